use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::flag_set;

/// A card as returned by `GET /api/cards` and `GET /api/admin/cards`.
///
/// The server is inconsistent about the demo flag: some routes emit the raw
/// column name `isdemo`, others `isDemo`. Both are folded into `is_demo`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawCard")]
pub struct Card {
    pub id: Option<Value>,
    pub title: Option<String>,
    pub color: Option<String>,
    pub is_demo: bool,
}

#[derive(Deserialize)]
struct RawCard {
    #[serde(default)]
    id: Option<Value>,
    #[serde(default)]
    title: Option<Value>,
    #[serde(default)]
    color: Option<Value>,
    #[serde(default)]
    isdemo: Option<Value>,
    #[serde(default, rename = "isDemo")]
    is_demo: Option<Value>,
}

impl From<RawCard> for Card {
    fn from(raw: RawCard) -> Self {
        Card {
            id: raw.id.filter(|v| !v.is_null()),
            title: raw.title.and_then(|v| v.as_str().map(str::to_string)),
            color: raw.color.and_then(|v| v.as_str().map(str::to_string)),
            is_demo: flag_set(raw.isdemo.as_ref()) || flag_set(raw.is_demo.as_ref()),
        }
    }
}

impl Card {
    /// Parse one listing entry. Entries that are not JSON objects yield `None`.
    pub fn from_value(v: &Value) -> Option<Card> {
        if !v.is_object() {
            return None;
        }
        serde_json::from_value(v.clone()).ok()
    }
}

/// Number of entries that parse as cards with the demo flag set.
pub fn demo_card_count(entries: &[Value]) -> usize {
    entries
        .iter()
        .filter_map(Card::from_value)
        .filter(|c| c.is_demo)
        .count()
}

#[cfg(test)]
#[path = "../tests/model/card_tests.rs"]
mod tests;
