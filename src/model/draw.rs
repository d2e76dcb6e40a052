use serde::Serialize;
use serde_json::Value;

use super::first_str;

/// A saved draw as echoed back by `POST /api/draws/save`.
///
/// Title columns come back lower-cased from the database on some deployments
/// (`blackcardtitle`) and camel-cased on others.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DrawRecord {
    pub id: Option<Value>,
    pub black_card_title: Option<String>,
    pub white_card_title: Option<String>,
}

impl DrawRecord {
    pub fn from_value(v: &Value) -> DrawRecord {
        DrawRecord {
            id: v.get("id").filter(|x| !x.is_null()).cloned(),
            black_card_title: first_str(v, &["blackcardtitle", "blackCardTitle"]),
            white_card_title: first_str(v, &["whitecardtitle", "whiteCardTitle"]),
        }
    }
}
