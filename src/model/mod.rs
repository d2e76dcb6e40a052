mod card;
mod draw;
mod fixtures;
mod result;
mod user;

pub use self::card::{Card, demo_card_count};
pub use self::draw::DrawRecord;
pub use self::fixtures::{Credentials, DrawFixture, NewCardFixture};
pub use self::result::{TestResult, Verdict};
pub use self::user::SessionUser;

/// Truthiness of an optional JSON flag: only a literal `true` counts.
pub(crate) fn flag_set(v: Option<&serde_json::Value>) -> bool {
    matches!(v, Some(serde_json::Value::Bool(true)))
}

/// First non-null string among several spellings of the same key.
pub(crate) fn first_str(v: &serde_json::Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| v.get(*k))
        .find_map(|x| x.as_str())
        .map(str::to_string)
}
