use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Default for Credentials {
    fn default() -> Self {
        Self {
            email: "testuser.apitest@gmail.com".to_string(),
            password: "TestPassword123!".to_string(),
        }
    }
}

/// Request body for `POST /api/draws/save`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DrawFixture {
    pub black_card_id: String,
    pub white_card_id: String,
    pub black_card_title: String,
    pub white_card_title: String,
}

impl Default for DrawFixture {
    fn default() -> Self {
        Self {
            black_card_id: "demo_black_1".to_string(),
            white_card_id: "demo_white_1".to_string(),
            black_card_title: "What moment from today are you grateful for?".to_string(),
            white_card_title: "Share a childhood memory that shaped you".to_string(),
        }
    }
}

/// Request body for `POST /api/admin/cards`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCardFixture {
    pub color: String,
    pub title: String,
    pub hint: String,
    pub language: String,
    pub is_demo: bool,
    pub is_active: bool,
}

impl Default for NewCardFixture {
    fn default() -> Self {
        Self {
            color: "black".to_string(),
            title: "Test Card Title".to_string(),
            hint: "This is a test hint".to_string(),
            language: "en".to_string(),
            is_demo: false,
            is_active: true,
        }
    }
}
