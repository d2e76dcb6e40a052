use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::{Credentials, DrawFixture, NewCardFixture};

pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Everything the runner needs to know before the first request goes out.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HarnessConfig {
    pub base_url: String,
    pub credentials: Credentials,
    pub draw: DrawFixture,
    pub new_card: NewCardFixture,

    /// Minimum number of demo cards a listing must return.
    pub min_demo_cards: usize,

    /// Per-request timeout. `None` leaves the HTTP client's default in place.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            credentials: Credentials::default(),
            draw: DrawFixture::default(),
            new_card: NewCardFixture::default(),
            min_demo_cards: 3,
            request_timeout_secs: None,
        }
    }
}

impl HarnessConfig {
    /// Read a JSON config file. Absent fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read config {}", path.display()))?;
        let cfg: HarnessConfig = serde_json::from_slice(&bytes)
            .with_context(|| format!("parse config {}", path.display()))?;
        Ok(cfg)
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn validate(&self) -> Result<()> {
        let url = self.base_url.trim();
        if url.is_empty() {
            anyhow::bail!("base_url is empty");
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            anyhow::bail!("base_url must start with http:// or https:// (got {})", url);
        }
        if self.min_demo_cards == 0 {
            anyhow::bail!("min_demo_cards must be at least 1");
        }
        Ok(())
    }

    /// `{base_url}/api`, without a doubled slash.
    pub fn api_base(&self) -> String {
        format!("{}/api", self.base_url.trim().trim_end_matches('/'))
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
