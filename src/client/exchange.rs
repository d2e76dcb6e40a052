use anyhow::{Context, Result};
use reqwest::StatusCode;
use reqwest::header::{CONTENT_TYPE, SET_COOKIE};
use serde_json::Value;

/// A fully-read HTTP response: status, raw text, and the body parsed as JSON
/// when it parses.
#[derive(Clone, Debug)]
pub struct Exchange {
    status: StatusCode,
    content_type: Option<String>,
    set_cookies: Vec<String>,
    text: String,
    json: Option<Value>,
}

impl Exchange {
    pub(super) fn read(resp: reqwest::blocking::Response) -> Result<Self> {
        let status = resp.status();
        let headers = resp.headers();
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let set_cookies = headers
            .get_all(SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .map(str::to_string)
            .collect();
        let text = resp.text().context("read body")?;
        Ok(Self::assemble(status, content_type, set_cookies, text))
    }

    /// Build an exchange from already-known parts.
    pub fn from_parts(status: StatusCode, content_type: Option<&str>, text: &str) -> Self {
        Self::assemble(
            status,
            content_type.map(str::to_string),
            Vec::new(),
            text.to_string(),
        )
    }

    fn assemble(
        status: StatusCode,
        content_type: Option<String>,
        set_cookies: Vec<String>,
        text: String,
    ) -> Self {
        let json = serde_json::from_str(&text).ok();
        Self {
            status,
            content_type,
            set_cookies,
            text,
            json,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn json(&self) -> Option<&Value> {
        self.json.as_ref()
    }

    pub fn set_cookies(&self) -> &[String] {
        &self.set_cookies
    }

    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("application/json"))
    }

    /// The server's error text: the JSON `error` string when the body is a JSON
    /// object carrying one, otherwise the raw body verbatim.
    pub fn error_message(&self) -> String {
        self.json
            .as_ref()
            .and_then(|v| v.get("error"))
            .and_then(|e| e.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| self.text.clone())
    }

    /// Error payload worth sampling: the JSON body for JSON responses,
    /// otherwise `{"error": <raw text>}`.
    pub fn error_body(&self) -> Value {
        match (&self.json, self.is_json()) {
            (Some(v), true) => v.clone(),
            _ => serde_json::json!({ "error": self.text }),
        }
    }
}

#[cfg(test)]
#[path = "../tests/client/exchange_tests.rs"]
mod tests;
