use serde::Serialize;
use serde_json::Value;

/// Outcome of classifying one response, before it is stamped and recorded.
#[derive(Clone, Debug, PartialEq)]
pub struct Verdict {
    pub success: bool,
    pub message: String,
    pub sample: Option<Value>,
}

impl Verdict {
    pub fn pass(message: impl Into<String>, sample: Option<Value>) -> Self {
        Self {
            success: true,
            message: message.into(),
            sample,
        }
    }

    pub fn fail(message: impl Into<String>, sample: Option<Value>) -> Self {
        Self {
            success: false,
            message: message.into(),
            sample,
        }
    }
}

/// One recorded contract case. Fields are read-only once constructed.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TestResult {
    name: String,
    success: bool,
    message: String,
    timestamp: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    sampled_response: Option<Value>,
}

impl TestResult {
    pub fn new(name: impl Into<String>, verdict: Verdict) -> Self {
        Self::at(name, verdict, now_rfc3339())
    }

    pub(crate) fn at(name: impl Into<String>, verdict: Verdict, timestamp: String) -> Self {
        Self {
            name: name.into(),
            success: verdict.success,
            message: verdict.message,
            timestamp,
            sampled_response: verdict.sample,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn success(&self) -> bool {
        self.success
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn sampled_response(&self) -> Option<&Value> {
        self.sampled_response.as_ref()
    }
}

fn now_rfc3339() -> String {
    let now = time::OffsetDateTime::now_utc();
    now.format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| now.unix_timestamp().to_string())
}
