use serde_json::Value;

/// The `user` object returned by the auth endpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SessionUser {
    pub id: Option<Value>,
    pub email: Option<String>,
    pub has_paid_access: Option<Value>,
}

impl SessionUser {
    /// Extract `body.user`. A missing or `null` user yields `None`.
    pub fn from_body(body: &Value) -> Option<SessionUser> {
        let user = body.get("user").filter(|u| !u.is_null())?;
        Some(SessionUser {
            id: user.get("id").filter(|x| !x.is_null()).cloned(),
            email: user.get("email").and_then(|e| e.as_str()).map(str::to_string),
            has_paid_access: user.get("hasPaidAccess").cloned(),
        })
    }

    /// The id rendered as a plain string, so numeric and string ids compare equal.
    pub fn id_string(&self) -> Option<String> {
        self.id.as_ref().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        })
    }
}
