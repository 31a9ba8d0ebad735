use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Credentials posted to the login endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Body returned by a successful login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub token: String,

    /// Opaque user profile, persisted as-is
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Value>,
}

impl LoginResponse {
    /// Username reported by the service, if the profile carries one
    pub fn reported_username(&self) -> Option<&str> {
        self.user
            .as_ref()
            .and_then(|user| user.get("username"))
            .and_then(Value::as_str)
            .filter(|name| !name.is_empty())
    }
}

/// Payload posted to the registration endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}
