use serde::{Deserialize, Serialize};

/// Authenticated session for the analysis API
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque bearer token issued by the backend
    pub token: String,
    /// Signed-in user identity
    pub email: String,
}

impl Session {
    pub fn new(token: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            email: email.into(),
        }
    }

    /// Text for the signed-in badge
    pub fn badge(&self) -> String {
        format!("Signed in: {}", self.email)
    }
}
