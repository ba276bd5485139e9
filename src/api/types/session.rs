use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structure that holds the OAuth session
///
/// Serializable so callers can persist it between runs
#[allow(missing_docs)]
#[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub(crate) access_token: Option<String>,
    pub token_type: Option<String>,
    pub expires_in: Option<i64>,
    pub expires_at: Option<DateTime<Utc>>,
    pub scope: Option<String>,
    pub jti: Option<String>,
    pub error: Option<String>,
    pub error_description: Option<String>,
}

impl Session {
    /// Creates new empty Session
    pub fn new() -> Self {
        Default::default()
    }

    /// Get access token
    pub fn access_token(&self) -> Option<String> {
        self.access_token.clone()
    }

    /// Set access token
    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }

    /// Whether the token is still valid for more than `margin_secs`
    pub fn is_valid(&self, margin_secs: i64) -> bool {
        if self.access_token.is_none() {
            return false;
        }
        match self.expires_at {
            Some(exp) => (exp - Utc::now()).num_seconds() > margin_secs,
            None => false,
        }
    }

    /// Updates only the present values in the existing session
    pub fn update(&mut self, new: Session) {
        if let Some(n) = new.access_token {
            self.access_token = Some(n)
        }
        if let Some(n) = new.token_type {
            self.token_type = Some(n)
        }
        if let Some(n) = new.expires_in {
            self.expires_in = Some(n);
            if new.expires_at.is_none() {
                self.expires_at = Some(Utc::now() + chrono::Duration::seconds(n))
            }
        }
        if let Some(n) = new.expires_at {
            self.expires_at = Some(n)
        }
        if let Some(n) = new.scope {
            self.scope = Some(n)
        }
        if let Some(n) = new.jti {
            self.jti = Some(n)
        }
        self.error = new.error;
        self.error_description = new.error_description;
    }
}
