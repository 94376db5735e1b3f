//! Signed-in session state

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::types::TokenResponse;

/// Session data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthSession {
    /// Token sent as bearer to the document service
    pub id_token: String,

    pub refresh_token: String,

    pub user_id: String,

    pub email: Option<String>,

    /// The expiry time in seconds
    pub expires_in: i64,

    /// The expiry timestamp
    pub expires_at: Option<i64>,
}

impl AuthSession {
    /// Create a new session
    pub fn new(id_token: String, refresh_token: String, user_id: String, expires_in: i64) -> Self {
        Self {
            id_token,
            refresh_token,
            user_id,
            email: None,
            expires_in,
            expires_at: Some(Utc::now().timestamp() + expires_in),
        }
    }

    /// Check if the session has expired
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires_at) => Utc::now().timestamp() >= expires_at,
            None => false,
        }
    }
}

impl From<TokenResponse> for AuthSession {
    fn from(response: TokenResponse) -> Self {
        let expires_in = response
            .expires_in
            .as_deref()
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or(3600);
        let mut session = Self::new(
            response.id_token,
            response.refresh_token,
            response.local_id,
            expires_in,
        );
        session.email = response.email;
        session
    }
}
