//! Types for the identity service

use serde::{Deserialize, Serialize};

/// Token response of sign-up and the sign-in endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    pub id_token: String,

    #[serde(default)]
    pub refresh_token: String,

    /// Lifetime in seconds, encoded as a string by the service
    #[serde(default)]
    pub expires_in: Option<String>,

    pub local_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub registered: Option<bool>,
}

/// Account record returned by a lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountInfo {
    pub local_id: String,

    #[serde(default)]
    pub email: Option<String>,

    #[serde(default)]
    pub email_verified: bool,

    #[serde(default)]
    pub phone_number: Option<String>,

    #[serde(default)]
    pub display_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LookupResponse {
    #[serde(default)]
    pub users: Vec<AccountInfo>,
}

/// Handle for a pending phone-number verification.
///
/// Returned by [`IdentityClient::send_phone_code`](super::IdentityClient::send_phone_code)
/// and handed back explicitly to confirm the code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhoneVerification {
    pub session_info: String,
    pub phone_number: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendCodeResponse {
    pub session_info: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorBody {
    pub error: ServiceErrorDetail,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ServiceErrorDetail {
    #[serde(default)]
    pub message: String,
}
