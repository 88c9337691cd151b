use serde::{Deserialize, Serialize};

/// Response of `/register/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterVerifyResponse {
    /// Whether the server accepted the registration.
    pub verified: bool,
}

/// The verification outcome nested in `/login/verify` responses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginVerification {
    /// Whether the server accepted the assertion.
    pub verified: bool,
}

/// Response of `/login/verify`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginVerifyResponse {
    /// The verification outcome.
    pub verification: LoginVerification,
    /// Base64 SubjectPublicKeyInfo stored at registration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    /// The user the credential belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
}
