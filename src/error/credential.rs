use thiserror::Error;

/// Errors related to registering or logging in with a passkey.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    /// The passkey server did not verify the registration.
    #[error("registration not verified")]
    RegistrationNotVerified,
    /// The passkey server did not verify the login.
    #[error("login not verified")]
    LoginNotVerified,
    /// Neither the ceremony nor the passkey server provided a public key.
    #[error("credential is missing a public key")]
    MissingPublicKey,
    /// The credential has no id.
    #[error("credential is missing an authenticator id")]
    MissingAuthenticatorId,
    /// The authenticator id is not valid base64url.
    #[error("invalid authenticator id {0:?}")]
    InvalidAuthenticatorId(String),
}
