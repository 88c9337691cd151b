//! Passkey server integration.
//!
//! The passkey server owns the relying party: it issues challenges, verifies ceremonies and
//! stores the public keys of registered credentials.

mod client;
pub use client::HttpPasskeyServer;

mod types;
pub use types::{LoginVerification, LoginVerifyResponse, RegisterVerifyResponse};

use crate::{
    error::ServerError,
    types::{
        AuthenticationCredential, CredentialCreationOptions, CredentialRequestOptions,
        RegistrationCredential,
    },
};

/// The four endpoints of a passkey server.
#[async_trait::async_trait]
pub trait PasskeyServer: std::fmt::Debug + Send + Sync {
    /// `POST /register/options`
    async fn register_options(
        &self,
        username: &str,
    ) -> Result<CredentialCreationOptions, ServerError>;

    /// `POST /register/verify`
    async fn register_verify(
        &self,
        user_id: &str,
        username: &str,
        credential: &RegistrationCredential,
    ) -> Result<RegisterVerifyResponse, ServerError>;

    /// `POST /login/options`
    async fn login_options(&self) -> Result<CredentialRequestOptions, ServerError>;

    /// `POST /login/verify`
    async fn login_verify(
        &self,
        credential: &AuthenticationCredential,
    ) -> Result<LoginVerifyResponse, ServerError>;
}
