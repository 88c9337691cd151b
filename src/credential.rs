//! Passkey registration and login.
//!
//! Both flows end in a [`WebAuthnKey`]: the public key of the credential and the hash of its id,
//! which is everything the validator module needs to be installed.

use crate::{
    error::{CredentialError, ValidatorError},
    server::PasskeyServer,
    signers::Authenticator,
    types::WebAuthnKey,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

/// Whether to create a new passkey or use an existing one.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WebAuthnMode {
    /// Create a new credential.
    #[default]
    Register,
    /// Authenticate with an existing credential.
    Login,
}

/// Parameters of [`to_webauthn_key`].
#[derive(Debug, Clone, Default)]
pub struct WebAuthnKeyRequest {
    /// Name of the passkey, used as the username on the passkey server.
    pub passkey_name: String,
    /// Which flow to run.
    pub mode: WebAuthnMode,
    /// A previously obtained key. When set, no flow runs.
    pub webauthn_key: Option<WebAuthnKey>,
    /// Overrides the relying party id in the server supplied options.
    pub rp_id: Option<String>,
}

impl WebAuthnKeyRequest {
    /// A registration request for a new passkey.
    pub fn register(passkey_name: impl Into<String>) -> Self {
        Self {
            passkey_name: passkey_name.into(),
            mode: WebAuthnMode::Register,
            ..Default::default()
        }
    }

    /// A login request with an existing passkey.
    pub fn login() -> Self {
        Self { mode: WebAuthnMode::Login, ..Default::default() }
    }

    /// Reuses a previously obtained key.
    pub fn with_webauthn_key(mut self, key: WebAuthnKey) -> Self {
        self.webauthn_key = Some(key);
        self
    }

    /// Sets the relying party id.
    pub fn with_rp_id(mut self, rp_id: impl Into<String>) -> Self {
        self.rp_id = Some(rp_id.into());
        self
    }
}

/// Registers or logs in with a passkey and returns its [`WebAuthnKey`].
///
/// Returns the supplied key unchanged, without any network or authenticator call, if the
/// request already carries one.
pub async fn to_webauthn_key(
    request: WebAuthnKeyRequest,
    server: &dyn PasskeyServer,
    authenticator: &dyn Authenticator,
) -> Result<WebAuthnKey, ValidatorError> {
    if let Some(key) = request.webauthn_key {
        debug!(authenticator_id = key.authenticator_id(), "Reusing webauthn key");
        return Ok(key);
    }

    match request.mode {
        WebAuthnMode::Register => {
            register(&request.passkey_name, request.rp_id.as_deref(), server, authenticator).await
        }
        WebAuthnMode::Login => login(request.rp_id.as_deref(), server, authenticator).await,
    }
}

/// Creates a new passkey and registers it with the passkey server.
#[instrument(skip(server, authenticator))]
pub async fn register(
    passkey_name: &str,
    rp_id: Option<&str>,
    server: &dyn PasskeyServer,
    authenticator: &dyn Authenticator,
) -> Result<WebAuthnKey, ValidatorError> {
    let mut options = server.register_options(passkey_name).await?;
    if let Some(rp_id) = rp_id {
        options.rp.id = Some(rp_id.to_string());
    }
    debug!(user_id = %options.user.id, "Received registration options");

    let credential = authenticator.create(&options).await.map_err(ValidatorError::Authenticator)?;
    if credential.id.is_empty() {
        return Err(CredentialError::MissingAuthenticatorId.into());
    }

    let verification = server.register_verify(&options.user.id, passkey_name, &credential).await?;
    if !verification.verified {
        return Err(CredentialError::RegistrationNotVerified.into());
    }

    let public_key =
        credential.response.public_key.as_deref().ok_or(CredentialError::MissingPublicKey)?;
    let key = WebAuthnKey::from_spki(public_key, credential.id)?;

    info!(authenticator_id_hash = %key.authenticator_id_hash(), "Registered passkey");
    Ok(key)
}

/// Authenticates with an existing passkey and fetches its public key from the passkey server.
#[instrument(skip(server, authenticator))]
pub async fn login(
    rp_id: Option<&str>,
    server: &dyn PasskeyServer,
    authenticator: &dyn Authenticator,
) -> Result<WebAuthnKey, ValidatorError> {
    let mut options = server.login_options().await?;
    if let Some(rp_id) = rp_id {
        options.rp_id = Some(rp_id.to_string());
    }
    debug!(challenge = %options.challenge, "Received login options");

    let credential = authenticator.get(&options).await.map_err(ValidatorError::Authenticator)?;
    if credential.id.is_empty() {
        return Err(CredentialError::MissingAuthenticatorId.into());
    }

    let verification = server.login_verify(&credential).await?;
    if !verification.verification.verified {
        return Err(CredentialError::LoginNotVerified.into());
    }

    let public_key = verification.pubkey.as_deref().ok_or(CredentialError::MissingPublicKey)?;
    let key = WebAuthnKey::from_spki(public_key, credential.id)?;

    info!(authenticator_id_hash = %key.authenticator_id_hash(), "Logged in with passkey");
    Ok(key)
}
