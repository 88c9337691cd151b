//! Passkey validator error types.
use thiserror::Error;

mod credential;
pub use credential::CredentialError;

mod server;
pub use server::ServerError;

mod signature;
pub use signature::SignatureError;

/// The overarching error type returned by the validator and the credential flows.
#[derive(Debug, Error)]
pub enum ValidatorError {
    /// Errors related to signature and key encodings.
    #[error(transparent)]
    Signature(#[from] SignatureError),
    /// Errors related to registration and login of credentials.
    #[error(transparent)]
    Credential(#[from] CredentialError),
    /// Errors related to the passkey server.
    #[error(transparent)]
    Server(#[from] ServerError),
    /// The message to sign is neither a string nor a byte-array-like value.
    #[error("unsupported message format, expected a string or {{ raw: hex | bytes }}")]
    UnsupportedMessageFormat,
    /// The account client has no active chain.
    #[error("chain id is not available on the account client")]
    ChainIdUnavailable,
    /// The platform authenticator failed to complete the ceremony.
    #[error("authenticator ceremony failed: {0}")]
    Authenticator(eyre::Error),
    /// An error occurred during ABI encoding/decoding.
    #[error(transparent)]
    Abi(#[from] alloy::sol_types::Error),
}

impl ValidatorError {
    /// Whether the error is [`ValidatorError::ChainIdUnavailable`].
    pub fn is_chain_id_unavailable(&self) -> bool {
        matches!(self, Self::ChainIdUnavailable)
    }

    /// Returns the inner [`CredentialError`], if any.
    pub fn as_credential(&self) -> Option<&CredentialError> {
        match self {
            Self::Credential(err) => Some(err),
            _ => None,
        }
    }
}

