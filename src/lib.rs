//! # Passkey Validator
//!
//! WebAuthn (passkey) signing for ERC-7579 modular smart accounts.
//!
//! - [`credential`] registers or logs in with a passkey and derives its [`types::WebAuthnKey`].
//! - [`webauthn`] normalizes assertion signatures, locates the response type in client data
//!   and derives public key coordinates.
//! - [`validator`] exposes the validator module: init data, stub signature and signing.

pub mod cli;
pub mod config;
pub mod constants;
pub mod credential;
pub mod error;
pub mod serde;
pub mod server;
pub mod signers;
pub mod types;
pub mod validator;
pub mod webauthn;

pub use error::ValidatorError;

/// Result alias defaulting to [`ValidatorError`].
pub type Result<T, E = ValidatorError> = std::result::Result<T, E>;
