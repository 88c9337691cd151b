//! Authenticators and module signers.

use crate::types::{
    AuthenticationCredential, CredentialCreationOptions, CredentialRequestOptions,
    RegistrationCredential, SignableMessage,
};
use alloy::primitives::Bytes;

mod p256;
pub use p256::P256Key;

mod webauthn;
pub use webauthn::SoftAuthenticator;

/// A WebAuthn authenticator able to run the create and get ceremonies.
///
/// In a browser this is `navigator.credentials`; natively it is the platform passkey API.
/// Ceremonies may suspend indefinitely while waiting for the user.
#[async_trait::async_trait]
pub trait Authenticator: std::fmt::Debug + Send + Sync {
    /// Runs the credential creation ceremony.
    async fn create(
        &self,
        options: &CredentialCreationOptions,
    ) -> eyre::Result<RegistrationCredential>;

    /// Runs the assertion ceremony.
    async fn get(&self, options: &CredentialRequestOptions)
    -> eyre::Result<AuthenticationCredential>;
}

/// Trait for the signer of an ERC-7579 validator module.
#[async_trait::async_trait]
pub trait ModuleSigner: std::fmt::Debug + Send + Sync {
    /// Signs a user operation hash.
    ///
    /// Returns the signature in the layout the validator contract decodes.
    async fn sign_user_op_hash(&self, message: SignableMessage) -> crate::Result<Bytes>;

    /// Returns a placeholder signature with the byte shape of a real one.
    fn stub_signature(&self) -> Bytes;
}
