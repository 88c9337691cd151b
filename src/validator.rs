//! The WebAuthn validator module.

use crate::{
    constants::WEBAUTHN_VALIDATOR_ADDRESS,
    error::ValidatorError,
    signers::{Authenticator, ModuleSigner},
    types::{
        CredentialRequestOptions, ModuleInitData, ModuleType, PrecompileChains, SignableMessage,
        ValidatorModule, WebAuthnKey, WebAuthnSignature, encode_init_data,
    },
    webauthn::{locate_response_type, normalize_der_signature},
};
use alloy::primitives::{Address, Bytes, ChainId, U256};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, instrument};

/// A WebAuthn validator module bound to one passkey.
///
/// Cheap to clone.
#[derive(Debug, Clone)]
pub struct PasskeyValidator {
    inner: Arc<PasskeyValidatorInner>,
}

#[derive(Debug, Clone)]
struct PasskeyValidatorInner {
    key: WebAuthnKey,
    authenticator: Arc<dyn Authenticator>,
    address: Address,
    account_address: Address,
    chain_id: Option<ChainId>,
    rp_id: Option<String>,
    precompile_chains: PrecompileChains,
}

impl PasskeyValidator {
    /// Creates a validator for `key`, signing through `authenticator`.
    pub fn new(key: WebAuthnKey, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            inner: Arc::new(PasskeyValidatorInner {
                key,
                authenticator,
                address: WEBAUTHN_VALIDATOR_ADDRESS,
                account_address: Address::ZERO,
                chain_id: None,
                rp_id: None,
                precompile_chains: PrecompileChains::default(),
            }),
        }
    }

    fn inner_mut(&mut self) -> &mut PasskeyValidatorInner {
        Arc::make_mut(&mut self.inner)
    }

    /// Sets the validator module address.
    pub fn with_address(mut self, address: Address) -> Self {
        self.inner_mut().address = address;
        self
    }

    /// Sets the account the module is installed on.
    pub fn with_account_address(mut self, account_address: Address) -> Self {
        self.inner_mut().account_address = account_address;
        self
    }

    /// Sets the active chain of the account client.
    pub fn with_chain_id(mut self, chain_id: Option<ChainId>) -> Self {
        self.inner_mut().chain_id = chain_id;
        self
    }

    /// Sets the relying party id used for assertions.
    pub fn with_rp_id(mut self, rp_id: Option<String>) -> Self {
        self.inner_mut().rp_id = rp_id;
        self
    }

    /// Sets the chains that support the P-256 precompile.
    pub fn with_precompile_chains(mut self, precompile_chains: PrecompileChains) -> Self {
        self.inner_mut().precompile_chains = precompile_chains;
        self
    }

    /// The passkey backing this validator.
    pub fn key(&self) -> &WebAuthnKey {
        &self.inner.key
    }

    /// The validator module address.
    pub fn address(&self) -> Address {
        self.inner.address
    }

    /// The active chain, if known.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.inner.chain_id
    }

    /// Data passed to `onInstall`.
    pub fn init_data(&self) -> Bytes {
        encode_init_data(&self.inner.key)
    }

    /// Data passed to `onUninstall`. The validator keeps no state that needs cleanup.
    pub fn de_init_data(&self) -> Bytes {
        Bytes::new()
    }

    /// The install descriptor, carrying the same init data as [`Self::init_data`].
    pub fn module_init_data(&self) -> ModuleInitData {
        ModuleInitData {
            init_data: encode_init_data(&self.inner.key),
            address: self.inner.address,
            module_type: ModuleType::Validator,
        }
    }

    /// Whether signatures on `chain_id` are verified through the P-256 precompile.
    pub fn use_precompiled(&self, chain_id: ChainId) -> bool {
        self.inner.precompile_chains.contains(chain_id)
    }

    /// The module descriptor handed to the account SDK.
    pub fn module(&self) -> ValidatorModule {
        ValidatorModule {
            address: self.inner.address,
            account_address: self.inner.account_address,
            signer: Arc::new(self.clone()),
            init_data: self.init_data(),
            de_init_data: self.de_init_data(),
            module_init_data: self.module_init_data(),
        }
    }

    /// Signs an [EIP-191] personal message with the passkey.
    ///
    /// [EIP-191]: https://eips.ethereum.org/EIPS/eip-191
    pub async fn sign_message(&self, message: SignableMessage) -> crate::Result<Bytes> {
        self.sign_user_op_hash(message.eip191_hash().into()).await
    }

    /// Signs a user operation hash given as JSON, see [`SignableMessage::from_value`].
    ///
    /// Unlike [`Self::sign_message_value`] no EIP-191 prefix is applied.
    pub async fn sign_user_op_hash_value(&self, message: &Value) -> crate::Result<Bytes> {
        self.sign_user_op_hash(SignableMessage::from_value(message)?).await
    }

    /// Signs an EIP-191 message given as JSON, see [`SignableMessage::from_value`].
    pub async fn sign_message_value(&self, message: &Value) -> crate::Result<Bytes> {
        self.sign_message(SignableMessage::from_value(message)?).await
    }

    /// Asks the authenticator to sign `challenge` and packs the assertion.
    #[instrument(skip(self, challenge))]
    async fn sign_challenge(&self, chain_id: ChainId, challenge: &[u8]) -> crate::Result<Bytes> {
        let mut options =
            CredentialRequestOptions::for_challenge(challenge, self.inner.key.authenticator_id());
        options.rp_id = self.inner.rp_id.clone();

        let credential = self
            .inner
            .authenticator
            .get(&options)
            .await
            .map_err(ValidatorError::Authenticator)?;

        let client_data_json = credential.client_data_json().map_err(|err| {
            ValidatorError::Authenticator(eyre::eyre!("client data is not utf-8: {err}"))
        })?;
        let response_type_location = locate_response_type(&client_data_json)?;
        let (r, s) = normalize_der_signature(&credential.response.signature)?;
        let use_precompiled = self.use_precompiled(chain_id);

        debug!(response_type_location, use_precompiled, "Signed with passkey");

        Ok(WebAuthnSignature {
            authenticatorData: credential.response.authenticator_data,
            clientDataJSON: client_data_json,
            responseTypeLocation: U256::from(response_type_location),
            r,
            s,
            usePrecompiled: use_precompiled,
        }
        .encode())
    }
}

#[async_trait::async_trait]
impl ModuleSigner for PasskeyValidator {
    async fn sign_user_op_hash(&self, message: SignableMessage) -> crate::Result<Bytes> {
        let chain_id = self.inner.chain_id.ok_or(ValidatorError::ChainIdUnavailable)?;
        self.sign_challenge(chain_id, &message.challenge()).await
    }

    fn stub_signature(&self) -> Bytes {
        WebAuthnSignature::stub().encode()
    }
}
