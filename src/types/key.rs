use crate::{error::CredentialError, serde::base64url, webauthn::derive_public_key};
use alloy::primitives::{B256, U256, keccak256};
use serde::{Deserialize, Deserializer, Serialize};

/// A passkey public key together with its authenticator id.
///
/// The `authenticator_id_hash` is always `keccak256` of the raw bytes behind the base64url
/// `authenticator_id`. The key is immutable once constructed and may be cached by the caller
/// and handed back to skip registration or login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WebAuthnKey {
    pub_x: U256,
    pub_y: U256,
    authenticator_id: String,
    authenticator_id_hash: B256,
}

impl WebAuthnKey {
    /// Creates a key from its coordinates and base64url authenticator id.
    pub fn new(
        pub_x: U256,
        pub_y: U256,
        authenticator_id: impl Into<String>,
    ) -> Result<Self, CredentialError> {
        let authenticator_id = authenticator_id.into();
        let authenticator_id_hash = Self::hash_authenticator_id(&authenticator_id)?;
        Ok(Self { pub_x, pub_y, authenticator_id, authenticator_id_hash })
    }

    /// Creates a key from a base64 SubjectPublicKeyInfo and a base64url authenticator id.
    pub fn from_spki(spki: &str, authenticator_id: impl Into<String>) -> crate::Result<Self> {
        let (pub_x, pub_y) = derive_public_key(spki)?;
        Ok(Self::new(pub_x, pub_y, authenticator_id)?)
    }

    /// Computes `keccak256(base64url_decode(authenticator_id))`.
    pub fn hash_authenticator_id(authenticator_id: &str) -> Result<B256, CredentialError> {
        if authenticator_id.is_empty() {
            return Err(CredentialError::MissingAuthenticatorId);
        }
        let raw = base64url::decode_any(authenticator_id)
            .ok_or_else(|| CredentialError::InvalidAuthenticatorId(authenticator_id.to_string()))?;
        Ok(keccak256(raw))
    }

    /// The x coordinate of the public key.
    pub fn pub_x(&self) -> U256 {
        self.pub_x
    }

    /// The y coordinate of the public key.
    pub fn pub_y(&self) -> U256 {
        self.pub_y
    }

    /// The base64url credential id.
    pub fn authenticator_id(&self) -> &str {
        &self.authenticator_id
    }

    /// `keccak256` of the raw credential id.
    pub fn authenticator_id_hash(&self) -> B256 {
        self.authenticator_id_hash
    }
}

impl<'de> Deserialize<'de> for WebAuthnKey {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(rename_all = "camelCase")]
        struct Raw {
            pub_x: U256,
            pub_y: U256,
            authenticator_id: String,
            authenticator_id_hash: Option<B256>,
        }

        let raw = Raw::deserialize(deserializer)?;
        let key = Self::new(raw.pub_x, raw.pub_y, raw.authenticator_id)
            .map_err(serde::de::Error::custom)?;
        if let Some(hash) = raw.authenticator_id_hash
            && hash != key.authenticator_id_hash
        {
            return Err(serde::de::Error::custom(format!(
                "authenticator id hash mismatch, expected {}, got {hash}",
                key.authenticator_id_hash
            )));
        }
        Ok(key)
    }
}
