//! A software authenticator holding its P256 key in memory.

use super::{
    Authenticator,
    p256::{P256Key, load_signing_key},
};
use crate::{
    constants::{WEBAUTHN_CREATE_TYPE, WEBAUTHN_GET_TYPE},
    serde::base64url,
    types::{
        AssertionResponse, AttestationResponse, AuthenticationCredential,
        CredentialCreationOptions, CredentialRequestOptions, PUBLIC_KEY_CREDENTIAL_TYPE,
        RegistrationCredential,
    },
};
use alloy::primitives::{B256, Bytes};
use ciborium::Value;
use p256::ecdsa::SigningKey;
use serde::Serialize;
use serde_json::Map;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::debug;

/// User present.
const FLAG_UP: u8 = 0x01;
/// User verified.
const FLAG_UV: u8 = 0x04;
/// Attested credential data included.
const FLAG_AT: u8 = 0x40;

/// COSE algorithm id of ES256.
const COSE_ES256: i64 = -7;

/// The client data members in the order browsers emit them.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CollectedClientData<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    challenge: &'a str,
    origin: &'a str,
    cross_origin: bool,
}

/// Abstraction over a P256 signer with webauthn capabilities.
///
/// Produces the same artifacts as a platform authenticator: client data JSON, authenticator
/// data and a DER signature over `sha256(authenticatorData || sha256(clientDataJSON))`.
/// Useful for tests, tooling and gas estimation, never for holding real user funds.
#[derive(Debug, Clone)]
pub struct SoftAuthenticator {
    key: Arc<SigningKey>,
    credential_id: Bytes,
    rp_id: String,
    origin: String,
}

impl SoftAuthenticator {
    /// Loads a P256 key.
    ///
    /// The credential id is derived from the key so that reloading the same key yields the same
    /// credential.
    pub fn load(key: &B256, rp_id: impl Into<String>) -> eyre::Result<Self> {
        let credential_id = Bytes::copy_from_slice(&Sha256::digest(key.as_slice())[..16]);
        let rp_id = rp_id.into();
        Ok(Self {
            key: Arc::new(load_signing_key(key)?),
            credential_id,
            origin: format!("https://{rp_id}"),
            rp_id,
        })
    }

    /// Creates an authenticator with a fresh random key.
    pub fn random(rp_id: impl Into<String>) -> Self {
        let key = SigningKey::random(&mut rand::thread_rng());
        let credential_id = Bytes::copy_from_slice(&Sha256::digest(key.to_bytes())[..16]);
        let rp_id = rp_id.into();
        Self { key: Arc::new(key), credential_id, origin: format!("https://{rp_id}"), rp_id }
    }

    /// Sets the origin reported in client data.
    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }

    /// The base64url credential id.
    pub fn credential_id(&self) -> String {
        base64url::encode(&self.credential_id)
    }

    fn client_data_json(&self, kind: &str, challenge: &str) -> eyre::Result<String> {
        Ok(serde_json::to_string(&CollectedClientData {
            kind,
            challenge,
            origin: &self.origin,
            cross_origin: false,
        })?)
    }

    /// rpIdHash || flags || signCount
    fn authenticator_data(&self, rp_id: &str, flags: u8) -> Vec<u8> {
        let mut data = Vec::with_capacity(37);
        data.extend_from_slice(&Sha256::digest(rp_id.as_bytes()));
        data.push(flags);
        data.extend_from_slice(&0u32.to_be_bytes());
        data
    }

    /// The credential public key as a COSE_Key map.
    fn cose_key(&self) -> eyre::Result<Vec<u8>> {
        let raw = self.public_key();
        let cose_key = Value::Map(vec![
            (Value::Integer(1.into()), Value::Integer(2.into())), // kty: EC2
            (Value::Integer(3.into()), Value::Integer(COSE_ES256.into())), // alg
            (Value::Integer((-1).into()), Value::Integer(1.into())), // crv: P-256
            (Value::Integer((-2).into()), Value::Bytes(raw[..32].to_vec())), // x
            (Value::Integer((-3).into()), Value::Bytes(raw[32..].to_vec())), // y
        ]);

        let mut bytes = Vec::new();
        ciborium::into_writer(&cose_key, &mut bytes)?;
        Ok(bytes)
    }

    /// A `none` attestation object wrapping `auth_data`.
    fn attestation_object(auth_data: Vec<u8>) -> eyre::Result<Vec<u8>> {
        let object = Value::Map(vec![
            (Value::Text("fmt".to_string()), Value::Text("none".to_string())),
            (Value::Text("attStmt".to_string()), Value::Map(Vec::new())),
            (Value::Text("authData".to_string()), Value::Bytes(auth_data)),
        ]);

        let mut bytes = Vec::new();
        ciborium::into_writer(&object, &mut bytes)?;
        Ok(bytes)
    }
}

impl P256Key for SoftAuthenticator {
    fn signing_key(&self) -> &SigningKey {
        &self.key
    }
}

#[async_trait::async_trait]
impl Authenticator for SoftAuthenticator {
    async fn create(
        &self,
        options: &CredentialCreationOptions,
    ) -> eyre::Result<RegistrationCredential> {
        if !options.pub_key_cred_params.is_empty()
            && !options.pub_key_cred_params.iter().any(|param| param.alg == COSE_ES256)
        {
            eyre::bail!("ES256 is not an accepted algorithm");
        }
        let rp_id = options.rp.id.as_deref().unwrap_or(&self.rp_id);
        let client_data_json = self.client_data_json(WEBAUTHN_CREATE_TYPE, &options.challenge)?;

        let mut auth_data = self.authenticator_data(rp_id, FLAG_UP | FLAG_UV | FLAG_AT);
        auth_data.extend_from_slice(&[0u8; 16]); // aaguid
        auth_data.extend_from_slice(&(self.credential_id.len() as u16).to_be_bytes());
        auth_data.extend_from_slice(&self.credential_id);
        auth_data.extend_from_slice(&self.cose_key()?);

        debug!(credential_id = %self.credential_id(), rp_id, "Created soft credential");

        Ok(RegistrationCredential {
            id: self.credential_id(),
            raw_id: self.credential_id(),
            kind: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            response: AttestationResponse {
                client_data_json: client_data_json.into_bytes().into(),
                attestation_object: Self::attestation_object(auth_data)?.into(),
                public_key: Some(self.spki()?),
                public_key_algorithm: Some(COSE_ES256),
                transports: vec!["internal".to_string()],
            },
            client_extension_results: Map::new(),
        })
    }

    async fn get(
        &self,
        options: &CredentialRequestOptions,
    ) -> eyre::Result<AuthenticationCredential> {
        let id = self.credential_id();
        if !options.allow_credentials.is_empty()
            && !options.allow_credentials.iter().any(|descriptor| descriptor.id == id)
        {
            eyre::bail!("no allowed credential available on this authenticator");
        }
        let rp_id = options.rp_id.as_deref().unwrap_or(&self.rp_id);

        let authenticator_data = self.authenticator_data(rp_id, FLAG_UP | FLAG_UV);
        let client_data_json = self.client_data_json(WEBAUTHN_GET_TYPE, &options.challenge)?;

        // Build digest: SHA256(authenticatorData || SHA256(clientDataJSON))
        let mut hasher = Sha256::new();
        hasher.update(&authenticator_data);
        hasher.update(Sha256::digest(client_data_json.as_bytes()));
        let digest = hasher.finalize();

        let signature = self.sign_prehash(&digest)?;

        Ok(AuthenticationCredential {
            raw_id: id.clone(),
            id,
            kind: PUBLIC_KEY_CREDENTIAL_TYPE.to_string(),
            response: AssertionResponse {
                client_data_json: client_data_json.into_bytes().into(),
                authenticator_data: authenticator_data.into(),
                signature: signature.to_der().as_bytes().to_vec().into(),
                user_handle: None,
            },
            client_extension_results: Map::new(),
        })
    }
}
