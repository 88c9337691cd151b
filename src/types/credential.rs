//! WebAuthn ceremony options and credentials in their JSON wire form.
//!
//! Binary members are unpadded base64url, as produced by browsers' `toJSON()` and consumed by
//! passkey servers.
use crate::serde::base64url;
use alloy::primitives::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The credential type of every passkey.
pub const PUBLIC_KEY_CREDENTIAL_TYPE: &str = "public-key";

fn public_key_type() -> String {
    PUBLIC_KEY_CREDENTIAL_TYPE.to_string()
}

/// The relying party of a registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelyingParty {
    /// Human readable name.
    pub name: String,
    /// Relying party id, usually the effective domain.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

/// The user a credential is registered for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntity {
    /// Server assigned user handle, base64url.
    pub id: String,
    /// Account name, here the passkey name.
    pub name: String,
    /// Display name.
    #[serde(default)]
    pub display_name: String,
}

/// A COSE algorithm accepted for the new credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialParameter {
    /// COSE algorithm identifier, `-7` for ES256.
    pub alg: i64,
    /// Always `public-key`.
    #[serde(rename = "type", default = "public_key_type")]
    pub kind: String,
}

/// Reference to an existing credential.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialDescriptor {
    /// Base64url credential id.
    pub id: String,
    /// Always `public-key`.
    #[serde(rename = "type", default = "public_key_type")]
    pub kind: String,
    /// Transport hints.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transports: Option<Vec<String>>,
}

impl CredentialDescriptor {
    /// A descriptor for the credential with the given base64url id.
    pub fn public_key(id: impl Into<String>) -> Self {
        Self { id: id.into(), kind: public_key_type(), transports: None }
    }
}

/// Relying party requirement on user verification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserVerification {
    /// The authenticator must verify the user.
    Required,
    /// Verification is preferred but not required.
    #[default]
    Preferred,
    /// Verification should be skipped.
    Discouraged,
}

/// Options for the credential creation ceremony, as returned by `/register/options`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialCreationOptions {
    /// Base64url challenge.
    pub challenge: String,
    /// The relying party.
    pub rp: RelyingParty,
    /// The user.
    pub user: UserEntity,
    /// Accepted algorithms.
    #[serde(default)]
    pub pub_key_cred_params: Vec<CredentialParameter>,
    /// Ceremony timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Members this crate does not interpret, passed to the authenticator untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Options for the assertion ceremony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRequestOptions {
    /// Base64url challenge.
    pub challenge: String,
    /// Relying party id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    /// Credentials allowed to answer, empty for discoverable credentials.
    #[serde(default)]
    pub allow_credentials: Vec<CredentialDescriptor>,
    /// User verification requirement.
    #[serde(default)]
    pub user_verification: UserVerification,
    /// Ceremony timeout in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<u64>,
    /// Members this crate does not interpret, passed to the authenticator untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CredentialRequestOptions {
    /// Options asking the given credential to sign `challenge`.
    pub fn for_challenge(challenge: &[u8], authenticator_id: &str) -> Self {
        Self {
            challenge: base64url::encode(challenge),
            rp_id: None,
            allow_credentials: vec![CredentialDescriptor::public_key(authenticator_id)],
            user_verification: UserVerification::Required,
            timeout: None,
            extra: Map::new(),
        }
    }
}

/// The attestation response of a creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttestationResponse {
    /// Client data JSON bytes.
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Bytes,
    /// CBOR attestation object.
    #[serde(with = "base64url")]
    pub attestation_object: Bytes,
    /// Base64 SubjectPublicKeyInfo of the new credential.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key: Option<String>,
    /// COSE algorithm of the public key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub public_key_algorithm: Option<i64>,
    /// Transports supported by the authenticator.
    #[serde(default)]
    pub transports: Vec<String>,
}

/// Result of the credential creation ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationCredential {
    /// Base64url credential id.
    pub id: String,
    /// Base64url credential id.
    pub raw_id: String,
    /// Always `public-key`.
    #[serde(rename = "type", default = "public_key_type")]
    pub kind: String,
    /// The attestation response.
    pub response: AttestationResponse,
    /// Client extension outputs.
    #[serde(default)]
    pub client_extension_results: Map<String, Value>,
}

/// The assertion response of a get ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertionResponse {
    /// Client data JSON bytes.
    #[serde(rename = "clientDataJSON", with = "base64url")]
    pub client_data_json: Bytes,
    /// Authenticator data.
    #[serde(with = "base64url")]
    pub authenticator_data: Bytes,
    /// DER encoded ECDSA signature.
    #[serde(with = "base64url")]
    pub signature: Bytes,
    /// Base64url user handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_handle: Option<String>,
}

/// Result of the assertion ceremony.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthenticationCredential {
    /// Base64url credential id.
    pub id: String,
    /// Base64url credential id.
    pub raw_id: String,
    /// Always `public-key`.
    #[serde(rename = "type", default = "public_key_type")]
    pub kind: String,
    /// The assertion response.
    pub response: AssertionResponse,
    /// Client extension outputs.
    #[serde(default)]
    pub client_extension_results: Map<String, Value>,
}

impl AuthenticationCredential {
    /// The client data JSON as text.
    pub fn client_data_json(&self) -> Result<String, std::string::FromUtf8Error> {
        String::from_utf8(self.response.client_data_json.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn creation_options_keep_unknown_members() {
        let options: CredentialCreationOptions = serde_json::from_value(json!({
            "challenge": "AQID",
            "rp": { "name": "Example", "id": "example.com" },
            "user": { "id": "dXNlcg", "name": "alice", "displayName": "alice" },
            "pubKeyCredParams": [{ "alg": -7, "type": "public-key" }],
            "attestation": "none",
            "authenticatorSelection": { "residentKey": "required" }
        }))
        .unwrap();

        assert_eq!(options.user.id, "dXNlcg");
        assert_eq!(options.pub_key_cred_params[0].alg, -7);
        assert_eq!(options.extra["attestation"], "none");

        let round_trip = serde_json::to_value(&options).unwrap();
        assert_eq!(round_trip["authenticatorSelection"]["residentKey"], "required");
    }

    #[test]
    fn request_options_for_challenge() {
        let options = CredentialRequestOptions::for_challenge(&[1, 2, 3, 4], "AQIDBA");
        assert_eq!(
            serde_json::to_value(&options).unwrap(),
            json!({
                "challenge": "AQIDBA",
                "allowCredentials": [{ "id": "AQIDBA", "type": "public-key" }],
                "userVerification": "required"
            })
        );
    }

    #[test]
    fn assertion_wire_format() {
        let credential: AuthenticationCredential = serde_json::from_value(json!({
            "id": "AQIDBA",
            "rawId": "AQIDBA",
            "type": "public-key",
            "response": {
                "clientDataJSON": "eyJ0eXBlIjoid2ViYXV0aG4uZ2V0In0",
                "authenticatorData": "AQID",
                "signature": "MAYCAQECAQE"
            },
            "clientExtensionResults": {}
        }))
        .unwrap();

        assert_eq!(credential.client_data_json().unwrap(), r#"{"type":"webauthn.get"}"#);
        assert_eq!(credential.response.authenticator_data.as_ref(), [1, 2, 3]);
        assert_eq!(credential.response.signature.as_ref(), [0x30, 6, 2, 1, 1, 2, 1, 1]);
    }
}
