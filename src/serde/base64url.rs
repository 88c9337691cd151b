//! Helpers for serializing and deserializing binary WebAuthn fields as base64url.
//!
//! WebAuthn JSON encodes every binary member (credential ids, authenticator data, signatures)
//! as unpadded base64url. Decoding is lenient and also takes the standard alphabet and padding,
//! since passkey servers differ in what they emit.

use alloy::primitives::Bytes;
use base64::{
    Engine,
    engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD},
};
use serde::{Deserialize, Deserializer, Serializer};

/// Encodes `data` as unpadded base64url.
pub fn encode(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_NO_PAD.encode(data)
}

/// Decodes base64 in either alphabet, with or without padding.
pub fn decode_any(s: &str) -> Option<Vec<u8>> {
    let s = s.trim().trim_end_matches('=');
    if s.contains(['-', '_']) {
        URL_SAFE_NO_PAD.decode(s).ok()
    } else {
        STANDARD_NO_PAD.decode(s).ok()
    }
}

/// Serializes [`Bytes`] as unpadded base64url.
pub fn serialize<S>(bytes: &Bytes, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&encode(bytes))
}

/// Deserializes [`Bytes`] from a base64 string.
pub fn deserialize<'de, D>(deserializer: D) -> Result<Bytes, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    decode_any(&s)
        .map(Bytes::from)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid base64: {s}")))
}
