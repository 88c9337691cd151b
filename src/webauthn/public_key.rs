use crate::{error::SignatureError, serde::base64url};
use alloy::primitives::U256;
use base64::{Engine, engine::general_purpose::STANDARD};
use p256::{
    EncodedPoint, FieldBytes, PublicKey,
    elliptic_curve::sec1::ToEncodedPoint,
    pkcs8::{DecodePublicKey, EncodePublicKey},
};

/// Derives the affine `(x, y)` coordinates from a base64 encoded P-256 SubjectPublicKeyInfo.
///
/// Both the standard and the URL-safe alphabet are accepted, with or without padding.
pub fn derive_public_key(spki: &str) -> Result<(U256, U256), SignatureError> {
    let der = base64url::decode_any(spki)
        .ok_or_else(|| SignatureError::InvalidPublicKeyEncoding("invalid base64".to_string()))?;
    let key = PublicKey::from_public_key_der(&der)
        .map_err(|err| SignatureError::InvalidPublicKeyEncoding(err.to_string()))?;

    // 0x04 || X || Y
    let point = key.to_encoded_point(false);
    let raw = point.as_bytes();

    Ok((U256::from_be_slice(&raw[1..33]), U256::from_be_slice(&raw[33..65])))
}

/// Re-encodes `(x, y)` as the raw 64 byte point `X || Y`.
///
/// Fails if the coordinates are not a point on P-256.
pub fn encode_public_key(x: U256, y: U256) -> Result<[u8; 64], SignatureError> {
    let key = public_key_from_coordinates(x, y)?;
    let point = key.to_encoded_point(false);

    let mut raw = [0u8; 64];
    raw.copy_from_slice(&point.as_bytes()[1..]);
    Ok(raw)
}

/// Encodes `(x, y)` as a base64 SubjectPublicKeyInfo, the format passkey servers store.
pub fn encode_spki(x: U256, y: U256) -> Result<String, SignatureError> {
    let der = public_key_from_coordinates(x, y)?
        .to_public_key_der()
        .map_err(|err| SignatureError::InvalidPublicKeyEncoding(err.to_string()))?;
    Ok(STANDARD.encode(der.as_bytes()))
}

fn public_key_from_coordinates(x: U256, y: U256) -> Result<PublicKey, SignatureError> {
    let point = EncodedPoint::from_affine_coordinates(
        FieldBytes::from_slice(&x.to_be_bytes::<32>()),
        FieldBytes::from_slice(&y.to_be_bytes::<32>()),
        false,
    );
    PublicKey::from_sec1_bytes(point.as_bytes())
        .map_err(|_| SignatureError::InvalidPublicKeyEncoding("point not on curve".to_string()))
}
