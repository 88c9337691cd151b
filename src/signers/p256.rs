//! P256 keys backing software authenticators.

use crate::webauthn::encode_spki;
use alloy::primitives::{B256, U256};
use p256::ecdsa::{Signature, SigningKey, signature::hazmat::PrehashSigner};

/// Trait for all signers that use a [`SigningKey`] underneath.
pub trait P256Key {
    /// Return reference to the P256 signing key.
    fn signing_key(&self) -> &SigningKey;

    /// Signs a prehashed digest with the p256 key.
    fn sign_prehash(&self, digest: &[u8]) -> eyre::Result<Signature> {
        Ok(self
            .signing_key()
            .sign_prehash(digest)
            .map(|s: Signature| s.normalize_s().unwrap_or(s))?)
    }

    /// Returns the signer's p256 public key as `X || Y`.
    fn public_key(&self) -> [u8; 64] {
        let mut raw = [0u8; 64];
        let point = self.signing_key().verifying_key().to_encoded_point(false);
        raw.copy_from_slice(&point.as_bytes()[1..]);
        raw
    }

    /// Returns the affine coordinates of the public key.
    fn coordinates(&self) -> (U256, U256) {
        let raw = self.public_key();
        (U256::from_be_slice(&raw[..32]), U256::from_be_slice(&raw[32..]))
    }

    /// Returns the public key as a base64 SubjectPublicKeyInfo.
    fn spki(&self) -> eyre::Result<String> {
        let (x, y) = self.coordinates();
        Ok(encode_spki(x, y)?)
    }
}

/// Loads a [`SigningKey`] from a 32 byte secret.
pub(crate) fn load_signing_key(key: &B256) -> eyre::Result<SigningKey> {
    Ok(SigningKey::from_slice(key.as_slice())?)
}
