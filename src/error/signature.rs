use thiserror::Error;

/// Errors related to signature, client data and public key encodings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature is not a valid DER encoded P-256 ECDSA signature.
    #[error("malformed signature: {0}")]
    MalformedSignature(String),
    /// The client data JSON does not contain the expected `type` and `challenge` fields.
    #[error("unexpected client data shape: missing {0}")]
    UnexpectedClientDataShape(&'static str),
    /// The public key is not a P-256 SubjectPublicKeyInfo.
    #[error("invalid public key encoding: {0}")]
    InvalidPublicKeyEncoding(String),
}
