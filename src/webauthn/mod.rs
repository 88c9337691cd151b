//! WebAuthn assertion processing.
//!
//! Turns the raw outputs of an authenticator ceremony into the values the on-chain validator
//! consumes: a low-s `(r, s)` pair, the location of the response type inside the client data
//! JSON and the affine coordinates of the credential public key.

mod client_data;
pub use client_data::locate_response_type;

mod public_key;
pub use public_key::{derive_public_key, encode_public_key, encode_spki};

mod signature;
pub use signature::{normalize_der_signature, normalize_signature};
