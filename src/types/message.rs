use crate::error::ValidatorError;
use alloy::{
    hex,
    primitives::{B256, Bytes, eip191_hash_message},
};
use serde_json::Value;
use std::borrow::Cow;

/// A message accepted by the signing callbacks.
///
/// Exactly three representations are accepted: a plain string, a hex string wrapped as
/// `{ raw: "0x…" }` and a byte array wrapped as `{ raw: [..] }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignableMessage {
    /// A UTF-8 string, signed as its bytes.
    Text(String),
    /// Hex encoded bytes.
    Hex(Bytes),
    /// Raw bytes.
    Raw(Vec<u8>),
}

impl SignableMessage {
    /// Converts a JSON value into a message.
    ///
    /// Any shape other than the three supported ones fails with
    /// [`ValidatorError::UnsupportedMessageFormat`].
    pub fn from_value(value: &Value) -> Result<Self, ValidatorError> {
        match value {
            Value::String(text) => Ok(Self::Text(text.clone())),
            Value::Object(object) if object.len() == 1 => match object.get("raw") {
                Some(Value::String(raw)) if raw.starts_with("0x") => hex::decode(raw)
                    .map(|bytes| Self::Hex(bytes.into()))
                    .map_err(|_| ValidatorError::UnsupportedMessageFormat),
                Some(Value::Array(items)) => items
                    .iter()
                    .map(|item| item.as_u64().and_then(|byte| u8::try_from(byte).ok()))
                    .collect::<Option<Vec<u8>>>()
                    .map(Self::Raw)
                    .ok_or(ValidatorError::UnsupportedMessageFormat),
                _ => Err(ValidatorError::UnsupportedMessageFormat),
            },
            _ => Err(ValidatorError::UnsupportedMessageFormat),
        }
    }

    /// The bytes the authenticator is asked to sign.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Text(text) => text.as_bytes(),
            Self::Hex(bytes) => bytes,
            Self::Raw(bytes) => bytes,
        }
    }

    /// The bytes signed as a user operation challenge.
    ///
    /// Account SDKs hand operation hashes over as `0x` prefixed hex strings, so a
    /// [`SignableMessage::Text`] that is valid `0x` hex is decoded. Any other text is taken as
    /// its UTF-8 bytes.
    pub fn challenge(&self) -> Cow<'_, [u8]> {
        match self {
            Self::Text(text) if text.starts_with("0x") => match hex::decode(text) {
                Ok(bytes) => Cow::Owned(bytes),
                Err(_) => Cow::Borrowed(text.as_bytes()),
            },
            _ => Cow::Borrowed(self.as_bytes()),
        }
    }

    /// The [EIP-191] personal message hash of the message.
    ///
    /// [EIP-191]: https://eips.ethereum.org/EIPS/eip-191
    pub fn eip191_hash(&self) -> B256 {
        eip191_hash_message(self.as_bytes())
    }
}

impl From<B256> for SignableMessage {
    fn from(hash: B256) -> Self {
        Self::Hex(hash.into())
    }
}

impl From<&str> for SignableMessage {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<Vec<u8>> for SignableMessage {
    fn from(bytes: Vec<u8>) -> Self {
        Self::Raw(bytes)
    }
}

impl TryFrom<Value> for SignableMessage {
    type Error = ValidatorError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        Self::from_value(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::bytes;
    use serde_json::json;

    #[test]
    fn supported_shapes() {
        assert_eq!(
            SignableMessage::from_value(&json!("hello")).unwrap(),
            SignableMessage::Text("hello".to_string())
        );
        assert_eq!(
            SignableMessage::from_value(&json!({ "raw": "0xdeadbeef" })).unwrap(),
            SignableMessage::Hex(bytes!("deadbeef"))
        );
        assert_eq!(
            SignableMessage::from_value(&json!({ "raw": [1, 2, 255] })).unwrap(),
            SignableMessage::Raw(vec![1, 2, 255])
        );
    }

    #[test]
    fn unsupported_shapes() {
        for value in [
            json!(42),
            json!(null),
            json!(true),
            json!([1, 2, 3]),
            json!({}),
            json!({ "raw": 1 }),
            json!({ "raw": "deadbeef" }),
            json!({ "raw": "0xzz" }),
            json!({ "raw": [256] }),
            json!({ "raw": [-1] }),
            json!({ "raw": "0x00", "extra": 1 }),
            json!({ "message": "hello" }),
        ] {
            assert!(
                matches!(
                    SignableMessage::from_value(&value),
                    Err(ValidatorError::UnsupportedMessageFormat)
                ),
                "{value} should be rejected"
            );
        }
    }

    #[test]
    fn hex_text_challenge() {
        let hash = B256::repeat_byte(1);
        let text = SignableMessage::Text(hex::encode_prefixed(hash));
        assert_eq!(text.challenge().as_ref(), hash.as_slice());
        assert_eq!(text.challenge(), SignableMessage::from(hash).challenge());

        // not hex, signed as text
        assert_eq!(SignableMessage::from("0xhello").challenge().as_ref(), b"0xhello");
        assert_eq!(SignableMessage::from("hello").challenge().as_ref(), b"hello");
        // personal messages keep the text bytes
        assert_eq!(text.as_bytes().len(), 66);
    }

    #[test]
    fn bytes_per_shape() {
        assert_eq!(SignableMessage::from("ab").as_bytes(), b"ab");
        assert_eq!(SignableMessage::Hex(bytes!("0102")).as_bytes(), [1, 2]);
        assert_eq!(SignableMessage::from(vec![3u8]).as_bytes(), [3]);
        assert_eq!(
            SignableMessage::from("hello").eip191_hash(),
            eip191_hash_message(b"hello")
        );
    }
}
