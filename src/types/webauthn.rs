use super::WebAuthnKey;
use crate::{
    constants::{STUB_AUTHENTICATOR_DATA, STUB_CLIENT_DATA_JSON, STUB_R, STUB_S},
    webauthn::locate_response_type,
};
use alloy::{
    primitives::{B256, Bytes, U256},
    sol,
    sol_types::SolValue,
};

sol! {
    /// A WebAuthn assertion in the layout the validator contract decodes.
    ///
    /// Encoded as `abi.encode(authenticatorData, clientDataJSON, responseTypeLocation, r, s,
    /// usePrecompiled)`.
    #[derive(Debug, PartialEq, Eq)]
    struct WebAuthnSignature {
        /// The WebAuthn authenticator data.
        /// See: https://www.w3.org/TR/webauthn-2/#dom-authenticatorassertionresponse-authenticatordata.
        bytes authenticatorData;
        /// The WebAuthn client data JSON.
        /// See: https://www.w3.org/TR/webauthn-2/#dom-authenticatorresponse-clientdatajson.
        string clientDataJSON;
        /// Offset of the `type` value in `clientDataJSON`.
        uint256 responseTypeLocation;
        /// The r value of secp256r1 signature.
        uint256 r;
        /// The s value of secp256r1 signature, in low-s form.
        uint256 s;
        /// Whether to verify through the RIP-7212 precompile.
        bool usePrecompiled;
    }

    /// The public key stored by the validator for an account.
    #[derive(Debug, PartialEq, Eq)]
    struct WebAuthnValidatorData {
        uint256 pubKeyX;
        uint256 pubKeyY;
    }
}

impl WebAuthnSignature {
    /// ABI encodes the signature as six top-level parameters.
    pub fn encode(&self) -> Bytes {
        self.abi_encode_params().into()
    }

    /// Decodes a signature produced by [`Self::encode`].
    pub fn decode(data: &[u8]) -> Result<Self, alloy::sol_types::Error> {
        Self::abi_decode_params(data)
    }

    /// The placeholder signature used for gas estimation before a real assertion exists.
    ///
    /// It has the byte shape of a real assertion, but does not verify.
    pub fn stub() -> Self {
        let client_data_json = STUB_CLIENT_DATA_JSON.to_string();
        let location = locate_response_type(&client_data_json).unwrap_or_default();
        Self {
            authenticatorData: Bytes::from_static(&STUB_AUTHENTICATOR_DATA),
            clientDataJSON: client_data_json,
            responseTypeLocation: U256::from(location),
            r: STUB_R,
            s: STUB_S,
            usePrecompiled: false,
        }
    }
}

/// Encodes the validator init payload, `abi.encode((x, y), authenticatorIdHash)`.
///
/// Both the top-level `initData` and the nested module install data are produced by this
/// function, and the installing account relies on them being identical.
pub fn encode_init_data(key: &WebAuthnKey) -> Bytes {
    (
        WebAuthnValidatorData { pubKeyX: key.pub_x(), pubKeyY: key.pub_y() },
        key.authenticator_id_hash(),
    )
        .abi_encode_params()
        .into()
}

/// Decodes a payload produced by [`encode_init_data`] into `(x, y, authenticatorIdHash)`.
pub fn decode_init_data(data: &[u8]) -> Result<(U256, U256, B256), alloy::sol_types::Error> {
    let (WebAuthnValidatorData { pubKeyX, pubKeyY }, hash) =
        <(WebAuthnValidatorData, B256)>::abi_decode_params(data)?;
    Ok((pubKeyX, pubKeyY, hash))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::P256_N_DIV_2;
    use alloy::primitives::{b256, bytes, uint};

    #[test]
    fn signature_layout() {
        let signature = WebAuthnSignature {
            authenticatorData: bytes!("0102"),
            clientDataJSON: "{}".to_string(),
            responseTypeLocation: U256::from(8),
            r: U256::from(1),
            s: U256::from(2),
            usePrecompiled: true,
        };
        let encoded = signature.encode();

        // six head words, then the two dynamic tails of one word length + one word data each
        assert_eq!(encoded.len(), 32 * 6 + 64 + 64);
        // offset of authenticatorData points right after the head
        assert_eq!(U256::from_be_slice(&encoded[0..32]), U256::from(192));
        assert_eq!(U256::from_be_slice(&encoded[64..96]), U256::from(8));
        assert_eq!(U256::from_be_slice(&encoded[160..192]), U256::from(1));
        assert_eq!(WebAuthnSignature::decode(&encoded).unwrap(), signature);
    }

    #[test]
    fn stub_is_well_formed() {
        let stub = WebAuthnSignature::decode(&WebAuthnSignature::stub().encode()).unwrap();
        assert_eq!(stub.responseTypeLocation, U256::from(8));
        assert_eq!(stub.authenticatorData.len(), 37);
        assert!(stub.s <= P256_N_DIV_2);
        assert!(!stub.usePrecompiled);
    }

    #[test]
    fn init_data_layout() {
        let key = WebAuthnKey::new(U256::from(1), U256::from(2), "AQIDBA").unwrap();
        let encoded = encode_init_data(&key);

        assert_eq!(encoded.len(), 96);
        assert_eq!(U256::from_be_slice(&encoded[0..32]), U256::from(1));
        assert_eq!(U256::from_be_slice(&encoded[32..64]), U256::from(2));
        assert_eq!(
            B256::from_slice(&encoded[64..96]),
            b256!("0xa6885b3731702da62e8e4a8f584ac46a7f6822f4e2ba50fba902f67b1588d23b")
        );
        assert_eq!(
            decode_init_data(&encoded).unwrap(),
            (uint!(1_U256), uint!(2_U256), key.authenticator_id_hash())
        );
    }
}
