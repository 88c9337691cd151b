use crate::error::SignatureError;
use alloy::{hex, primitives::U256};
use p256::ecdsa::Signature;

/// Parses a hex encoded DER signature and returns its `(r, s)` pair in low-s form.
pub fn normalize_signature(signature: &str) -> Result<(U256, U256), SignatureError> {
    let der = hex::decode(signature.trim())
        .map_err(|err| SignatureError::MalformedSignature(err.to_string()))?;
    normalize_der_signature(&der)
}

/// Parses a DER signature and returns its `(r, s)` pair in low-s form.
///
/// `s` is replaced by `n - s` whenever `s > n / 2`, since the validator only accepts the lower
/// of the two valid values.
pub fn normalize_der_signature(der: &[u8]) -> Result<(U256, U256), SignatureError> {
    let signature = Signature::from_der(der)
        .map_err(|err| SignatureError::MalformedSignature(err.to_string()))?;
    let (r, s) = signature.normalize_s().unwrap_or(signature).split_bytes();

    Ok((U256::from_be_slice(&r), U256::from_be_slice(&s)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{P256_N, P256_N_DIV_2};
    use alloy::primitives::B256;
    use p256::{
        FieldBytes,
        ecdsa::{SigningKey, signature::hazmat::PrehashSigner},
    };

    fn der_from_scalars(r: U256, s: U256) -> String {
        let signature = Signature::from_scalars(
            FieldBytes::clone_from_slice(&r.to_be_bytes::<32>()),
            FieldBytes::clone_from_slice(&s.to_be_bytes::<32>()),
        )
        .unwrap();
        hex::encode(signature.to_der().as_bytes())
    }

    #[test]
    fn low_s_is_unchanged() {
        assert_eq!(
            normalize_signature("3006020101020101").unwrap(),
            (U256::from(1), U256::from(1))
        );
    }

    #[test]
    fn high_s_is_flipped() {
        // r = 1, s = n - 1
        let der = concat!(
            "3026020101",
            "022100ffffffff00000000ffffffffffffffffbce6faada7179e84f3b9cac2fc632550"
        );
        assert_eq!(normalize_signature(der).unwrap(), (U256::from(1), U256::from(1)));
        assert_eq!(normalize_signature(&format!("0x{der}")).unwrap().1, U256::from(1));
    }

    #[test]
    fn half_order_is_kept() {
        let (_, s) = normalize_signature(&der_from_scalars(U256::from(7), P256_N_DIV_2)).unwrap();
        assert_eq!(s, P256_N_DIV_2);

        let above = P256_N_DIV_2 + U256::from(1);
        let (_, s) = normalize_signature(&der_from_scalars(U256::from(7), above)).unwrap();
        assert_eq!(s, P256_N - above);
    }

    #[test]
    fn normalized_s_never_exceeds_half_order() {
        for i in 1..=32u8 {
            let key = SigningKey::from_slice(B256::repeat_byte(i).as_slice()).unwrap();
            let digest = B256::repeat_byte(i.wrapping_mul(7));
            let signature: Signature = key.sign_prehash(digest.as_slice()).unwrap();
            let (r, s) = signature.split_bytes();
            let (r, s) = (U256::from_be_slice(&r), U256::from_be_slice(&s));

            for candidate in [s, P256_N - s] {
                let (nr, ns) = normalize_signature(&der_from_scalars(r, candidate)).unwrap();
                assert_eq!(nr, r);
                assert!(ns <= P256_N_DIV_2);
                assert_eq!(ns, s.min(P256_N - s));
            }
        }
    }

    #[test]
    fn malformed_signatures() {
        for der in [
            "",
            "zz",
            // truncated
            "3045022100",
            // not a sequence
            "3106020101020101",
            // integer tag replaced
            "3006030101020101",
            // length mismatch
            "3007020101020101",
            // s = 0
            "3006020101020100",
        ] {
            assert!(
                matches!(normalize_signature(der), Err(SignatureError::MalformedSignature(_))),
                "{der} should be rejected"
            );
        }
    }
}
