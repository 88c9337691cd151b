//! Passkey validator constants.
use alloy::primitives::{Address, ChainId, U256, address, uint};

/// The order `n` of the NIST P-256 curve.
pub const P256_N: U256 =
    uint!(0xFFFFFFFF00000000FFFFFFFFFFFFFFFFBCE6FAADA7179E84F3B9CAC2FC632551_U256);

/// Half of [`P256_N`], the largest `s` accepted by the validator contract.
pub const P256_N_DIV_2: U256 =
    uint!(0x7FFFFFFF800000007FFFFFFFFFFFFFFFDE737D56D38BCF4279DCE5617E3192A8_U256);

/// Address of the deployed WebAuthn validator module.
pub const WEBAUTHN_VALIDATOR_ADDRESS: Address =
    address!("0xbA45a2BFb8De3D24cA9D7F1B551E14dFF5d690Fd");

/// Chains that ship the RIP-7212 P-256 verification precompile.
///
/// See <https://github.com/ethereum/RIPs/blob/master/RIPS/rip-7212.md>.
pub const DEFAULT_PRECOMPILE_CHAINS: [ChainId; 10] = [
    10,        // optimism
    137,       // polygon
    8453,      // base
    42161,     // arbitrum
    80002,     // polygon amoy
    84532,     // base sepolia
    421614,    // arbitrum sepolia
    7777777,   // zora
    11155420,  // optimism sepolia
    999999999, // zora sepolia
];

/// The `type` member the validator contract expects in assertion client data.
pub const WEBAUTHN_GET_TYPE: &str = "webauthn.get";

/// The `type` member of registration client data.
pub const WEBAUTHN_CREATE_TYPE: &str = "webauthn.create";

/// Authenticator data of the stub signature.
///
/// rpIdHash || flags (UP | UV | BE | BS) || signCount
pub const STUB_AUTHENTICATOR_DATA: [u8; 37] = [
    0x49, 0x96, 0x0d, 0xe5, 0x88, 0x0e, 0x8c, 0x68, 0x74, 0x34, 0x17, 0x0f, 0x64, 0x76, 0x60, 0x5b,
    0x8f, 0xe4, 0xae, 0xb9, 0xa2, 0x86, 0x32, 0xc7, 0x99, 0x5c, 0xf3, 0xba, 0x83, 0x1d, 0x97, 0x63,
    0x1d, 0x00, 0x00, 0x00, 0x00,
];

/// Client data JSON of the stub signature.
pub const STUB_CLIENT_DATA_JSON: &str = r#"{"type":"webauthn.get","challenge":"tbxXNFS9X_4Byr1cMwqKrIGB-_30a0QhZ6y7ucM0BOE","origin":"http://localhost:3000","crossOrigin":false}"#;

/// `r` of the stub signature.
pub const STUB_R: U256 =
    uint!(44941127272049826721201904734628716258498742255959991581049806490182030242267_U256);

/// `s` of the stub signature.
pub const STUB_S: U256 =
    uint!(9910254599581058084911561569808925251374718953855182016200087235935345969636_U256);

/// Default passkey server URL used by the CLI when no configuration is present.
pub const DEFAULT_PASSKEY_SERVER_URL: &str = "http://localhost:8080";
