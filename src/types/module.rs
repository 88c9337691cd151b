use crate::{constants::DEFAULT_PRECOMPILE_CHAINS, signers::ModuleSigner};
use alloy::primitives::{Address, Bytes, ChainId};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeSet, fmt, sync::Arc};

/// ERC-7579 module types this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleType {
    /// A validator module, ERC-7579 module type id `1`.
    Validator,
}

impl ModuleType {
    /// The ERC-7579 module type id.
    pub const fn type_id(&self) -> u8 {
        match self {
            Self::Validator => 1,
        }
    }
}

/// The data needed to install the module on an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModuleInitData {
    /// Data passed to `onInstall`.
    pub init_data: Bytes,
    /// Module address.
    pub address: Address,
    /// Module type.
    #[serde(rename = "type")]
    pub module_type: ModuleType,
}

/// The module descriptor handed to the account SDK.
#[derive(Clone)]
pub struct ValidatorModule {
    /// Module address.
    pub address: Address,
    /// Account the module is installed on.
    pub account_address: Address,
    /// Signs on behalf of the module.
    pub signer: Arc<dyn ModuleSigner>,
    /// Data passed to `onInstall`.
    pub init_data: Bytes,
    /// Data passed to `onUninstall`.
    pub de_init_data: Bytes,
    /// Install descriptor.
    pub module_init_data: ModuleInitData,
}

impl fmt::Debug for ValidatorModule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorModule")
            .field("address", &self.address)
            .field("account_address", &self.account_address)
            .field("init_data", &self.init_data)
            .field("de_init_data", &self.de_init_data)
            .field("module_init_data", &self.module_init_data)
            .finish_non_exhaustive()
    }
}

/// Chains on which the validator verifies through the RIP-7212 precompile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrecompileChains(BTreeSet<ChainId>);

impl PrecompileChains {
    /// Creates a set from the given chain ids.
    pub fn new(chains: impl IntoIterator<Item = ChainId>) -> Self {
        Self(chains.into_iter().collect())
    }

    /// Whether the chain supports the precompile.
    pub fn contains(&self, chain_id: ChainId) -> bool {
        self.0.contains(&chain_id)
    }
}

impl Default for PrecompileChains {
    fn default() -> Self {
        Self::new(DEFAULT_PRECOMPILE_CHAINS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_precompile_chains() {
        let chains = PrecompileChains::default();
        for chain in [10, 8453, 84532, 42161, 137] {
            assert!(chains.contains(chain), "{chain} supports the precompile");
        }
        for chain in [1, 11155111, 56, 100] {
            assert!(!chains.contains(chain), "{chain} has no precompile");
        }
    }

    #[test]
    fn module_init_data_json() {
        let data = ModuleInitData {
            init_data: Bytes::from_static(&[1]),
            address: Address::ZERO,
            module_type: ModuleType::Validator,
        };
        let json = serde_json::to_value(&data).unwrap();
        assert_eq!(json["type"], "validator");
        assert_eq!(json["initData"], "0x01");
        assert_eq!(ModuleType::Validator.type_id(), 1);
    }
}
