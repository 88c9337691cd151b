//! Passkey validator configuration.
use crate::{
    constants::{DEFAULT_PASSKEY_SERVER_URL, WEBAUTHN_VALIDATOR_ADDRESS},
    types::PrecompileChains,
};
use alloy::primitives::{Address, ChainId};
use eyre::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::info;
use url::Url;

/// Passkey validator configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidatorConfig {
    /// Base URL of the passkey server.
    pub passkey_server_url: Url,
    /// Address of the WebAuthn validator module.
    #[serde(default = "default_validator_address")]
    pub validator_address: Address,
    /// Relying party id. If unset, the passkey server's choice is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rp_id: Option<String>,
    /// Chains on which signatures are verified through the P-256 precompile.
    #[serde(default)]
    pub precompile_chains: PrecompileChains,
}

fn default_validator_address() -> Address {
    WEBAUTHN_VALIDATOR_ADDRESS
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            passkey_server_url: DEFAULT_PASSKEY_SERVER_URL
                .parse()
                .expect("default passkey server url is valid"),
            validator_address: WEBAUTHN_VALIDATOR_ADDRESS,
            rp_id: None,
            precompile_chains: PrecompileChains::default(),
        }
    }
}

impl ValidatorConfig {
    /// Sets the passkey server URL.
    pub fn with_passkey_server_url(mut self, url: Option<Url>) -> Self {
        if let Some(url) = url {
            self.passkey_server_url = url;
        }
        self
    }

    /// Sets the validator module address.
    pub fn with_validator_address(mut self, address: Option<Address>) -> Self {
        if let Some(address) = address {
            self.validator_address = address;
        }
        self
    }

    /// Sets the relying party id.
    pub fn with_rp_id(mut self, rp_id: Option<String>) -> Self {
        self.rp_id = rp_id.or(self.rp_id);
        self
    }

    /// Replaces the precompile chains, if any are given.
    pub fn with_precompile_chains(mut self, chains: &[ChainId]) -> Self {
        if !chains.is_empty() {
            self.precompile_chains = PrecompileChains::new(chains.iter().copied());
        }
        self
    }

    /// Load from a YAML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)
            .wrap_err_with(|| format!("failed to read config file: {}", path.display()))?;
        let config = serde_yaml::from_reader(&file)
            .wrap_err_with(|| format!("failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load from a YAML file, or write and return the default config if the file is missing.
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> eyre::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            return Self::load_from_file(path);
        }
        let config = Self::default();
        config.save_to_file(path)?;
        info!(path = %path.display(), "Wrote default config");
        Ok(config)
    }

    /// Save to a YAML file.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> eyre::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::address;

    #[test]
    fn yaml_round_trip() {
        let s = r#"
passkey_server_url: https://passkeys.example.com/api/v3/
validator_address: "0x1111111111111111111111111111111111111111"
rp_id: example.com
precompile_chains: [8453, 10]
"#;
        let config = serde_yaml::from_str::<ValidatorConfig>(s).unwrap();
        assert_eq!(
            config.validator_address,
            address!("0x1111111111111111111111111111111111111111")
        );
        assert_eq!(config.rp_id.as_deref(), Some("example.com"));
        assert!(config.precompile_chains.contains(8453));
        assert!(!config.precompile_chains.contains(42161));

        let yaml = serde_yaml::to_string(&config).unwrap();
        assert_eq!(serde_yaml::from_str::<ValidatorConfig>(&yaml).unwrap(), config);
    }

    #[test]
    fn defaults() {
        let config =
            serde_yaml::from_str::<ValidatorConfig>("passkey_server_url: http://localhost:8080")
                .unwrap();
        assert_eq!(config.validator_address, WEBAUTHN_VALIDATOR_ADDRESS);
        assert_eq!(config.precompile_chains, PrecompileChains::default());
        assert_eq!(config.rp_id, None);
    }

    #[test]
    fn builders() {
        let config = ValidatorConfig::default()
            .with_rp_id(Some("example.com".to_string()))
            .with_rp_id(None)
            .with_precompile_chains(&[])
            .with_validator_address(None);
        assert_eq!(config.rp_id.as_deref(), Some("example.com"));
        assert_eq!(config.precompile_chains, PrecompileChains::default());
        assert_eq!(config.validator_address, WEBAUTHN_VALIDATOR_ADDRESS);

        let config = config.with_precompile_chains(&[1]);
        assert!(config.precompile_chains.contains(1));
    }
}
