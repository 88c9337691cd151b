//! # Passkey validator CLI
use crate::{
    config::ValidatorConfig,
    credential::{WebAuthnKeyRequest, to_webauthn_key},
    server::HttpPasskeyServer,
    signers::{ModuleSigner, SoftAuthenticator},
    types::{SignableMessage, WebAuthnKey, WebAuthnSignature, encode_init_data},
    validator::PasskeyValidator,
    webauthn::{locate_response_type, normalize_signature},
};
use alloy::{
    hex,
    primitives::{Address, B256, ChainId, U256},
};
use clap::{Parser, Subcommand};
use std::{path::PathBuf, sync::Arc};
use tracing::info;
use url::Url;

/// Tooling for the WebAuthn validator module of ERC-7579 accounts.
#[derive(Debug, Parser)]
#[command(author, version, about = "Passkey validator", long_about = None)]
pub struct Args {
    /// The configuration file.
    ///
    /// If missing, a default one will be used and stored under the given path.
    #[arg(
        long,
        value_name = "CONFIG",
        env = "PASSKEY_VALIDATOR_CONFIG",
        default_value = "passkey-validator.yaml",
        global = true
    )]
    pub config: PathBuf,
    /// Overrides the passkey server URL of the config.
    #[arg(long = "passkey-server", value_name = "URL", env = "PASSKEY_SERVER_URL", global = true)]
    pub passkey_server_url: Option<Url>,
    /// Overrides the relying party id of the config.
    #[arg(long = "rp-id", value_name = "RP_ID", global = true)]
    pub rp_id: Option<String>,
    /// Overrides the validator module address of the config.
    #[arg(long = "validator", value_name = "ADDRESS", global = true)]
    pub validator_address: Option<Address>,
    /// A chain that supports the P-256 precompile. Replaces the configured list.
    #[arg(long = "precompile-chain", value_name = "CHAIN_ID", global = true)]
    pub precompile_chains: Vec<ChainId>,
    /// The command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Passkey validator commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Derive a webauthn key from a base64 SubjectPublicKeyInfo.
    DeriveKey {
        /// Base64 SPKI of the credential.
        #[arg(long)]
        spki: String,
        /// Base64url credential id.
        #[arg(long)]
        authenticator_id: String,
    },
    /// Normalize a hex encoded DER signature into low-s `(r, s)`.
    Normalize {
        /// Hex encoded DER signature.
        signature: String,
    },
    /// Print the offset of the `type` value in client data JSON.
    Locate {
        /// The client data JSON.
        client_data_json: String,
    },
    /// Print the module init data for a public key.
    InitData {
        /// Public key x coordinate.
        #[arg(long)]
        pub_x: U256,
        /// Public key y coordinate.
        #[arg(long)]
        pub_y: U256,
        /// Base64url credential id.
        #[arg(long)]
        authenticator_id: String,
    },
    /// Print the stub signature used for gas estimation.
    Stub,
    /// Register a software passkey with the passkey server.
    Register {
        /// The passkey name.
        #[arg(long)]
        name: String,
        /// Secret key of the software authenticator.
        #[arg(long, env = "PASSKEY_SECRET_KEY")]
        secret_key: B256,
    },
    /// Log in with a software passkey registered before.
    Login {
        /// Secret key of the software authenticator.
        #[arg(long, env = "PASSKEY_SECRET_KEY")]
        secret_key: B256,
    },
    /// Sign a user operation hash with a software passkey.
    Sign {
        /// The user operation hash.
        hash: B256,
        /// The chain the operation is for.
        #[arg(long)]
        chain_id: ChainId,
        /// Secret key of the software authenticator.
        #[arg(long, env = "PASSKEY_SECRET_KEY")]
        secret_key: B256,
    },
}

impl Args {
    /// Run the command.
    pub async fn run(self) -> eyre::Result<()> {
        let config = ValidatorConfig::load_or_create(&self.config)?
            .with_passkey_server_url(self.passkey_server_url)
            .with_rp_id(self.rp_id)
            .with_validator_address(self.validator_address)
            .with_precompile_chains(&self.precompile_chains);

        match self.command {
            Command::DeriveKey { spki, authenticator_id } => {
                let key = WebAuthnKey::from_spki(&spki, authenticator_id)?;
                println!("{}", serde_json::to_string_pretty(&key)?);
            }
            Command::Normalize { signature } => {
                let (r, s) = normalize_signature(&signature)?;
                println!("r: {r:#x}\ns: {s:#x}");
            }
            Command::Locate { client_data_json } => {
                println!("{}", locate_response_type(&client_data_json)?);
            }
            Command::InitData { pub_x, pub_y, authenticator_id } => {
                let key = WebAuthnKey::new(pub_x, pub_y, authenticator_id)?;
                println!("{}", hex::encode_prefixed(encode_init_data(&key)));
            }
            Command::Stub => {
                println!("{}", hex::encode_prefixed(WebAuthnSignature::stub().encode()));
            }
            Command::Register { name, secret_key } => {
                let key = obtain_key(&config, WebAuthnKeyRequest::register(name), &secret_key)
                    .await?;
                println!("{}", serde_json::to_string_pretty(&key)?);
            }
            Command::Login { secret_key } => {
                let key = obtain_key(&config, WebAuthnKeyRequest::login(), &secret_key).await?;
                println!("{}", serde_json::to_string_pretty(&key)?);
            }
            Command::Sign { hash, chain_id, secret_key } => {
                let authenticator = soft_authenticator(&config, &secret_key)?;
                let (pub_x, pub_y) = crate::signers::P256Key::coordinates(&authenticator);
                let key = WebAuthnKey::new(pub_x, pub_y, authenticator.credential_id())?;
                let validator = PasskeyValidator::new(key, Arc::new(authenticator))
                    .with_address(config.validator_address)
                    .with_chain_id(Some(chain_id))
                    .with_rp_id(config.rp_id.clone())
                    .with_precompile_chains(config.precompile_chains.clone());

                let signature = validator.sign_user_op_hash(SignableMessage::from(hash)).await?;
                println!("{}", hex::encode_prefixed(signature));
            }
        }

        Ok(())
    }
}

fn soft_authenticator(
    config: &ValidatorConfig,
    secret_key: &B256,
) -> eyre::Result<SoftAuthenticator> {
    let rp_id = config
        .rp_id
        .clone()
        .or_else(|| config.passkey_server_url.host_str().map(str::to_string))
        .unwrap_or_else(|| "localhost".to_string());
    SoftAuthenticator::load(secret_key, rp_id)
}

async fn obtain_key(
    config: &ValidatorConfig,
    request: WebAuthnKeyRequest,
    secret_key: &B256,
) -> eyre::Result<WebAuthnKey> {
    let authenticator = soft_authenticator(config, secret_key)?;
    let server = HttpPasskeyServer::new(config.passkey_server_url.clone());
    let request = match &config.rp_id {
        Some(rp_id) => request.with_rp_id(rp_id),
        None => request,
    };

    let key = to_webauthn_key(request, &server, &authenticator).await?;
    info!(
        authenticator_id = key.authenticator_id(),
        authenticator_id_hash = %key.authenticator_id_hash(),
        "Obtained webauthn key"
    );
    Ok(key)
}
