/*
[INPUT]:  Environment variables set at build/startup
[OUTPUT]: Parsed application configuration
[POS]:    Configuration layer - embedder setup
[UPDATE]: When adding new configuration options
*/

use serde::{Deserialize, Serialize};

/// Environment-derived configuration consumed at startup.
///
/// Values are read once and not re-validated; the deployed contract
/// addresses are informational and unused by the client itself.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Base URL of the LegalBounty API
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Network name the deployed contracts live on
    #[serde(default = "default_network")]
    pub network: String,
    /// Feature flag: expose the wallet-link flow
    #[serde(default = "default_true")]
    pub enable_wallet_link: bool,
    /// Deployed contract addresses
    #[serde(default)]
    pub contracts: ContractAddresses,
}

/// Addresses written by the deployment manifest
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ContractAddresses {
    pub token: Option<String>,
    pub escrow: Option<String>,
    pub bounty: Option<String>,
    pub reputation: Option<String>,
    pub multisig: Option<String>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            network: default_network(),
            enable_wallet_link: true,
            contracts: ContractAddresses::default(),
        }
    }
}

impl AppConfig {
    /// Read configuration from `LEGALBOUNTY_*` environment variables,
    /// falling back to defaults for anything unset
    pub fn from_env() -> Self {
        Self {
            api_url: env_or("LEGALBOUNTY_API_URL", default_api_url),
            network: env_or("LEGALBOUNTY_NETWORK", default_network),
            enable_wallet_link: std::env::var("LEGALBOUNTY_ENABLE_WALLET_LINK")
                .map(|value| value != "0" && !value.eq_ignore_ascii_case("false"))
                .unwrap_or(true),
            contracts: ContractAddresses {
                token: std::env::var("LEGALBOUNTY_TOKEN_ADDRESS").ok(),
                escrow: std::env::var("LEGALBOUNTY_ESCROW_ADDRESS").ok(),
                bounty: std::env::var("LEGALBOUNTY_BOUNTY_ADDRESS").ok(),
                reputation: std::env::var("LEGALBOUNTY_REPUTATION_ADDRESS").ok(),
                multisig: std::env::var("LEGALBOUNTY_MULTISIG_ADDRESS").ok(),
            },
        }
    }
}

fn env_or(key: &str, fallback: fn() -> String) -> String {
    std::env::var(key).unwrap_or_else(|_| fallback())
}

fn default_api_url() -> String {
    "https://api.legalbounty.io".to_string()
}

fn default_network() -> String {
    "testnet".to_string()
}

fn default_true() -> bool {
    true
}
