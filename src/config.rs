//! Configuration management for the orchestrator
//!
//! Loads configuration from TOML files with environment variable substitution.

use crate::registry::{ChainRegistry, CustomChainData};

use anyhow::{Context, Result};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

/// Highest decimal exponent accepted for a custom asset
const MAX_ASSET_EXPONENT: u32 = 36;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api: ApiConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    pub wallet: WalletConfig,
    #[serde(default)]
    pub custom_chains: Vec<CustomChainData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
}

/// Metrics are served on the API listener under `/metrics`
#[derive(Debug, Clone, Deserialize)]
pub struct MetricsConfig {
    pub enabled: bool,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoggingConfig {
    /// `EnvFilter` directive, overridden by `RUST_LOG`
    #[serde(default)]
    pub filter: Option<String>,
    /// Emit JSON lines instead of human-readable output
    #[serde(default)]
    pub json: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WalletConfig {
    /// Chains the wallet holds keys for
    pub chains: Vec<String>,
}

impl Settings {
    /// Load settings from the file named by `ORCHESTRATOR_CONFIG`
    pub fn load() -> Result<Self> {
        let config_path = env::var("ORCHESTRATOR_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("config/default.toml"));

        Self::load_from(&config_path)
    }

    /// Load settings from a specific file
    pub fn load_from(config_path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {:?}", config_path))?;

        Self::parse(&config_str)
    }

    /// Parse and validate settings from TOML source
    pub fn parse(source: &str) -> Result<Self> {
        // Substitute environment variables
        let config_str = substitute_env_vars(source);

        let settings: Settings =
            toml::from_str(&config_str).with_context(|| "Failed to parse configuration")?;

        settings.validate()?;

        Ok(settings)
    }

    /// Validate configuration
    fn validate(&self) -> Result<()> {
        if self.wallet.chains.is_empty() {
            anyhow::bail!("At least one wallet chain must be configured");
        }

        for custom in &self.custom_chains {
            let chain = &custom.chain;
            if chain.chain_name.is_empty() {
                anyhow::bail!("Custom chain {:?} has no chain name", chain.chain_id);
            }
            if chain.chain_id.is_empty() {
                anyhow::bail!("Custom chain {} has no chain id", chain.chain_name);
            }
            if chain.rpc_endpoints.is_empty() {
                anyhow::bail!("Custom chain {} has no RPC endpoints configured", chain.chain_name);
            }
            for asset in &custom.assets {
                if asset.exponent > MAX_ASSET_EXPONENT {
                    anyhow::bail!(
                        "Asset {} on {} has exponent {} (max {})",
                        asset.symbol,
                        chain.chain_name,
                        asset.exponent,
                        MAX_ASSET_EXPONENT
                    );
                }
            }
        }

        for name in &self.wallet.chains {
            let known = ChainRegistry::builtin().locator().find_by_name(name).is_some()
                || self.custom_chains.iter().any(|c| &c.chain.chain_name == name);
            if !known {
                tracing::warn!("Wallet chain {} is not in the registry - balances will skip it", name);
            }
        }

        Ok(())
    }

    /// Built-in registry merged with the configured custom chains
    pub fn registry(&self) -> ChainRegistry {
        ChainRegistry::merged(&self.custom_chains)
    }
}

/// Substitute environment variables in the format ${VAR_NAME}
fn substitute_env_vars(input: &str) -> String {
    let mut result = input.to_string();
    let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("env var pattern must compile");

    for cap in re.captures_iter(input) {
        let var_name = &cap[1];
        let var_value = env::var(var_name).unwrap_or_default();
        result = result.replace(&cap[0], &var_value);
    }

    result
}
