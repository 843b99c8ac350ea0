//! Chain and asset registry
//!
//! A static built-in table of Cosmos chains and assets, merged at startup with
//! caller-supplied chains. The merged registry is immutable and shared
//! read-only between concurrent requests.
//!
//! - [`ChainLocator`] resolves chain metadata by name or chain id
//! - [`AssetResolver`] resolves a (symbol, chain) pair to exactly one denom
//! - [`units`] converts display amounts to base units

pub mod assets;
pub mod chains;
pub mod units;

pub use assets::AssetResolver;
pub use chains::ChainLocator;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use tracing::debug;

lazy_static! {
    static ref BUILTIN: ChainRegistry =
        ChainRegistry::from_toml(include_str!("builtin.toml"))
            .expect("built-in registry must parse");
}

/// Chain metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainDescriptor {
    pub chain_name: String,
    pub chain_id: String,
    #[serde(default)]
    pub pretty_name: Option<String>,
    #[serde(default)]
    pub bech32_prefix: Option<String>,
    #[serde(default)]
    pub fee_denom: Option<String>,
    #[serde(default)]
    pub rpc_endpoints: Vec<String>,
}

/// Token metadata on a specific chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    /// Owning chain. May be left empty in custom chain data, in which case
    /// the enclosing chain's name is filled in on merge.
    #[serde(default)]
    pub chain_name: String,
    pub symbol: String,
    pub base: String,
    #[serde(default)]
    pub display: Option<String>,
    pub exponent: u32,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Caller-supplied chain with its asset list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomChainData {
    pub chain: ChainDescriptor,
    #[serde(default)]
    pub assets: Vec<AssetDescriptor>,
}

/// Immutable union of the built-in table and custom chains
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ChainRegistry {
    #[serde(default)]
    chains: Vec<ChainDescriptor>,
    #[serde(default)]
    assets: Vec<AssetDescriptor>,
}

impl ChainRegistry {
    /// Parse a registry table from TOML
    pub fn from_toml(source: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(source)
    }

    /// The static built-in table
    pub fn builtin() -> &'static ChainRegistry {
        &BUILTIN
    }

    /// Built-in table with custom chains appended.
    ///
    /// Custom entries come after built-in ones, so name and id lookups still
    /// prefer the built-in descriptor when both define the same chain.
    pub fn merged(custom: &[CustomChainData]) -> Self {
        let mut registry = Self::builtin().clone();
        for entry in custom {
            registry.push_custom(entry);
        }
        debug!(
            "Merged registry: {} chains, {} assets ({} custom chains)",
            registry.chains.len(),
            registry.assets.len(),
            custom.len()
        );
        registry
    }

    fn push_custom(&mut self, entry: &CustomChainData) {
        self.chains.push(entry.chain.clone());
        self.assets.extend(entry.assets.iter().cloned().map(|mut asset| {
            if asset.chain_name.is_empty() {
                asset.chain_name = entry.chain.chain_name.clone();
            }
            asset
        }));
    }

    pub fn chains(&self) -> &[ChainDescriptor] {
        &self.chains
    }

    pub fn assets(&self) -> &[AssetDescriptor] {
        &self.assets
    }

    pub fn locator(&self) -> ChainLocator<'_> {
        ChainLocator::new(self)
    }

    pub fn resolver(&self) -> AssetResolver<'_> {
        AssetResolver::new(self)
    }
}
