//! Asset resolution by (symbol, chain) with explicit ambiguity reporting

use super::{units, AssetDescriptor, ChainRegistry};
use crate::error::{OrchestratorError, OrchestratorResult};

use tracing::debug;

/// Read-only asset lookups over a merged registry
#[derive(Clone, Copy)]
pub struct AssetResolver<'a> {
    registry: &'a ChainRegistry,
}

impl<'a> AssetResolver<'a> {
    pub fn new(registry: &'a ChainRegistry) -> Self {
        Self { registry }
    }

    /// Resolve a symbol on a chain to exactly one asset.
    ///
    /// Fails with `AssetNotFound` when nothing matches and `AmbiguousAsset`
    /// when the symbol is shared by several denoms on the chain.
    pub fn resolve(&self, symbol: &str, chain_name: &str) -> OrchestratorResult<&'a AssetDescriptor> {
        let candidates = self.matching(symbol, chain_name);

        match candidates.as_slice() {
            [asset] => {
                debug!("Resolved {} on {} to {}", symbol, chain_name, asset.base);
                Ok(*asset)
            }
            [] => Err(OrchestratorError::AssetNotFound {
                symbol: symbol.to_string(),
                chain_name: chain_name.to_string(),
            }),
            _ => Err(OrchestratorError::AmbiguousAsset {
                value: symbol.to_string(),
                chain_name: chain_name.to_string(),
                candidates: candidates.iter().map(|a| (*a).clone()).collect(),
            }),
        }
    }

    /// Find an asset by its base denom on a chain
    pub fn by_denom(&self, base: &str, chain_name: &str) -> OrchestratorResult<&'a AssetDescriptor> {
        self.registry
            .assets()
            .iter()
            .find(|a| a.chain_name == chain_name && a.base == base)
            .ok_or_else(|| OrchestratorError::AssetNotFound {
                symbol: base.to_string(),
                chain_name: chain_name.to_string(),
            })
    }

    /// Every asset on the chain carrying the symbol
    pub fn candidates(&self, symbol: &str, chain_name: &str) -> Vec<AssetDescriptor> {
        self.matching(symbol, chain_name).into_iter().cloned().collect()
    }

    /// Resolve the asset and convert a display amount to its base units
    pub fn base_amount(&self, symbol: &str, amount: &str, chain_name: &str) -> OrchestratorResult<u128> {
        let asset = self.resolve(symbol, chain_name)?;
        units::to_base_units(amount, asset.exponent)
    }

    fn matching(&self, symbol: &str, chain_name: &str) -> Vec<&'a AssetDescriptor> {
        self.registry
            .assets()
            .iter()
            .filter(|a| a.chain_name == chain_name && a.symbol.eq_ignore_ascii_case(symbol))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::custom_chain;

    #[test]
    fn test_unique_symbol_resolves() {
        let registry = ChainRegistry::merged(&[]);
        let asset = registry.resolver().resolve("ATOM", "cosmoshub").unwrap();
        assert_eq!(asset.base, "uatom");
        assert_eq!(asset.exponent, 6);
    }

    #[test]
    fn test_symbol_lookup_is_case_insensitive() {
        let registry = ChainRegistry::merged(&[]);
        let asset = registry.resolver().resolve("osmo", "osmosis").unwrap();
        assert_eq!(asset.base, "uosmo");
    }

    #[test]
    fn test_same_symbol_on_other_chain_is_not_ambiguous() {
        let registry = ChainRegistry::merged(&[]);
        let asset = registry.resolver().resolve("ATOM", "osmosis").unwrap();
        assert!(asset.base.starts_with("ibc/"));
    }

    #[test]
    fn test_absent_pair_is_not_found() {
        let registry = ChainRegistry::merged(&[]);
        let err = registry.resolver().resolve("OM", "cosmoshub").unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::AssetNotFound { ref symbol, ref chain_name }
                if symbol == "OM" && chain_name == "cosmoshub"
        ));
    }

    #[test]
    fn test_duplicate_pair_is_ambiguous() {
        let registry = ChainRegistry::merged(&[]);
        match registry.resolver().resolve("USDC", "osmosis") {
            Err(OrchestratorError::AmbiguousAsset {
                value,
                chain_name,
                candidates,
            }) => {
                assert_eq!(value, "USDC");
                assert_eq!(chain_name, "osmosis");
                assert_eq!(candidates.len(), 2);
            }
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_custom_assets_participate() {
        let registry = ChainRegistry::merged(&[custom_chain()]);
        let resolver = registry.resolver();
        assert_eq!(resolver.resolve("STAKE", "localnet").unwrap().base, "ustake");
        assert_eq!(resolver.base_amount("STAKE", "2.5", "localnet").unwrap(), 2_500_000);
        assert_eq!(resolver.by_denom("ustake", "localnet").unwrap().symbol, "STAKE");
    }
}
