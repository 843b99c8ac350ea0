//! Shared test fixtures

use crate::registry::{AssetDescriptor, ChainDescriptor, CustomChainData};

/// Local single-asset chain used by registry and transfer tests
pub fn custom_chain() -> CustomChainData {
    CustomChainData {
        chain: ChainDescriptor {
            chain_name: "localnet".to_string(),
            chain_id: "localnet-1".to_string(),
            pretty_name: Some("Local Testnet".to_string()),
            bech32_prefix: Some("local".to_string()),
            fee_denom: Some("ustake".to_string()),
            rpc_endpoints: vec!["http://127.0.0.1:26657".to_string()],
        },
        assets: vec![AssetDescriptor {
            chain_name: String::new(),
            symbol: "STAKE".to_string(),
            base: "ustake".to_string(),
            display: Some("stake".to_string()),
            exponent: 6,
            name: Some("Stake".to_string()),
            description: None,
        }],
    }
}
