//! Chain-facing collaborators and wire types
//!
//! This module provides:
//! - Wallet, signing and balance-query traits implemented outside this crate
//! - Receipt and coin types shared by the transfer and fee paths
//! - The concurrent per-chain balance aggregator

pub mod balances;

pub use balances::{BalanceAggregator, ChainBalances};

use crate::error::OrchestratorResult;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Token amount in base units
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Coin {
    pub denom: String,
    pub amount: String,
}

impl Coin {
    pub fn new(amount: u128, denom: impl Into<String>) -> Self {
        Self {
            denom: denom.into(),
            amount: amount.to_string(),
        }
    }
}

/// Key/value pair attached to a receipt event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventAttribute {
    pub key: String,
    pub value: String,
}

/// Receipt event: a type tag plus ordered attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxEvent {
    #[serde(rename = "type")]
    pub event_type: String,
    #[serde(default)]
    pub attributes: Vec<EventAttribute>,
}

impl TxEvent {
    pub fn new(event_type: &str, attributes: &[(&str, &str)]) -> Self {
        Self {
            event_type: event_type.to_string(),
            attributes: attributes
                .iter()
                .map(|(key, value)| EventAttribute {
                    key: key.to_string(),
                    value: value.to_string(),
                })
                .collect(),
        }
    }
}

/// Result of a delivered transaction as reported by the node
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TxReceipt {
    pub transaction_hash: String,
    #[serde(default)]
    pub height: u64,
    #[serde(default)]
    pub gas_used: u64,
    #[serde(default)]
    pub gas_wanted: u64,
    #[serde(default)]
    pub events: Vec<TxEvent>,
}

/// Fee attached to a signed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StdFee {
    pub amount: Vec<Coin>,
    pub gas: u64,
}

/// Wallet with one address per configured chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletProvider: Send + Sync {
    /// Chains the wallet is configured for
    fn chain_names(&self) -> Vec<String>;

    /// Wallet address on a chain, `None` when the wallet has no key for it
    async fn address_for(&self, chain_name: &str) -> OrchestratorResult<Option<String>>;

    /// Client able to simulate and submit signed transfers on a chain
    fn signing_client(&self, chain_name: &str) -> OrchestratorResult<Arc<dyn SigningClient>>;
}

/// Signing client bound to one chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SigningClient: Send + Sync {
    /// Simulate a bank send and return the gas it consumed
    async fn simulate_send(
        &self,
        sender: &str,
        recipient: &str,
        coins: &[Coin],
    ) -> OrchestratorResult<u64>;

    /// Sign and broadcast a bank send
    async fn send_tokens(
        &self,
        sender: &str,
        recipient: &str,
        coins: &[Coin],
        fee: &StdFee,
    ) -> OrchestratorResult<TxReceipt>;
}

/// Read-only bank queries
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BalanceQuerier: Send + Sync {
    /// All balances held by an address, queried through an RPC endpoint
    async fn all_balances(&self, rpc_endpoint: &str, address: &str) -> OrchestratorResult<Vec<Coin>>;
}
