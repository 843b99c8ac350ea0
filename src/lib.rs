//! Interchain Orchestrator - cross-chain transfer and swap coordination for Cosmos chains
//!
//! Resolves user intents against a chain/asset registry, drives same-chain
//! transfers and routed IBC transfers or swaps to completion, and reconciles
//! the fees actually paid from transaction receipts. Wallets, chain clients
//! and the route engine are injected through the traits in [`chain`] and
//! [`route`].

pub mod api;
pub mod chain;
pub mod config;
pub mod coordination;
pub mod error;
pub mod intent;
pub mod metrics;
pub mod registry;
pub mod route;
pub mod telemetry;
pub mod tx;

#[cfg(test)]
mod test_utils;

pub use chain::{BalanceAggregator, BalanceQuerier, SigningClient, WalletProvider};
pub use config::Settings;
pub use coordination::IbcOrchestrator;
pub use error::{OrchestratorError, OrchestratorResult};
pub use registry::ChainRegistry;
pub use route::{DenomMapper, RouteEngine};
pub use tx::TransferOrchestrator;
