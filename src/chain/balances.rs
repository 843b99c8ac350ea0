//! Concurrent balance aggregation across the wallet's chains

use super::{BalanceQuerier, Coin, WalletProvider};
use crate::error::{OrchestratorError, OrchestratorResult};
use crate::registry::{ChainDescriptor, ChainLocator, ChainRegistry};

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

/// Balances held by the wallet on one chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBalances {
    pub chain_name: String,
    pub balances: Vec<Coin>,
}

/// Fans out one balance query per wallet chain and joins on all of them
pub struct BalanceAggregator {
    /// Merged chain registry
    registry: Arc<ChainRegistry>,
    /// Wallet used for per-chain addresses
    wallet: Arc<dyn WalletProvider>,
    /// Bank query client
    querier: Arc<dyn BalanceQuerier>,
}

impl BalanceAggregator {
    pub fn new(
        registry: Arc<ChainRegistry>,
        wallet: Arc<dyn WalletProvider>,
        querier: Arc<dyn BalanceQuerier>,
    ) -> Self {
        Self {
            registry,
            wallet,
            querier,
        }
    }

    /// Fetch all balances for every registered wallet chain.
    ///
    /// Chains missing from the registry are skipped. Any single query
    /// failure fails the whole call.
    pub async fn fetch_all(&self) -> OrchestratorResult<Vec<ChainBalances>> {
        let locator = self.registry.locator();

        let chains: Vec<&ChainDescriptor> = self
            .wallet
            .chain_names()
            .iter()
            .filter_map(|name| {
                let chain = locator.find_by_name(name);
                if chain.is_none() {
                    debug!("Skipping wallet chain {} - not in registry", name);
                }
                chain
            })
            .collect();

        info!("Fetching balances on {} chains", chains.len());

        try_join_all(chains.into_iter().map(|chain| self.fetch_chain(chain))).await
    }

    async fn fetch_chain(&self, chain: &ChainDescriptor) -> OrchestratorResult<ChainBalances> {
        let address = self
            .wallet
            .address_for(&chain.chain_name)
            .await?
            .ok_or_else(|| OrchestratorError::WalletAddressUnavailable {
                chain_name: chain.chain_name.clone(),
            })?;

        let rpc = ChainLocator::primary_rpc(chain)?;
        let balances = self.querier.all_balances(rpc, &address).await?;

        crate::metrics::record_balance_query(&chain.chain_name);
        debug!(
            "Chain {}: {} balances for {}",
            chain.chain_name,
            balances.len(),
            address
        );

        Ok(ChainBalances {
            chain_name: chain.chain_name.clone(),
            balances,
        })
    }
}
