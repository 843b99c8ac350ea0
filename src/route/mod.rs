//! External route engine and denom mapping collaborators
//!
//! The route engine computes a multi-hop plan between two (chain, denom)
//! pairs and executes it. The orchestrator never inspects the plan beyond
//! the chains it needs addresses for; the terminal transaction hash arrives
//! only through a [`CompletionHandle`].

pub mod completion;

pub use completion::{completion_channel, CompletionHandle, CompletionSlot, RouteCompletion};

use crate::error::OrchestratorResult;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Affiliate fee applied to every route requested by this crate
pub const DEFAULT_AFFILIATE_FEE_BPS: u32 = 0;

/// Parameters for route computation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub source_chain_id: String,
    pub source_denom: String,
    pub dest_chain_id: String,
    pub dest_denom: String,
    /// Amount in source base units
    pub amount_in: String,
    pub affiliate_fee_bps: u32,
}

/// Route plan produced by the engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    /// Chains on which the route needs a user address, in route order
    pub required_chain_ids: Vec<String>,
    #[serde(default)]
    pub estimated_amount_out: Option<String>,
    #[serde(default)]
    pub estimated_fees: Option<String>,
    #[serde(default)]
    pub estimated_duration_secs: Option<u64>,
    /// Engine-private route data, forwarded untouched
    #[serde(default)]
    pub payload: serde_json::Value,
}

/// Address supplied for one chain of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainAddress {
    pub chain_id: String,
    pub address: String,
}

/// Terminal state reported by the route engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RouteState {
    #[serde(rename = "STATE_COMPLETED_SUCCESS")]
    CompletedSuccess,
    #[serde(rename = "STATE_COMPLETED_ERROR")]
    CompletedError,
    #[serde(rename = "STATE_ABANDONED")]
    Abandoned,
    #[serde(rename = "STATE_PENDING")]
    Pending,
}

impl RouteState {
    pub fn is_success(&self) -> bool {
        matches!(self, RouteState::CompletedSuccess)
    }
}

/// Bridge routing engine
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RouteEngine: Send + Sync {
    /// Compute a route plan
    async fn route(&self, request: RouteRequest) -> OrchestratorResult<RoutePlan>;

    /// Execute a plan with one address per required chain.
    ///
    /// Implementations deliver the final transaction hash through
    /// `completion` exactly once and return the terminal state.
    async fn execute_route(
        &self,
        plan: &RoutePlan,
        addresses: &[ChainAddress],
        completion: CompletionHandle,
    ) -> OrchestratorResult<RouteState>;
}

/// Maps a source denom to its representation on another chain
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DenomMapper: Send + Sync {
    async fn map_denom(
        &self,
        source_denom: &str,
        source_chain_id: &str,
        dest_chain_id: &str,
    ) -> OrchestratorResult<String>;
}
