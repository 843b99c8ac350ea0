//! Error types for the interchain orchestrator

use crate::coordination::ambiguity::disambiguation_prompt;
use crate::registry::AssetDescriptor;

use std::fmt;
use thiserror::Error;

/// Request field that must be present before an orchestration can start
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    ChainName,
    TargetChainName,
    Symbol,
    TargetSymbol,
    Amount,
    ToAddress,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::ChainName => "chain name",
            Field::TargetChainName => "target chain name",
            Field::Symbol => "symbol",
            Field::TargetSymbol => "target symbol",
            Field::Amount => "amount",
            Field::ToAddress => "receiver address",
        };
        f.write_str(name)
    }
}

/// Main error type for the orchestrator
#[derive(Error, Debug, Clone)]
pub enum OrchestratorError {
    #[error("No {0}")]
    MissingField(Field),

    #[error("Chain {0} not found")]
    ChainNotFound(String),

    #[error("Asset {symbol} not found on chain {chain_name}")]
    AssetNotFound { symbol: String, chain_name: String },

    #[error("{}", disambiguation_prompt(.value, .chain_name, .candidates))]
    AmbiguousAsset {
        value: String,
        chain_name: String,
        candidates: Vec<AssetDescriptor>,
    },

    #[error("Route computation failed: {0}")]
    RouteComputationFailed(String),

    #[error("Route execution failed: {0}")]
    RouteExecutionFailed(String),

    #[error("Denom mapping failed: {0}")]
    DenomMappingFailed(String),

    #[error("Cannot get wallet address for chain {chain_name}")]
    WalletAddressUnavailable { chain_name: String },

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Chain {chain_name} has no RPC endpoint")]
    NoRpcEndpoint { chain_name: String },

    #[error("Transaction simulation failed: {0}")]
    Simulation(String),

    #[error("{0}")]
    TransactionRejected(String),

    #[error("Balance query failed on chain {chain_name}: {message}")]
    BalanceQuery { chain_name: String, message: String },

    #[error("Route completion was already delivered")]
    CompletionAlreadyDelivered,

    #[error("Invalid stage transition from {from} to {to}")]
    InvalidStageTransition { from: String, to: String },

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    /// Check if the end user can fix the request and retry
    pub fn is_user_actionable(&self) -> bool {
        matches!(
            self,
            OrchestratorError::MissingField(_)
                | OrchestratorError::ChainNotFound(_)
                | OrchestratorError::AssetNotFound { .. }
                | OrchestratorError::AmbiguousAsset { .. }
                | OrchestratorError::InvalidAmount(_)
        )
    }

    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            OrchestratorError::MissingField(_) => "MISSING_FIELD",
            OrchestratorError::ChainNotFound(_) => "CHAIN_NOT_FOUND",
            OrchestratorError::AssetNotFound { .. } => "ASSET_NOT_FOUND",
            OrchestratorError::AmbiguousAsset { .. } => "AMBIGUOUS_ASSET",
            OrchestratorError::RouteComputationFailed(_) => "ROUTE_COMPUTATION_FAILED",
            OrchestratorError::RouteExecutionFailed(_) => "ROUTE_EXECUTION_FAILED",
            OrchestratorError::DenomMappingFailed(_) => "DENOM_MAPPING_FAILED",
            OrchestratorError::WalletAddressUnavailable { .. } => "WALLET_ADDRESS_UNAVAILABLE",
            OrchestratorError::InvalidAmount(_) => "INVALID_AMOUNT",
            OrchestratorError::NoRpcEndpoint { .. } => "NO_RPC_ENDPOINT",
            OrchestratorError::Simulation(_) => "SIMULATION_FAILED",
            OrchestratorError::TransactionRejected(_) => "TRANSACTION_REJECTED",
            OrchestratorError::BalanceQuery { .. } => "BALANCE_QUERY_FAILED",
            OrchestratorError::CompletionAlreadyDelivered => "COMPLETION_ALREADY_DELIVERED",
            OrchestratorError::InvalidStageTransition { .. } => "INVALID_STAGE_TRANSITION",
            OrchestratorError::Config(_) => "CONFIG_ERROR",
            OrchestratorError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

/// Result type for orchestrator operations
pub type OrchestratorResult<T> = Result<T, OrchestratorError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_field_messages() {
        assert_eq!(
            OrchestratorError::MissingField(Field::ToAddress).to_string(),
            "No receiver address"
        );
        assert_eq!(
            OrchestratorError::MissingField(Field::Symbol).to_string(),
            "No symbol"
        );
    }

    #[test]
    fn test_user_actionable_split() {
        assert!(OrchestratorError::InvalidAmount("1.5".into()).is_user_actionable());
        assert!(!OrchestratorError::TransactionRejected("out of gas".into()).is_user_actionable());
    }
}
