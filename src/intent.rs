//! User intents and orchestration results
//!
//! Request fields arrive loosely typed (usually from a parameter extractor or
//! a JSON body), so every field is optional until validated. Each missing
//! field maps to its own [`Field`] in the `MissingField` error.

use crate::error::{Field, OrchestratorError, OrchestratorResult};

use serde::{Deserialize, Serialize};

/// Same-chain transfer intent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransferRequest {
    pub chain_name: Option<String>,
    pub symbol: Option<String>,
    /// Display-unit decimal string, e.g. `"0.25"`
    pub amount: Option<String>,
    pub to_address: Option<String>,
}

/// Validated same-chain transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidTransfer {
    pub chain_name: String,
    pub symbol: String,
    pub amount: String,
    pub to_address: String,
}

impl TransferRequest {
    pub fn validate(&self) -> OrchestratorResult<ValidTransfer> {
        Ok(ValidTransfer {
            chain_name: required(&self.chain_name, Field::ChainName)?,
            symbol: required(&self.symbol, Field::Symbol)?,
            amount: required(&self.amount, Field::Amount)?,
            to_address: required(&self.to_address, Field::ToAddress)?,
        })
    }
}

/// Cross-chain transfer intent
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BridgeTransferRequest {
    pub chain_name: Option<String>,
    pub target_chain_name: Option<String>,
    pub symbol: Option<String>,
    pub amount: Option<String>,
    pub to_address: Option<String>,
    /// Explicit source denom, skips symbol lookup
    #[serde(default)]
    pub source_denom: Option<String>,
    /// Explicit destination denom, skips the denom mapper
    #[serde(default)]
    pub destination_denom: Option<String>,
}

/// Validated cross-chain transfer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidBridgeTransfer {
    pub chain_name: String,
    pub target_chain_name: String,
    pub symbol: String,
    pub amount: String,
    pub to_address: String,
    pub source_denom: Option<String>,
    pub destination_denom: Option<String>,
}

impl BridgeTransferRequest {
    pub fn validate(&self) -> OrchestratorResult<ValidBridgeTransfer> {
        Ok(ValidBridgeTransfer {
            chain_name: required(&self.chain_name, Field::ChainName)?,
            target_chain_name: required(&self.target_chain_name, Field::TargetChainName)?,
            symbol: required(&self.symbol, Field::Symbol)?,
            amount: required(&self.amount, Field::Amount)?,
            to_address: required(&self.to_address, Field::ToAddress)?,
            source_denom: optional(&self.source_denom),
            destination_denom: optional(&self.destination_denom),
        })
    }
}

/// Cross-chain swap intent into the wallet's own address
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwapRequest {
    pub from_chain_name: Option<String>,
    pub from_symbol: Option<String>,
    pub from_amount: Option<String>,
    pub to_symbol: Option<String>,
    pub to_chain_name: Option<String>,
    #[serde(default)]
    pub from_denom: Option<String>,
    #[serde(default)]
    pub to_denom: Option<String>,
}

/// Validated swap
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidSwap {
    pub from_chain_name: String,
    pub from_symbol: String,
    pub from_amount: String,
    pub to_symbol: String,
    pub to_chain_name: String,
    pub from_denom: Option<String>,
    pub to_denom: Option<String>,
}

impl SwapRequest {
    pub fn validate(&self) -> OrchestratorResult<ValidSwap> {
        Ok(ValidSwap {
            from_chain_name: required(&self.from_chain_name, Field::ChainName)?,
            to_chain_name: required(&self.to_chain_name, Field::TargetChainName)?,
            from_symbol: required(&self.from_symbol, Field::Symbol)?,
            to_symbol: required(&self.to_symbol, Field::TargetSymbol)?,
            from_amount: required(&self.from_amount, Field::Amount)?,
            from_denom: optional(&self.from_denom),
            to_denom: optional(&self.to_denom),
        })
    }
}

fn required(value: &Option<String>, field: Field) -> OrchestratorResult<String> {
    optional(value).ok_or(OrchestratorError::MissingField(field))
}

fn optional(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Outcome of a transfer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferResult {
    pub from: String,
    pub to: String,
    /// Present only when the transfer produced a hash
    pub tx_hash: Option<String>,
    /// Reconciled fee as `<amount><denom>`, same-chain transfers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee_paid: Option<String>,
}

/// Terminal classification of a routed execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteStatus {
    Success,
    Failure,
}

/// Outcome of a cross-chain transfer or swap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapResult {
    #[serde(flatten)]
    pub transfer: TransferResult,
    pub from_symbol: String,
    pub from_amount: String,
    pub to_symbol: String,
    pub to_chain_name: String,
    pub status: RouteStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_amount_out: Option<String>,
    /// Why execution did not succeed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
}

impl SwapResult {
    pub fn is_success(&self) -> bool {
        self.status == RouteStatus::Success
    }

    /// One-line summary for chat or log output
    pub fn summary(&self) -> String {
        let hash = self.transfer.tx_hash.as_deref().unwrap_or("none");
        match self.status {
            RouteStatus::Success => format!(
                "Successfully swapped {} {} tokens to {} on chain {}.\nTransaction Hash: {}",
                self.from_amount, self.from_symbol, self.to_symbol, self.to_chain_name, hash
            ),
            RouteStatus::Failure => format!(
                "Error occurred swapping {} {} tokens to {} on chain {}.\nTransaction Hash: {}, try again",
                self.from_amount, self.from_symbol, self.to_symbol, self.to_chain_name, hash
            ),
        }
    }
}
