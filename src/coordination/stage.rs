//! Bridge execution stages

use crate::error::{OrchestratorError, OrchestratorResult};

use serde::Serialize;
use std::fmt;
use tracing::info;

/// Stage of a cross-chain transfer or swap
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum BridgeStage {
    Validating,
    Resolving,
    Routing,
    Addressing,
    Executing,
    CompletedSuccess,
    CompletedFailure,
}

impl BridgeStage {
    pub fn is_terminal(&self) -> bool {
        matches!(self, BridgeStage::CompletedSuccess | BridgeStage::CompletedFailure)
    }

    /// Whether `next` directly follows this stage
    pub fn can_advance_to(&self, next: BridgeStage) -> bool {
        use BridgeStage::*;
        matches!(
            (self, next),
            (Validating, Resolving)
                | (Resolving, Routing)
                | (Routing, Addressing)
                | (Addressing, Executing)
                | (Executing, CompletedSuccess)
                | (Executing, CompletedFailure)
        )
    }
}

impl fmt::Display for BridgeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BridgeStage::Validating => "validating",
            BridgeStage::Resolving => "resolving",
            BridgeStage::Routing => "routing",
            BridgeStage::Addressing => "addressing",
            BridgeStage::Executing => "executing",
            BridgeStage::CompletedSuccess => "completed_success",
            BridgeStage::CompletedFailure => "completed_failure",
        };
        f.write_str(name)
    }
}

/// Forward-only stage tracker for one execution
#[derive(Debug)]
pub struct StageTracker {
    stage: BridgeStage,
}

impl StageTracker {
    pub fn new() -> Self {
        Self {
            stage: BridgeStage::Validating,
        }
    }

    pub fn current(&self) -> BridgeStage {
        self.stage
    }

    /// Move to the next stage, rejecting skips, repeats and reversals
    pub fn advance(&mut self, next: BridgeStage) -> OrchestratorResult<()> {
        if !self.stage.can_advance_to(next) {
            return Err(OrchestratorError::InvalidStageTransition {
                from: self.stage.to_string(),
                to: next.to_string(),
            });
        }
        info!("Bridge stage {} -> {}", self.stage, next);
        self.stage = next;
        Ok(())
    }
}

impl Default for StageTracker {
    fn default() -> Self {
        Self::new()
    }
}
