//! Cross-chain orchestration
//!
//! - [`engine`] drives transfers and swaps through the route engine
//! - [`stage`] tracks the forward-only execution stages
//! - [`ambiguity`] turns ambiguous-asset reports into a user prompt

pub mod ambiguity;
pub mod engine;
pub mod stage;

pub use engine::IbcOrchestrator;
pub use stage::{BridgeStage, StageTracker};
