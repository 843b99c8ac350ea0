//! Same-chain transfers with gas estimation and fee reconciliation

mod gas;
pub mod receipt;
mod transfer;

pub use gas::GasEstimator;
pub use receipt::{paid_fee, paid_fee_from_receipt};
pub use transfer::TransferOrchestrator;
