//! Prometheus metrics for monitoring
//!
//! Exposes metrics for:
//! - Same-chain transfers and the fees they paid
//! - Bridge executions by outcome and route latency
//! - Balance queries

use crate::error::{OrchestratorError, OrchestratorResult};
use crate::intent::RouteStatus;

use lazy_static::lazy_static;
use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, Encoder, HistogramVec, TextEncoder,
};

lazy_static! {
    // Transfer metrics
    pub static ref TRANSFERS_SUBMITTED: CounterVec = register_counter_vec!(
        "orchestrator_transfers_submitted_total",
        "Total same-chain transfers accepted by the chain",
        &["chain_name"]
    ).unwrap();

    pub static ref TRANSFERS_FAILED: CounterVec = register_counter_vec!(
        "orchestrator_transfers_failed_total",
        "Total same-chain transfers rejected on submission",
        &["chain_name"]
    ).unwrap();

    pub static ref FEE_PAID: CounterVec = register_counter_vec!(
        "orchestrator_fee_paid_total",
        "Reconciled fees paid, in base units",
        &["denom"]
    ).unwrap();

    // Bridge metrics
    pub static ref BRIDGE_EXECUTIONS: CounterVec = register_counter_vec!(
        "orchestrator_bridge_executions_total",
        "Total routed executions by kind and outcome",
        &["kind", "status"]
    ).unwrap();

    pub static ref ROUTE_LATENCY: HistogramVec = register_histogram_vec!(
        "orchestrator_route_latency_seconds",
        "Route execution latency",
        &["kind"],
        vec![1.0, 5.0, 10.0, 30.0, 60.0, 120.0, 300.0, 600.0]
    ).unwrap();

    // Balance metrics
    pub static ref BALANCE_QUERIES: CounterVec = register_counter_vec!(
        "orchestrator_balance_queries_total",
        "Total successful balance queries",
        &["chain_name"]
    ).unwrap();
}

/// Render every registered metric in the Prometheus text format
pub fn render() -> OrchestratorResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| OrchestratorError::Internal(format!("metrics encoding: {}", e)))?;
    String::from_utf8(buffer)
        .map_err(|e| OrchestratorError::Internal(format!("metrics encoding: {}", e)))
}

// Helper functions to record metrics

pub fn record_transfer_submitted(chain_name: &str) {
    TRANSFERS_SUBMITTED.with_label_values(&[chain_name]).inc();
}

pub fn record_transfer_failed(chain_name: &str) {
    TRANSFERS_FAILED.with_label_values(&[chain_name]).inc();
}

pub fn record_fee_paid(denom: &str, amount: u128) {
    FEE_PAID.with_label_values(&[denom]).inc_by(amount as f64);
}

pub fn record_bridge_execution(kind: &str, status: RouteStatus) {
    let status = match status {
        RouteStatus::Success => "success",
        RouteStatus::Failure => "failure",
    };
    BRIDGE_EXECUTIONS.with_label_values(&[kind, status]).inc();
}

pub fn observe_route_latency(kind: &str, latency_secs: f64) {
    ROUTE_LATENCY.with_label_values(&[kind]).observe(latency_secs);
}

pub fn record_balance_query(chain_name: &str) {
    BALANCE_QUERIES.with_label_values(&[chain_name]).inc();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_includes_recorded_series() {
        record_transfer_submitted("metrics-test-chain");
        record_bridge_execution("transfer", RouteStatus::Failure);

        let output = render().unwrap();
        assert!(output.contains("orchestrator_transfers_submitted_total"));
        assert!(output.contains("metrics-test-chain"));
        assert!(output.contains("status=\"failure\""));
    }
}
