//! Metrics collection and exposition.
//!
//! # Metrics
//! - `burn_gate_requests_total` (counter): gated requests by outcome
//! - `burn_gate_pending_operations` (gauge): tokens currently in flight
//! - `burn_gate_rpc_health` (gauge): 1=healthy, 0=unhealthy
//! - `burn_gate_burns_total` (counter): settled burns by verification method
//!
//! Recording is a no-op until a recorder is installed, so library users and
//! tests pay nothing when metrics are disabled.

use metrics::{counter, gauge};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;

/// Install the Prometheus recorder with an HTTP scrape endpoint.
///
/// Must be called from within a tokio runtime.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

/// Count one gated request by outcome label.
pub fn record_gate_outcome(outcome: &'static str) {
    counter!("burn_gate_requests_total", "outcome" => outcome).increment(1);
}

/// Set the number of in-flight tokens.
pub fn record_pending_operations(count: usize) {
    gauge!("burn_gate_pending_operations").set(count as f64);
}

/// Record RPC reachability.
pub fn record_rpc_health(healthy: bool) {
    gauge!("burn_gate_rpc_health").set(if healthy { 1.0 } else { 0.0 });
}

/// Count a settled burn by how it was verified.
pub fn record_burn(verification: &'static str) {
    counter!("burn_gate_burns_total", "verification" => verification).increment(1);
}
