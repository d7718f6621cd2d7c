//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! gate / blockchain / metadata produce:
//!     → logging.rs (structured log events, one span per gated request)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → stderr
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```

pub mod logging;
pub mod metrics;
