//! Resilience helpers for chain calls.
//!
//! # Design Decisions
//! - Every RPC call has a deadline (`blockchain::client`)
//! - Reads fail over across configured endpoints; writes go to the primary only
//! - Receipt polling backs off exponentially with jitter
//! - The gate itself never retries

pub mod backoff;

pub use backoff::{calculate_backoff, Backoff};
