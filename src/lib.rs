//! Guarded NFT burns for an EVM gallery contract.
//!
//! The [`gate::TransactionGate`] allows at most one in-flight burn per token
//! ID, asks for confirmation, and hands the burn to a chain collaborator
//! ([`blockchain::BurnExecutor`]). Everything else supports it: configuration,
//! notifications, metadata lookup for the gallery view and observability.

pub mod blockchain;
pub mod config;
pub mod gate;
pub mod metadata;
pub mod notify;
pub mod observability;
pub mod resilience;

pub use config::GateConfig;
pub use gate::{BurnService, GateError, TokenId, TransactionGate};
