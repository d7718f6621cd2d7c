//! Blockchain integration subsystem.
//!
//! # Data Flow
//! ```text
//! Environment variable (private key) + BlockchainConfig
//!     → wallet.rs (key loading)
//!     → client.rs (RPC connection with timeouts and failover)
//!     → contract.rs (ownerOf / tokenURI / burnNFT encoding)
//!     → burn.rs (ownership, gas, submit, verify)
//!     → transaction.rs (receipt polling until confirmed)
//! ```
//!
//! # Security Constraints
//! - Private keys ONLY from environment variables
//! - Never log private keys or sensitive data
//! - All RPC calls have configurable timeouts
//! - Transactions are broadcast through the primary endpoint only

pub mod burn;
pub mod client;
pub mod contract;
pub mod transaction;
pub mod types;
pub mod wallet;

pub use burn::{BurnExecutor, TokenBurner};
pub use client::BlockchainClient;
pub use contract::NftContract;
pub use types::{BlockchainConfig, BlockchainError, BlockchainResult, BurnReceipt, BurnVerification, ChainId};
pub use wallet::Wallet;
