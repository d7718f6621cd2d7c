//! Chain-specific types and error definitions.

use alloy::primitives::TxHash;
use serde::Serialize;
use thiserror::Error;

use crate::gate::TokenId;

pub use crate::config::schema::BlockchainConfig;

/// Chain ID type for strong typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ChainId(pub u64);

impl From<u64> for ChainId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<ChainId> for u64 {
    fn from(id: ChainId) -> Self {
        id.0
    }
}

/// Errors that can occur during blockchain operations.
#[derive(Debug, Error)]
pub enum BlockchainError {
    /// RPC connection or request failed.
    #[error("RPC error: {0}")]
    Rpc(String),

    /// RPC request timed out.
    #[error("RPC timeout after {0} seconds")]
    Timeout(u64),

    /// Transaction was not confirmed within the configured deadline.
    #[error("Transaction {tx_hash} not confirmed after {waited_secs} seconds")]
    ConfirmationTimeout { tx_hash: TxHash, waited_secs: u64 },

    /// A call or transaction was reverted by the contract.
    #[error("Transaction reverted: {0}")]
    Reverted(String),

    /// Invalid private key format or signing error.
    #[error("Wallet error: {0}")]
    Wallet(String),

    /// Gas price exceeded maximum allowed.
    #[error("Gas price {current_gwei} gwei exceeds maximum {max_gwei} gwei")]
    GasPriceTooHigh { current_gwei: u64, max_gwei: u64 },

    /// Gas estimation failed, so the transaction would fail on-chain.
    #[error("Transaction would fail: {0}")]
    GasEstimation(String),

    /// The signer does not own the token.
    #[error("You are not the owner of NFT {token_id} (owner is {owner})")]
    NotOwner { token_id: TokenId, owner: String },

    /// The token does not exist (never minted or already burned).
    #[error("NFT {0} does not exist")]
    NonexistentToken(TokenId),

    /// Chain configuration mismatch.
    #[error("Chain ID mismatch: expected {expected}, got {actual}")]
    ChainMismatch { expected: u64, actual: u64 },

    /// Blockchain client not usable for the requested operation.
    #[error("Blockchain not available: {0}")]
    NotAvailable(String),

    /// A configured address does not parse.
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),
}

/// Result type for blockchain operations.
pub type BlockchainResult<T> = Result<T, BlockchainError>;

/// How a burn was confirmed on-chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BurnVerification {
    /// The receipt carries the contract's `NFTBurned` event.
    BurnEvent,
    /// The receipt carries an ERC-721 `Transfer` to the zero address.
    TransferToZero,
    /// No event matched, but `ownerOf` now reverts.
    OwnerQueryReverted,
    /// The transaction succeeded but the token still appears to exist.
    Unverified,
}

impl BurnVerification {
    pub fn is_verified(&self) -> bool {
        !matches!(self, BurnVerification::Unverified)
    }

    pub fn label(&self) -> &'static str {
        match self {
            BurnVerification::BurnEvent => "burn_event",
            BurnVerification::TransferToZero => "transfer_to_zero",
            BurnVerification::OwnerQueryReverted => "owner_query_reverted",
            BurnVerification::Unverified => "unverified",
        }
    }
}

/// Settled burn transaction.
#[derive(Debug, Clone, Serialize)]
pub struct BurnReceipt {
    pub token_id: TokenId,
    pub tx_hash: TxHash,
    pub block_number: Option<u64>,
    pub gas_used: u64,
    pub verification: BurnVerification,
}
