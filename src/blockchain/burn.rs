//! Burn submission and on-chain verification.
//!
//! # Steps
//! ```text
//! ownerOf(token)        → NotOwner / NonexistentToken
//! gas price ceiling     → GasPriceTooHigh
//! estimateGas(burnNFT)  → GasEstimation ("transaction would fail")
//! send burnNFT          → tx hash
//! wait for receipt      → Reverted / ConfirmationTimeout
//! verify burn           → NFTBurned event | Transfer to 0x0 | ownerOf reverts
//! ```

use alloy::network::TransactionBuilder;
use alloy::primitives::Address;
use alloy::rpc::types::Log;
use std::future::Future;

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::contract::{NFTBurned, NftContract, Transfer};
use crate::blockchain::transaction::ConfirmationWatcher;
use crate::blockchain::types::{BlockchainError, BlockchainResult, BurnReceipt, BurnVerification};
use crate::gate::TokenId;
use crate::observability::metrics;

/// The chain collaborator behind the gate.
pub trait TokenBurner: Send + Sync {
    /// Burn `token_id`, resolving once the burn is final or has failed.
    fn burn(&self, token_id: TokenId) -> impl Future<Output = BlockchainResult<BurnReceipt>> + Send;
}

/// Look for evidence of the burn in a receipt's logs.
///
/// Only logs emitted by `contract` for `token_id` count.
pub fn verify_burn_logs(logs: &[Log], contract: Address, token_id: TokenId) -> Option<BurnVerification> {
    let target = token_id.as_u256();
    let mut transfer_to_zero = false;

    for log in logs.iter().filter(|log| log.address() == contract) {
        if let Ok(decoded) = log.log_decode::<NFTBurned>() {
            if decoded.inner.tokenId == target {
                return Some(BurnVerification::BurnEvent);
            }
        }
        if let Ok(decoded) = log.log_decode::<Transfer>() {
            if decoded.inner.tokenId == target && decoded.inner.to == Address::ZERO {
                transfer_to_zero = true;
            }
        }
    }

    transfer_to_zero.then_some(BurnVerification::TransferToZero)
}

/// Gas limit with the configured safety buffer applied.
pub fn buffered_gas_limit(estimate: u64, multiplier: f64) -> u64 {
    (estimate as f64 * multiplier).ceil() as u64
}

/// Submits `burnNFT` transactions signed by the client's wallet.
#[derive(Debug, Clone)]
pub struct BurnExecutor {
    contract: NftContract,
    watcher: ConfirmationWatcher,
    sender: Address,
}

impl BurnExecutor {
    /// Create an executor. The client must carry a signing wallet.
    pub fn new(client: BlockchainClient) -> BlockchainResult<Self> {
        let sender = client.sender().ok_or_else(|| {
            BlockchainError::NotAvailable("burning requires a signing wallet".to_string())
        })?;
        let watcher = ConfirmationWatcher::new(client.clone());
        let contract = NftContract::new(client)?;

        Ok(Self {
            contract,
            watcher,
            sender,
        })
    }

    /// Address burns are sent from.
    pub fn sender(&self) -> Address {
        self.sender
    }

    async fn verify_ownership(&self, token_id: TokenId) -> BlockchainResult<()> {
        let owner = self.contract.owner_of(token_id).await?;
        tracing::debug!(token_id = %token_id, owner = %owner, sender = %self.sender, "Checked ownership");

        if owner != self.sender {
            return Err(BlockchainError::NotOwner {
                token_id,
                owner: owner.to_string(),
            });
        }
        Ok(())
    }

    async fn check_gas_price(&self) -> BlockchainResult<()> {
        let client = self.contract.client();
        let gas_price_gwei = client.get_gas_price().await? / 1_000_000_000;
        let max_gwei = client.config().max_gas_price_gwei;

        if gas_price_gwei > max_gwei as u128 {
            return Err(BlockchainError::GasPriceTooHigh {
                current_gwei: gas_price_gwei.min(u64::MAX as u128) as u64,
                max_gwei,
            });
        }
        Ok(())
    }

    /// Run the full burn sequence for `token_id`.
    pub async fn burn_token(&self, token_id: TokenId) -> BlockchainResult<BurnReceipt> {
        self.verify_ownership(token_id).await?;
        self.check_gas_price().await?;

        let client = self.contract.client();
        let request = self.contract.burn_request(token_id, self.sender);
        let estimate = client.estimate_gas(request.clone()).await.map_err(|e| match e {
            BlockchainError::GasEstimation(_) => e,
            other => BlockchainError::GasEstimation(other.to_string()),
        })?;
        let gas_limit = buffered_gas_limit(estimate, client.config().gas_limit_multiplier);
        tracing::debug!(token_id = %token_id, estimate, gas_limit, "Gas estimated");

        let tx_hash = client.send_transaction(request.with_gas_limit(gas_limit)).await?;
        let receipt = self.watcher.wait(tx_hash).await?;

        let verification = match verify_burn_logs(receipt.inner.logs(), self.contract.address(), token_id) {
            Some(found) => found,
            None => self.verify_by_owner_query(token_id).await,
        };
        metrics::record_burn(verification.label());

        Ok(BurnReceipt {
            token_id,
            tx_hash,
            block_number: receipt.block_number,
            gas_used: receipt.gas_used,
            verification,
        })
    }

    async fn verify_by_owner_query(&self, token_id: TokenId) -> BurnVerification {
        match self.contract.owner_of(token_id).await {
            Err(BlockchainError::NonexistentToken(_)) => BurnVerification::OwnerQueryReverted,
            Ok(owner) => {
                tracing::warn!(token_id = %token_id, owner = %owner, "NFT still exists after burn transaction");
                BurnVerification::Unverified
            }
            Err(e) => {
                tracing::warn!(token_id = %token_id, error = %e, "Could not re-check ownership after burn");
                BurnVerification::Unverified
            }
        }
    }
}

impl TokenBurner for BurnExecutor {
    fn burn(&self, token_id: TokenId) -> impl Future<Output = BlockchainResult<BurnReceipt>> + Send {
        self.burn_token(token_id)
    }
}
