//! Transaction confirmation monitoring.

use alloy::primitives::TxHash;
use alloy::rpc::types::TransactionReceipt;
use std::time::Duration;
use tokio::time::{sleep, timeout};

use crate::blockchain::client::BlockchainClient;
use crate::blockchain::types::{BlockchainError, BlockchainResult};
use crate::resilience::Backoff;

/// Longest pause between two receipt polls.
const MAX_POLL_INTERVAL_MS: u64 = 8_000;

/// Confirmation progress of a broadcast transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmationStatus {
    /// No receipt yet.
    Pending,
    /// Mined but not deep enough.
    Confirming { current: u32, required: u32 },
    /// Deep enough to be treated as final.
    Confirmed { block_number: u64 },
}

/// Whether a failed poll is worth repeating.
///
/// The transaction is already broadcast, so endpoint trouble must not end
/// the wait; only an on-chain failure does.
pub fn is_transient(error: &BlockchainError) -> bool {
    matches!(error, BlockchainError::Rpc(_) | BlockchainError::Timeout(_))
}

/// Number of blocks a transaction has, counting its inclusion block as one.
pub fn confirmations(tx_block: u64, current_block: u64) -> u32 {
    if current_block < tx_block {
        return 0;
    }
    (current_block - tx_block + 1).min(u32::MAX as u64) as u32
}

/// Polls for receipts until the configured confirmation depth.
#[derive(Debug, Clone)]
pub struct ConfirmationWatcher {
    client: BlockchainClient,
}

impl ConfirmationWatcher {
    pub fn new(client: BlockchainClient) -> Self {
        Self { client }
    }

    /// Wait for a transaction to be confirmed.
    ///
    /// Fails with [`BlockchainError::Reverted`] if the receipt reports a
    /// failed execution, and with [`BlockchainError::ConfirmationTimeout`]
    /// once `confirmation_timeout_secs` has passed. RPC errors in between
    /// are logged and polled through.
    pub async fn wait(&self, tx_hash: TxHash) -> BlockchainResult<TransactionReceipt> {
        let config = self.client.config();
        let required = config.confirmation_blocks;
        let waited_secs = config.confirmation_timeout_secs;
        let mut delays = Backoff::new(config.poll_interval_ms, MAX_POLL_INTERVAL_MS);

        let result: Result<BlockchainResult<TransactionReceipt>, _> =
            timeout(Duration::from_secs(waited_secs), async {
                loop {
                    let polled = match self.poll(tx_hash, required).await {
                        Ok(polled) => Some(polled),
                        Err(e) if is_transient(&e) => {
                            tracing::warn!(tx_hash = %tx_hash, error = %e, "Receipt poll failed, retrying");
                            None
                        }
                        Err(e) => return Err(e),
                    };

                    match polled {
                        None => {}
                        Some((status, receipt)) => match status {
                            ConfirmationStatus::Confirmed { block_number } => {
                                tracing::info!(tx_hash = %tx_hash, block_number, "Transaction confirmed");
                                if let Some(receipt) = receipt {
                                    return Ok(receipt);
                                }
                            }
                            ConfirmationStatus::Confirming { current, required } => {
                                tracing::debug!(
                                    tx_hash = %tx_hash,
                                    confirmations = current,
                                    required = required,
                                    "Waiting for confirmations"
                                );
                            }
                            ConfirmationStatus::Pending => {
                                tracing::debug!(tx_hash = %tx_hash, "Transaction pending");
                            }
                        },
                    }

                    if let Some(delay) = delays.next() {
                        sleep(delay).await;
                    }
                }
            })
            .await;

        match result {
            Ok(receipt) => receipt,
            Err(_) => Err(BlockchainError::ConfirmationTimeout { tx_hash, waited_secs }),
        }
    }

    async fn poll(
        &self,
        tx_hash: TxHash,
        required: u32,
    ) -> BlockchainResult<(ConfirmationStatus, Option<TransactionReceipt>)> {
        let receipt = match self.client.get_transaction_receipt(tx_hash).await? {
            Some(r) => r,
            None => return Ok((ConfirmationStatus::Pending, None)),
        };

        if !receipt.status() {
            return Err(BlockchainError::Reverted(format!(
                "transaction {} failed on-chain",
                tx_hash
            )));
        }

        let current_block = self.client.get_block_number().await?;
        let tx_block = receipt.block_number.unwrap_or(current_block);
        let current = confirmations(tx_block, current_block);

        if current >= required {
            Ok((
                ConfirmationStatus::Confirmed {
                    block_number: tx_block,
                },
                Some(receipt),
            ))
        } else {
            Ok((ConfirmationStatus::Confirming { current, required }, None))
        }
    }
}
