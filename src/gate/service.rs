//! Burn requests routed through the gate, with user notifications.

use std::future::Future;
use std::sync::Arc;

use crate::blockchain::burn::TokenBurner;
use crate::blockchain::types::{BlockchainError, BurnReceipt};
use crate::gate::error::{GateError, TransactionOutcome};
use crate::gate::transaction_gate::TransactionGate;
use crate::gate::token_id::TokenId;
use crate::notify::{Notifier, Severity};

/// Outcome of a gated burn.
pub type BurnOutcome = TransactionOutcome<BurnReceipt, BlockchainError>;

/// Connects the gate, the chain collaborator and a notification sink.
pub struct BurnService<B, N> {
    gate: TransactionGate,
    burner: Arc<B>,
    notifier: N,
}

impl<B: TokenBurner, N: Notifier> BurnService<B, N> {
    pub fn new(gate: TransactionGate, burner: Arc<B>, notifier: N) -> Self {
        Self {
            gate,
            burner,
            notifier,
        }
    }

    pub fn gate(&self) -> &TransactionGate {
        &self.gate
    }

    /// Confirm and burn the token named by `raw_id`.
    pub async fn burn<C, CF>(&self, raw_id: &str, confirm: C) -> BurnOutcome
    where
        C: FnOnce(TokenId) -> CF,
        CF: Future<Output = bool>,
    {
        let burner = Arc::clone(&self.burner);
        let notifier = &self.notifier;

        let outcome = self
            .gate
            .request_operation(raw_id, confirm, |token_id| async move {
                notifier.notify(
                    &format!("Burning NFT with token ID {}...", token_id),
                    Severity::Info,
                );
                burner.burn(token_id).await
            })
            .await;

        self.report(&outcome);
        outcome
    }

    fn report(&self, outcome: &BurnOutcome) {
        let (message, severity) = match outcome {
            Ok(receipt) if receipt.verification.is_verified() => (
                format!(
                    "NFT with token ID {} burned successfully (tx {})",
                    receipt.token_id, receipt.tx_hash
                ),
                Severity::Success,
            ),
            Ok(receipt) => (
                format!(
                    "Transaction {} confirmed, but the burn of NFT {} could not be verified",
                    receipt.tx_hash, receipt.token_id
                ),
                Severity::Warning,
            ),
            Err(GateError::DuplicateInFlight(token_id)) => (
                format!(
                    "Already processing a burn transaction for token ID {}",
                    token_id
                ),
                Severity::Warning,
            ),
            Err(GateError::UserCancelled(token_id)) => (
                format!("Burn of NFT {} cancelled", token_id),
                Severity::Info,
            ),
            Err(GateError::InvalidIdentifier(e)) => {
                (format!("Invalid token ID: {}", e), Severity::Error)
            }
            Err(GateError::Collaborator(e)) => {
                (format!("Failed to burn NFT: {}", e), Severity::Error)
            }
        };
        self.notifier.notify(&message, severity);
    }
}
