//! Per-token de-duplication and confirmation of destructive requests.
//!
//! # Request Flow
//! ```text
//! raw identifier
//!     → TokenId::parse            (InvalidIdentifier)
//!     → PendingOperationSet       (DuplicateInFlight, no prompt)
//!     → confirm(token_id)         (UserCancelled, reservation dropped)
//!     → execute(token_id)         (Collaborator(e) or Ok(T))
//!     → guard dropped             (token ID absent again)
//! ```
//!
//! The reservation is taken before the prompt is shown. A second request for
//! the same token therefore never reaches its own prompt while the first one
//! is waiting for the user or for the chain.

use std::fmt::Display;
use std::future::Future;
use tracing::Instrument;
use uuid::Uuid;

use crate::gate::error::{GateError, TransactionOutcome};
use crate::gate::pending::PendingOperationSet;
use crate::gate::token_id::TokenId;
use crate::observability::metrics;

/// Serializes destructive requests per token ID.
///
/// Cloning is cheap; clones share the same pending set.
#[derive(Debug, Clone, Default)]
pub struct TransactionGate {
    pending: PendingOperationSet,
}

impl TransactionGate {
    /// Create a gate with an empty pending set.
    pub fn new() -> Self {
        Self::default()
    }

    /// The set of tokens currently in flight.
    pub fn pending(&self) -> &PendingOperationSet {
        &self.pending
    }

    /// Check whether a request for `token_id` is outstanding.
    pub fn is_pending(&self, token_id: &TokenId) -> bool {
        self.pending.contains(token_id)
    }

    /// Normalize `resource_id`, confirm with the user and run `execute`.
    ///
    /// `confirm` is called at most once and only when no request for the
    /// same token is outstanding. `execute` is called at most once and only
    /// after a positive confirmation.
    pub async fn request_operation<T, E, C, CF, X, XF>(
        &self,
        resource_id: &str,
        confirm: C,
        execute: X,
    ) -> TransactionOutcome<T, E>
    where
        E: Display,
        C: FnOnce(TokenId) -> CF,
        CF: Future<Output = bool>,
        X: FnOnce(TokenId) -> XF,
        XF: Future<Output = Result<T, E>>,
    {
        let token_id = match TokenId::parse(resource_id) {
            Ok(id) => id,
            Err(e) => {
                tracing::warn!(resource_id = %resource_id, error = %e, "Rejected invalid token ID");
                metrics::record_gate_outcome("invalid_identifier");
                return Err(GateError::InvalidIdentifier(e));
            }
        };

        self.request_token(token_id, confirm, execute).await
    }

    /// Same as [`request_operation`](Self::request_operation) for an already
    /// validated token ID.
    pub async fn request_token<T, E, C, CF, X, XF>(
        &self,
        token_id: TokenId,
        confirm: C,
        execute: X,
    ) -> TransactionOutcome<T, E>
    where
        E: Display,
        C: FnOnce(TokenId) -> CF,
        CF: Future<Output = bool>,
        X: FnOnce(TokenId) -> XF,
        XF: Future<Output = Result<T, E>>,
    {
        let request_id = Uuid::new_v4();
        let span = tracing::info_span!("gate_request", %request_id, %token_id);

        async move {
            let Some(guard) = self.pending.try_reserve(token_id, request_id) else {
                tracing::info!("Burn already in flight, rejecting duplicate request");
                metrics::record_gate_outcome("duplicate_in_flight");
                return Err(GateError::DuplicateInFlight(token_id));
            };

            if !confirm(token_id).await {
                drop(guard);
                tracing::info!("User declined confirmation");
                metrics::record_gate_outcome("user_cancelled");
                return Err(GateError::UserCancelled(token_id));
            }

            tracing::info!("Confirmed, handing off to collaborator");
            let result = execute(token_id).await;
            drop(guard);

            match result {
                Ok(value) => {
                    tracing::info!("Operation settled successfully");
                    metrics::record_gate_outcome("success");
                    Ok(value)
                }
                Err(e) => {
                    tracing::warn!(error = %e, "Operation failed");
                    metrics::record_gate_outcome("collaborator_failure");
                    Err(GateError::Collaborator(e))
                }
            }
        }
        .instrument(span)
        .await
    }
}
