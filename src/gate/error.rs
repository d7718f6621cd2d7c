//! Gate outcome and error taxonomy.

use thiserror::Error;

use crate::gate::token_id::{TokenId, TokenIdError};

/// Why a gated request did not produce a collaborator result.
///
/// `E` is the collaborator's own error type, passed through untouched.
#[derive(Debug, Error)]
pub enum GateError<E> {
    /// The identifier does not reduce to a positive integer.
    #[error("invalid token ID: {0}")]
    InvalidIdentifier(#[from] TokenIdError),

    /// An operation for the same token is still outstanding.
    #[error("already processing a burn transaction for token ID {0}")]
    DuplicateInFlight(TokenId),

    /// The user declined the confirmation prompt.
    #[error("burn of token ID {0} cancelled")]
    UserCancelled(TokenId),

    /// The chain collaborator rejected.
    #[error(transparent)]
    Collaborator(E),
}

impl<E> GateError<E> {
    /// Stable label used for metrics and machine-readable output.
    pub fn label(&self) -> &'static str {
        match self {
            GateError::InvalidIdentifier(_) => "invalid_identifier",
            GateError::DuplicateInFlight(_) => "duplicate_in_flight",
            GateError::UserCancelled(_) => "user_cancelled",
            GateError::Collaborator(_) => "collaborator_failure",
        }
    }

    /// Declining the prompt is a normal negative outcome, not a failure.
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GateError::UserCancelled(_))
    }

    /// The collaborator's error, if that is where the request failed.
    pub fn collaborator(&self) -> Option<&E> {
        match self {
            GateError::Collaborator(e) => Some(e),
            _ => None,
        }
    }
}

/// Result of one gated request.
pub type TransactionOutcome<T, E> = Result<T, GateError<E>>;
