//! Transaction gate subsystem.
//!
//! # Data Flow
//! ```text
//! CLI / caller (raw token identifier, confirmation prompt)
//!     → service.rs (BurnService: notifications around the gate)
//!     → transaction_gate.rs (normalize, de-duplicate, confirm, execute)
//!         → token_id.rs (strip non-digits, require > 0)
//!         → pending.rs (per-token reservation, released on drop)
//!     → blockchain::burn (TokenBurner collaborator)
//! ```
//!
//! # Invariants
//! - A token ID is in the pending set only while its request is outstanding
//! - A duplicate request is rejected before its prompt is shown
//! - The pending marker is removed on every exit path

pub mod error;
pub mod pending;
pub mod service;
pub mod token_id;
pub mod transaction_gate;

pub use error::{GateError, TransactionOutcome};
pub use pending::{PendingGuard, PendingOperationSet};
pub use service::{BurnOutcome, BurnService};
pub use token_id::{TokenId, TokenIdError};
pub use transaction_gate::TransactionGate;
