//! Set of token IDs with an outstanding destructive operation.

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

use crate::gate::token_id::TokenId;
use crate::observability::metrics;

/// Bookkeeping for one in-flight operation.
#[derive(Debug, Clone)]
pub struct PendingEntry {
    /// Request that owns the reservation.
    pub request_id: Uuid,
    /// When the reservation was taken.
    pub started_at: Instant,
}

impl PendingEntry {
    /// Time since the reservation was taken.
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

/// A thread-safe set of token IDs currently being operated on.
///
/// A key is present only while its operation is outstanding. Keys are only
/// ever removed through the [`PendingGuard`] returned by
/// [`try_reserve`](Self::try_reserve).
#[derive(Debug, Clone, Default)]
pub struct PendingOperationSet {
    inner: Arc<DashMap<TokenId, PendingEntry>>,
}

impl PendingOperationSet {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Atomically mark `token_id` as in flight.
    ///
    /// Returns `None` if the ID is already reserved. The reservation lasts
    /// until the returned guard is dropped.
    pub fn try_reserve(&self, token_id: TokenId, request_id: Uuid) -> Option<PendingGuard> {
        let reserved = match self.inner.entry(token_id) {
            Entry::Occupied(_) => false,
            Entry::Vacant(slot) => {
                slot.insert(PendingEntry {
                    request_id,
                    started_at: Instant::now(),
                });
                true
            }
        };

        if !reserved {
            return None;
        }

        metrics::record_pending_operations(self.inner.len());
        Some(PendingGuard {
            set: self.clone(),
            token_id,
            request_id,
        })
    }

    /// Check whether an operation for `token_id` is outstanding.
    pub fn contains(&self, token_id: &TokenId) -> bool {
        self.inner.contains_key(token_id)
    }

    /// Look up the entry for `token_id`.
    pub fn get(&self, token_id: &TokenId) -> Option<PendingEntry> {
        self.inner.get(token_id).map(|r| r.value().clone())
    }

    /// Number of outstanding operations.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// True when nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Outstanding token IDs in ascending order.
    pub fn ids(&self) -> Vec<TokenId> {
        let mut ids: Vec<TokenId> = self.inner.iter().map(|r| *r.key()).collect();
        ids.sort();
        ids
    }

    fn release(&self, token_id: &TokenId, request_id: Uuid) {
        self.inner
            .remove_if(token_id, |_, entry| entry.request_id == request_id);
        metrics::record_pending_operations(self.inner.len());
    }
}

/// Reservation of one token ID in a [`PendingOperationSet`].
///
/// Dropping the guard removes the key, so every exit path (success, error,
/// panic, or the owning future being dropped) clears the marker.
#[derive(Debug)]
pub struct PendingGuard {
    set: PendingOperationSet,
    token_id: TokenId,
    request_id: Uuid,
}

impl PendingGuard {
    /// The reserved token ID.
    pub fn token_id(&self) -> TokenId {
        self.token_id
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.set.release(&self.token_id, self.request_id);
        tracing::trace!(token_id = %self.token_id, "Pending marker released");
    }
}
