//! The in-memory transactional document store.
//!
//! The backing state is one [`Collections`] struct behind a
//! `parking_lot::Mutex`. A transaction clones the working set, applies the
//! closure to the clone through a [`TxHandle`], and swaps the clone in on
//! success — an error drops the clone, so a failed transaction leaves no
//! observable mutation. Holding the mutex for the duration of the closure
//! serializes transactions, which is exactly the ordering contract the
//! engine's re-read-inside-transaction pattern relies on.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use tradepost_types::{
    Bid, BidId, EntryId, EntryKind, Listing, ListingId, ListingStatus, MarketError, Member,
    MemberId, Order, OrderId, Result, StoneTransaction, TradeMetric,
};

use crate::tx::TxHandle;

/// The full collection set backing the engine.
#[derive(Debug, Clone, Default)]
pub struct Collections {
    pub members: HashMap<MemberId, Member>,
    pub listings: HashMap<ListingId, Listing>,
    pub bids: HashMap<BidId, Bid>,
    /// Append-only stone ledger.
    pub ledger: Vec<StoneTransaction>,
    pub orders: HashMap<OrderId, Order>,
    /// Best-effort singleton aggregate; `None` until first touched.
    pub metric: Option<TradeMetric>,
}

impl Collections {
    /// Listings past their expiry that are still active, oldest expiry
    /// first, bounded to `limit`. Sweep candidates only — the sweeper
    /// re-checks each inside its own transaction.
    #[must_use]
    pub fn expired_active_listings(&self, now: DateTime<Utc>, limit: usize) -> Vec<ListingId> {
        let mut due: Vec<&Listing> = self
            .listings
            .values()
            .filter(|l| l.status == ListingStatus::Active && l.expires_at <= now)
            .collect();
        due.sort_by_key(|l| l.expires_at);
        due.into_iter().take(limit).map(|l| l.id).collect()
    }

    /// Signed ledger sum for one member — equals the member's balance
    /// delta over the ledger's lifetime.
    ///
    /// A lock relabeled to `BID_REFUND` records its reversal in place
    /// (the debit amount is retained for audit), so it counts as zero
    /// here; a fresh positive `BID_REFUND` entry is a real credit and
    /// counts at face value.
    #[must_use]
    pub fn ledger_sum(&self, member_id: MemberId) -> i64 {
        self.ledger
            .iter()
            .filter(|e| e.member_id == member_id)
            .map(|e| match e.kind {
                EntryKind::BidRefund if e.amount < 0 => 0,
                _ => e.amount,
            })
            .sum()
    }

    /// Ledger entry lookup by id.
    #[must_use]
    pub fn entry(&self, entry_id: EntryId) -> Option<&StoneTransaction> {
        self.ledger.iter().find(|e| e.id == entry_id)
    }
}

/// The transactional document store.
pub struct MarketStore {
    inner: Mutex<Option<Collections>>,
}

impl MarketStore {
    /// Open a store with its collections provisioned.
    #[must_use]
    pub fn open() -> Self {
        Self {
            inner: Mutex::new(Some(Collections::default())),
        }
    }

    /// A store whose collections were never provisioned. Every access
    /// fails with `STORAGE_NOT_PROVISIONED` until [`Self::provision`].
    #[must_use]
    pub fn unprovisioned() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Provision the backing collections. Idempotent; a startup/admin
    /// concern, never called from the hot path.
    pub fn provision(&self) {
        let mut guard = self.inner.lock();
        if guard.is_none() {
            tracing::info!("provisioning market store collections");
            *guard = Some(Collections::default());
        }
    }

    /// Run `f` transactionally. All writes commit together on `Ok`;
    /// any `Err` rolls the whole transaction back.
    pub fn transaction<T>(&self, f: impl FnOnce(&mut TxHandle<'_>) -> Result<T>) -> Result<T> {
        let mut guard = self.inner.lock();
        let committed = guard.as_mut().ok_or(MarketError::StorageNotProvisioned)?;

        let mut working = committed.clone();
        let mut tx = TxHandle::new(&mut working);
        match f(&mut tx) {
            Ok(value) => {
                *committed = working;
                Ok(value)
            }
            Err(err) => Err(err), // working set dropped: full rollback
        }
    }

    /// Snapshot read access. Not authoritative: results may be stale the
    /// moment the lock is released, so writes decided from here must be
    /// re-validated inside a transaction.
    pub fn read<T>(&self, f: impl FnOnce(&Collections) -> T) -> Result<T> {
        let guard = self.inner.lock();
        let committed = guard.as_ref().ok_or(MarketError::StorageNotProvisioned)?;
        Ok(f(committed))
    }
}
