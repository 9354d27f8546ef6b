//! The ledger recorder — appends immutable currency-movement records.

use chrono::{DateTime, Utc};
use tradepost_store::TxHandle;
use tradepost_types::{EntryId, EntryKind, EntryMeta, MemberId, StoneTransaction};

/// Append one ledger entry for a member. Returns the entry id so callers
/// can back-reference it (e.g. a bid's `lock_transaction_id`).
pub fn record(
    tx: &mut TxHandle<'_>,
    member_id: MemberId,
    amount: i64,
    kind: EntryKind,
    description: impl Into<String>,
    meta: EntryMeta,
    now: DateTime<Utc>,
) -> EntryId {
    tx.record_entry(StoneTransaction::new(
        member_id,
        amount,
        kind,
        description,
        meta,
        now,
    ))
}

/// Relabel an entry's semantic kind — used when a pending lock is
/// realized into a purchase or reversed into a refund. Returns `false`
/// when the entry no longer resolves.
pub fn relabel(tx: &mut TxHandle<'_>, entry_id: EntryId, kind: EntryKind) -> bool {
    tx.relabel_entry(entry_id, kind)
}
