//! # tradepost-escrow
//!
//! The only code path allowed to move stone balances. Every mutation is
//! paired with exactly one ledger entry, written in the same transaction:
//!
//! 1. **Lock** — debit a bidder and record a `BID_LOCK` entry; if the
//!    debit fails, nothing is recorded.
//! 2. **Refund** — return a lock to its bidder, relabeling the original
//!    lock entry (or appending a fresh `BID_REFUND` entry when the lock
//!    reference is gone). Idempotent via the bid status check.
//! 3. **Realize** — convert a winning bid's lock into a purchase by
//!    relabeling its entry. No new debit: the stones are already held.

pub mod escrow;
pub mod ledger;

pub use escrow::{credit_income, debit_purchase, lock_stones, realize_lock, refund_current_bid};
pub use ledger::{record, relabel};
