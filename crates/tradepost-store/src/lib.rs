//! # tradepost-store
//!
//! The storage collaborator of the Tradepost settlement engine: a
//! document store with a transactional primitive.
//!
//! ## Contract
//!
//! - [`MarketStore::transaction`] runs a closure against a scoped
//!   [`TxHandle`]; all reads and writes inside the closure commit or roll
//!   back **as a unit**. Transactions serialize against each other, so the
//!   "read current state, decide, write" pattern is race-free.
//! - [`MarketStore::read`] gives non-authoritative snapshot access for UI
//!   hints and sweep candidate queries; anything decided from such a read
//!   must be re-validated inside a transaction before writing.
//! - Collections are provisioned once at startup via [`MarketStore::open`].
//!   The engine never creates schema lazily; touching an unprovisioned
//!   store surfaces `STORAGE_NOT_PROVISIONED`.

pub mod store;
pub mod tx;

pub use store::{Collections, MarketStore};
pub use tx::TxHandle;
