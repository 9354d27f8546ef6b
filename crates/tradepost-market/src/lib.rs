//! # tradepost-market
//!
//! Listing lifecycle management and the bid ledger.
//!
//! - [`ListingManager`] owns the listing state machine: create (pull the
//!   item out of the seller's inventory), cancel (refund + return).
//! - [`BidDesk`] owns bid placement: escrow lock, outbid refund, and the
//!   "current highest bid" pointer on the listing.
//! - [`query`] provides the non-authoritative read views behind dashboards.
//!
//! Every mutating operation runs inside one store transaction and
//! re-reads its documents through the transaction handle before writing.

pub mod bid;
pub mod listing;
pub mod query;

pub use bid::BidDesk;
pub use listing::{CreateListing, ListingManager};
