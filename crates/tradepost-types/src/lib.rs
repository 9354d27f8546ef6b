//! # tradepost-types
//!
//! Shared types, errors, and configuration for the **Tradepost**
//! marketplace settlement engine.
//!
//! Every other crate in the workspace depends on this one and nothing
//! else below it. It defines:
//!
//! - **Identifiers**: [`MemberId`], [`ListingId`], [`BidId`], [`OrderId`], [`EntryId`], [`InventoryId`]
//! - **Listing model**: [`Listing`], [`SaleMode`], [`ListingStatus`], [`BidRecord`], [`SettlementSource`]
//! - **Bid model**: [`Bid`], [`BidStatus`]
//! - **Ledger model**: [`StoneTransaction`], [`EntryKind`], [`EntryMeta`]
//! - **Settlement records**: [`Order`], [`TradeMetric`]
//! - **Member model**: [`Member`], [`ItemInstance`]
//! - **Configuration**: [`TradeConfig`]
//! - **Errors**: [`MarketError`] with stable string codes
//! - **Constants**: system-wide limits and defaults

pub mod bid;
pub mod config;
pub mod constants;
pub mod error;
pub mod ids;
pub mod item;
pub mod ledger;
pub mod listing;
pub mod member;
pub mod metric;
pub mod order;

// Re-export all primary types at crate root for ergonomic imports:
//   use tradepost_types::{Listing, Bid, StoneTransaction, ...};

pub use bid::*;
pub use config::*;
pub use error::*;
pub use ids::*;
pub use item::*;
pub use ledger::*;
pub use listing::*;
pub use member::*;
pub use metric::*;
pub use order::*;

// Constants stay namespaced: `tradepost_types::constants::FOO`.
