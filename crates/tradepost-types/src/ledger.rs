//! Stone ledger entries — the immutable currency-movement audit trail.
//!
//! Every balance mutation the escrow controller performs is paired with
//! exactly one [`StoneTransaction`]. Entries are append-only; the single
//! permitted mutation is relabeling an entry's [`EntryKind`] when a
//! pending lock is realized into a purchase or reversed into a refund.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BidId, EntryId, ListingId, MemberId, OrderId, SaleMode};

/// Semantic type of a currency movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Stones debited from a bidder and held in escrow.
    BidLock,
    /// An escrow lock returned to its bidder.
    BidRefund,
    /// Stones paid for a purchase (fresh debit, or a realized lock).
    Purchase,
    /// Seller proceeds, net of the platform fee.
    Income,
}

impl std::fmt::Display for EntryKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BidLock => write!(f, "BID_LOCK"),
            Self::BidRefund => write!(f, "BID_REFUND"),
            Self::Purchase => write!(f, "PURCHASE"),
            Self::Income => write!(f, "INCOME"),
        }
    }
}

/// Structured context attached to a ledger entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryMeta {
    pub listing_id: Option<ListingId>,
    pub bid_id: Option<BidId>,
    pub order_id: Option<OrderId>,
    pub sale_mode: Option<SaleMode>,
    pub price: Option<i64>,
    pub fee: Option<i64>,
}

impl EntryMeta {
    /// Meta referencing a listing alone.
    #[must_use]
    pub fn for_listing(listing_id: ListingId) -> Self {
        Self {
            listing_id: Some(listing_id),
            ..Self::default()
        }
    }

    /// Meta referencing a listing and one of its bids.
    #[must_use]
    pub fn for_bid(listing_id: ListingId, bid_id: BidId) -> Self {
        Self {
            listing_id: Some(listing_id),
            bid_id: Some(bid_id),
            ..Self::default()
        }
    }
}

/// An immutable record of one currency movement.
///
/// The signed sum of a member's entries over a window equals the member's
/// balance delta over the same window — the escrow controller never
/// changes a balance without writing the paired entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoneTransaction {
    pub id: EntryId,
    pub member_id: MemberId,
    /// Signed amount: negative for debits, positive for credits.
    pub amount: i64,
    pub kind: EntryKind,
    pub description: String,
    pub meta: EntryMeta,
    pub created_at: DateTime<Utc>,
}

impl StoneTransaction {
    #[must_use]
    pub fn new(
        member_id: MemberId,
        amount: i64,
        kind: EntryKind,
        description: impl Into<String>,
        meta: EntryMeta,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: EntryId::new(),
            member_id,
            amount,
            kind,
            description: description.into(),
            meta,
            created_at,
        }
    }
}
