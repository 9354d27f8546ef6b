//! Listing documents — the tradable sell offer and its state machine.
//!
//! ## Status machine
//!
//! ```text
//!              cancel            sweep (no winning bid)
//!   ┌────────┐ ─────▶ CANCELLED   ┌─────────┐
//!   │ ACTIVE │ ─────────────────▶ │ EXPIRED │──┐
//!   └───┬────┘  expiry            └─────────┘  │ sweep-driven settlement
//!       │ buy-now / settle             ▲       │ of a carried winning bid
//!       ▼                              │       ▼
//!   ┌──────┐ ◀─────────────────────────┴───────┘
//!   │ SOLD │
//!   └──────┘
//! ```
//!
//! Terminal listings are retained for audit, never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{constants, BidId, ItemInstance, ListingId, MemberId, TradeConfig};

/// How the listing sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SaleMode {
    /// One fixed price, first buyer wins.
    Fixed,
    /// English auction with optional buyout price.
    Auction,
}

impl std::fmt::Display for SaleMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Fixed => write!(f, "FIXED"),
            Self::Auction => write!(f, "AUCTION"),
        }
    }
}

/// Lifecycle status of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ListingStatus {
    Active,
    Sold,
    Cancelled,
    Expired,
    /// Reserved terminal state for post-sale bookkeeping flows.
    Settled,
}

impl std::fmt::Display for ListingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Sold => write!(f, "SOLD"),
            Self::Cancelled => write!(f, "CANCELLED"),
            Self::Expired => write!(f, "EXPIRED"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// What triggered the settlement that sold this listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementSource {
    /// A fixed price or auction buyout was paid directly.
    Buyout,
    /// An expired auction settled to its winning bid.
    Auction,
}

impl std::fmt::Display for SettlementSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buyout => write!(f, "BUYOUT"),
            Self::Auction => write!(f, "AUCTION"),
        }
    }
}

/// One entry of the bounded recent-bid log on a listing, newest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BidRecord {
    pub bid_id: BidId,
    pub bidder_id: MemberId,
    pub bidder_name: String,
    pub amount: i64,
    pub placed_at: DateTime<Utc>,
}

/// A tradable offer: one item, fixed-price or auction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Listing {
    pub id: ListingId,
    pub seller_id: MemberId,
    /// Seller display name at listing time.
    pub seller_name: String,
    pub sale_mode: SaleMode,
    pub status: ListingStatus,

    /// Fixed mode only.
    pub fixed_price: Option<i64>,
    /// Auction mode only.
    pub start_price: Option<i64>,
    /// Auction: highest committed price so far; seeded from the start
    /// price and monotonically non-decreasing while active.
    pub current_price: i64,
    /// Auction: optional end-it-now price.
    pub buyout_price: Option<i64>,
    /// Auction: increment snapshot taken at listing time. Later bids use
    /// `max(this, re-derived)` so the floor can never decrease.
    pub bid_increment: i64,
    pub bid_count: u32,

    /// Immutable copy of the traded item, taken when the listing pulled
    /// it out of the seller's inventory.
    pub item_snapshot: Option<ItemInstance>,
    /// Bounded recent-bid log, newest first.
    pub bid_history: Vec<BidRecord>,

    pub current_bidder_id: Option<MemberId>,
    pub current_bidder_name: Option<String>,
    pub current_bid_id: Option<BidId>,

    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub sold_at: Option<DateTime<Utc>>,
    pub buyer_id: Option<MemberId>,
    pub buyer_name: Option<String>,
    pub settlement_source: Option<SettlementSource>,
    pub settlement_fee: Option<i64>,
}

impl Listing {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == ListingStatus::Active
    }

    #[must_use]
    pub fn is_auction(&self) -> bool {
        self.sale_mode == SaleMode::Auction
    }

    #[must_use]
    pub fn has_current_bid(&self) -> bool {
        self.current_bid_id.is_some()
    }

    /// The auction base price the increment derives from.
    #[must_use]
    pub fn base_price(&self) -> i64 {
        self.start_price.unwrap_or(self.current_price)
    }

    /// The effective bid increment: the snapshot taken at creation or the
    /// freshly derived value, whichever is larger. Never decreases.
    #[must_use]
    pub fn effective_increment(&self, cfg: &TradeConfig) -> i64 {
        self.bid_increment.max(cfg.derive_increment(self.base_price()))
    }

    /// The minimum acceptable next bid: the start price while no bid
    /// stands, otherwise the current price plus the effective increment.
    #[must_use]
    pub fn min_acceptable_bid(&self, cfg: &TradeConfig) -> i64 {
        if self.has_current_bid() {
            self.current_price + self.effective_increment(cfg)
        } else {
            self.base_price()
        }
    }

    /// Prepend a bid record, trimming the log to its cap.
    pub fn push_bid_record(&mut self, record: BidRecord) {
        self.bid_history.insert(0, record);
        self.bid_history.truncate(constants::BID_HISTORY_CAP);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ItemInstance;

    fn auction_listing(start_price: i64) -> Listing {
        let now = Utc::now();
        Listing {
            id: ListingId::new(),
            seller_id: MemberId::new(),
            seller_name: "Wei".into(),
            sale_mode: SaleMode::Auction,
            status: ListingStatus::Active,
            fixed_price: None,
            start_price: Some(start_price),
            current_price: start_price,
            buyout_price: None,
            bid_increment: 10,
            bid_count: 0,
            item_snapshot: Some(ItemInstance::new("sword_iron", "Iron Sword")),
            bid_history: Vec::new(),
            current_bidder_id: None,
            current_bidder_name: None,
            current_bid_id: None,
            created_at: now,
            expires_at: now + chrono::Duration::hours(72),
            sold_at: None,
            buyer_id: None,
            buyer_name: None,
            settlement_source: None,
            settlement_fee: None,
        }
    }

    #[test]
    fn first_bid_floor_is_start_price() {
        let listing = auction_listing(100);
        let cfg = TradeConfig::default();
        assert_eq!(listing.min_acceptable_bid(&cfg), 100);
    }

    #[test]
    fn later_bid_floor_adds_increment() {
        let mut listing = auction_listing(100);
        listing.current_price = 100;
        listing.current_bid_id = Some(BidId::new());
        let cfg = TradeConfig::default();
        // increment snapshot is 10; derived would be 5 (5% of 100)
        assert_eq!(listing.min_acceptable_bid(&cfg), 110);
    }

    #[test]
    fn increment_never_decreases() {
        let mut listing = auction_listing(100);
        listing.bid_increment = 3; // below the derived 5% floor
        let cfg = TradeConfig::default();
        assert_eq!(listing.effective_increment(&cfg), 5);
    }

    #[test]
    fn bid_history_capped_newest_first() {
        let mut listing = auction_listing(100);
        for i in 0..(constants::BID_HISTORY_CAP as i64 + 5) {
            listing.push_bid_record(BidRecord {
                bid_id: BidId::new(),
                bidder_id: MemberId::new(),
                bidder_name: format!("bidder-{i}"),
                amount: 100 + i,
                placed_at: Utc::now(),
            });
        }
        assert_eq!(listing.bid_history.len(), constants::BID_HISTORY_CAP);
        // Newest (largest amount) sits at the front.
        assert_eq!(
            listing.bid_history[0].amount,
            100 + constants::BID_HISTORY_CAP as i64 + 4
        );
    }

    #[test]
    fn status_display() {
        assert_eq!(format!("{}", ListingStatus::Active), "ACTIVE");
        assert_eq!(format!("{}", ListingStatus::Cancelled), "CANCELLED");
        assert_eq!(format!("{}", SaleMode::Auction), "AUCTION");
        assert_eq!(format!("{}", SettlementSource::Buyout), "BUYOUT");
    }

    #[test]
    fn listing_serde_roundtrip() {
        let listing = auction_listing(250);
        let json = serde_json::to_string(&listing).unwrap();
        let back: Listing = serde_json::from_str(&json).unwrap();
        assert_eq!(listing.id, back.id);
        assert_eq!(back.current_price, 250);
        assert_eq!(back.status, ListingStatus::Active);
    }
}
