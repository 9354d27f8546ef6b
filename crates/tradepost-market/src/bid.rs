//! The bid ledger: placing bids and maintaining the current-highest
//! pointer on the listing.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tradepost_escrow::{lock_stones, refund_current_bid};
use tradepost_store::MarketStore;
use tradepost_types::{
    Bid, BidId, BidRecord, BidStatus, ListingId, MarketError, MemberId, Result, TradeConfig,
};

/// Owns bid placement against auction listings.
pub struct BidDesk {
    store: Arc<MarketStore>,
    config: TradeConfig,
}

impl BidDesk {
    #[must_use]
    pub fn new(store: Arc<MarketStore>, config: TradeConfig) -> Self {
        Self { store, config }
    }

    /// Place a bid. The full sequence runs inside one transaction:
    /// re-read the listing, lock the bidder's stones, refund the
    /// displaced bid, insert the new bid, and advance the listing's
    /// price/bidder/history fields.
    ///
    /// The acceptable floor is `start_price` while no bid stands,
    /// otherwise `current_price` plus the effective increment — which
    /// never decreases below the snapshot taken at listing time.
    pub fn place_bid(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<BidId> {
        let bid_id = self.store.transaction(|tx| {
            let listing = tx.require_listing(listing_id)?;
            if !listing.is_active() {
                return Err(MarketError::ListingNotActive);
            }
            if !listing.is_auction() {
                return Err(MarketError::NotAuction);
            }
            if listing.seller_id == member_id {
                return Err(MarketError::Forbidden {
                    reason: "sellers cannot bid on their own listing".into(),
                });
            }

            let floor = listing.min_acceptable_bid(&self.config);
            if amount < floor {
                return Err(MarketError::BidTooLow { floor });
            }

            if tx.active_bid_count(member_id) >= self.config.max_active_bids {
                return Err(MarketError::BidLimit {
                    limit: self.config.max_active_bids,
                });
            }

            let bidder_name = tx.require_member(member_id)?.name.clone();

            let bid_id = BidId::new();
            let lock_entry = lock_stones(tx, member_id, amount, listing_id, bid_id, now)?;

            // The displaced bid (if any) gets its stones back in the same
            // unit of work that commits the new lock.
            refund_current_bid(tx, listing_id, now)?;

            tx.insert_bid(Bid {
                id: bid_id,
                listing_id,
                bidder_id: member_id,
                bidder_name: bidder_name.clone(),
                amount,
                status: BidStatus::Active,
                lock_transaction_id: Some(lock_entry),
                placed_at: now,
            });

            let listing = tx.listing_mut(listing_id)?;
            listing.current_price = amount;
            listing.current_bidder_id = Some(member_id);
            listing.current_bidder_name = Some(bidder_name.clone());
            listing.current_bid_id = Some(bid_id);
            listing.bid_count += 1;
            listing.push_bid_record(BidRecord {
                bid_id,
                bidder_id: member_id,
                bidder_name,
                amount,
                placed_at: now,
            });
            Ok(bid_id)
        })?;

        tracing::info!(%listing_id, %bid_id, bidder = %member_id, amount, "bid placed");
        Ok(bid_id)
    }
}
