//! The listing lifecycle manager: create and cancel.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tradepost_escrow::refund_current_bid;
use tradepost_store::MarketStore;
use tradepost_types::{
    InventoryId, Listing, ListingId, ListingStatus, MarketError, MemberId, Result, SaleMode,
    TradeConfig,
};

/// Input for a new listing.
#[derive(Debug, Clone)]
pub struct CreateListing {
    /// Which inventory item to list.
    pub inventory_id: InventoryId,
    pub sale_mode: SaleMode,
    /// Fixed mode: the asking price.
    pub fixed_price: Option<i64>,
    /// Auction mode: the opening price.
    pub start_price: Option<i64>,
    /// Auction mode: optional end-it-now price.
    pub buyout_price: Option<i64>,
    /// Auction mode: explicit increment; the derived minimum applies if
    /// this is smaller.
    pub bid_increment: Option<i64>,
    /// Requested duration; clamped to the configured range.
    pub duration_hours: Option<i64>,
}

/// Owns the listing state machine.
pub struct ListingManager {
    store: Arc<MarketStore>,
    config: TradeConfig,
}

impl ListingManager {
    #[must_use]
    pub fn new(store: Arc<MarketStore>, config: TradeConfig) -> Self {
        Self { store, config }
    }

    /// Create a listing. Inside one transaction the member is re-read,
    /// the item is pulled out of the inventory, and the listing is
    /// inserted `ACTIVE` holding an immutable snapshot of the item.
    pub fn create_listing(
        &self,
        member_id: MemberId,
        input: &CreateListing,
        now: DateTime<Utc>,
    ) -> Result<ListingId> {
        // Sale-mode price validation has no side effects; do it up front.
        match input.sale_mode {
            SaleMode::Fixed => {
                if input.fixed_price.is_none_or(|p| p <= 0) {
                    return Err(MarketError::PriceRequired);
                }
            }
            SaleMode::Auction => {
                if input.start_price.is_none_or(|p| p <= 0) {
                    return Err(MarketError::StartPriceRequired);
                }
                if let Some(buyout) = input.buyout_price {
                    if buyout <= 0 {
                        return Err(MarketError::PriceInvalid {
                            reason: "buyout price must be positive".into(),
                        });
                    }
                }
            }
        }

        let duration_hours = self.config.clamp_duration_hours(input.duration_hours);

        let listing_id = self.store.transaction(|tx| {
            let member = tx.require_member(member_id)?;
            let seller_name = member.name.clone();

            let item = member
                .find_item(input.inventory_id)
                .ok_or(MarketError::ItemNotFound(input.inventory_id))?;
            if item.locked {
                return Err(MarketError::ItemLocked);
            }
            if item.bound {
                return Err(MarketError::ItemInvalid {
                    reason: "bound items cannot be listed".into(),
                });
            }
            if self.config.is_starter(&item.item_code) {
                return Err(MarketError::ItemInvalid {
                    reason: "starter equipment cannot be listed".into(),
                });
            }

            if tx.active_listing_count(member_id) >= self.config.max_active_listings {
                return Err(MarketError::ListingLimit {
                    limit: self.config.max_active_listings,
                });
            }

            // The listing takes exclusive ownership of the item.
            let snapshot = tx
                .remove_item(member_id, input.inventory_id)?
                .ok_or(MarketError::ItemNotFound(input.inventory_id))?;

            let (start_price, current_price, bid_increment) = match input.sale_mode {
                SaleMode::Fixed => (None, input.fixed_price.unwrap_or(0), 0),
                SaleMode::Auction => {
                    let base = input.start_price.unwrap_or(0);
                    (
                        Some(base),
                        base,
                        self.config.listing_increment(base, input.bid_increment),
                    )
                }
            };

            let listing = Listing {
                id: ListingId::new(),
                seller_id: member_id,
                seller_name,
                sale_mode: input.sale_mode,
                status: ListingStatus::Active,
                fixed_price: match input.sale_mode {
                    SaleMode::Fixed => input.fixed_price,
                    SaleMode::Auction => None,
                },
                start_price,
                current_price,
                buyout_price: match input.sale_mode {
                    SaleMode::Auction => input.buyout_price,
                    SaleMode::Fixed => None,
                },
                bid_increment,
                bid_count: 0,
                item_snapshot: Some(snapshot),
                bid_history: Vec::new(),
                current_bidder_id: None,
                current_bidder_name: None,
                current_bid_id: None,
                created_at: now,
                expires_at: now + Duration::hours(duration_hours),
                sold_at: None,
                buyer_id: None,
                buyer_name: None,
                settlement_source: None,
                settlement_fee: None,
            };
            let listing_id = listing.id;
            tx.insert_listing(listing);
            Ok(listing_id)
        })?;

        tracing::info!(
            %listing_id,
            seller = %member_id,
            mode = %input.sale_mode,
            duration_hours,
            "listing created"
        );
        Ok(listing_id)
    }

    /// Cancel an active listing. Only the seller may cancel. A standing
    /// bid is refunded, the item returns to the seller's inventory, and
    /// the listing flips to `CANCELLED` — all in one transaction.
    pub fn cancel_listing(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.store.transaction(|tx| {
            let listing = tx.require_listing(listing_id)?;
            if listing.seller_id != member_id {
                return Err(MarketError::Forbidden {
                    reason: "only the seller may cancel a listing".into(),
                });
            }
            if !listing.is_active() {
                return Err(MarketError::ListingNotActive);
            }
            let snapshot = listing.item_snapshot.clone();

            refund_current_bid(tx, listing_id, now)?;

            if let Some(item) = snapshot {
                tx.add_item(member_id, item)?;
            }
            tx.listing_mut(listing_id)?.status = ListingStatus::Cancelled;
            Ok(())
        })?;

        tracing::info!(%listing_id, seller = %member_id, "listing cancelled");
        Ok(())
    }
}
