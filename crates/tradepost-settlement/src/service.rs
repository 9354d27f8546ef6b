//! The trade service facade — the operations exposed to the transport
//! layer (RPC dispatch, session resolution, and rendering live outside
//! this engine).

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tradepost_market::{query, BidDesk, CreateListing, ListingManager};
use tradepost_store::MarketStore;
use tradepost_types::{
    Bid, BidId, ItemInstance, Listing, ListingId, MemberId, Order, Result, TradeConfig,
};

use crate::engine::SettlementEngine;
use crate::sweeper::ExpirationSweeper;

/// Read-only aggregation backing the market UI.
#[derive(Debug, Clone)]
pub struct Dashboard {
    /// All active listings, newest first.
    pub active_listings: Vec<Listing>,
    /// The caller's own listings, any status.
    pub my_listings: Vec<Listing>,
    /// The caller's bids, any status.
    pub my_bids: Vec<Bid>,
    /// The effective trade configuration.
    pub config: TradeConfig,
}

/// Wires the market components over one store and exposes the public
/// operations. Each operation is one transaction, so a retried-but-
/// uncommitted call is safe to repeat.
pub struct TradeService {
    store: Arc<MarketStore>,
    config: TradeConfig,
    listings: ListingManager,
    bids: BidDesk,
    engine: SettlementEngine,
    sweeper: ExpirationSweeper,
}

impl TradeService {
    #[must_use]
    pub fn new(store: Arc<MarketStore>, config: TradeConfig) -> Self {
        Self {
            listings: ListingManager::new(store.clone(), config.clone()),
            bids: BidDesk::new(store.clone(), config.clone()),
            engine: SettlementEngine::new(store.clone(), config.clone()),
            sweeper: ExpirationSweeper::new(store.clone(), config.clone()),
            store,
            config,
        }
    }

    pub fn create_listing(
        &self,
        member_id: MemberId,
        input: &CreateListing,
        now: DateTime<Utc>,
    ) -> Result<ListingId> {
        self.listings.create_listing(member_id, input, now)
    }

    pub fn cancel_listing(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        now: DateTime<Utc>,
    ) -> Result<()> {
        self.listings.cancel_listing(member_id, listing_id, now)
    }

    pub fn place_bid(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        amount: i64,
        now: DateTime<Utc>,
    ) -> Result<BidId> {
        self.bids.place_bid(member_id, listing_id, amount, now)
    }

    pub fn buy_now(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        self.engine.buy_now(member_id, listing_id, now)
    }

    /// The market dashboard. Sweeps first so listings already past their
    /// expiry cannot leak into the "active" view.
    pub fn dashboard(&self, member_id: MemberId, now: DateTime<Utc>) -> Result<Dashboard> {
        self.sweeper.settle_expired_listings(now)?;
        Ok(Dashboard {
            active_listings: query::active_listings(&self.store, usize::MAX)?,
            my_listings: query::listings_of(&self.store, member_id)?,
            my_bids: query::bids_of(&self.store, member_id)?,
            config: self.config.clone(),
        })
    }

    /// The caller's tradable inventory, bounded to the configured max.
    pub fn sellable(&self, member_id: MemberId) -> Result<Vec<ItemInstance>> {
        query::sellable_items(&self.store, &self.config, member_id)
    }

    /// Direct access to the sweeper, for the external scheduler.
    #[must_use]
    pub fn sweeper(&self) -> &ExpirationSweeper {
        &self.sweeper
    }
}
