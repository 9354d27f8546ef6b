//! Read-only market views.
//!
//! These are UI hints, not authoritative state: they read a committed
//! snapshot outside any transaction, so every decision made from them is
//! re-validated inside a transaction before a write.

use tradepost_store::MarketStore;
use tradepost_types::{
    Bid, ItemInstance, Listing, ListingStatus, MemberId, Result, TradeConfig,
};

/// All active listings, newest first, bounded to `limit`.
pub fn active_listings(store: &MarketStore, limit: usize) -> Result<Vec<Listing>> {
    store.read(|c| {
        let mut listings: Vec<Listing> = c
            .listings
            .values()
            .filter(|l| l.status == ListingStatus::Active)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings.truncate(limit);
        listings
    })
}

/// The member's own listings in any status, newest first.
pub fn listings_of(store: &MarketStore, member_id: MemberId) -> Result<Vec<Listing>> {
    store.read(|c| {
        let mut listings: Vec<Listing> = c
            .listings
            .values()
            .filter(|l| l.seller_id == member_id)
            .cloned()
            .collect();
        listings.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        listings
    })
}

/// The member's bids in any status, newest first.
pub fn bids_of(store: &MarketStore, member_id: MemberId) -> Result<Vec<Bid>> {
    store.read(|c| {
        let mut bids: Vec<Bid> = c
            .bids
            .values()
            .filter(|b| b.bidder_id == member_id)
            .cloned()
            .collect();
        bids.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));
        bids
    })
}

/// The member's tradable inventory: not bound, not locked, not starter
/// equipment, bounded to the configured maximum.
pub fn sellable_items(
    store: &MarketStore,
    config: &TradeConfig,
    member_id: MemberId,
) -> Result<Vec<ItemInstance>> {
    let items = store.read(|c| {
        c.members.get(&member_id).map(|m| {
            m.inventory
                .iter()
                .filter(|i| i.is_tradable() && !config.is_starter(&i.item_code))
                .take(config.max_sellable)
                .cloned()
                .collect::<Vec<_>>()
        })
    })?;
    items.ok_or(tradepost_types::MarketError::MemberNotFound(member_id))
}
