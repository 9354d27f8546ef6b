//! The scoped transaction handle.
//!
//! A [`TxHandle`] wraps the working collection set of one transaction and
//! exposes the typed operations the engine is allowed to perform. Balance
//! changes are delta-based ([`TxHandle::adjust_balance`]) and inventory
//! changes go through explicit add/remove by inventory id — never
//! read-modify-write of whole member documents in engine code.

use chrono::{DateTime, Utc};
use tradepost_types::{
    Bid, BidId, BidStatus, EntryId, EntryKind, InventoryId, ItemInstance, Listing, ListingId,
    ListingStatus, MarketError, Member, MemberId, Order, Result, StoneTransaction, TradeMetric,
};

use crate::store::Collections;

/// Scoped handle over one transaction's working set.
pub struct TxHandle<'a> {
    collections: &'a mut Collections,
}

impl<'a> TxHandle<'a> {
    pub(crate) fn new(collections: &'a mut Collections) -> Self {
        Self { collections }
    }

    // =====================================================================
    // Members
    // =====================================================================

    #[must_use]
    pub fn member(&self, id: MemberId) -> Option<&Member> {
        self.collections.members.get(&id)
    }

    pub fn require_member(&self, id: MemberId) -> Result<&Member> {
        self.collections
            .members
            .get(&id)
            .ok_or(MarketError::MemberNotFound(id))
    }

    pub fn insert_member(&mut self, member: Member) {
        self.collections.members.insert(member.id, member);
    }

    /// Delta-based balance adjustment. Returns the new balance; a delta
    /// that would take the balance negative fails `STONE_INSUFFICIENT`
    /// without mutating anything.
    pub fn adjust_balance(&mut self, id: MemberId, delta: i64) -> Result<i64> {
        let member = self
            .collections
            .members
            .get_mut(&id)
            .ok_or(MarketError::MemberNotFound(id))?;
        let new_balance = member.balance + delta;
        if new_balance < 0 {
            return Err(MarketError::StoneInsufficient {
                needed: -delta,
                available: member.balance,
            });
        }
        member.balance = new_balance;
        Ok(new_balance)
    }

    /// Add an item to a member's inventory.
    pub fn add_item(&mut self, id: MemberId, item: ItemInstance) -> Result<()> {
        let member = self
            .collections
            .members
            .get_mut(&id)
            .ok_or(MarketError::MemberNotFound(id))?;
        member.add_item(item);
        Ok(())
    }

    /// Remove an item from a member's inventory by inventory id.
    /// `Ok(None)` when the member exists but holds no such item.
    pub fn remove_item(
        &mut self,
        id: MemberId,
        inventory_id: InventoryId,
    ) -> Result<Option<ItemInstance>> {
        let member = self
            .collections
            .members
            .get_mut(&id)
            .ok_or(MarketError::MemberNotFound(id))?;
        Ok(member.remove_item(inventory_id))
    }

    // =====================================================================
    // Listings
    // =====================================================================

    #[must_use]
    pub fn listing(&self, id: ListingId) -> Option<&Listing> {
        self.collections.listings.get(&id)
    }

    pub fn require_listing(&self, id: ListingId) -> Result<&Listing> {
        self.collections
            .listings
            .get(&id)
            .ok_or(MarketError::ListingNotFound(id))
    }

    pub fn listing_mut(&mut self, id: ListingId) -> Result<&mut Listing> {
        self.collections
            .listings
            .get_mut(&id)
            .ok_or(MarketError::ListingNotFound(id))
    }

    pub fn insert_listing(&mut self, listing: Listing) {
        self.collections.listings.insert(listing.id, listing);
    }

    /// How many listings this member currently has active.
    #[must_use]
    pub fn active_listing_count(&self, seller_id: MemberId) -> usize {
        self.collections
            .listings
            .values()
            .filter(|l| l.seller_id == seller_id && l.status == ListingStatus::Active)
            .count()
    }

    // =====================================================================
    // Bids
    // =====================================================================

    #[must_use]
    pub fn bid(&self, id: BidId) -> Option<&Bid> {
        self.collections.bids.get(&id)
    }

    pub fn bid_mut(&mut self, id: BidId) -> Result<&mut Bid> {
        self.collections
            .bids
            .get_mut(&id)
            .ok_or(MarketError::BidNotFound(id))
    }

    pub fn insert_bid(&mut self, bid: Bid) {
        self.collections.bids.insert(bid.id, bid);
    }

    /// How many bids this member currently has active, across listings.
    #[must_use]
    pub fn active_bid_count(&self, bidder_id: MemberId) -> usize {
        self.collections
            .bids
            .values()
            .filter(|b| b.bidder_id == bidder_id && b.status == BidStatus::Active)
            .count()
    }

    // =====================================================================
    // Ledger
    // =====================================================================

    /// Append a ledger entry; returns its id.
    pub fn record_entry(&mut self, entry: StoneTransaction) -> EntryId {
        let id = entry.id;
        self.collections.ledger.push(entry);
        id
    }

    /// Relabel an entry's kind — the single permitted ledger mutation.
    /// Returns `false` when no entry with this id exists.
    pub fn relabel_entry(&mut self, entry_id: EntryId, kind: EntryKind) -> bool {
        match self.collections.ledger.iter_mut().find(|e| e.id == entry_id) {
            Some(entry) => {
                entry.kind = kind;
                true
            }
            None => false,
        }
    }

    #[must_use]
    pub fn entry(&self, entry_id: EntryId) -> Option<&StoneTransaction> {
        self.collections.entry(entry_id)
    }

    // =====================================================================
    // Orders & metric
    // =====================================================================

    pub fn insert_order(&mut self, order: Order) {
        self.collections.orders.insert(order.id, order);
    }

    #[must_use]
    pub fn order(&self, id: tradepost_types::OrderId) -> Option<&Order> {
        self.collections.orders.get(&id)
    }

    /// Upsert-with-default access to the singleton metric: a missing
    /// aggregate is initialized to zero rather than treated as an error.
    pub fn metric_mut(&mut self, now: DateTime<Utc>) -> &mut TradeMetric {
        self.collections
            .metric
            .get_or_insert_with(|| TradeMetric::zero(now))
    }
}
