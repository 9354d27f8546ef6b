//! The expiration sweeper — periodic reconciliation of stale listings.
//!
//! An external scheduler invokes [`ExpirationSweeper::settle_expired_listings`]
//! on a fixed interval with at-least-once delivery, so every step here must
//! tolerate duplicate execution. The candidate query runs on a snapshot;
//! the decisive check is the **re-read inside the transaction**: a listing
//! that is no longer active, or no longer past its expiry, was handled by a
//! concurrent actor and the sweep is a no-op for it. That re-read-and-
//! re-check is the correctness mechanism, not an optimization.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tradepost_store::MarketStore;
use tradepost_types::{
    ListingId, ListingStatus, MarketError, OrderId, Result, SettlementSource, TradeConfig,
};

use crate::engine::{complete_sale, SaleRequest};

/// What happened to one swept listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SweepOutcome {
    /// The auction settled to its winning bid.
    Settled(OrderId),
    /// No winning bid; the item returned to the seller.
    Expired,
    /// A concurrent transaction already handled this listing.
    AlreadyHandled,
}

/// Per-batch sweep results. Failures are collected, never thrown — one
/// listing's error must not abort the batch.
#[derive(Debug, Default)]
pub struct SweepReport {
    pub settled: Vec<ListingId>,
    pub expired: Vec<ListingId>,
    pub already_handled: Vec<ListingId>,
    pub failed: Vec<(ListingId, MarketError)>,
}

impl SweepReport {
    /// Listings this sweep actually drove to a terminal state.
    #[must_use]
    pub fn finalized(&self) -> usize {
        self.settled.len() + self.expired.len()
    }
}

/// Drives listings past their expiry to a terminal state.
pub struct ExpirationSweeper {
    store: Arc<MarketStore>,
    config: TradeConfig,
}

impl ExpirationSweeper {
    #[must_use]
    pub fn new(store: Arc<MarketStore>, config: TradeConfig) -> Self {
        Self { store, config }
    }

    /// Sweep one bounded batch of expired-but-active listings. Each
    /// listing is finalized in its own transaction with isolated failure.
    pub fn settle_expired_listings(&self, now: DateTime<Utc>) -> Result<SweepReport> {
        let candidates = self
            .store
            .read(|c| c.expired_active_listings(now, self.config.sweep_batch_size))?;

        let mut report = SweepReport::default();
        for listing_id in candidates {
            match self.finalize_expired_listing(listing_id, now) {
                Ok(SweepOutcome::Settled(order_id)) => {
                    tracing::info!(%listing_id, %order_id, "expired auction settled");
                    report.settled.push(listing_id);
                }
                Ok(SweepOutcome::Expired) => {
                    tracing::info!(%listing_id, "listing expired, item returned to seller");
                    report.expired.push(listing_id);
                }
                Ok(SweepOutcome::AlreadyHandled) => {
                    report.already_handled.push(listing_id);
                }
                Err(err) => {
                    tracing::warn!(%listing_id, error = %err, "failed to finalize expired listing");
                    report.failed.push((listing_id, err));
                }
            }
        }
        Ok(report)
    }

    /// Finalize one expired listing in one transaction.
    ///
    /// The listing is re-read and both conditions re-checked inside the
    /// transaction; a listing raced away by a concurrent settle/cancel is
    /// reported as [`SweepOutcome::AlreadyHandled`], not an error.
    pub fn finalize_expired_listing(
        &self,
        listing_id: ListingId,
        now: DateTime<Utc>,
    ) -> Result<SweepOutcome> {
        self.store.transaction(|tx| {
            let listing = tx.require_listing(listing_id)?;
            if !listing.is_active() || listing.expires_at > now {
                return Ok(SweepOutcome::AlreadyHandled);
            }
            let seller_id = listing.seller_id;
            let snapshot = listing.item_snapshot.clone();

            let winning = if listing.is_auction() && listing.current_price > 0 {
                listing
                    .current_bidder_id
                    .zip(listing.current_bid_id)
                    .map(|(bidder_id, bid_id)| {
                        let bidder_name = listing
                            .current_bidder_name
                            .clone()
                            .unwrap_or_default();
                        (bidder_id, bidder_name, bid_id, listing.current_price)
                    })
            } else {
                None
            };

            if let Some((bidder_id, bidder_name, bid_id, price)) = winning {
                let order = complete_sale(
                    tx,
                    &self.config,
                    listing_id,
                    &SaleRequest {
                        buyer_id: bidder_id,
                        buyer_name: bidder_name,
                        price,
                        source: SettlementSource::Auction,
                        bid_id: Some(bid_id),
                    },
                    now,
                )?;
                return Ok(SweepOutcome::Settled(order.id));
            }

            // No winning bid: hand the item back and expire the listing.
            if let Some(item) = snapshot {
                tx.add_item(seller_id, item)?;
            }
            tx.listing_mut(listing_id)?.status = ListingStatus::Expired;
            Ok(SweepOutcome::Expired)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradepost_market::{BidDesk, CreateListing, ListingManager};
    use tradepost_types::{
        BidStatus, ItemInstance, Member, MemberId, SaleMode,
    };

    struct Fixture {
        store: Arc<MarketStore>,
        manager: ListingManager,
        desk: BidDesk,
        sweeper: ExpirationSweeper,
        seller: MemberId,
        item_inv: tradepost_types::InventoryId,
    }

    fn fixture() -> Fixture {
        let store = Arc::new(MarketStore::open());
        let config = TradeConfig::default();
        let mut seller = Member::new("Wei", 0);
        let item = ItemInstance::new("sword_iron", "Iron Sword");
        let item_inv = item.inventory_id;
        seller.add_item(item);
        let seller_id = seller.id;
        store
            .transaction(|tx| {
                tx.insert_member(seller);
                Ok(())
            })
            .unwrap();
        Fixture {
            manager: ListingManager::new(store.clone(), config.clone()),
            desk: BidDesk::new(store.clone(), config.clone()),
            sweeper: ExpirationSweeper::new(store.clone(), config),
            store,
            seller: seller_id,
            item_inv,
        }
    }

    fn add_member(store: &MarketStore, name: &str, balance: i64) -> MemberId {
        let member = Member::new(name, balance);
        let id = member.id;
        store
            .transaction(|tx| {
                tx.insert_member(member);
                Ok(())
            })
            .unwrap();
        id
    }

    fn auction(f: &Fixture, start: i64, hours: i64) -> ListingId {
        f.manager
            .create_listing(
                f.seller,
                &CreateListing {
                    inventory_id: f.item_inv,
                    sale_mode: SaleMode::Auction,
                    fixed_price: None,
                    start_price: Some(start),
                    buyout_price: None,
                    bid_increment: None,
                    duration_hours: Some(hours),
                },
                Utc::now(),
            )
            .unwrap()
    }

    fn past_expiry(hours: i64) -> DateTime<Utc> {
        Utc::now() + chrono::Duration::hours(hours) + chrono::Duration::minutes(1)
    }

    #[test]
    fn expired_auction_with_bid_settles_to_winner() {
        let f = fixture();
        let listing_id = auction(&f, 100, 1);
        let alice = add_member(&f.store, "Alice", 500);
        let bob = add_member(&f.store, "Bob", 500);
        f.desk.place_bid(alice, listing_id, 100, Utc::now()).unwrap();
        f.desk.place_bid(bob, listing_id, 110, Utc::now()).unwrap();

        let report = f.sweeper.settle_expired_listings(past_expiry(1)).unwrap();
        assert_eq!(report.settled, vec![listing_id]);

        f.store
            .read(|c| {
                // Alice fully refunded; Bob's lock realized, no double debit.
                assert_eq!(c.members[&alice].balance, 500);
                assert_eq!(c.members[&bob].balance, 390);
                assert_eq!(c.members[&bob].inventory.len(), 1);
                // 110 sale, 5% fee floor = 5.
                assert_eq!(c.members[&f.seller].balance, 105);
                assert_eq!(c.listings[&listing_id].status, ListingStatus::Sold);
                assert_eq!(
                    c.listings[&listing_id].settlement_source,
                    Some(SettlementSource::Auction)
                );
            })
            .unwrap();
    }

    #[test]
    fn expired_auction_without_bid_returns_item() {
        let f = fixture();
        let listing_id = auction(&f, 100, 1);

        let report = f.sweeper.settle_expired_listings(past_expiry(1)).unwrap();
        assert_eq!(report.expired, vec![listing_id]);

        f.store
            .read(|c| {
                assert_eq!(c.listings[&listing_id].status, ListingStatus::Expired);
                assert_eq!(c.members[&f.seller].inventory.len(), 1);
                assert!(c.orders.is_empty());
            })
            .unwrap();
    }

    #[test]
    fn sweep_before_expiry_is_noop() {
        let f = fixture();
        let listing_id = auction(&f, 100, 24);
        let report = f.sweeper.settle_expired_listings(Utc::now()).unwrap();
        assert_eq!(report.finalized(), 0);
        let status = f.store.read(|c| c.listings[&listing_id].status).unwrap();
        assert_eq!(status, ListingStatus::Active);
    }

    #[test]
    fn sweep_twice_is_idempotent() {
        let f = fixture();
        let listing_id = auction(&f, 100, 1);
        let winner = add_member(&f.store, "Alice", 500);
        f.desk.place_bid(winner, listing_id, 100, Utc::now()).unwrap();

        let now = past_expiry(1);
        let first = f.sweeper.settle_expired_listings(now).unwrap();
        assert_eq!(first.settled.len(), 1);

        let snapshot_after_first = f
            .store
            .read(|c| {
                (
                    c.ledger.len(),
                    c.orders.len(),
                    c.members[&winner].balance,
                    c.members[&f.seller].balance,
                )
            })
            .unwrap();

        let second = f.sweeper.settle_expired_listings(now).unwrap();
        assert_eq!(second.finalized(), 0);
        assert!(second.failed.is_empty());

        let snapshot_after_second = f
            .store
            .read(|c| {
                (
                    c.ledger.len(),
                    c.orders.len(),
                    c.members[&winner].balance,
                    c.members[&f.seller].balance,
                )
            })
            .unwrap();
        assert_eq!(snapshot_after_first, snapshot_after_second);
    }

    #[test]
    fn finalize_rechecks_inside_transaction() {
        let f = fixture();
        let listing_id = auction(&f, 100, 1);

        // Simulate a concurrent cancel landing between the candidate
        // query and the finalize transaction.
        f.manager
            .cancel_listing(f.seller, listing_id, Utc::now())
            .unwrap();

        let outcome = f
            .sweeper
            .finalize_expired_listing(listing_id, past_expiry(1))
            .unwrap();
        assert_eq!(outcome, SweepOutcome::AlreadyHandled);
    }

    #[test]
    fn one_failure_does_not_abort_the_batch() {
        let f = fixture();
        let healthy = auction(&f, 100, 1);

        // Second listing whose winning bidder record is gone by sweep time.
        let mut seller2 = Member::new("Mo", 0);
        let item = ItemInstance::new("ring_jade", "Jade Ring");
        let inv2 = item.inventory_id;
        seller2.add_item(item);
        let seller2_id = seller2.id;
        f.store
            .transaction(|tx| {
                tx.insert_member(seller2);
                Ok(())
            })
            .unwrap();
        let doomed = f
            .manager
            .create_listing(
                seller2_id,
                &CreateListing {
                    inventory_id: inv2,
                    sale_mode: SaleMode::Auction,
                    fixed_price: None,
                    start_price: Some(100),
                    buyout_price: None,
                    bid_increment: None,
                    duration_hours: Some(1),
                },
                Utc::now(),
            )
            .unwrap();
        let ghost = add_member(&f.store, "Ghost", 500);
        f.desk.place_bid(ghost, doomed, 100, Utc::now()).unwrap();
        // Point the listing at a bidder record that does not exist, so
        // settlement fails with BUYER_NOT_FOUND at sweep time.
        f.store
            .transaction(|tx| {
                tx.listing_mut(doomed)?.current_bidder_id = Some(MemberId::new());
                Ok(())
            })
            .unwrap();

        let report = f.sweeper.settle_expired_listings(past_expiry(1)).unwrap();
        assert_eq!(report.failed.len(), 1);
        assert_eq!(report.failed[0].0, doomed);
        // The healthy listing still finalized.
        assert!(report.expired.contains(&healthy));
    }

    #[test]
    fn settled_winner_bid_ends_settled() {
        let f = fixture();
        let listing_id = auction(&f, 100, 1);
        let winner = add_member(&f.store, "Alice", 500);
        let bid_id = f.desk.place_bid(winner, listing_id, 100, Utc::now()).unwrap();

        f.sweeper.settle_expired_listings(past_expiry(1)).unwrap();
        let status = f.store.read(|c| c.bids[&bid_id].status).unwrap();
        assert_eq!(status, BidStatus::Settled);
    }
}
