//! The settlement engine — the sole finalizer of sales.
//!
//! [`complete_sale`] runs entirely inside the caller's transaction, so a
//! failure at any step (missing member, insufficient stones, invalid bid
//! transition) rolls back every balance, ledger, inventory, and listing
//! write together. There is no partial-failure window.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tradepost_escrow::{credit_income, debit_purchase, realize_lock, refund_current_bid};
use tradepost_store::{MarketStore, TxHandle};
use tradepost_types::{
    BidId, EntryMeta, ListingId, ListingStatus, MarketError, MemberId, Order, OrderId, Result,
    SaleMode, SettlementSource, TradeConfig,
};

use crate::metrics;

/// Everything `complete_sale` needs to know about the purchase.
#[derive(Debug, Clone)]
pub struct SaleRequest {
    pub buyer_id: MemberId,
    /// Buyer display name, snapshotted onto the order and listing.
    pub buyer_name: String,
    /// Sale price in stones. Must be positive.
    pub price: i64,
    pub source: SettlementSource,
    /// The winning bid — required when `source` is `Auction`.
    pub bid_id: Option<BidId>,
}

/// Finalize a sale. The sole path that moves item ownership and realizes
/// currency transfer.
///
/// Steps, all in the caller's transaction: read seller and buyer, compute
/// the fee split, collect payment (fresh debit for buyouts, lock
/// realization for auction wins), credit the seller, fold the metrics,
/// move the item into the buyer's inventory, write the immutable order
/// record, and flip the listing to `SOLD`.
pub fn complete_sale(
    tx: &mut TxHandle<'_>,
    cfg: &TradeConfig,
    listing_id: ListingId,
    req: &SaleRequest,
    now: DateTime<Utc>,
) -> Result<Order> {
    let listing = tx.require_listing(listing_id)?;
    let seller_id = listing.seller_id;
    let seller_name = listing.seller_name.clone();
    let sale_mode = listing.sale_mode;
    let snapshot = listing
        .item_snapshot
        .clone()
        .ok_or_else(|| MarketError::ListingInvalid {
            reason: "listing has no item snapshot".into(),
        })?;

    if req.buyer_id == seller_id {
        return Err(MarketError::SelfPurchaseForbidden);
    }
    if req.price <= 0 {
        return Err(MarketError::PriceInvalid {
            reason: "sale price must be positive".into(),
        });
    }

    tx.require_member(seller_id)
        .map_err(|_| MarketError::SellerNotFound(seller_id))?;
    tx.require_member(req.buyer_id)
        .map_err(|_| MarketError::BuyerNotFound(req.buyer_id))?;

    let fee = cfg.fee_for(req.price);
    let net_income = req.price - fee;
    let order_id = OrderId::deterministic(listing_id);
    let meta = EntryMeta {
        listing_id: Some(listing_id),
        bid_id: req.bid_id,
        order_id: Some(order_id),
        sale_mode: Some(sale_mode),
        price: Some(req.price),
        fee: Some(fee),
    };

    match req.source {
        SettlementSource::Buyout => {
            let buyer = tx.require_member(req.buyer_id)?;
            if buyer.balance < req.price {
                return Err(MarketError::StoneInsufficient {
                    needed: req.price,
                    available: buyer.balance,
                });
            }
            debit_purchase(tx, req.buyer_id, req.price, meta.clone(), now)?;
        }
        SettlementSource::Auction => {
            // The winning bid's stones are already escrowed; realizing
            // the lock is the payment. No second debit.
            let bid_id = req.bid_id.ok_or_else(|| MarketError::ListingInvalid {
                reason: "auction settlement requires a winning bid".into(),
            })?;
            realize_lock(tx, bid_id)?;
        }
    }

    credit_income(tx, seller_id, net_income, meta, now)?;
    metrics::record_trade(tx, req.price, fee, now);

    tx.add_item(req.buyer_id, snapshot.clone())?;

    let order = Order {
        id: order_id,
        listing_id,
        seller_id,
        seller_name,
        buyer_id: req.buyer_id,
        buyer_name: req.buyer_name.clone(),
        inventory_id: snapshot.inventory_id,
        item_code: snapshot.item_code.clone(),
        item_name: snapshot.name.clone(),
        price: req.price,
        fee,
        net_income,
        sale_mode,
        settlement_source: req.source,
        sold_at: now,
    };
    tx.insert_order(order.clone());

    let listing = tx.listing_mut(listing_id)?;
    listing.status = ListingStatus::Sold;
    listing.buyer_id = Some(req.buyer_id);
    listing.buyer_name = Some(req.buyer_name.clone());
    listing.sold_at = Some(now);
    listing.settlement_source = Some(req.source);
    listing.settlement_fee = Some(fee);

    if let Some(bid_id) = req.bid_id {
        if req.source == SettlementSource::Auction {
            tx.bid_mut(bid_id)?.mark_settled()?;
        }
    }

    tracing::info!(
        %listing_id,
        %order_id,
        buyer = %req.buyer_id,
        seller = %seller_id,
        price = req.price,
        fee,
        source = %req.source,
        "sale settled"
    );
    Ok(order)
}

/// The direct-purchase entry point: pay the fixed price, or an auction's
/// buyout price, and end the listing immediately.
pub struct SettlementEngine {
    store: Arc<MarketStore>,
    config: TradeConfig,
}

impl SettlementEngine {
    #[must_use]
    pub fn new(store: Arc<MarketStore>, config: TradeConfig) -> Self {
        Self { store, config }
    }

    /// Buy a listing outright. For auctions carrying a bid from someone
    /// other than the buyer, the displaced bidder is refunded in the same
    /// transaction before settlement.
    pub fn buy_now(
        &self,
        member_id: MemberId,
        listing_id: ListingId,
        now: DateTime<Utc>,
    ) -> Result<Order> {
        self.store.transaction(|tx| {
            let listing = tx.require_listing(listing_id)?;
            if !listing.is_active() {
                return Err(MarketError::ListingNotActive);
            }
            if listing.seller_id == member_id {
                return Err(MarketError::Forbidden {
                    reason: "cannot buy your own listing".into(),
                });
            }

            let price = match listing.sale_mode {
                SaleMode::Fixed => listing
                    .fixed_price
                    .filter(|p| *p > 0)
                    .ok_or_else(|| MarketError::PriceInvalid {
                        reason: "fixed-price listing has no usable price".into(),
                    })?,
                SaleMode::Auction => {
                    let buyout = listing.buyout_price.ok_or(MarketError::BuyoutDisabled)?;
                    if buyout <= 0 {
                        return Err(MarketError::PriceInvalid {
                            reason: "buyout price must be positive".into(),
                        });
                    }
                    buyout
                }
            };

            let displaced_bidder = listing
                .current_bidder_id
                .filter(|bidder| *bidder != member_id);

            let buyer_name = tx.require_member(member_id)?.name.clone();

            if displaced_bidder.is_some() {
                refund_current_bid(tx, listing_id, now)?;
            }

            complete_sale(
                tx,
                &self.config,
                listing_id,
                &SaleRequest {
                    buyer_id: member_id,
                    buyer_name,
                    price,
                    source: SettlementSource::Buyout,
                    bid_id: None,
                },
                now,
            )
        })
    }
}
