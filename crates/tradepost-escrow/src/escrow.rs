//! The escrow controller.
//!
//! All operations take the caller's [`TxHandle`]: escrow never opens its
//! own transaction, so a failure anywhere in the caller's unit of work
//! rolls back the balance mutation together with its paired entry.

use chrono::{DateTime, Utc};
use tradepost_store::TxHandle;
use tradepost_types::{
    BidId, EntryId, EntryKind, EntryMeta, ListingId, MarketError, MemberId, Result,
};

use crate::ledger;

/// Debit `amount` stones from a bidder and record the paired `BID_LOCK`
/// entry. If the debit fails (insufficient stones, missing member),
/// nothing is recorded.
pub fn lock_stones(
    tx: &mut TxHandle<'_>,
    bidder_id: MemberId,
    amount: i64,
    listing_id: ListingId,
    bid_id: BidId,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    tx.adjust_balance(bidder_id, -amount)?;
    Ok(ledger::record(
        tx,
        bidder_id,
        -amount,
        EntryKind::BidLock,
        format!("bid lock on {listing_id}"),
        EntryMeta::for_bid(listing_id, bid_id),
        now,
    ))
}

/// Return the listing's current bid to its bidder, if one is still active.
///
/// This is the single refund path for outbid, cancellation, and buyout
/// displacement. The bid-status check makes it idempotent: a bid that was
/// already refunded (or won) is left untouched and `Ok(None)` is returned.
///
/// The original lock entry is relabeled to `BID_REFUND` when it still
/// resolves; otherwise a fresh positive `BID_REFUND` entry is appended.
pub fn refund_current_bid(
    tx: &mut TxHandle<'_>,
    listing_id: ListingId,
    now: DateTime<Utc>,
) -> Result<Option<BidId>> {
    let Some(bid_id) = tx.require_listing(listing_id)?.current_bid_id else {
        return Ok(None);
    };

    let Some(bid) = tx.bid(bid_id) else {
        tracing::warn!(%listing_id, %bid_id, "current bid reference dangles; nothing to refund");
        return Ok(None);
    };
    if !bid.is_active() || bid.amount <= 0 {
        return Ok(None);
    }
    let (bidder_id, amount, lock_entry) = (bid.bidder_id, bid.amount, bid.lock_transaction_id);

    tx.adjust_balance(bidder_id, amount)?;
    let relabeled = lock_entry.is_some_and(|entry_id| {
        ledger::relabel(tx, entry_id, EntryKind::BidRefund)
    });
    if !relabeled {
        ledger::record(
            tx,
            bidder_id,
            amount,
            EntryKind::BidRefund,
            format!("bid refund on {listing_id}"),
            EntryMeta::for_bid(listing_id, bid_id),
            now,
        );
    }
    tx.bid_mut(bid_id)?.mark_refunded()?;

    tracing::debug!(%listing_id, %bid_id, bidder = %bidder_id, amount, "bid refunded");
    Ok(Some(bid_id))
}

/// Convert a winning bid's lock into a purchase: relabel the lock entry
/// and mark the bid `WON`. No new debit — the stones are already held.
pub fn realize_lock(tx: &mut TxHandle<'_>, bid_id: BidId) -> Result<()> {
    let bid = tx.bid_mut(bid_id)?;
    let lock_entry = bid.lock_transaction_id;
    bid.mark_won()?;

    let relabeled = lock_entry.is_some_and(|entry_id| {
        ledger::relabel(tx, entry_id, EntryKind::Purchase)
    });
    if !relabeled {
        tracing::warn!(%bid_id, "winning bid has no resolvable lock entry");
    }
    Ok(())
}

/// Fresh purchase debit (buy-now path): debit the buyer and record the
/// paired `PURCHASE` entry.
pub fn debit_purchase(
    tx: &mut TxHandle<'_>,
    buyer_id: MemberId,
    price: i64,
    meta: EntryMeta,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    tx.adjust_balance(buyer_id, -price).map_err(|err| match err {
        MarketError::MemberNotFound(id) => MarketError::BuyerNotFound(id),
        other => other,
    })?;
    Ok(ledger::record(
        tx,
        buyer_id,
        -price,
        EntryKind::Purchase,
        "purchase",
        meta,
        now,
    ))
}

/// Credit seller proceeds and record the paired `INCOME` entry.
pub fn credit_income(
    tx: &mut TxHandle<'_>,
    seller_id: MemberId,
    amount: i64,
    meta: EntryMeta,
    now: DateTime<Utc>,
) -> Result<EntryId> {
    tx.adjust_balance(seller_id, amount).map_err(|err| match err {
        MarketError::MemberNotFound(id) => MarketError::SellerNotFound(id),
        other => other,
    })?;
    Ok(ledger::record(
        tx,
        seller_id,
        amount,
        EntryKind::Income,
        "sale income",
        meta,
        now,
    ))
}
