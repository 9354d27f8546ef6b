//! Bid documents and their state machine.
//!
//! ## State machine
//!
//! ```text
//!   ┌────────┐  outbid / cancel   ┌──────────┐
//!   │ ACTIVE ├───────────────────▶│ REFUNDED │
//!   └───┬────┘                    └──────────┘
//!       │ listing sells to this bid
//!       ▼
//!   ┌─────┐   settlement completes   ┌─────────┐
//!   │ WON ├─────────────────────────▶│ SETTLED │
//!   └─────┘                          └─────────┘
//! ```
//!
//! Transitions are monotonic; everything else is rejected. An `ACTIVE`
//! bid always has stones locked 1:1 via the escrow controller, and its
//! `lock_transaction_id` points at the ledger entry that locked them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{BidId, EntryId, ListingId, MarketError, MemberId, Result};

/// Lifecycle state of a bid. An outbid bid is modeled as `Refunded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BidStatus {
    /// Stones are locked; this bid currently leads its listing.
    Active,
    /// The lock was returned (outbid, listing cancelled, or displaced
    /// by a buyout).
    Refunded,
    /// The listing sold to this bid; the lock is being realized.
    Won,
    /// Settlement completed. **Irreversible.**
    Settled,
}

impl BidStatus {
    /// Can this bid transition to the given target state?
    #[must_use]
    pub fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (Self::Active, Self::Refunded | Self::Won) | (Self::Won, Self::Settled)
        )
    }
}

impl std::fmt::Display for BidStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Active => write!(f, "ACTIVE"),
            Self::Refunded => write!(f, "REFUNDED"),
            Self::Won => write!(f, "WON"),
            Self::Settled => write!(f, "SETTLED"),
        }
    }
}

/// One member's offer against one auction listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bid {
    pub id: BidId,
    pub listing_id: ListingId,
    pub bidder_id: MemberId,
    /// Bidder display name at bid time.
    pub bidder_name: String,
    /// Locked amount in stones.
    pub amount: i64,
    pub status: BidStatus,
    /// The ledger entry that escrowed the funds for this bid.
    pub lock_transaction_id: Option<EntryId>,
    pub placed_at: DateTime<Utc>,
}

impl Bid {
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == BidStatus::Active
    }

    fn transition(&mut self, target: BidStatus) -> Result<()> {
        if !self.status.can_transition_to(target) {
            return Err(MarketError::Internal(format!(
                "bid {} cannot transition {} -> {target}",
                self.id, self.status
            )));
        }
        self.status = target;
        Ok(())
    }

    /// Mark this bid refunded (outbid, cancel, buyout displacement).
    pub fn mark_refunded(&mut self) -> Result<()> {
        self.transition(BidStatus::Refunded)
    }

    /// Mark this bid as the winning bid of its listing.
    pub fn mark_won(&mut self) -> Result<()> {
        self.transition(BidStatus::Won)
    }

    /// Mark the winning bid fully settled.
    pub fn mark_settled(&mut self) -> Result<()> {
        self.transition(BidStatus::Settled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_bid() -> Bid {
        Bid {
            id: BidId::new(),
            listing_id: ListingId::new(),
            bidder_id: MemberId::new(),
            bidder_name: "Lan".into(),
            amount: 100,
            status: BidStatus::Active,
            lock_transaction_id: Some(EntryId::new()),
            placed_at: Utc::now(),
        }
    }

    #[test]
    fn active_can_refund_or_win() {
        assert!(BidStatus::Active.can_transition_to(BidStatus::Refunded));
        assert!(BidStatus::Active.can_transition_to(BidStatus::Won));
        assert!(!BidStatus::Active.can_transition_to(BidStatus::Settled));
    }

    #[test]
    fn won_only_settles() {
        assert!(BidStatus::Won.can_transition_to(BidStatus::Settled));
        assert!(!BidStatus::Won.can_transition_to(BidStatus::Refunded));
        assert!(!BidStatus::Won.can_transition_to(BidStatus::Active));
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [BidStatus::Refunded, BidStatus::Settled] {
            for target in [
                BidStatus::Active,
                BidStatus::Refunded,
                BidStatus::Won,
                BidStatus::Settled,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn double_refund_rejected() {
        let mut bid = make_bid();
        bid.mark_refunded().unwrap();
        assert!(bid.mark_refunded().is_err());
    }

    #[test]
    fn win_then_settle() {
        let mut bid = make_bid();
        bid.mark_won().unwrap();
        bid.mark_settled().unwrap();
        assert_eq!(bid.status, BidStatus::Settled);
    }

    #[test]
    fn bid_serde_roundtrip() {
        let bid = make_bid();
        let json = serde_json::to_string(&bid).unwrap();
        let back: Bid = serde_json::from_str(&json).unwrap();
        assert_eq!(bid.id, back.id);
        assert_eq!(back.status, BidStatus::Active);
    }
}
