//! Global trade metrics — best-effort, not authoritative.
//!
//! A single aggregate document accumulates volume, fees, and order
//! counts. It is updated inside the settlement transaction but is not
//! required to be consistent with individual [`crate::Order`] records;
//! a missing aggregate is initialized on first touch.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The singleton trade-volume aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradeMetric {
    /// Sum of sale prices in stones.
    pub total_volume: i64,
    /// Sum of platform fees in stones.
    pub total_fee: i64,
    /// Number of settled orders.
    pub total_orders: u64,
    pub updated_at: DateTime<Utc>,
}

impl TradeMetric {
    /// A zeroed aggregate, used when none has been written yet.
    #[must_use]
    pub fn zero(now: DateTime<Utc>) -> Self {
        Self {
            total_volume: 0,
            total_fee: 0,
            total_orders: 0,
            updated_at: now,
        }
    }

    /// Fold one settlement into the aggregate.
    pub fn record(&mut self, price: i64, fee: i64, now: DateTime<Utc>) {
        self.total_volume = self.total_volume.saturating_add(price);
        self.total_fee = self.total_fee.saturating_add(fee);
        self.total_orders += 1;
        self.updated_at = now;
    }
}
