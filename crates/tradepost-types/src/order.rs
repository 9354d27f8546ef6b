//! Completed-sale order records.
//!
//! One [`Order`] is written per settlement, inside the settlement
//! transaction, and never mutated afterwards.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{InventoryId, ListingId, MemberId, OrderId, SaleMode, SettlementSource};

/// The immutable record of one completed sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Deterministic from the listing id — a listing settles at most once.
    pub id: OrderId,
    pub listing_id: ListingId,
    pub seller_id: MemberId,
    pub seller_name: String,
    pub buyer_id: MemberId,
    pub buyer_name: String,
    /// The traded item, as listed.
    pub inventory_id: InventoryId,
    pub item_code: String,
    pub item_name: String,
    /// Sale price in stones.
    pub price: i64,
    /// Platform fee retained from the price.
    pub fee: i64,
    /// Seller proceeds: `price - fee`.
    pub net_income: i64,
    pub sale_mode: SaleMode,
    pub settlement_source: SettlementSource,
    pub sold_at: DateTime<Utc>,
}

impl Order {
    /// The fee-relevant notional value of this order.
    #[must_use]
    pub fn notional(&self) -> i64 {
        self.price
    }
}

impl std::fmt::Display for Order {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Order[{}] {} {} @ {} (fee {}, net {})",
            self.id, self.item_name, self.settlement_source, self.price, self.fee, self.net_income,
        )
    }
}
