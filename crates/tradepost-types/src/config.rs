//! Configuration for the Tradepost settlement engine.
//!
//! Amounts are integer stones; configured *rates* are [`Decimal`]
//! fractions so fee and increment math stays exact before the final
//! floor back to stones.

use std::collections::HashSet;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::constants;

/// Engine-wide trade configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradeConfig {
    /// Platform fee retained from the sale price (fraction, e.g. 0.05).
    pub fee_rate: Decimal,
    /// Minimum bid increment as a fraction of the auction base price.
    pub min_increment_rate: Decimal,
    /// Listing duration clamp, in hours.
    pub min_duration_hours: i64,
    pub max_duration_hours: i64,
    /// Applied when the seller does not specify a duration.
    pub default_duration_hours: i64,
    /// Per-member cap on simultaneously active listings.
    pub max_active_listings: usize,
    /// Per-member cap on simultaneously active bids across listings.
    pub max_active_bids: usize,
    /// Listings finalized per expiration sweep.
    pub sweep_batch_size: usize,
    /// Cap on items returned by a sellable-inventory query.
    pub max_sellable: usize,
    /// Catalog codes of protected starter equipment — never listable.
    pub starter_item_codes: HashSet<String>,
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            fee_rate: Decimal::new(constants::DEFAULT_FEE_RATE_BPS, 4),
            min_increment_rate: Decimal::new(constants::DEFAULT_MIN_INCREMENT_RATE_BPS, 4),
            min_duration_hours: constants::MIN_LISTING_DURATION_HOURS,
            max_duration_hours: constants::MAX_LISTING_DURATION_HOURS,
            default_duration_hours: constants::DEFAULT_LISTING_DURATION_HOURS,
            max_active_listings: constants::DEFAULT_MAX_ACTIVE_LISTINGS,
            max_active_bids: constants::DEFAULT_MAX_ACTIVE_BIDS,
            sweep_batch_size: constants::DEFAULT_SWEEP_BATCH_SIZE,
            max_sellable: constants::DEFAULT_MAX_SELLABLE,
            starter_item_codes: HashSet::new(),
        }
    }
}

impl TradeConfig {
    /// `floor(price × fee_rate)` in stones.
    #[must_use]
    pub fn fee_for(&self, price: i64) -> i64 {
        (Decimal::from(price) * self.fee_rate)
            .floor()
            .to_i64()
            .unwrap_or(0)
    }

    /// The increment derived from an auction base price:
    /// `max(floor(base × min_increment_rate), 1)`.
    #[must_use]
    pub fn derive_increment(&self, base_price: i64) -> i64 {
        (Decimal::from(base_price) * self.min_increment_rate)
            .floor()
            .to_i64()
            .unwrap_or(constants::MIN_BID_INCREMENT)
            .max(constants::MIN_BID_INCREMENT)
    }

    /// The increment snapshot stored on a new listing: the derived value
    /// or the seller's explicit increment, whichever is larger.
    #[must_use]
    pub fn listing_increment(&self, base_price: i64, explicit: Option<i64>) -> i64 {
        self.derive_increment(base_price)
            .max(explicit.unwrap_or(0))
            .max(constants::MIN_BID_INCREMENT)
    }

    /// Clamp a requested duration into the configured `[min, max]` hour
    /// range; `None` gets the default.
    #[must_use]
    pub fn clamp_duration_hours(&self, requested: Option<i64>) -> i64 {
        requested
            .unwrap_or(self.default_duration_hours)
            .clamp(self.min_duration_hours, self.max_duration_hours)
    }

    /// Whether this catalog code is protected starter equipment.
    #[must_use]
    pub fn is_starter(&self, item_code: &str) -> bool {
        self.starter_item_codes.contains(item_code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fee_is_five_percent_floored() {
        let cfg = TradeConfig::default();
        assert_eq!(cfg.fee_for(100), 5);
        assert_eq!(cfg.fee_for(99), 4); // floor(4.95)
        assert_eq!(cfg.fee_for(1), 0);
    }

    #[test]
    fn derived_increment_has_floor_of_one() {
        let cfg = TradeConfig::default();
        assert_eq!(cfg.derive_increment(100), 5);
        assert_eq!(cfg.derive_increment(1), 1);
        assert_eq!(cfg.derive_increment(0), 1);
    }

    #[test]
    fn explicit_increment_wins_when_larger() {
        let cfg = TradeConfig::default();
        assert_eq!(cfg.listing_increment(100, Some(20)), 20);
        assert_eq!(cfg.listing_increment(100, Some(2)), 5);
        assert_eq!(cfg.listing_increment(100, None), 5);
    }

    #[test]
    fn duration_clamped_to_range() {
        let cfg = TradeConfig::default();
        assert_eq!(cfg.clamp_duration_hours(None), 72);
        assert_eq!(cfg.clamp_duration_hours(Some(0)), 1);
        assert_eq!(cfg.clamp_duration_hours(Some(10_000)), 168);
        assert_eq!(cfg.clamp_duration_hours(Some(24)), 24);
    }

    #[test]
    fn starter_set_matches_on_code() {
        let mut cfg = TradeConfig::default();
        cfg.starter_item_codes.insert("novice_robe".into());
        assert!(cfg.is_starter("novice_robe"));
        assert!(!cfg.is_starter("silk_robe"));
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = TradeConfig::default();
        let json = serde_json::to_string(&cfg).unwrap();
        let back: TradeConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(cfg.fee_rate, back.fee_rate);
        assert_eq!(cfg.max_active_listings, back.max_active_listings);
    }
}
