//! Best-effort global trade metrics.
//!
//! The aggregate is not authoritative — it is updated inside the
//! settlement transaction for convenience, but a missing document is
//! initialized on first touch and the update itself cannot fail, so it
//! can never abort a settlement.

use chrono::{DateTime, Utc};
use tradepost_store::TxHandle;

/// Fold one settlement into the singleton aggregate.
pub fn record_trade(tx: &mut TxHandle<'_>, price: i64, fee: i64, now: DateTime<Utc>) {
    tx.metric_mut(now).record(price, fee, now);
}

#[cfg(test)]
mod tests {
    use super::*;
    use tradepost_store::MarketStore;

    #[test]
    fn records_accumulate_from_missing_aggregate() {
        let store = MarketStore::open();
        store
            .transaction(|tx| {
                let now = Utc::now();
                record_trade(tx, 100, 5, now);
                record_trade(tx, 40, 2, now);
                Ok(())
            })
            .unwrap();

        store
            .read(|c| {
                let metric = c.metric.as_ref().unwrap();
                assert_eq!(metric.total_volume, 140);
                assert_eq!(metric.total_fee, 7);
                assert_eq!(metric.total_orders, 2);
            })
            .unwrap();
    }
}
