//! System-wide constants for the Tradepost settlement engine.

/// Platform fee retained from the sale price, in basis points (500 = 5%).
pub const DEFAULT_FEE_RATE_BPS: i64 = 500;

/// Minimum bid increment as a fraction of the auction base price,
/// in basis points (500 = 5%).
pub const DEFAULT_MIN_INCREMENT_RATE_BPS: i64 = 500;

/// Absolute floor for a bid increment, in stones.
pub const MIN_BID_INCREMENT: i64 = 1;

/// Shortest allowed listing duration in hours.
pub const MIN_LISTING_DURATION_HOURS: i64 = 1;

/// Longest allowed listing duration in hours (one week).
pub const MAX_LISTING_DURATION_HOURS: i64 = 168;

/// Listing duration applied when the seller does not specify one.
pub const DEFAULT_LISTING_DURATION_HOURS: i64 = 72;

/// Maximum simultaneously active listings per member.
pub const DEFAULT_MAX_ACTIVE_LISTINGS: usize = 5;

/// Maximum simultaneously active bids per member, across all listings.
pub const DEFAULT_MAX_ACTIVE_BIDS: usize = 10;

/// Maximum listings finalized per expiration sweep.
pub const DEFAULT_SWEEP_BATCH_SIZE: usize = 10;

/// Maximum number of recent bids retained on a listing, newest first.
pub const BID_HISTORY_CAP: usize = 20;

/// Maximum items returned by a sellable-inventory query.
pub const DEFAULT_MAX_SELLABLE: usize = 50;

/// Version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Engine name.
pub const ENGINE_NAME: &str = "Tradepost";
