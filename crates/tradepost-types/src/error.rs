//! Error types for the Tradepost settlement engine.
//!
//! Every error is identified by a **stable string code** (the part before
//! the first `:` in the Display output). Callers branch on [`MarketError::code`],
//! never on message text. Codes are grouped by category:
//!
//! - **Validation** — caller input fails a precondition; no side effects;
//!   safe to retry after correcting the input.
//! - **StateConflict** — the entity exists but is not in the expected state,
//!   typically because another transaction got there first; refresh and retry.
//! - **Resource** — a referenced entity is missing or a quota is exceeded.
//! - **Funds** — business-rule rejection checked before any debit.
//! - **Internal** — engine/storage faults and transport-side preconditions.
//!
//! Any error raised inside a store transaction rolls the whole transaction
//! back; no partial ledger/balance/inventory mutation is ever observable.

use thiserror::Error;

use crate::{BidId, InventoryId, ListingId, MemberId};

/// Coarse error category, mirroring the retry semantics above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    Validation,
    StateConflict,
    Resource,
    Funds,
    Internal,
}

/// Central error enum for all Tradepost operations.
#[derive(Debug, Error)]
pub enum MarketError {
    // =================================================================
    // Validation
    // =================================================================
    /// A fixed-price listing was submitted without a positive price.
    #[error("PRICE_REQUIRED: fixed-price listing requires a positive price")]
    PriceRequired,

    /// An auction listing was submitted without a positive start price.
    #[error("START_PRICE_REQUIRED: auction listing requires a positive start price")]
    StartPriceRequired,

    /// A price field is present but unusable (non-positive, unset where needed).
    #[error("PRICE_INVALID: {reason}")]
    PriceInvalid { reason: String },

    /// The bid is below the minimum acceptable amount. The message states
    /// the exact floor so the bidder can correct in one step.
    #[error("BID_TOO_LOW: minimum acceptable bid is {floor}")]
    BidTooLow { floor: i64 },

    /// The item exists but cannot be traded (bound, starter equipment, ...).
    #[error("ITEM_INVALID: {reason}")]
    ItemInvalid { reason: String },

    // =================================================================
    // State conflict
    // =================================================================
    /// The requested listing does not exist.
    #[error("LISTING_NOT_FOUND: listing not found: {0}")]
    ListingNotFound(ListingId),

    /// The listing exists but is no longer active.
    #[error("LISTING_NOT_ACTIVE: listing is not active")]
    ListingNotActive,

    /// The caller may not perform this action on this listing
    /// (self-bid, self-buy, cancelling someone else's listing).
    #[error("FORBIDDEN: {reason}")]
    Forbidden { reason: String },

    /// Bids were placed against a fixed-price listing.
    #[error("NOT_AUCTION: listing does not accept bids")]
    NotAuction,

    /// Buy-now was requested on an auction without a buyout price.
    #[error("BUYOUT_DISABLED: auction has no buyout price")]
    BuyoutDisabled,

    /// The sale mode is not recognized by this engine version.
    #[error("MODE_UNSUPPORTED: unsupported sale mode")]
    ModeUnsupported,

    /// The listing document is structurally unfit for settlement
    /// (missing item snapshot, missing winning bid reference).
    #[error("LISTING_INVALID: {reason}")]
    ListingInvalid { reason: String },

    // =================================================================
    // Resource
    // =================================================================
    /// The acting member record does not exist.
    #[error("MEMBER_NOT_FOUND: member not found: {0}")]
    MemberNotFound(MemberId),

    /// The listing's seller record vanished before settlement.
    #[error("SELLER_NOT_FOUND: seller not found: {0}")]
    SellerNotFound(MemberId),

    /// The buyer record vanished before settlement.
    #[error("BUYER_NOT_FOUND: buyer not found: {0}")]
    BuyerNotFound(MemberId),

    /// No inventory item with this id.
    #[error("ITEM_NOT_FOUND: inventory item not found: {0}")]
    ItemNotFound(InventoryId),

    /// The item is locked by another subsystem and cannot be listed.
    #[error("ITEM_LOCKED: item is locked")]
    ItemLocked,

    /// Too many simultaneously active listings for this member.
    #[error("LISTING_LIMIT: active listing limit reached ({limit})")]
    ListingLimit { limit: usize },

    /// Too many simultaneously active bids for this member.
    #[error("BID_LIMIT: active bid limit reached ({limit})")]
    BidLimit { limit: usize },

    // =================================================================
    // Funds
    // =================================================================
    /// Not enough stones to cover the debit.
    #[error("STONE_INSUFFICIENT: need {needed}, have {available}")]
    StoneInsufficient { needed: i64, available: i64 },

    /// The buyer and seller are the same member.
    #[error("SELF_PURCHASE_FORBIDDEN: cannot buy your own listing")]
    SelfPurchaseForbidden,

    // =================================================================
    // Internal / transport preconditions
    // =================================================================
    /// The transport layer failed to resolve an acting member.
    /// Produced outside this engine; kept here so the whole taxonomy
    /// shares one enum.
    #[error("AUTH_REQUIRED: sign in required")]
    AuthRequired,

    /// A settlement request arrived without a buyer reference.
    #[error("MEMBER_REQUIRED: buyer member is required")]
    MemberRequired,

    /// Backing collections were never provisioned. Provisioning is a
    /// startup/admin concern; the engine never creates schema lazily.
    #[error("STORAGE_NOT_PROVISIONED: store collections not provisioned")]
    StorageNotProvisioned,

    /// A bid referenced by a listing does not exist.
    #[error("BID_NOT_FOUND: bid not found: {0}")]
    BidNotFound(BidId),

    /// Unrecoverable internal error.
    #[error("INTERNAL: {0}")]
    Internal(String),
}

impl MarketError {
    /// The stable string code for this error. Wire formats and callers
    /// branch on this, never on the human-readable message.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::PriceRequired => "PRICE_REQUIRED",
            Self::StartPriceRequired => "START_PRICE_REQUIRED",
            Self::PriceInvalid { .. } => "PRICE_INVALID",
            Self::BidTooLow { .. } => "BID_TOO_LOW",
            Self::ItemInvalid { .. } => "ITEM_INVALID",
            Self::ListingNotFound(_) => "LISTING_NOT_FOUND",
            Self::ListingNotActive => "LISTING_NOT_ACTIVE",
            Self::Forbidden { .. } => "FORBIDDEN",
            Self::NotAuction => "NOT_AUCTION",
            Self::BuyoutDisabled => "BUYOUT_DISABLED",
            Self::ModeUnsupported => "MODE_UNSUPPORTED",
            Self::ListingInvalid { .. } => "LISTING_INVALID",
            Self::MemberNotFound(_) => "MEMBER_NOT_FOUND",
            Self::SellerNotFound(_) => "SELLER_NOT_FOUND",
            Self::BuyerNotFound(_) => "BUYER_NOT_FOUND",
            Self::ItemNotFound(_) => "ITEM_NOT_FOUND",
            Self::ItemLocked => "ITEM_LOCKED",
            Self::ListingLimit { .. } => "LISTING_LIMIT",
            Self::BidLimit { .. } => "BID_LIMIT",
            Self::StoneInsufficient { .. } => "STONE_INSUFFICIENT",
            Self::SelfPurchaseForbidden => "SELF_PURCHASE_FORBIDDEN",
            Self::AuthRequired => "AUTH_REQUIRED",
            Self::MemberRequired => "MEMBER_REQUIRED",
            Self::StorageNotProvisioned => "STORAGE_NOT_PROVISIONED",
            Self::BidNotFound(_) => "BID_NOT_FOUND",
            Self::Internal(_) => "INTERNAL",
        }
    }

    /// The retry-semantics category for this error.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::PriceRequired
            | Self::StartPriceRequired
            | Self::PriceInvalid { .. }
            | Self::BidTooLow { .. }
            | Self::ItemInvalid { .. } => ErrorCategory::Validation,

            Self::ListingNotFound(_)
            | Self::ListingNotActive
            | Self::Forbidden { .. }
            | Self::NotAuction
            | Self::BuyoutDisabled
            | Self::ModeUnsupported
            | Self::ListingInvalid { .. } => ErrorCategory::StateConflict,

            Self::MemberNotFound(_)
            | Self::SellerNotFound(_)
            | Self::BuyerNotFound(_)
            | Self::ItemNotFound(_)
            | Self::ItemLocked
            | Self::ListingLimit { .. }
            | Self::BidLimit { .. } => ErrorCategory::Resource,

            Self::StoneInsufficient { .. } | Self::SelfPurchaseForbidden => ErrorCategory::Funds,

            Self::AuthRequired
            | Self::MemberRequired
            | Self::StorageNotProvisioned
            | Self::BidNotFound(_)
            | Self::Internal(_) => ErrorCategory::Internal,
        }
    }
}

/// Crate-wide `Result` alias.
pub type Result<T> = std::result::Result<T, MarketError>;
