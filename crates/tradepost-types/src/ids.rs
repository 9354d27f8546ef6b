//! Typed identifiers for every Tradepost entity.
//!
//! All ids are UUIDv7 newtypes, so creation order and sort order agree.
//! [`OrderId`] additionally supports deterministic derivation from the
//! listing it settles, so a retried settlement can never mint a second
//! order for the same listing.

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! uuid_id {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
        pub struct $name(pub Uuid);

        impl $name {
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            #[must_use]
            pub fn from_bytes(bytes: [u8; 16]) -> Self {
                Self(Uuid::from_bytes(bytes))
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                if $prefix.is_empty() {
                    write!(f, "{}", self.0)
                } else {
                    write!(f, "{}:{}", $prefix, self.0)
                }
            }
        }
    };
}

uuid_id!(
    /// Unique identifier for a member (trading account).
    MemberId,
    ""
);

uuid_id!(
    /// Unique identifier for a listing (sell offer).
    ListingId,
    "lst"
);

uuid_id!(
    /// Unique identifier for a bid against an auction listing.
    BidId,
    "bid"
);

uuid_id!(
    /// Unique identifier for a stone ledger entry.
    EntryId,
    "stx"
);

uuid_id!(
    /// Key of an item within a member's inventory.
    InventoryId,
    "inv"
);

// ---------------------------------------------------------------------------
// OrderId
// ---------------------------------------------------------------------------

/// Globally unique identifier for a completed-sale order record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct OrderId(pub Uuid);

impl OrderId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Deterministic `OrderId` from the listing being settled.
    ///
    /// A listing settles at most once, so deriving the order id from the
    /// listing id makes the order record idempotent: a retried settlement
    /// of the same listing produces the **exact same** order id.
    #[must_use]
    pub fn deterministic(listing_id: ListingId) -> Self {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(b"tradepost:order_id:v1:");
        hasher.update(listing_id.0.as_bytes());
        let hash = hasher.finalize();
        let bytes: [u8; 16] = hash[..16].try_into().expect("digest is 32 bytes");
        Self(Uuid::from_bytes(bytes))
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ord:{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
