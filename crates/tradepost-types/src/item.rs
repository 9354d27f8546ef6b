//! Inventory item types.
//!
//! An [`ItemInstance`] is one concrete item in a member's inventory, keyed
//! by its [`InventoryId`]. When an item is listed, an immutable clone of
//! the instance becomes the listing's item snapshot and the member's
//! inventory no longer references it — the listing owns the item for its
//! active lifetime.

use serde::{Deserialize, Serialize};

use crate::InventoryId;

/// One concrete item instance inside a member's inventory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInstance {
    /// Key of this instance within its owner's inventory.
    pub inventory_id: InventoryId,
    /// Catalog identifier. The protected starter-equipment set matches
    /// on this code.
    pub item_code: String,
    /// Display name.
    pub name: String,
    /// Quality tier.
    pub quality: u8,
    /// Bound items can never be traded.
    pub bound: bool,
    /// Locked items are in use by another subsystem (equipped, escrowed).
    pub locked: bool,
    /// Free-form attributes carried along unchanged.
    pub meta: serde_json::Value,
}

impl ItemInstance {
    /// A plain tradable item with the given catalog code and name.
    #[must_use]
    pub fn new(item_code: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            inventory_id: InventoryId::new(),
            item_code: item_code.into(),
            name: name.into(),
            quality: 1,
            bound: false,
            locked: false,
            meta: serde_json::Value::Null,
        }
    }

    /// Whether this item can be listed at all (ignoring the starter set,
    /// which is configuration-dependent).
    #[must_use]
    pub fn is_tradable(&self) -> bool {
        !self.bound && !self.locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_item_is_tradable() {
        let item = ItemInstance::new("sword_iron", "Iron Sword");
        assert!(item.is_tradable());
        assert_eq!(item.quality, 1);
    }

    #[test]
    fn bound_or_locked_is_not_tradable() {
        let mut item = ItemInstance::new("ring_jade", "Jade Ring");
        item.bound = true;
        assert!(!item.is_tradable());

        let mut item = ItemInstance::new("ring_jade", "Jade Ring");
        item.locked = true;
        assert!(!item.is_tradable());
    }

    #[test]
    fn item_serde_roundtrip() {
        let mut item = ItemInstance::new("robe_silk", "Silk Robe");
        item.meta = serde_json::json!({ "slots": 3 });
        let json = serde_json::to_string(&item).unwrap();
        let back: ItemInstance = serde_json::from_str(&json).unwrap();
        assert_eq!(item, back);
    }
}
