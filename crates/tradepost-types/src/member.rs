//! Member records as seen by the settlement engine.
//!
//! The member store is an external collaborator; this engine only reads
//! and writes two fields — the stone `balance` and the `inventory` array.
//! Everything else about a member lives elsewhere.

use serde::{Deserialize, Serialize};

use crate::{InventoryId, ItemInstance, MemberId};

/// The slice of a member record this engine touches.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Member {
    pub id: MemberId,
    /// Display name, snapshotted onto listings/bids/orders at write time.
    pub name: String,
    /// Stone balance in integer units. Never negative.
    pub balance: i64,
    /// Owned items, keyed by `inventory_id`.
    pub inventory: Vec<ItemInstance>,
}

impl Member {
    #[must_use]
    pub fn new(name: impl Into<String>, balance: i64) -> Self {
        Self {
            id: MemberId::new(),
            name: name.into(),
            balance,
            inventory: Vec::new(),
        }
    }

    /// Look up an inventory item without removing it.
    #[must_use]
    pub fn find_item(&self, inventory_id: InventoryId) -> Option<&ItemInstance> {
        self.inventory
            .iter()
            .find(|i| i.inventory_id == inventory_id)
    }

    /// Remove an item by inventory id. Returns the removed instance, or
    /// `None` when no item with this id exists.
    pub fn remove_item(&mut self, inventory_id: InventoryId) -> Option<ItemInstance> {
        let idx = self
            .inventory
            .iter()
            .position(|i| i.inventory_id == inventory_id)?;
        Some(self.inventory.remove(idx))
    }

    /// Append an item to the inventory.
    pub fn add_item(&mut self, item: ItemInstance) {
        self.inventory.push(item);
    }
}
