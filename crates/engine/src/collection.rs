//! Base collectible ownership primitive.
//!
//! The engine delegates item creation and ownership bookkeeping to this
//! seam; its own index is a derived view kept in lock-step via the
//! notification path in [`crate::ownership`].

use crate::errors::{EngineError, Result};
use boostpass_types::{Address, ItemId, Quantity, FIRST_ITEM_ID};
use parking_lot::RwLock;
use std::collections::HashMap;

/// Interface to the base issuance/ownership ledger.
pub trait CollectionLedger: Send + Sync {
    fn exists(&self, id: ItemId) -> bool;

    fn owner_of(&self, id: ItemId) -> Result<Address>;

    /// Create `quantity` items with contiguous sequential ids owned by `to`.
    /// Returns the first id of the range.
    fn mint_sequential(&self, to: &Address, quantity: Quantity) -> Result<ItemId>;

    /// Destroy one item. Fails if the item does not exist or `owner` does
    /// not hold it.
    fn burn(&self, owner: &Address, id: ItemId) -> Result<()>;
}

#[derive(Debug, Default)]
struct CollectionState {
    owners: HashMap<ItemId, Address>,
    next_id: ItemId,
}

/// Sequential-id ownership ledger for tests and single-process hosts.
///
/// Ids start at [`FIRST_ITEM_ID`] and are never reused, including after a
/// burn.
#[derive(Debug)]
pub struct InMemoryCollectionLedger {
    state: RwLock<CollectionState>,
}

impl InMemoryCollectionLedger {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(CollectionState {
                owners: HashMap::new(),
                next_id: FIRST_ITEM_ID,
            }),
        }
    }
}

impl Default for InMemoryCollectionLedger {
    fn default() -> Self {
        Self::new()
    }
}

impl CollectionLedger for InMemoryCollectionLedger {
    fn exists(&self, id: ItemId) -> bool {
        self.state.read().owners.contains_key(&id)
    }

    fn owner_of(&self, id: ItemId) -> Result<Address> {
        self.state
            .read()
            .owners
            .get(&id)
            .copied()
            .ok_or(EngineError::UnknownItem { item_id: id })
    }

    fn mint_sequential(&self, to: &Address, quantity: Quantity) -> Result<ItemId> {
        if quantity == 0 {
            return Err(EngineError::ZeroQuantity);
        }

        let mut state = self.state.write();
        let first = state.next_id;
        let next = first
            .checked_add(quantity)
            .ok_or(EngineError::AmountOverflow)?;

        for id in first..next {
            state.owners.insert(id, *to);
        }
        state.next_id = next;
        Ok(first)
    }

    fn burn(&self, owner: &Address, id: ItemId) -> Result<()> {
        let mut state = self.state.write();
        match state.owners.get(&id) {
            None => Err(EngineError::UnknownItem { item_id: id }),
            Some(current) if current != owner => Err(EngineError::NotItemOwner { item_id: id }),
            Some(_) => {
                state.owners.remove(&id);
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address([byte; 32])
    }

    #[test]
    fn sequential_ids_start_at_offset() {
        let ledger = InMemoryCollectionLedger::new();
        let first = ledger.mint_sequential(&addr(1), 3).unwrap();
        assert_eq!(first, FIRST_ITEM_ID);
        assert!(ledger.exists(FIRST_ITEM_ID + 2));
        assert!(!ledger.exists(FIRST_ITEM_ID + 3));

        let second = ledger.mint_sequential(&addr(2), 2).unwrap();
        assert_eq!(second, FIRST_ITEM_ID + 3);
        assert_eq!(ledger.owner_of(second).unwrap(), addr(2));
    }

    #[test]
    fn burn_checks_ownership_and_retires_id() {
        let ledger = InMemoryCollectionLedger::new();
        let first = ledger.mint_sequential(&addr(1), 1).unwrap();

        let err = ledger.burn(&addr(2), first).unwrap_err();
        assert!(matches!(err, EngineError::NotItemOwner { .. }));

        ledger.burn(&addr(1), first).unwrap();
        assert!(!ledger.exists(first));

        // Burned ids are never reassigned.
        let next = ledger.mint_sequential(&addr(1), 1).unwrap();
        assert_eq!(next, first + 1);
    }

    #[test]
    fn zero_quantity_rejected() {
        let ledger = InMemoryCollectionLedger::new();
        let err = ledger.mint_sequential(&addr(1), 0).unwrap_err();
        assert!(matches!(err, EngineError::ZeroQuantity));
    }
}
