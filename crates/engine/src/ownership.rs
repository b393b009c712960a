//! Derived ownership indexes.
//!
//! Two redundant reverse maps (owner -> item ids, tier -> item ids) kept in
//! lock-step with the base ledger through the post-transfer notification
//! path. Updated incrementally per batch, never rebuilt in normal
//! operation; both must always equal the ground truth derivable from the
//! base ledger plus the item records.

use boostpass_types::{Address, ItemId, Quantity, TierId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OwnershipIndex {
    by_owner: HashMap<Address, BTreeSet<ItemId>>,
    by_tier: HashMap<TierId, BTreeSet<ItemId>>,
}

impl OwnershipIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Post-transfer notification for a contiguous id range.
    ///
    /// `from = None` marks issuance, `to = None` marks a burn, both present
    /// marks a transfer. O(quantity) set edits per call. The transfer arm
    /// stays maintained even while the public API blocks transfers.
    pub fn on_transfer(
        &mut self,
        from: Option<&Address>,
        to: Option<&Address>,
        tier_id: TierId,
        first_id: ItemId,
        quantity: Quantity,
    ) {
        for id in first_id..first_id.saturating_add(quantity) {
            match (from, to) {
                (None, Some(owner)) => {
                    self.by_owner.entry(*owner).or_default().insert(id);
                    self.by_tier.entry(tier_id).or_default().insert(id);
                }
                (Some(owner), None) => {
                    self.remove_from_owner(owner, id);
                    if let Some(ids) = self.by_tier.get_mut(&tier_id) {
                        ids.remove(&id);
                    }
                }
                (Some(source), Some(dest)) => {
                    self.remove_from_owner(source, id);
                    self.by_owner.entry(*dest).or_default().insert(id);
                }
                (None, None) => {}
            }
        }
    }

    fn remove_from_owner(&mut self, owner: &Address, id: ItemId) {
        if let Some(ids) = self.by_owner.get_mut(owner) {
            ids.remove(&id);
            if ids.is_empty() {
                self.by_owner.remove(owner);
            }
        }
    }

    /// Item ids currently held by `owner`, in ascending order.
    pub fn items_of_owner(&self, owner: &Address) -> Vec<ItemId> {
        self.by_owner
            .get(owner)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Live item ids minted in `tier_id`, in ascending order.
    pub fn items_of_tier(&self, tier_id: TierId) -> Vec<ItemId> {
        self.by_tier
            .get(&tier_id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    pub fn holding_count(&self, owner: &Address) -> usize {
        self.by_owner.get(owner).map(BTreeSet::len).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn addr(byte: u8) -> Address {
        Address([byte; 32])
    }

    #[test]
    fn issuance_indexes_batch_under_owner_and_tier() {
        let mut index = OwnershipIndex::new();
        index.on_transfer(None, Some(&addr(1)), 3, 10, 4);

        assert_eq!(index.items_of_owner(&addr(1)), vec![10, 11, 12, 13]);
        assert_eq!(index.items_of_tier(3), vec![10, 11, 12, 13]);
        assert_eq!(index.holding_count(&addr(1)), 4);
    }

    #[test]
    fn burn_removes_from_both_structures() {
        let mut index = OwnershipIndex::new();
        index.on_transfer(None, Some(&addr(1)), 3, 10, 3);
        index.on_transfer(Some(&addr(1)), None, 3, 11, 1);

        assert_eq!(index.items_of_owner(&addr(1)), vec![10, 12]);
        assert_eq!(index.items_of_tier(3), vec![10, 12]);
    }

    #[test]
    fn transfer_moves_owner_and_leaves_tier_set() {
        let mut index = OwnershipIndex::new();
        index.on_transfer(None, Some(&addr(1)), 3, 10, 2);
        index.on_transfer(Some(&addr(1)), Some(&addr(2)), 3, 10, 1);

        assert_eq!(index.items_of_owner(&addr(1)), vec![11]);
        assert_eq!(index.items_of_owner(&addr(2)), vec![10]);
        assert_eq!(index.items_of_tier(3), vec![10, 11]);
    }

    #[test]
    fn empty_owner_entries_are_dropped() {
        let mut index = OwnershipIndex::new();
        index.on_transfer(None, Some(&addr(1)), 3, 10, 1);
        index.on_transfer(Some(&addr(1)), None, 3, 10, 1);

        assert_eq!(index.holding_count(&addr(1)), 0);
        assert!(index.items_of_owner(&addr(1)).is_empty());
    }
}
