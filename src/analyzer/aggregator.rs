use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use crate::models::{LootSet, Slot};

/// Slot → distinct item names seen in that slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemIndex {
    items: BTreeMap<Slot, BTreeSet<String>>,
}

impl ItemIndex {
    pub fn build(loot: &LootSet) -> Self {
        let mut items: BTreeMap<Slot, BTreeSet<String>> = BTreeMap::new();
        for bag in loot.bags() {
            for (slot, item) in bag.items() {
                let seen = items.entry(slot).or_default();
                if !seen.contains(item) {
                    seen.insert(item.to_string());
                }
            }
        }
        Self { items }
    }

    pub fn items(&self, slot: Slot) -> Option<&BTreeSet<String>> {
        self.items.get(&slot)
    }

    /// Distinct items per slot. Every slot is present, unseen ones at 0.
    pub fn counts(&self) -> BTreeMap<Slot, usize> {
        Slot::ALL
            .iter()
            .map(|&slot| (slot, self.items.get(&slot).map_or(0, BTreeSet::len)))
            .collect()
    }
}
