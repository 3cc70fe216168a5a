use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::LootSet;

/// Number of `(bag, slot)` pairs holding each raw item string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OccurrenceMap {
    counts: BTreeMap<String, u32>,
}

impl OccurrenceMap {
    /// Single pass over every slot of every bag.
    pub fn count(loot: &LootSet) -> Self {
        let mut counts: BTreeMap<String, u32> = BTreeMap::new();
        for bag in loot.bags() {
            for (_, item) in bag.items() {
                *counts.entry(item.to_string()).or_insert(0) += 1;
            }
        }
        Self { counts }
    }

    pub fn get(&self, item: &str) -> Option<u32> {
        self.counts.get(item).copied()
    }

    /// Count for a value that came from the same snapshot. Values from
    /// elsewhere read as zero.
    pub fn count_of(&self, item: &str) -> u32 {
        self.get(item).unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.counts.iter().map(|(item, count)| (item.as_str(), *count))
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| c as u64).sum()
    }
}
