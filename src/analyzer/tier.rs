use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::occurrences::OccurrenceMap;

/// Descending occurrence breakpoints. A count above `TIER_BREAKPOINTS[i]`
/// lands in tier `i + 1`.
pub const TIER_BREAKPOINTS: [u32; 5] = [350, 310, 130, 7, 1];

/// Tier for values seen exactly once.
pub const RAREST_TIER: u8 = 6;

pub fn tier(occurrences: u32) -> u8 {
    TIER_BREAKPOINTS
        .iter()
        .position(|&breakpoint| occurrences > breakpoint)
        .map(|i| i as u8 + 1)
        .unwrap_or(RAREST_TIER)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RarityTier {
    Common = 1,
    Uncommon = 2,
    Rare = 3,
    Epic = 4,
    Legendary = 5,
    Mythic = 6,
}

impl RarityTier {
    pub fn from_occurrences(occurrences: u32) -> Self {
        Self::from_tier(tier(occurrences))
    }

    pub fn from_tier(tier: u8) -> Self {
        match tier {
            1 => RarityTier::Common,
            2 => RarityTier::Uncommon,
            3 => RarityTier::Rare,
            4 => RarityTier::Epic,
            5 => RarityTier::Legendary,
            _ => RarityTier::Mythic,
        }
    }
}

impl fmt::Display for RarityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RarityTier::Common => "Common",
            RarityTier::Uncommon => "Uncommon",
            RarityTier::Rare => "Rare",
            RarityTier::Epic => "Epic",
            RarityTier::Legendary => "Legendary",
            RarityTier::Mythic => "Mythic",
        };
        f.write_str(name)
    }
}

/// Item string → tier, from its occurrence count alone.
pub type TierMap = BTreeMap<String, u8>;

pub fn tier_map(occurrences: &OccurrenceMap) -> TierMap {
    occurrences
        .iter()
        .map(|(item, count)| (item.to_string(), tier(count)))
        .collect()
}

/// Number of distinct items per tier, for the run summary.
pub fn tier_distribution(tiers: &TierMap) -> BTreeMap<RarityTier, usize> {
    let mut distribution = BTreeMap::new();
    for &t in tiers.values() {
        *distribution.entry(RarityTier::from_tier(t)).or_insert(0) += 1;
    }
    distribution
}
