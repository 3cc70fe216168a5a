mod aggregator;
mod classifier;
mod occurrences;
mod scoring;
mod tier;
mod traits;

pub use aggregator::ItemIndex;
pub use classifier::ItemClassifier;
pub use occurrences::OccurrenceMap;
pub use scoring::ScoringEngine;
pub use tier::{tier, tier_distribution, tier_map, RarityTier, TierMap, RAREST_TIER, TIER_BREAKPOINTS};
pub use traits::{TraitCounts, TraitRarity};
