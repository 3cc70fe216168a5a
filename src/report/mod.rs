use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::analyzer::{
    tier_map, ItemClassifier, ItemIndex, OccurrenceMap, ScoringEngine, TierMap, TraitCounts,
    TraitRarity,
};
use crate::errors::{RarityError, Result};
use crate::models::{ItemParts, ItemScoreEntry, LootSet, ProbabilityEntry, RarityEntry, Slot};
use crate::storage::documents::save_json;

pub const OCCURRENCES_FILE: &str = "occurrences.json";
pub const ADDITIVE_FILE: &str = "additive.json";
pub const PROBABILITY_FILE: &str = "probability.json";
pub const RARE_FILE: &str = "rare.json";
pub const ITEM_RARITIES_FILE: &str = "item-rarities.json";
pub const ITEMS_FILE: &str = "items.json";
pub const ITEM_COUNT_FILE: &str = "item-count.json";
pub const TRAIT_COUNTS_FILE: &str = "trait-counts.json";
pub const RARITY_FILE: &str = "rarity.json";

/// Per-token export row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenRarity {
    #[serde(rename = "token_id")]
    pub token_id: String,
    /// `overall` is the bag's rank in `rare.json`; every other key is a slot
    /// holding that item's tier.
    pub rank: BTreeMap<String, usize>,
    pub count: BTreeMap<Slot, u32>,
    pub rarity: BTreeMap<Slot, u64>,
    pub rarity_position: BTreeMap<Slot, usize>,
}

/// Every document the analysis produces.
#[derive(Debug, Clone)]
pub struct RarityReport {
    pub occurrences: OccurrenceMap,
    pub additive: Vec<RarityEntry>,
    pub probability: Vec<ProbabilityEntry>,
    pub rare: Vec<ItemScoreEntry>,
    pub item_rarities: TierMap,
    pub items: ItemIndex,
    pub item_count: BTreeMap<Slot, usize>,
    pub trait_counts: TraitCounts,
    pub tokens: Vec<TokenRarity>,
}

impl RarityReport {
    /// Runs every analysis over the snapshot and merges the results.
    pub fn build(loot: &LootSet, parts: &ItemParts) -> Result<Self> {
        info!("Analyzing {} bags", loot.len());

        let occurrences = OccurrenceMap::count(loot);
        info!("Counted {} distinct items", occurrences.len());

        let classifier = ItemClassifier::new(parts);
        let engine = ScoringEngine::new(loot, &occurrences);
        let additive = engine.additive_ranking();
        let probability = engine.probability_ranking();
        let rare = engine.item_score_ranking(&classifier);

        let item_rarities = tier_map(&occurrences);
        let items = ItemIndex::build(loot);
        let item_count = items.counts();

        let trait_counts = TraitCounts::count(loot, parts);
        let trait_rarity = TraitRarity::compute(loot, &trait_counts);
        let tokens = assemble_tokens(loot, &occurrences, &rare, &item_rarities, &trait_rarity)?;

        Ok(Self {
            occurrences,
            additive,
            probability,
            rare,
            item_rarities,
            items,
            item_count,
            trait_counts,
            tokens,
        })
    }

    pub async fn write_all(&self, dir: &Path) -> Result<()> {
        tokio::fs::create_dir_all(dir).await?;

        save_json(&dir.join(OCCURRENCES_FILE), &self.occurrences).await?;
        save_json(&dir.join(ADDITIVE_FILE), &self.additive).await?;
        save_json(&dir.join(PROBABILITY_FILE), &self.probability).await?;
        save_json(&dir.join(RARE_FILE), &self.rare).await?;
        save_json(&dir.join(ITEM_RARITIES_FILE), &self.item_rarities).await?;
        save_json(&dir.join(ITEMS_FILE), &self.items).await?;
        save_json(&dir.join(ITEM_COUNT_FILE), &self.item_count).await?;
        save_json(&dir.join(TRAIT_COUNTS_FILE), &self.trait_counts).await?;
        save_json(&dir.join(RARITY_FILE), &self.tokens).await?;

        info!("Wrote rarity documents to {}", dir.display());
        Ok(())
    }
}

fn assemble_tokens(
    loot: &LootSet,
    occurrences: &OccurrenceMap,
    rare: &[ItemScoreEntry],
    tiers: &TierMap,
    trait_rarity: &TraitRarity,
) -> Result<Vec<TokenRarity>> {
    let overall: BTreeMap<u32, usize> = rare.iter().map(|e| (e.loot_id, e.rarest)).collect();

    loot.bags()
        .iter()
        .enumerate()
        .map(|(index, bag)| -> Result<TokenRarity> {
            let missing = || {
                RarityError::ValidationError(format!("Bag {} missing from rankings", bag.id))
            };

            let mut rank = BTreeMap::new();
            rank.insert(
                "overall".to_string(),
                *overall.get(&bag.id).ok_or_else(missing)?,
            );
            let mut count = BTreeMap::new();
            for (slot, item) in bag.items() {
                let tier = *tiers.get(item).ok_or_else(missing)?;
                rank.insert(slot.to_string(), tier as usize);
                count.insert(slot, occurrences.count_of(item));
            }

            let rarity = trait_rarity.bag(index).cloned().ok_or_else(missing)?;
            let rarity_position = rarity
                .iter()
                .filter_map(|(&slot, &score)| {
                    trait_rarity.position(slot, score).map(|pos| (slot, pos))
                })
                .collect();

            Ok(TokenRarity {
                token_id: bag.id.to_string(),
                rank,
                count,
                rarity,
                rarity_position,
            })
        })
        .collect()
}
