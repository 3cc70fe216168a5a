use serde::{Deserialize, Serialize};

/// Additive ranking entry: `score` is the sum of the bag's occurrence counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RarityEntry {
    pub loot_id: u32,
    pub score: u64,
    pub rarest: usize,
}

/// Probability ranking entry: `score` is `|ln P|` of the bag's joint probability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityEntry {
    pub loot_id: u32,
    pub score: f64,
    pub rarest: usize,
}

/// Additive entry with the classifier item score merged in. Ranked by the
/// additive `score`, not by `item_score`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemScoreEntry {
    pub loot_id: u32,
    pub score: u64,
    pub item_score: u32,
    pub rarest: usize,
}
