use serde::{Deserialize, Serialize};

use super::item_parts::Category;

/// Structured decomposition of a raw item name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedItem {
    pub base_type: Option<String>,
    pub category: Option<Category>,
    pub suffix: Option<String>,
    pub name_prefix: Option<String>,
    pub name_suffix: Option<String>,
    pub has_bonus: bool,
    pub score: u32,
}

impl ClassifiedItem {
    /// One point for the item itself, plus one each for a place suffix, a
    /// quoted name and a "+1" bonus.
    pub fn score_for(name: &str, suffix_matched: bool, has_bonus: bool) -> u32 {
        let mut score = 1;
        if suffix_matched {
            score += 1;
        }
        if name.starts_with('"') {
            score += 1;
        }
        if has_bonus {
            score += 1;
        }
        score
    }
}
