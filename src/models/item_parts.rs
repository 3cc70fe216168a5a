use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Category {
    Weapons,
    Clothes,
    Drugs,
    Vehicle,
    WaistArmor,
    FootArmor,
    HandArmor,
    Necklaces,
    Rings,
}

/// Order in which categories are tried when resolving an item's base type.
pub const CLASSIFY_PRIORITY: [Category; 9] = [
    Category::Weapons,
    Category::Clothes,
    Category::Drugs,
    Category::Vehicle,
    Category::WaistArmor,
    Category::FootArmor,
    Category::HandArmor,
    Category::Necklaces,
    Category::Rings,
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartPattern {
    pub pattern: String,
    pub category: Category,
}

/// Reference dictionary of known item-name fragments. Every list is
/// order-significant: lookups take the first entry contained in a name.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemParts {
    pub weapons: Vec<String>,
    pub clothes: Vec<String>,
    pub drugs: Vec<String>,
    pub vehicle: Vec<String>,
    pub waist_armor: Vec<String>,
    pub foot_armor: Vec<String>,
    pub hand_armor: Vec<String>,
    pub necklaces: Vec<String>,
    pub rings: Vec<String>,
    pub suffixes: Vec<String>,
    pub name_prefixes: Vec<String>,
    pub name_suffixes: Vec<String>,
}

impl ItemParts {
    pub fn parts(&self, category: Category) -> &[String] {
        match category {
            Category::Weapons => &self.weapons,
            Category::Clothes => &self.clothes,
            Category::Drugs => &self.drugs,
            Category::Vehicle => &self.vehicle,
            Category::WaistArmor => &self.waist_armor,
            Category::FootArmor => &self.foot_armor,
            Category::HandArmor => &self.hand_armor,
            Category::Necklaces => &self.necklaces,
            Category::Rings => &self.rings,
        }
    }

    /// Flattens the category lists into one linear scan list, categories in
    /// `CLASSIFY_PRIORITY` order and entries in declaration order.
    pub fn base_type_patterns(&self) -> Vec<PartPattern> {
        CLASSIFY_PRIORITY
            .iter()
            .flat_map(|&category| {
                self.parts(category).iter().map(move |pattern| PartPattern {
                    pattern: pattern.clone(),
                    category,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLED_PARTS: &str = include_str!("../../data/item-parts.json");

    #[test]
    fn test_bundled_parts_parse() {
        let parts: ItemParts = serde_json::from_str(BUNDLED_PARTS).unwrap();
        for category in CLASSIFY_PRIORITY {
            assert!(!parts.parts(category).is_empty(), "{:?} is empty", category);
        }
        assert!(parts.suffixes.iter().all(|s| s.starts_with("from ")));
        assert!(!parts.name_prefixes.is_empty());
        assert!(!parts.name_suffixes.is_empty());
    }

    #[test]
    fn test_patterns_follow_priority_order() {
        let mut parts = ItemParts::default();
        parts.rings = vec!["Gold Ring".to_string()];
        parts.weapons = vec!["Chain".to_string(), "Uzi".to_string()];
        parts.necklaces = vec!["Gold Chain".to_string()];

        let patterns = parts.base_type_patterns();
        let order: Vec<_> = patterns.iter().map(|p| p.pattern.as_str()).collect();
        assert_eq!(order, vec!["Chain", "Uzi", "Gold Chain", "Gold Ring"]);
        assert_eq!(patterns[2].category, Category::Necklaces);
    }

    #[test]
    fn test_category_names_match_dictionary_keys() {
        let json = serde_json::to_string(&Category::WaistArmor).unwrap();
        assert_eq!(json, "\"waistArmor\"");
    }
}
