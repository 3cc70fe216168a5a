use crate::models::{ClassifiedItem, ItemParts, PartPattern};

/// Substring marking a "+1" bonus item.
pub const BONUS_MARKER: &str = "+1";

/// Resolves raw item names against the item-part dictionary. Every lookup is
/// a linear scan where the first contained entry wins, so dictionary order
/// decides between overlapping entries ("Chain" before "Gold Chain").
pub struct ItemClassifier {
    base_types: Vec<PartPattern>,
    suffixes: Vec<String>,
    name_prefixes: Vec<String>,
    name_suffixes: Vec<String>,
}

impl ItemClassifier {
    pub fn new(parts: &ItemParts) -> Self {
        Self {
            base_types: parts.base_type_patterns(),
            suffixes: parts.suffixes.clone(),
            name_prefixes: parts.name_prefixes.clone(),
            name_suffixes: parts.name_suffixes.clone(),
        }
    }

    pub fn classify(&self, name: &str) -> ClassifiedItem {
        let base = self.base_types.iter().find(|p| name.contains(p.pattern.as_str()));
        let suffix = first_contained(&self.suffixes, name);
        let has_bonus = name.contains(BONUS_MARKER);

        ClassifiedItem {
            base_type: base.map(|p| p.pattern.clone()),
            category: base.map(|p| p.category),
            score: ClassifiedItem::score_for(name, suffix.is_some(), has_bonus),
            suffix,
            name_prefix: first_contained(&self.name_prefixes, name),
            name_suffix: first_contained(&self.name_suffixes, name),
            has_bonus,
        }
    }
}

fn first_contained(candidates: &[String], name: &str) -> Option<String> {
    candidates
        .iter()
        .find(|candidate| name.contains(candidate.as_str()))
        .cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    fn sample_parts() -> ItemParts {
        ItemParts {
            weapons: strings(&["Chain", "Knife"]),
            clothes: strings(&["Track Suit"]),
            waist_armor: strings(&["Hide Sash", "Sash"]),
            necklaces: strings(&["Gold Chain"]),
            rings: strings(&["Gold Ring"]),
            suffixes: strings(&["Hide", "Sash", "from Compton"]),
            name_prefixes: strings(&["Big", "Grim"]),
            name_suffixes: strings(&["Shout", "Killer"]),
            ..ItemParts::default()
        }
    }

    #[test]
    fn test_first_list_match_wins_over_later_match() {
        let classifier = ItemClassifier::new(&sample_parts());
        let item = classifier.classify("Divine Hide Sash");
        assert_eq!(item.suffix.as_deref(), Some("Hide"));
    }

    #[test]
    fn test_category_priority_beats_longer_match() {
        let classifier = ItemClassifier::new(&sample_parts());
        let item = classifier.classify("Gold Chain from Compton");
        assert_eq!(item.base_type.as_deref(), Some("Chain"));
        assert_eq!(item.category, Some(Category::Weapons));
    }

    #[test]
    fn test_unknown_name_classifies_to_nothing() {
        let classifier = ItemClassifier::new(&sample_parts());
        let item = classifier.classify("Fedora");
        assert_eq!(item.base_type, None);
        assert_eq!(item.category, None);
        assert_eq!(item.suffix, None);
        assert_eq!(item.name_prefix, None);
        assert_eq!(item.name_suffix, None);
        assert!(!item.has_bonus);
        assert_eq!(item.score, 1);
    }

    #[test]
    fn test_fully_decorated_name_scores_four() {
        let classifier = ItemClassifier::new(&sample_parts());
        let item = classifier.classify("\"Grim Shout\" Hide Sash of Power +1");

        assert_eq!(item.base_type.as_deref(), Some("Hide Sash"));
        assert_eq!(item.category, Some(Category::WaistArmor));
        assert_eq!(item.suffix.as_deref(), Some("Hide"));
        assert_eq!(item.name_prefix.as_deref(), Some("Grim"));
        assert_eq!(item.name_suffix.as_deref(), Some("Shout"));
        assert!(item.has_bonus);
        assert_eq!(item.score, 4);
    }

    #[test]
    fn test_prefix_substring_can_match_inside_suffix() {
        let mut parts = sample_parts();
        parts.suffixes = strings(&["from Big Smoke"]);
        let classifier = ItemClassifier::new(&parts);

        let item = classifier.classify("Knife from Big Smoke");
        assert_eq!(item.name_prefix.as_deref(), Some("Big"));
        assert_eq!(item.score, 2);
    }
}
