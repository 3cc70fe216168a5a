use tracing::debug;

use super::classifier::ItemClassifier;
use super::occurrences::OccurrenceMap;
use crate::models::{Bag, ItemScoreEntry, LootSet, ProbabilityEntry, RarityEntry};

/// Produces the three bag rankings. Each ranking sorts and ranks on its own;
/// all sorts are stable, so equal scores keep bag-id order.
pub struct ScoringEngine<'a> {
    loot: &'a LootSet,
    occurrences: &'a OccurrenceMap,
}

impl<'a> ScoringEngine<'a> {
    pub fn new(loot: &'a LootSet, occurrences: &'a OccurrenceMap) -> Self {
        Self { loot, occurrences }
    }

    /// Sum of occurrence counts per bag, in bag-id order, unranked.
    fn additive_scores(&self) -> Vec<(u32, u64)> {
        self.loot
            .bags()
            .iter()
            .map(|bag| (bag.id, additive_score(bag, self.occurrences)))
            .collect()
    }

    pub fn additive_ranking(&self) -> Vec<RarityEntry> {
        let mut scores = self.additive_scores();
        scores.sort_by_key(|&(_, score)| score);

        let ranking: Vec<RarityEntry> = scores
            .into_iter()
            .enumerate()
            .map(|(i, (loot_id, score))| RarityEntry {
                loot_id,
                score,
                rarest: i + 1,
            })
            .collect();

        debug!("Ranked {} bags by additive score", ranking.len());
        ranking
    }

    /// Sorted by the raw joint probability first; the `|ln P|` transform is
    /// applied to the already ordered entries.
    pub fn probability_ranking(&self) -> Vec<ProbabilityEntry> {
        let population = self.loot.len() as f64;
        let mut probabilities: Vec<(u32, f64)> = self
            .loot
            .bags()
            .iter()
            .map(|bag| (bag.id, joint_probability(bag, self.occurrences, population)))
            .collect();

        probabilities.sort_by(|a, b| a.1.total_cmp(&b.1));

        let ranking: Vec<ProbabilityEntry> = probabilities
            .into_iter()
            .enumerate()
            .map(|(i, (loot_id, probability))| ProbabilityEntry {
                loot_id,
                score: probability.ln().abs(),
                rarest: i + 1,
            })
            .collect();

        debug!("Ranked {} bags by joint probability", ranking.len());
        ranking
    }

    /// Classifier item score merged onto the additive scores. The ranking
    /// still orders by the additive `score`; `item_score` rides along.
    pub fn item_score_ranking(&self, classifier: &ItemClassifier) -> Vec<ItemScoreEntry> {
        let mut entries: Vec<ItemScoreEntry> = self
            .additive_scores()
            .into_iter()
            .zip(self.loot.bags())
            .map(|((loot_id, score), bag)| ItemScoreEntry {
                loot_id,
                score,
                item_score: item_score(bag, classifier),
                rarest: 0,
            })
            .collect();

        entries.sort_by_key(|entry| entry.score);
        for (i, entry) in entries.iter_mut().enumerate() {
            entry.rarest = i + 1;
        }

        debug!("Ranked {} bags with merged item scores", entries.len());
        entries
    }
}

pub fn additive_score(bag: &Bag, occurrences: &OccurrenceMap) -> u64 {
    bag.items()
        .map(|(_, item)| occurrences.count_of(item) as u64)
        .sum()
}

/// Product of per-slot probabilities under an independence assumption.
/// A bag without slots is the empty product, 1.
pub fn joint_probability(bag: &Bag, occurrences: &OccurrenceMap, population: f64) -> f64 {
    bag.items()
        .map(|(_, item)| occurrences.count_of(item) as f64 / population)
        .product()
}

pub fn item_score(bag: &Bag, classifier: &ItemClassifier) -> u32 {
    bag.items()
        .map(|(_, item)| classifier.classify(item).score)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ItemParts, Slot};

    fn abb_loot() -> LootSet {
        LootSet::new(vec![
            Bag::new(1).with_item(Slot::Clothes, "A"),
            Bag::new(2).with_item(Slot::Clothes, "A"),
            Bag::new(3).with_item(Slot::Clothes, "B"),
        ])
        .unwrap()
    }

    fn assert_permutation(mut ranks: Vec<usize>) {
        let n = ranks.len();
        ranks.sort_unstable();
        assert_eq!(ranks, (1..=n).collect::<Vec<_>>());
    }

    #[test]
    fn test_additive_ranking_end_to_end() {
        let loot = abb_loot();
        let occurrences = OccurrenceMap::count(&loot);
        let ranking = ScoringEngine::new(&loot, &occurrences).additive_ranking();

        let rows: Vec<_> = ranking.iter().map(|e| (e.loot_id, e.score, e.rarest)).collect();
        assert_eq!(rows, vec![(3, 1, 1), (1, 2, 2), (2, 2, 3)]);
    }

    #[test]
    fn test_additive_score_sums_counts() {
        let loot = LootSet::new(vec![
            Bag::new(1)
                .with_item(Slot::Clothes, "Bikini")
                .with_item(Slot::Weapon, "Uzi"),
            Bag::new(2)
                .with_item(Slot::Clothes, "Bikini")
                .with_item(Slot::Weapon, "Glock"),
        ])
        .unwrap();
        let occurrences = OccurrenceMap::count(&loot);

        assert_eq!(additive_score(&loot.bags()[0], &occurrences), 3);
        assert_eq!(additive_score(&loot.bags()[1], &occurrences), 3);
    }

    #[test]
    fn test_probability_ranking_orders_by_raw_probability() {
        let loot = abb_loot();
        let occurrences = OccurrenceMap::count(&loot);
        let ranking = ScoringEngine::new(&loot, &occurrences).probability_ranking();

        assert_eq!(ranking[0].loot_id, 3);
        assert!((ranking[0].score - (3.0f64).ln()).abs() < 1e-12);
        assert_eq!(ranking[1].loot_id, 1);
        assert_eq!(ranking[2].loot_id, 2);
        assert!((ranking[1].score - (1.5f64).ln()).abs() < 1e-12);
        assert!(ranking[0].score > ranking[1].score);
        assert_permutation(ranking.iter().map(|e| e.rarest).collect());
    }

    #[test]
    fn test_probability_multiplies_slots() {
        let loot = LootSet::new(vec![
            Bag::new(1)
                .with_item(Slot::Clothes, "A")
                .with_item(Slot::Weapon, "X"),
            Bag::new(2)
                .with_item(Slot::Clothes, "A")
                .with_item(Slot::Weapon, "Y"),
        ])
        .unwrap();
        let occurrences = OccurrenceMap::count(&loot);
        let p = joint_probability(&loot.bags()[0], &occurrences, 2.0);
        assert!((p - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_empty_bag_has_probability_one() {
        let loot = LootSet::new(vec![Bag::new(1), Bag::new(2).with_item(Slot::Ring, "Gold Ring")])
            .unwrap();
        let occurrences = OccurrenceMap::count(&loot);
        let ranking = ScoringEngine::new(&loot, &occurrences).probability_ranking();

        let empty = ranking.iter().find(|e| e.loot_id == 1).unwrap();
        assert_eq!(empty.score, 0.0);
        assert!(ranking.iter().all(|e| e.score.is_finite()));
    }

    #[test]
    fn test_item_score_ranking_keeps_additive_order() {
        let parts = ItemParts {
            weapons: vec!["Uzi".to_string()],
            suffixes: vec!["from Compton".to_string()],
            ..ItemParts::default()
        };
        let classifier = ItemClassifier::new(&parts);
        let loot = LootSet::new(vec![
            Bag::new(1).with_item(Slot::Weapon, "Uzi"),
            Bag::new(2).with_item(Slot::Weapon, "Uzi"),
            Bag::new(3).with_item(Slot::Weapon, "\"Big Sin\" Uzi from Compton +1"),
        ])
        .unwrap();
        let occurrences = OccurrenceMap::count(&loot);
        let engine = ScoringEngine::new(&loot, &occurrences);
        let ranking = engine.item_score_ranking(&classifier);

        let rows: Vec<_> = ranking
            .iter()
            .map(|e| (e.loot_id, e.score, e.item_score, e.rarest))
            .collect();
        assert_eq!(rows, vec![(3, 1, 4, 1), (1, 2, 1, 2), (2, 2, 1, 3)]);

        let additive: Vec<_> = engine.additive_ranking().iter().map(|e| e.loot_id).collect();
        let merged: Vec<_> = ranking.iter().map(|e| e.loot_id).collect();
        assert_eq!(additive, merged);
    }
}
