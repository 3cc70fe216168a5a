//! Trait-level rarity.
//!
//! A slot value such as `"Big Sin" Pocket Knife from Compton +1` is made of
//! up to five traits: the name prefix, the name suffix, the part, the place
//! suffix and the "+1" bonus. Each trait is counted across the population
//! and a slot value scores the sum of `N / count` over its traits.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::{debug, warn};

use super::classifier::BONUS_MARKER;
use crate::errors::{RarityError, Result};
use crate::models::{Bag, ItemParts, LootSet, Slot};

/// Parts that are substrings of a longer part only match when the longer
/// part is absent.
pub const PART_EXCLUSIONS: [(&str, &str); 6] = [
    ("Dress Shoes", "Alligator Dress Shoes"),
    ("Leather Gloves", "Studded Leather Gloves"),
    ("Knife", "Pocket Knife"),
    ("Scooter", "Electric Scooter"),
    ("Bike", "Push Bike"),
    ("The Orphan", "The Orphan Maker"),
];

/// Trait scores are kept to four decimal places as integers.
pub const RARITY_SCALE: u128 = 10_000;

const BONUS_SUFFIX: &str = " +1";
const PLACE_SEPARATOR: &str = " from ";
const NAME_SEPARATOR: &str = "\" ";

fn contains_trait(item: &str, anchored: &str, part: &str) -> bool {
    if !item.contains(anchored) {
        return false;
    }
    match PART_EXCLUSIONS.iter().find(|(short, _)| *short == part) {
        Some((_, longer)) => !item.contains(longer),
        None => true,
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotTraitCounts {
    pub parts: BTreeMap<String, u32>,
    pub parts_plus: BTreeMap<String, u32>,
    pub name_prefixes: BTreeMap<String, u32>,
    pub name_suffixes: BTreeMap<String, u32>,
    pub suffixes: BTreeMap<String, u32>,
    pub plus: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraitCounts {
    pub population: u32,
    pub slots: BTreeMap<Slot, SlotTraitCounts>,
}

impl TraitCounts {
    /// Counts traits for every slot filled on at least one bag.
    pub fn count(loot: &LootSet, parts: &ItemParts) -> Self {
        let mut slots = BTreeMap::new();
        let seen: BTreeSet<Slot> = loot
            .bags()
            .iter()
            .flat_map(|bag| bag.slots.keys().copied())
            .collect();

        for slot in seen {
            let items: Vec<&str> = loot.bags().iter().filter_map(|bag| bag.item(slot)).collect();
            slots.insert(slot, count_slot(&items, slot, parts));
        }

        Self {
            population: loot.len() as u32,
            slots,
        }
    }

    /// Trait rarity of one slot value, truncated to `RARITY_SCALE`.
    pub fn rarity(&self, slot: Slot, item: &str) -> Result<u64> {
        let unknown = |name: &str| RarityError::UnknownTrait {
            slot,
            name: name.to_string(),
        };
        let counts = self.slots.get(&slot).ok_or_else(|| unknown(item))?;
        let lookup = |table: &BTreeMap<String, u32>, name: &str| -> Result<u32> {
            match table.get(name) {
                Some(&count) if count > 0 => Ok(count),
                _ => Err(unknown(name)),
            }
        };

        let mut total = Fraction::zero();
        let mut part = item.to_string();

        if part.contains(BONUS_MARKER) {
            part = part.replace(BONUS_SUFFIX, "");
            if counts.plus == 0 {
                return Err(unknown(BONUS_MARKER));
            }
            total.add_inverse(self.population, counts.plus);
        }

        if let Some((head, place)) = part.clone().split_once(PLACE_SEPARATOR) {
            let suffix = format!("from {}", place);
            total.add_inverse(self.population, lookup(&counts.suffixes, &suffix)?);
            part = head.to_string();
        }

        if part.contains('"') {
            let (name, base) = part
                .split_once(NAME_SEPARATOR)
                .ok_or_else(|| unknown(&part))?;
            let (prefix, name_suffix) = name.rsplit_once(' ').ok_or_else(|| unknown(name))?;
            let prefix = prefix.replace('"', "");
            total.add_inverse(self.population, lookup(&counts.name_prefixes, &prefix)?);
            total.add_inverse(self.population, lookup(&counts.name_suffixes, name_suffix)?);
            part = base.to_string();
        }

        total.add_inverse(self.population, lookup(&counts.parts, &part)?);
        Ok(total.scaled_floor(RARITY_SCALE))
    }
}

fn count_slot(items: &[&str], slot: Slot, parts: &ItemParts) -> SlotTraitCounts {
    let mut counts = SlotTraitCounts::default();

    for part in parts.parts(slot.category()) {
        let matching = items.iter().filter(|item| contains_trait(item, part, part));
        let (mut total, mut plus) = (0, 0);
        for item in matching {
            total += 1;
            if item.contains(BONUS_MARKER) {
                plus += 1;
            }
        }
        counts.parts.insert(part.clone(), total);
        counts.parts_plus.insert(part.clone(), plus);
    }

    let anchored = |table: &mut BTreeMap<String, u32>, names: &[String], anchor: fn(&str) -> String| {
        for name in names {
            let pattern = anchor(name);
            let total = items
                .iter()
                .filter(|item| contains_trait(item, &pattern, name))
                .count();
            table.insert(name.clone(), total as u32);
        }
    };
    anchored(&mut counts.name_prefixes, &parts.name_prefixes, |n| format!("\"{} ", n));
    anchored(&mut counts.name_suffixes, &parts.name_suffixes, |n| format!("{}\"", n));
    anchored(&mut counts.suffixes, &parts.suffixes, str::to_string);

    counts.plus = items.iter().filter(|item| item.contains(BONUS_MARKER)).count() as u32;
    debug!("Counted traits for {} slot", slot);
    counts
}

/// Exact running sum of `population / count` terms.
#[derive(Debug, Clone, Copy)]
struct Fraction {
    numerator: u128,
    denominator: u128,
}

impl Fraction {
    fn zero() -> Self {
        Self {
            numerator: 0,
            denominator: 1,
        }
    }

    fn add_inverse(&mut self, population: u32, count: u32) {
        let (n, d) = (population as u128, count as u128);
        self.numerator = self.numerator * d + n * self.denominator;
        self.denominator *= d;
        let divisor = gcd(self.numerator, self.denominator);
        if divisor > 1 {
            self.numerator /= divisor;
            self.denominator /= divisor;
        }
    }

    fn scaled_floor(&self, scale: u128) -> u64 {
        (self.numerator * scale / self.denominator) as u64
    }
}

fn gcd(mut a: u128, mut b: u128) -> u128 {
    while b != 0 {
        let r = a % b;
        a = b;
        b = r;
    }
    a
}

/// Per-bag trait rarity plus the distinct scores of each slot, highest first.
#[derive(Debug, Clone, Default)]
pub struct TraitRarity {
    per_bag: Vec<BTreeMap<Slot, u64>>,
    ladders: BTreeMap<Slot, Vec<u64>>,
}

impl TraitRarity {
    /// Slot values with a trait missing from `counts` are left out of their
    /// bag's scores.
    pub fn compute(loot: &LootSet, counts: &TraitCounts) -> Self {
        let per_bag: Vec<_> = loot.bags().iter().map(|bag| bag_rarity(bag, counts)).collect();

        let mut distinct: BTreeMap<Slot, BTreeSet<u64>> = BTreeMap::new();
        for scores in &per_bag {
            for (&slot, &score) in scores {
                distinct.entry(slot).or_default().insert(score);
            }
        }
        let ladders = distinct
            .into_iter()
            .map(|(slot, scores)| (slot, scores.into_iter().rev().collect()))
            .collect();

        Self { per_bag, ladders }
    }

    /// Scores of the bag at `index` (bag id minus one).
    pub fn bag(&self, index: usize) -> Option<&BTreeMap<Slot, u64>> {
        self.per_bag.get(index)
    }

    /// 1-based position of `score` among the slot's distinct scores, 1 being
    /// the highest.
    pub fn position(&self, slot: Slot, score: u64) -> Option<usize> {
        let ladder = self.ladders.get(&slot)?;
        ladder.iter().position(|&s| s == score).map(|i| i + 1)
    }
}

fn bag_rarity(bag: &Bag, counts: &TraitCounts) -> BTreeMap<Slot, u64> {
    bag.items()
        .filter_map(|(slot, item)| match counts.rarity(slot, item) {
            Ok(score) => Some((slot, score)),
            Err(e) => {
                warn!("Skipping trait rarity of bag {}: {}", bag.id, e);
                None
            }
        })
        .collect()
}
