use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use super::item_parts::Category;
use crate::errors::{RarityError, Result};

// Declaration order is the order slots are read from the source and the
// order every per-slot document is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Slot {
    Clothes,
    Foot,
    Hand,
    Neck,
    Ring,
    Waist,
    Weapon,
    Drugs,
    Vehicle,
}

impl Slot {
    pub const ALL: [Slot; 9] = [
        Slot::Clothes,
        Slot::Foot,
        Slot::Hand,
        Slot::Neck,
        Slot::Ring,
        Slot::Waist,
        Slot::Weapon,
        Slot::Drugs,
        Slot::Vehicle,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Slot::Clothes => "clothes",
            Slot::Foot => "foot",
            Slot::Hand => "hand",
            Slot::Neck => "neck",
            Slot::Ring => "ring",
            Slot::Waist => "waist",
            Slot::Weapon => "weapon",
            Slot::Drugs => "drugs",
            Slot::Vehicle => "vehicle",
        }
    }

    /// The item-part category whose entries can appear in this slot.
    pub fn category(&self) -> Category {
        match self {
            Slot::Clothes => Category::Clothes,
            Slot::Foot => Category::FootArmor,
            Slot::Hand => Category::HandArmor,
            Slot::Neck => Category::Necklaces,
            Slot::Ring => Category::Rings,
            Slot::Waist => Category::WaistArmor,
            Slot::Weapon => Category::Weapons,
            Slot::Drugs => Category::Drugs,
            Slot::Vehicle => Category::Vehicle,
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Slot {
    type Err = RarityError;

    fn from_str(s: &str) -> Result<Self> {
        Slot::ALL
            .iter()
            .find(|slot| slot.as_str() == s)
            .copied()
            .ok_or_else(|| RarityError::ValidationError(format!("Unknown slot: {}", s)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bag {
    pub id: u32,
    pub slots: BTreeMap<Slot, String>,
}

impl Bag {
    pub fn new(id: u32) -> Self {
        Self {
            id,
            slots: BTreeMap::new(),
        }
    }

    pub fn with_item(mut self, slot: Slot, item: impl Into<String>) -> Self {
        self.slots.insert(slot, item.into());
        self
    }

    pub fn item(&self, slot: Slot) -> Option<&str> {
        self.slots.get(&slot).map(String::as_str)
    }

    pub fn items(&self) -> impl Iterator<Item = (Slot, &str)> {
        self.slots.iter().map(|(slot, item)| (*slot, item.as_str()))
    }
}

/// One entry of `loot.json`: `{"<id>": {"<slot>": "<item>", ...}}`.
pub type LootEntry = HashMap<String, BTreeMap<Slot, String>>;

/// The complete, immutable snapshot every analysis pass reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LootSet {
    bags: Vec<Bag>,
}

impl LootSet {
    /// Bags must be numbered `1..=N` in order.
    pub fn new(bags: Vec<Bag>) -> Result<Self> {
        for (index, bag) in bags.iter().enumerate() {
            let expected = index as u32 + 1;
            if bag.id != expected {
                return Err(RarityError::ValidationError(format!(
                    "Bag at position {} has id {}, expected {}",
                    index, bag.id, expected
                )));
            }
        }
        Ok(Self { bags })
    }

    pub fn from_entries(entries: Vec<LootEntry>) -> Result<Self> {
        let bags = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| -> Result<Bag> {
                if entry.len() != 1 {
                    return Err(RarityError::ValidationError(format!(
                        "Loot entry {} must hold exactly one bag, found {}",
                        index,
                        entry.len()
                    )));
                }
                let (key, slots) = entry.into_iter().next().ok_or_else(|| {
                    RarityError::ValidationError(format!("Loot entry {} is empty", index))
                })?;
                let id = key.parse::<u32>().map_err(|e| {
                    RarityError::ValidationError(format!("Invalid bag id {:?}: {}", key, e))
                })?;
                Ok(Bag { id, slots })
            })
            .collect::<Result<Vec<_>>>()?;

        Self::new(bags)
    }

    pub fn to_entries(&self) -> Vec<LootEntry> {
        self.bags
            .iter()
            .map(|bag| {
                let mut entry = HashMap::new();
                entry.insert(bag.id.to_string(), bag.slots.clone());
                entry
            })
            .collect()
    }

    pub fn bags(&self) -> &[Bag] {
        &self.bags
    }

    pub fn len(&self) -> usize {
        self.bags.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bags.is_empty()
    }

    pub fn first(&self) -> Option<&Bag> {
        self.bags.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_round_trips_through_str() {
        for slot in Slot::ALL {
            assert_eq!(slot.as_str().parse::<Slot>().unwrap(), slot);
        }
        assert!("hat".parse::<Slot>().is_err());
    }

    #[test]
    fn test_loot_set_from_json_layout() {
        let json = r#"[
            {"1": {"clothes": "Bikini", "weapon": "Pocket Knife"}},
            {"2": {"clothes": "Naked", "weapon": "Uzi"}}
        ]"#;
        let entries: Vec<LootEntry> = serde_json::from_str(json).unwrap();
        let loot = LootSet::from_entries(entries).unwrap();

        assert_eq!(loot.len(), 2);
        assert_eq!(loot.bags()[1].item(Slot::Weapon), Some("Uzi"));
        let slots: Vec<_> = loot.bags()[0].items().map(|(slot, _)| slot).collect();
        assert_eq!(slots, vec![Slot::Clothes, Slot::Weapon]);
    }

    #[test]
    fn test_loot_set_rejects_out_of_order_ids() {
        let bags = vec![Bag::new(1), Bag::new(3)];
        let err = LootSet::new(bags).unwrap_err();
        assert!(matches!(err, RarityError::ValidationError(_)));
    }

    #[test]
    fn test_loot_set_rejects_unknown_slot() {
        let json = r#"[{"1": {"hat": "Fedora"}}]"#;
        assert!(serde_json::from_str::<Vec<LootEntry>>(json).is_err());
    }

    #[test]
    fn test_loot_set_rejects_non_numeric_id() {
        let json = r#"[{"one": {"clothes": "Bikini"}}]"#;
        let entries: Vec<LootEntry> = serde_json::from_str(json).unwrap();
        assert!(LootSet::from_entries(entries).is_err());
    }
}
