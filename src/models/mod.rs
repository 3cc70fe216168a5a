pub mod classified_item;
pub mod item_parts;
pub mod loot;
pub mod rarity;

pub use classified_item::ClassifiedItem;

pub use item_parts::{
    Category,
    ItemParts,
    PartPattern,
    CLASSIFY_PRIORITY,
};

pub use loot::{
    Bag,
    LootEntry,
    LootSet,
    Slot,
};

pub use rarity::{
    ItemScoreEntry,
    ProbabilityEntry,
    RarityEntry,
};
