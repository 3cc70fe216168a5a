mod collector;
mod loot_api;

pub use collector::LootCollector;
pub use loot_api::{
    fetch_with_retry,
    LootApiClient,
    LootSource,
};
