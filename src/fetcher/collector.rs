use tracing::info;

use super::loot_api::{fetch_with_retry, LootSource};
use crate::errors::Result;
use crate::models::LootSet;
use crate::storage::Database;

/// Walks bag ids `1..=count`, checkpointing every bag in the database.
pub struct LootCollector<'a, S: LootSource> {
    source: S,
    database: &'a Database,
}

impl<'a, S: LootSource> LootCollector<'a, S> {
    pub fn new(source: S, database: &'a Database) -> Self {
        Self { source, database }
    }

    pub async fn collect(&mut self, count: u32) -> Result<LootSet> {
        let fetched = self.database.fetched_ids().await?;
        let pending = (1..=count).filter(|id| !fetched.contains(id)).count();
        info!("{} of {} bags already fetched, {} to go", count as usize - pending, count, pending);

        for id in (1..=count).filter(|id| !fetched.contains(id)) {
            info!("Collecting: {}", id);
            let bag = fetch_with_retry(&mut self.source, id).await?;
            self.database.store_bag(&bag).await?;
        }

        self.database.load_loot(count).await
    }
}
