use sqlx::{migrate::MigrateDatabase, sqlite::SqlitePool, Row, Sqlite};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

use crate::errors::Result;
use crate::models::{Bag, LootSet, Slot};

pub const DEFAULT_DATABASE_URL: &str = "sqlite:loot_bags.db";

/// Checkpoint of fetched bags, so an interrupted fetch resumes where it
/// stopped instead of starting over.
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn initialize(database_url: &str) -> Result<Self> {
        if !Sqlite::database_exists(database_url).await? {
            info!("Creating new database at {}", database_url);
            Sqlite::create_database(database_url).await?;
        }

        let pool = SqlitePool::connect(database_url).await?;

        info!("Running database migrations...");
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Replaces whatever was stored for this bag.
    pub async fn store_bag(&self, bag: &Bag) -> Result<()> {
        let mut tx = self.pool.begin().await?;
        let bag_id = bag.id as i64;

        sqlx::query(
            "INSERT OR REPLACE INTO fetched_bags (bag_id, fetched_at) VALUES (?, datetime('now'))",
        )
        .bind(bag_id)
        .execute(&mut *tx)
        .await?;

        sqlx::query("DELETE FROM bag_items WHERE bag_id = ?")
            .bind(bag_id)
            .execute(&mut *tx)
            .await?;

        for (slot, item) in bag.items() {
            sqlx::query(
                r#"
                INSERT INTO bag_items (bag_id, slot, item, fetched_at)
                VALUES (?, ?, ?, datetime('now'))
                "#,
            )
            .bind(bag_id)
            .bind(slot.as_str())
            .bind(item)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    pub async fn fetched_ids(&self) -> Result<BTreeSet<u32>> {
        let rows = sqlx::query("SELECT bag_id FROM fetched_bags")
            .fetch_all(&self.pool)
            .await?;

        rows.iter()
            .map(|row| -> Result<u32> { Ok(row.try_get::<i64, _>("bag_id")? as u32) })
            .collect()
    }

    /// Bags `1..=count`. Fails validation if any id in the range is missing.
    pub async fn load_loot(&self, count: u32) -> Result<LootSet> {
        let ids = sqlx::query("SELECT bag_id FROM fetched_bags WHERE bag_id <= ? ORDER BY bag_id")
            .bind(count as i64)
            .fetch_all(&self.pool)
            .await?;

        let mut bags: BTreeMap<u32, Bag> = BTreeMap::new();
        for row in &ids {
            let id = row.try_get::<i64, _>("bag_id")? as u32;
            bags.insert(id, Bag::new(id));
        }

        let rows = sqlx::query("SELECT bag_id, slot, item FROM bag_items WHERE bag_id <= ?")
            .bind(count as i64)
            .fetch_all(&self.pool)
            .await?;

        for row in &rows {
            let id = row.try_get::<i64, _>("bag_id")? as u32;
            let slot: Slot = row.try_get::<String, _>("slot")?.parse()?;
            let item: String = row.try_get("item")?;
            if let Some(bag) = bags.get_mut(&id) {
                bag.slots.insert(slot, item);
            }
        }

        LootSet::new(bags.into_values().collect())
    }
}
