use serde::{de::DeserializeOwned, Serialize};
use std::path::Path;
use tracing::debug;

use crate::errors::Result;
use crate::models::{ItemParts, LootEntry, LootSet};

pub async fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    tokio::fs::write(path, json).await?;
    debug!("Saved {}", path.display());
    Ok(())
}

pub async fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = tokio::fs::read_to_string(path).await?;
    let value = serde_json::from_str(&content)?;
    debug!("Loaded {}", path.display());
    Ok(value)
}

pub async fn load_loot(path: &Path) -> Result<LootSet> {
    let entries: Vec<LootEntry> = load_json(path).await?;
    LootSet::from_entries(entries)
}

pub async fn save_loot(path: &Path, loot: &LootSet) -> Result<()> {
    save_json(path, &loot.to_entries()).await
}

pub async fn load_item_parts(path: &Path) -> Result<ItemParts> {
    load_json(path).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Bag, Slot};

    #[tokio::test]
    async fn test_loot_survives_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("loot.json");
        let loot = LootSet::new(vec![
            Bag::new(1).with_item(Slot::Clothes, "Bikini"),
            Bag::new(2).with_item(Slot::Clothes, "Naked"),
        ])
        .unwrap();

        save_loot(&path, &loot).await.unwrap();
        assert_eq!(load_loot(&path).await.unwrap(), loot);
    }

    #[tokio::test]
    async fn test_missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_item_parts(&dir.path().join("missing.json")).await.unwrap_err();
        assert!(matches!(err, crate::errors::RarityError::IoError(_)));
    }

    #[tokio::test]
    async fn test_bundled_item_parts_load() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("data/item-parts.json");
        let parts = load_item_parts(&path).await.unwrap();
        assert_eq!(parts.necklaces.len(), 3);
    }
}
