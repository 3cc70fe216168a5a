use std::path::PathBuf;

use crate::storage::database::DEFAULT_DATABASE_URL;

pub const DEFAULT_DATA_DIR: &str = "output";
pub const DEFAULT_PARTS_FILE: &str = "data/item-parts.json";
pub const DEFAULT_BAG_COUNT: u32 = 8000;
pub const LOOT_FILE: &str = "loot.json";

/// Paths and endpoints shared by every command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_dir: PathBuf,
    pub parts_file: PathBuf,
    pub database_url: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            parts_file: PathBuf::from(DEFAULT_PARTS_FILE),
            database_url: DEFAULT_DATABASE_URL.to_string(),
        }
    }
}

impl Config {
    /// The retrieved snapshot, input to `analyze`.
    pub fn loot_file(&self) -> PathBuf {
        self.data_dir.join(LOOT_FILE)
    }
}
