use thiserror::Error;

use crate::models::Slot;

#[derive(Debug, Error)]
pub enum RarityError {
    #[error("API Error: {0}")]
    ApiError(String),
    #[error("Network Error: {0}")]
    NetworkError(#[from] reqwest::Error),
    #[error("Parse Error: {0}")]
    ParseError(#[from] serde_json::Error),
    #[error("Validation Error: {0}")]
    ValidationError(String),
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Database Error: {0}")]
    DatabaseError(#[from] sqlx::Error),
    #[error("Migration Error: {0}")]
    MigrationError(#[from] sqlx::migrate::MigrateError),
    #[error("Unknown trait {name:?} in {slot} slot")]
    UnknownTrait { slot: Slot, name: String },
}

pub type Result<T> = std::result::Result<T, RarityError>;
