pub mod analyzer;
pub mod config;
pub mod errors;
pub mod fetcher;
pub mod models;
pub mod report;
pub mod storage;

pub use errors::{RarityError, Result};
