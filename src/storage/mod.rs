pub mod database;
pub mod documents;

pub use database::Database;
