// SQLite session ledger
// Append-only prompt records; only completion and wait timestamps change after insert

mod db;
mod error;
mod queries;
mod schema;

// Public API
pub use db::Database;
pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
