//! SQLite file behind [`crate::storage::SqliteStorage`].
//!
//! The bookmark tree is one JSON blob in the `kv_store` table; see
//! [`migrations`] for the schema.

pub mod connection;
pub mod migrations;

pub use connection::Database;
