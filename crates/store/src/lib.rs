//! `stocktrack-store`
//!
//! **Responsibility:** local persistence for inventory items.
//!
//! This crate provides:
//! - The `ItemDao` gateway trait and its SQLite / in-memory implementations
//! - Change notifications published on every successful write, plus polling
//!   for writes made by other processes sharing the database file
//! - `LiveQuery`, a query result that re-emits whenever the data changes
//! - Database location configuration

pub mod changes;
pub mod config;
pub mod dao;
pub mod error;
pub mod live;
pub mod memory;
pub mod sqlite;

pub use changes::{ChangeBus, ItemChange};
pub use config::{DATABASE_URL_ENV, StoreConfig};
pub use dao::ItemDao;
pub use error::{StoreError, StoreResult};
pub use live::LiveQuery;
pub use memory::InMemoryItemDao;
pub use sqlite::{ExternalWriteWatcher, SqliteItemDao};
