//! `cartable` - A searchable, paginated car inventory table
//!
//! This library provides the car table view-model: search filtering,
//! pagination, the add/edit/delete protocol, and whole-snapshot persistence
//! to a local `SQLite` store seeded once from a remote endpoint.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod car;
pub mod cli;
pub mod config;
pub mod error;
pub mod inventory;
pub mod logging;
pub mod modal;
pub mod pagination;
pub mod render;
pub mod search;
pub mod seed;
pub mod storage;
pub mod store;
pub mod table;
pub mod tui;

pub use car::{Car, FieldValue};
pub use config::Config;
pub use error::{Error, Result};
pub use logging::init_logging;
pub use modal::{FormField, ModalState, RowAction};
pub use pagination::Pager;
pub use seed::{HttpSeed, SeedSource};
pub use storage::{Storage, StorageStats};
pub use store::{CarStore, MemoryStore, SnapshotStore};
pub use table::{CarTable, Mutation, Origin};
