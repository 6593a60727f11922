//! Link store implementations.
//!
//! [`InMemoryLinkStore`] keeps everything in process memory,
//! [`SqliteLinkStore`] and [`MySqlLinkStore`] persist links with sqlx and
//! rely on the database's unique index on `short_code`.

pub mod memory;
pub mod mysql;
mod sql;
pub mod sqlite;

pub use linkhop_core::store::{LinkStore, ReadLinkStore, Result, SchemaBootstrap};
pub use linkhop_core::StorageError;
pub use memory::InMemoryLinkStore;
pub use mysql::MySqlLinkStore;
pub use sqlite::SqliteLinkStore;
