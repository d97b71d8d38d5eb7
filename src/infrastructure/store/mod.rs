// src/infrastructure/store/mod.rs
mod memory;
mod sqlite;

pub use memory::InMemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;
