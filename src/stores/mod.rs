//! Contains the key-value store trait and its implementations.
//!
//! The expense store keeps everything it persists in a handful of string
//! slots, so any backend that can get and set a string by key will do.

mod key_value;
mod sqlite;

pub use key_value::{KeyValueStore, MemoryKeyValueStore};
pub use sqlite::SQLiteKeyValueStore;
