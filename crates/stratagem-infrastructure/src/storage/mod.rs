//! Key-value storage backends for persisted records.

pub mod atomic_file;
pub mod file_store;
pub mod key_value;
pub mod memory_store;

pub use file_store::FileKeyValueStore;
pub use key_value::KeyValueStore;
pub use memory_store::InMemoryKeyValueStore;
