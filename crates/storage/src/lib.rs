#![forbid(unsafe_code)]

pub mod records;
pub mod repository;
pub mod sqlite;

pub use records::{CURRENT_USER_KEY, LEGACY_PROGRESS_KEY, LocalStore, USER_DATA_KEY};
pub use repository::{InMemoryStore, KeyValueStore, Storage, StorageError};
