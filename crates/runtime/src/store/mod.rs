//! Flat key/value configuration storage.
//!
//! The shadow blob and the manual slot entries are stored as plain
//! strings scoped by a group identifier; the blob format is opaque to
//! the store. Implementations must be safe to call from the processing
//! thread while readers exist elsewhere.

mod file;
mod memory;

pub use file::FileConfigStore;
pub use memory::InMemoryConfigStore;

use thiserror::Error;

/// Errors surfaced by configuration store implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("config store lock was poisoned")]
    LockPoisoned,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(String),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Flat string key/value store scoped by a group identifier.
pub trait ConfigStore: Send + Sync {
    /// Read a value; `Ok(None)` when the key was never set or was unset.
    fn get(&self, group: &str, key: &str) -> Result<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, group: &str, key: &str, value: &str) -> Result<()>;

    /// Remove a key entirely. Removing an absent key is not an error.
    fn unset(&self, group: &str, key: &str) -> Result<()>;
}
