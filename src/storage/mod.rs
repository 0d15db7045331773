//! Client-side key/value persistence
//!
//! The session token and the branding logo live outside any single component.
//! They are kept behind the [`KeyValueStore`] trait and injected where needed, so
//! tests can swap the on-disk store for [`MemoryStore`].

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use crate::core::error::Result;

/// Plain string key/value storage with no schema versioning.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;

    /// Drop every entry.
    fn clear(&self) -> Result<()>;
}
