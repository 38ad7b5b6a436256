//! Key-value preference storage.
//!
//! The settings service is the only consumer. Values are stored as text and
//! typed on the way in and out by the caller.

mod memory;
mod sqlite;

pub use memory::MemoryPreferenceStore;
pub use sqlite::SqlitePreferenceStore;

use anyhow::Result;

/// Backing store for persisted preferences.
///
/// Methods take `&self`; the application only ever touches a store from the
/// UI thread.
#[cfg_attr(test, mockall::automock)]
pub trait PreferenceStore {
    /// Returns the raw value for `key`, or `None` when it was never written.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Inserts or replaces the value for `key`.
    fn put(&self, key: &str, value: &str) -> Result<()>;

    fn put_int(&self, key: &str, value: i32) -> Result<()> {
        self.put(key, &value.to_string())
    }

    fn put_bool(&self, key: &str, value: bool) -> Result<()> {
        self.put(key, if value { "true" } else { "false" })
    }
}
