//! Key-value persistence for client-side lists.
//!
//! Each key maps to one JSON document. Reads and writes are synchronous so
//! a mutation is durable by the time the call returns.
//!
//! ## Directory Structure
//!
//! ```text
//! storage/
//! ├── terrytownrv-favorites.json   # [412, 97, 1033]
//! └── terrytownrv-compare.json     # [97, 1033]
//! ```

pub mod local;
pub mod memory;

use crate::error::{AppError, Result};

// Re-export for convenience
pub use local::LocalStorage;
pub use memory::MemoryStorage;

/// A simple key to JSON-string store with atomic single-key writes.
pub trait KeyValueStore: Send + Sync {
    /// Read the raw value for `key`, `None` if it was never written.
    fn read(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value for `key`.
    fn write(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Keys become file names, so keep them to a safe alphabet.
pub(crate) fn check_key(key: &str) -> Result<()> {
    let valid = !key.is_empty()
        && !key.starts_with('.')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));

    if valid {
        Ok(())
    } else {
        Err(AppError::validation(format!("invalid storage key '{key}'")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_key() {
        assert!(check_key("terrytownrv-favorites").is_ok());
        assert!(check_key("lists_v2.compare").is_ok());
        assert!(check_key("").is_err());
        assert!(check_key("../etc/passwd").is_err());
        assert!(check_key(".hidden").is_err());
        assert!(check_key("a/b").is_err());
    }
}
