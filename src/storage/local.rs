//! Local filesystem storage implementation.
//!
//! One `{key}.json` file per key under a root directory. Writes go to a
//! temporary file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};
use crate::storage::{KeyValueStore, check_key};

/// Local filesystem storage backend.
#[derive(Debug, Clone)]
pub struct LocalStorage {
    root_dir: PathBuf,
}

impl LocalStorage {
    /// Create a new LocalStorage rooted at the given directory.
    ///
    /// The directory is created lazily on first write.
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root_dir
    }

    /// Get the full path for a key.
    fn path(&self, key: &str) -> PathBuf {
        self.root_dir.join(format!("{key}.json"))
    }

    /// Write bytes atomically (write to temp, then rename).
    fn write_bytes(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        fs::create_dir_all(&self.root_dir)?;

        let tmp = path.with_extension("json.tmp");
        let mut file = fs::File::create(&tmp)?;
        file.write_all(bytes)?;
        file.sync_all()?;
        drop(file);

        fs::rename(&tmp, path)?;
        Ok(())
    }
}

impl KeyValueStore for LocalStorage {
    fn read(&self, key: &str) -> Result<Option<String>> {
        check_key(key)?;
        match fs::read_to_string(self.path(key)) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(AppError::Io(e)),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        check_key(key)?;
        let path = self.path(key);
        self.write_bytes(&path, value.as_bytes())?;
        log::debug!("Wrote {} bytes to {}", value.len(), path.display());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        check_key(key)?;
        match fs::remove_file(self.path(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AppError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_and_read() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write("favorites", "[1,2,3]").unwrap();
        assert_eq!(
            storage.read("favorites").unwrap(),
            Some("[1,2,3]".to_string())
        );
        assert!(tmp.path().join("favorites.json").exists());
        assert!(!tmp.path().join("favorites.json.tmp").exists());
    }

    #[test]
    fn test_read_nonexistent() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.read("nope").unwrap().is_none());
    }

    #[test]
    fn test_creates_missing_root() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path().join("nested/lists"));

        storage.write("compare", "[]").unwrap();
        assert_eq!(storage.read("compare").unwrap(), Some("[]".to_string()));
    }

    #[test]
    fn test_overwrite_and_remove() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        storage.write("compare", "[1]").unwrap();
        storage.write("compare", "[1,2]").unwrap();
        assert_eq!(storage.read("compare").unwrap(), Some("[1,2]".to_string()));

        storage.remove("compare").unwrap();
        storage.remove("compare").unwrap();
        assert!(storage.read("compare").unwrap().is_none());
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let tmp = TempDir::new().unwrap();
        let storage = LocalStorage::new(tmp.path());

        assert!(storage.write("../escape", "[]").is_err());
        assert!(storage.read("a/b").is_err());
    }

    #[test]
    fn test_unreadable_root_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("not-a-dir");
        std::fs::write(&file, "x").unwrap();
        let storage = LocalStorage::new(&file);

        assert!(storage.write("favorites", "[1]").is_err());
    }
}
