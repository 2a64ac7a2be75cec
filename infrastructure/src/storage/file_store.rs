//! Directory-backed key-value store.
//!
//! Each key is one `<key>.json` file under the data directory. Writes go to
//! a sibling temp file first and are renamed into place, so a crash mid-write
//! leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;
use worldtale_application::ports::storage::{KeyValueStore, StoreError};

/// [`KeyValueStore`] persisting every key as a JSON file.
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Store rooted at `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, StoreError> {
        if key.is_empty() || key.contains(['/', '\\']) || key.starts_with('.') {
            return Err(StoreError::Backend(format!("invalid storage key: {:?}", key)));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl KeyValueStore for FileStore {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        let path = self.path_for(key)?;
        match fs::read_to_string(&path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key)?;
        fs::create_dir_all(&self.dir)?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;

        debug!("Wrote {} ({} bytes)", path.display(), value.len());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_missing_key_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.read("ai_trpg_characters").unwrap(), None);
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path().join("nested").join("data"));

        store.write("ai_trpg_worldbooks", "[]").unwrap();

        assert_eq!(
            store.read("ai_trpg_worldbooks").unwrap().as_deref(),
            Some("[]")
        );
        assert!(store.dir().join("ai_trpg_worldbooks.json").exists());
        assert!(!store.dir().join("ai_trpg_worldbooks.json.tmp").exists());
    }

    #[test]
    fn test_values_survive_a_new_handle() {
        let dir = tempfile::tempdir().unwrap();
        FileStore::new(dir.path()).write("k", "{\"a\":1}").unwrap();
        let reopened = FileStore::new(dir.path());
        assert_eq!(reopened.read("k").unwrap().as_deref(), Some("{\"a\":1}"));
    }

    #[test]
    fn test_rejects_path_like_keys() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert!(matches!(
            store.write("../escape", "x"),
            Err(StoreError::Backend(_))
        ));
        assert!(store.read("").is_err());
    }
}
