//! File-backed storage: one `<key>.json` file per key in a directory.
//!
//! Writes go to `<key>.json.tmp` first and are renamed into place, so a
//! crash mid-write leaves the previous value intact.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::SessionStorage;
use crate::error::{StorageError, StorageResult};

#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    /// Uses `dir` for storage; it is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileStorage { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

fn io_error(key: &str, source: std::io::Error) -> StorageError {
    StorageError::Io {
        key: key.to_string(),
        source,
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(key, e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| io_error(key, e))?;

        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value).map_err(|e| io_error(key, e))?;
        fs::rename(&tmp, &path).map_err(|e| io_error(key, e))?;

        debug!(?path, "session file written");
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        match fs::remove_file(self.path_for(key)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("nested"));

        assert_eq!(storage.get("CUSTOMER_SESSION").unwrap(), None);

        storage.set("CUSTOMER_SESSION", r#"{"uid":"A"}"#).unwrap();
        assert_eq!(
            storage.get("CUSTOMER_SESSION").unwrap().as_deref(),
            Some(r#"{"uid":"A"}"#)
        );
        assert!(dir.path().join("nested/CUSTOMER_SESSION.json").exists());
        assert!(!dir.path().join("nested/CUSTOMER_SESSION.json.tmp").exists());

        storage.remove("CUSTOMER_SESSION").unwrap();
        assert_eq!(storage.get("CUSTOMER_SESSION").unwrap(), None);
    }

    #[test]
    fn test_remove_absent_key_is_ok() {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        assert!(storage.remove("missing").is_ok());
    }

    #[test]
    fn test_values_survive_new_instance() {
        let dir = tempfile::tempdir().unwrap();
        FileStorage::new(dir.path()).set("k", "v").unwrap();
        assert_eq!(FileStorage::new(dir.path()).get("k").unwrap().as_deref(), Some("v"));
    }
}
