//! File-backed key-value store: one `<key>.json` file per key.

use super::atomic_file::{FileLock, write_atomic};
use super::key_value::KeyValueStore;
use async_trait::async_trait;
use std::fs;
use std::path::{Path, PathBuf};
use stratagem_core::error::{Result, StratagemError};

/// Stores each record as a file under `root`.
///
/// Writes are atomic (temp file + rename) and serialized across processes with an
/// exclusive lock file per key. Reads take no lock.
#[derive(Debug, Clone)]
pub struct FileKeyValueStore {
    root: PathBuf,
}

impl FileKeyValueStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves the file holding `key`, rejecting keys that could escape `root`.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && !key.starts_with('.')
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
        if !valid {
            return Err(StratagemError::storage(format!(
                "invalid storage key '{key}'"
            )));
        }
        Ok(self.root.join(format!("{key}.json")))
    }

    async fn run_blocking<T, F>(f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce() -> Result<T> + Send + 'static,
    {
        tokio::task::spawn_blocking(f)
            .await
            .map_err(|e| StratagemError::internal(format!("Failed to join task: {}", e)))?
    }
}

fn read_optional(path: &Path) -> Result<Option<String>> {
    match fs::read_to_string(path) {
        Ok(content) => Ok(Some(content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl KeyValueStore for FileKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.path_for(key)?;
        Self::run_blocking(move || read_optional(&path)).await
    }

    async fn set(&self, key: &str, value: String) -> Result<()> {
        let path = self.path_for(key)?;
        Self::run_blocking(move || {
            let _lock = FileLock::acquire(&path)?;
            write_atomic(&path, value.as_bytes())?;
            Ok(())
        })
        .await
    }

    async fn compare_and_swap(
        &self,
        key: &str,
        expected: Option<&str>,
        value: String,
    ) -> Result<bool> {
        let path = self.path_for(key)?;
        let expected = expected.map(str::to_owned);
        Self::run_blocking(move || {
            let _lock = FileLock::acquire(&path)?;
            let current = read_optional(&path)?;
            if current != expected {
                return Ok(false);
            }
            write_atomic(&path, value.as_bytes())?;
            Ok(true)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn get_missing_key_is_none() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());
        assert_eq!(store.get("strategic_reports").await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path().join("storage"));

        store.set("strategic_reports", "[]".into()).await.unwrap();

        assert_eq!(
            store.get("strategic_reports").await.unwrap().as_deref(),
            Some("[]")
        );
        assert!(temp_dir.path().join("storage/strategic_reports.json").exists());
    }

    #[tokio::test]
    async fn compare_and_swap_only_writes_on_match() {
        let temp_dir = TempDir::new().unwrap();
        let store = FileKeyValueStore::new(temp_dir.path());

        assert!(store.compare_and_swap("k", None, "v1".into()).await.unwrap());
        assert!(!store.compare_and_swap("k", None, "v2".into()).await.unwrap());
        assert!(!store.compare_and_swap("k", Some("other"), "v2".into()).await.unwrap());
        assert!(store.compare_and_swap("k", Some("v1"), "v2".into()).await.unwrap());

        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("v2"));
    }

    #[test]
    fn rejects_keys_that_escape_root() {
        let store = FileKeyValueStore::new("/tmp/stratagem");
        for key in ["", "../etc", "a/b", ".hidden", "a\\b"] {
            assert!(store.path_for(key).is_err(), "key {key:?} should be rejected");
        }
        assert!(store.path_for("strategic_reports").is_ok());
    }
}
