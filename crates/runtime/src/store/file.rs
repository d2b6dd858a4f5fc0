//! File-based ConfigStore implementation.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::{ConfigStore, Result, StoreError};

/// File-based implementation of [`ConfigStore`].
///
/// Each group is stored as `{group}.json`, a single JSON object mapping
/// key to value. Writes go through a temp file and an atomic rename so a
/// crash mid-write never leaves a truncated group file behind.
pub struct FileConfigStore {
    base_dir: PathBuf,
}

impl FileConfigStore {
    /// Create a new file-based store rooted at `base_dir`.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir).map_err(StoreError::Io)?;
        Ok(Self { base_dir })
    }

    fn group_path(&self, group: &str) -> PathBuf {
        self.base_dir.join(format!("{group}.json"))
    }

    fn read_group(&self, group: &str) -> Result<BTreeMap<String, String>> {
        let path = self.group_path(group);
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let text = fs::read_to_string(&path).map_err(StoreError::Io)?;
        serde_json::from_str(&text).map_err(|e| StoreError::Json(e.to_string()))
    }

    fn write_group(&self, group: &str, entries: &BTreeMap<String, String>) -> Result<()> {
        let path = self.group_path(group);
        let temp_path = path.with_extension("json.tmp");

        let text =
            serde_json::to_string_pretty(entries).map_err(|e| StoreError::Json(e.to_string()))?;
        fs::write(&temp_path, text).map_err(StoreError::Io)?;
        fs::rename(&temp_path, &path).map_err(StoreError::Io)?;

        tracing::debug!("saved {} entries to {}", entries.len(), path.display());
        Ok(())
    }
}

impl ConfigStore for FileConfigStore {
    fn get(&self, group: &str, key: &str) -> Result<Option<String>> {
        Ok(self.read_group(group)?.get(key).cloned())
    }

    fn set(&self, group: &str, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_group(group)?;
        entries.insert(key.to_owned(), value.to_owned());
        self.write_group(group, &entries)
    }

    fn unset(&self, group: &str, key: &str) -> Result<()> {
        let mut entries = self.read_group(group)?;
        if entries.remove(key).is_some() {
            self.write_group(group, &entries)?;
        }
        Ok(())
    }
}
