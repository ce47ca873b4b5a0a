// Preference stores: a TOML file on disk and an in-memory map
use crate::application::preferences::{PreferenceError, PreferenceStore};
use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Key-value preferences persisted as a flat TOML table. The whole file
/// is rewritten on every change.
#[derive(Debug)]
pub struct TomlPreferenceStore {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl TomlPreferenceStore {
    /// Open the store at `path`. A missing file is an empty store.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PreferenceError> {
        let path = path.as_ref().to_path_buf();
        let values = match std::fs::read_to_string(&path) {
            Ok(text) => toml::from_str(&text).map_err(|e| PreferenceError::Decode(e.to_string()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        tracing::debug!("Loaded {} preferences from {}", values.len(), path.display());
        Ok(Self { path, values })
    }

    fn flush(&self) -> Result<(), PreferenceError> {
        let text = toml::to_string(&self.values).map_err(|e| PreferenceError::Encode(e.to_string()))?;
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        std::fs::write(&self.path, text)?;
        Ok(())
    }
}

impl PreferenceStore for TomlPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        self.values.insert(key.to_string(), value.to_string());
        self.flush()
    }
}

/// Shared in-memory store; clones see the same values.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferenceStore {
    values: Arc<Mutex<HashMap<String, String>>>,
}

impl PreferenceStore for MemoryPreferenceStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.lock().ok()?.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PreferenceError> {
        let mut values = self
            .values
            .lock()
            .map_err(|e| PreferenceError::Encode(e.to_string()))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::theme::THEME_KEY;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = TomlPreferenceStore::open(dir.path().join("prefs.toml")).unwrap();
        assert_eq!(store.get(THEME_KEY), None);
    }

    #[test]
    fn test_set_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("prefs.toml");
        let mut store = TomlPreferenceStore::open(&path).unwrap();
        store.set(THEME_KEY, "dark").unwrap();

        let reopened = TomlPreferenceStore::open(&path).unwrap();
        assert_eq!(reopened.get(THEME_KEY).as_deref(), Some("dark"));
        assert!(std::fs::read_to_string(&path).unwrap().contains("theme = \"dark\""));
    }

    #[test]
    fn test_corrupt_file_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.toml");
        std::fs::write(&path, "theme = [").unwrap();
        assert!(matches!(
            TomlPreferenceStore::open(&path),
            Err(PreferenceError::Decode(_))
        ));
    }

    #[test]
    fn test_memory_store_is_shared_between_clones() {
        let mut a = MemoryPreferenceStore::default();
        let b = a.clone();
        a.set(THEME_KEY, "light").unwrap();
        assert_eq!(b.get(THEME_KEY).as_deref(), Some("light"));
    }
}
