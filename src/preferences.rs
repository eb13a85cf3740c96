//! Small key-value facade over the persisted user preferences.
//!
//! Navigation reads its preferences once when it is created and writes them
//! back when it is dropped. Tests inject [`MemoryPreferences`]; the viewer
//! binary uses [`JsonFilePreferences`].

use std::cell::RefCell;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::error::PreferenceError;

pub const MOUSE_SENSITIVITY_KEY: &str = "Navigation/mouseSensitivity";

pub trait PreferenceStore {
    fn int(&self, key: &str) -> Option<i64>;

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PreferenceError>;
}

/// In-memory store. Clones share the same map, so a test can keep a handle
/// and inspect what was written after the store was handed away.
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: Rc<RefCell<HashMap<String, i64>>>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_int(self, key: &str, value: i64) -> Self {
        self.values.borrow_mut().insert(key.to_owned(), value);
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn int(&self, key: &str) -> Option<i64> {
        self.values.borrow().get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PreferenceError> {
        self.values.borrow_mut().insert(key.to_owned(), value);
        Ok(())
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
struct PreferenceDocument {
    values: BTreeMap<String, i64>,
}

/// Preferences kept as a flat JSON object in a file. Every write rewrites
/// the whole file.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    document: PreferenceDocument,
}

impl JsonFilePreferences {
    /// Opens the store at `path`. A missing file is an empty store.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, PreferenceError> {
        let path = path.into();
        let document = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text).map_err(|source| PreferenceError::Parse {
                path: path.clone(),
                source,
            })?,
            Err(err) if err.kind() == ErrorKind::NotFound => PreferenceDocument::default(),
            Err(source) => return Err(PreferenceError::Io { path, source }),
        };

        Ok(Self { path, document })
    }

    /// An empty store that will be written to `path`.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            document: PreferenceDocument::default(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<(), PreferenceError> {
        let text = serde_json::to_string_pretty(&self.document).map_err(|source| {
            PreferenceError::Serialize {
                path: self.path.clone(),
                source,
            }
        })?;
        fs::write(&self.path, text).map_err(|source| PreferenceError::Io {
            path: self.path.clone(),
            source,
        })
    }
}

impl PreferenceStore for JsonFilePreferences {
    fn int(&self, key: &str) -> Option<i64> {
        self.document.values.get(key).copied()
    }

    fn set_int(&mut self, key: &str, value: i64) -> Result<(), PreferenceError> {
        self.document.values.insert(key.to_owned(), value);
        self.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_values() {
        let handle = MemoryPreferences::new();
        let mut store = handle.clone();
        store.set_int(MOUSE_SENSITIVITY_KEY, 42).unwrap();
        assert_eq!(handle.int(MOUSE_SENSITIVITY_KEY), Some(42));
        assert_eq!(handle.int("missing"), None);
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFilePreferences::open(dir.path().join("prefs.json")).unwrap();
        assert_eq!(store.int(MOUSE_SENSITIVITY_KEY), None);
    }

    #[test]
    fn file_round_trips_through_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");

        let mut store = JsonFilePreferences::open(&path).unwrap();
        store.set_int(MOUSE_SENSITIVITY_KEY, -37).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Navigation/mouseSensitivity"));

        let reopened = JsonFilePreferences::open(&path).unwrap();
        assert_eq!(reopened.int(MOUSE_SENSITIVITY_KEY), Some(-37));
    }

    #[test]
    fn malformed_file_is_a_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prefs.json");
        fs::write(&path, "{ not json").unwrap();

        let err = JsonFilePreferences::open(&path).unwrap_err();
        assert!(matches!(err, PreferenceError::Parse { .. }));
        assert!(err.to_string().contains("prefs.json"));
    }

    #[test]
    fn unwritable_path_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFilePreferences::empty(dir.path().join("missing").join("prefs.json"));
        let err = store.set_int(MOUSE_SENSITIVITY_KEY, 1).unwrap_err();
        assert!(matches!(err, PreferenceError::Io { .. }));
    }
}
