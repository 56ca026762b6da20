use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::super::domain::ApplicationDraft;

/// Local, best-effort storage for unsubmitted drafts keyed by portal.
pub trait DraftStore: Send + Sync {
    fn load(&self, key: &str) -> Result<Option<ApplicationDraft>, PersistenceError>;
    fn save(&self, key: &str, draft: &ApplicationDraft) -> Result<(), PersistenceError>;
    fn clear(&self, key: &str) -> Result<(), PersistenceError>;
}

/// Draft store failure; callers treat it as recoverable.
#[derive(Debug, thiserror::Error)]
pub enum PersistenceError {
    #[error("invalid draft key '{0}'")]
    InvalidKey(String),
    #[error("failed to access draft '{key}' at {path}: {source}")]
    Io {
        key: String,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("stored draft '{key}' is not valid JSON: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("draft store unavailable: {0}")]
    Unavailable(String),
}

fn check_key(key: &str) -> Result<(), PersistenceError> {
    let valid = !key.is_empty()
        && key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '-');
    if valid {
        Ok(())
    } else {
        Err(PersistenceError::InvalidKey(key.to_string()))
    }
}

fn encode(key: &str, draft: &ApplicationDraft) -> Result<String, PersistenceError> {
    serde_json::to_string(draft).map_err(|source| PersistenceError::Corrupt {
        key: key.to_string(),
        source,
    })
}

fn decode(key: &str, raw: &str) -> Result<ApplicationDraft, PersistenceError> {
    serde_json::from_str(raw).map_err(|source| PersistenceError::Corrupt {
        key: key.to_string(),
        source,
    })
}

/// Holds serialized drafts in process memory, mirroring browser local storage.
#[derive(Debug, Default)]
pub struct MemoryDraftStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryDraftStore {
    /// Stores a raw payload verbatim, bypassing serialization.
    pub fn insert_raw(&self, key: &str, raw: &str) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), raw.to_string());
    }

    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl DraftStore for MemoryDraftStore {
    fn load(&self, key: &str) -> Result<Option<ApplicationDraft>, PersistenceError> {
        check_key(key)?;
        let raw = self.raw(key);
        raw.map(|raw| decode(key, &raw)).transpose()
    }

    fn save(&self, key: &str, draft: &ApplicationDraft) -> Result<(), PersistenceError> {
        check_key(key)?;
        let raw = encode(key, draft)?;
        self.insert_raw(key, &raw);
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), PersistenceError> {
        check_key(key)?;
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
        Ok(())
    }
}

/// Writes each draft to `<root>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileDraftStore {
    root: PathBuf,
}

impl FileDraftStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        check_key(key)?;
        Ok(self.root.join(format!("{key}.json")))
    }
}

impl DraftStore for FileDraftStore {
    fn load(&self, key: &str) -> Result<Option<ApplicationDraft>, PersistenceError> {
        let path = self.path_for(key)?;
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(PersistenceError::Io {
                    key: key.to_string(),
                    path,
                    source,
                })
            }
        };
        decode(key, &raw).map(Some)
    }

    fn save(&self, key: &str, draft: &ApplicationDraft) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        let raw = encode(key, draft)?;
        let io_error = |path: &Path, source| PersistenceError::Io {
            key: key.to_string(),
            path: path.to_path_buf(),
            source,
        };

        fs::create_dir_all(&self.root).map_err(|source| io_error(&self.root, source))?;
        let staging = path.with_extension("json.tmp");
        fs::write(&staging, raw).map_err(|source| io_error(&staging, source))?;
        fs::rename(&staging, &path).map_err(|source| io_error(&path, source))?;

        debug!(key, path = %path.display(), "draft written");
        Ok(())
    }

    fn clear(&self, key: &str) -> Result<(), PersistenceError> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(PersistenceError::Io {
                key: key.to_string(),
                path,
                source,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::portals::domain::FieldValue;

    fn sample() -> ApplicationDraft {
        ApplicationDraft::new()
            .with("orgName", FieldValue::text("Agnika Tech"))
            .with("teamSize", FieldValue::Number(12.0))
            .with(
                "documents",
                FieldValue::Files(vec!["Pitch deck.pdf".to_string()]),
            )
    }

    #[test]
    fn memory_store_round_trips_and_clears() {
        let store = MemoryDraftStore::default();
        assert_eq!(store.load("samridh_draft").expect("load"), None);

        store.save("samridh_draft", &sample()).expect("save");
        assert_eq!(
            store.load("samridh_draft").expect("load"),
            Some(sample())
        );

        store.clear("samridh_draft").expect("clear");
        assert_eq!(store.load("samridh_draft").expect("load"), None);
    }

    #[test]
    fn memory_store_reports_corrupt_payloads() {
        let store = MemoryDraftStore::default();
        store.insert_raw("genesis_draft", "{not json");
        match store.load("genesis_draft") {
            Err(PersistenceError::Corrupt { key, .. }) => assert_eq!(key, "genesis_draft"),
            other => panic!("expected corrupt draft, got {other:?}"),
        }
    }

    #[test]
    fn rejects_keys_that_escape_the_store() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileDraftStore::new(dir.path());
        assert!(matches!(
            store.save("../outside", &sample()),
            Err(PersistenceError::InvalidKey(_))
        ));
        assert!(matches!(
            MemoryDraftStore::default().load(""),
            Err(PersistenceError::InvalidKey(_))
        ));
    }

    #[test]
    fn file_store_persists_between_instances() {
        let dir = tempfile::tempdir().expect("tempdir");
        let root = dir.path().join("drafts");

        FileDraftStore::new(&root)
            .save("samridh_draft", &sample())
            .expect("save");
        assert!(root.join("samridh_draft.json").exists());

        let reopened = FileDraftStore::new(&root);
        assert_eq!(
            reopened.load("samridh_draft").expect("load"),
            Some(sample())
        );

        reopened.clear("samridh_draft").expect("clear");
        reopened.clear("samridh_draft").expect("clearing twice is fine");
        assert_eq!(reopened.load("samridh_draft").expect("load"), None);
    }

    #[test]
    fn file_store_surfaces_corrupt_files() {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("genesis_draft.json"), "[1, 2").expect("write");
        let store = FileDraftStore::new(dir.path());
        assert!(matches!(
            store.load("genesis_draft"),
            Err(PersistenceError::Corrupt { .. })
        ));
    }
}
