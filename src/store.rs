//! The collection store: `collections.json`.
//!
//! A JSON object mapping collection key to [`Collection`] record, kept in
//! creation order. The whole file is read at startup, edited in memory and
//! written back in full (two-space pretty JSON), so a load followed by a save
//! with no edits reproduces the file byte for byte.
//!
//! ```json
//! {
//!   "final-test": {
//!     "name": "Final Test Collection",
//!     "description": "Testing",
//!     "filename": "final-test.html",
//!     "backgroundImage": "../Artpieces/background.jpg",
//!     "backgroundOverlay": "rgba(64, 0, 109, 0.8)",
//!     "artworks": []
//!   }
//! }
//! ```

use crate::naming::page_filename;
use crate::types::{Artwork, Collection};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to read {path}: {source}")]
    Read { path: PathBuf, source: io::Error },
    #[error("Failed to write {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("Failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("JSON error: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("Collection '{key}' must use filename '{expected}', got '{actual}'")]
    KeyMismatch {
        key: String,
        expected: String,
        actual: String,
    },
    #[error("Collection '{0}' not found")]
    UnknownCollection(String),
}

/// Outcome of [`CollectionStore::append_artworks`].
#[derive(Debug, Default, PartialEq)]
pub struct AppendOutcome {
    pub added: Vec<Artwork>,
    /// Artworks already in the collection, left untouched
    pub skipped: Vec<Artwork>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CollectionStore {
    collections: IndexMap<String, Collection>,
}

impl CollectionStore {
    /// Load the store. A missing file is an empty store; a file that exists
    /// but is not valid JSON is an error naming the file.
    pub fn load(path: &Path) -> Result<Self, StoreError> {
        let content = match std::fs::read_to_string(path) {
            Ok(c) => c,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no collection store yet");
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(StoreError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let store: Self = serde_json::from_str(&content).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), collections = store.len(), "loaded collection store");
        Ok(store)
    }

    /// The full JSON text [`save`](Self::save) writes.
    pub fn to_json(&self) -> Result<String, StoreError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StoreError> {
        let json = self.to_json()?;
        std::fs::write(path, json).map_err(|source| StoreError::Write {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Insert or overwrite the record under `key`.
    ///
    /// Overwriting keeps the collection's position in the listing order.
    pub fn upsert_collection(&mut self, key: &str, record: Collection) -> Result<(), StoreError> {
        let expected = page_filename(key);
        if record.filename != expected {
            return Err(StoreError::KeyMismatch {
                key: key.to_string(),
                expected,
                actual: record.filename,
            });
        }
        self.collections.insert(key.to_string(), record);
        Ok(())
    }

    /// Append artworks to a collection, skipping any whose filename is
    /// already present (including duplicates within `artworks` itself).
    pub fn append_artworks(
        &mut self,
        key: &str,
        artworks: Vec<Artwork>,
    ) -> Result<AppendOutcome, StoreError> {
        let collection = self
            .collections
            .get_mut(key)
            .ok_or_else(|| StoreError::UnknownCollection(key.to_string()))?;

        let mut outcome = AppendOutcome::default();
        for artwork in artworks {
            if collection.contains(&artwork.filename) {
                outcome.skipped.push(artwork);
            } else {
                collection.artworks.push(artwork.clone());
                outcome.added.push(artwork);
            }
        }
        Ok(outcome)
    }

    pub fn get(&self, key: &str) -> Option<&Collection> {
        self.collections.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }

    /// Collections in creation order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Key of the collection at a 1-based listing position.
    pub fn key_at(&self, position: usize) -> Option<&str> {
        position
            .checked_sub(1)
            .and_then(|i| self.collections.get_index(i))
            .map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn collection(key: &str) -> Collection {
        Collection {
            name: format!("{key} name"),
            description: "desc".to_string(),
            filename: page_filename(key),
            background_image: "../Artpieces/background.jpg".to_string(),
            background_overlay: "rgba(64, 0, 109, 0.8)".to_string(),
            artworks: vec![],
        }
    }

    fn artwork(filename: &str) -> Artwork {
        Artwork {
            filename: filename.to_string(),
            title: "T".to_string(),
            description: "D".to_string(),
            price: "$100".to_string(),
            availability: "Available".to_string(),
            image: "Artpieces/t.jpg".to_string(),
        }
    }

    #[test]
    fn missing_file_is_empty_store() {
        let tmp = TempDir::new().unwrap();
        let store = CollectionStore::load(&tmp.path().join("collections.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn invalid_json_names_the_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("collections.json");
        std::fs::write(&path, "{ not json").unwrap();
        let err = CollectionStore::load(&path).unwrap_err();
        assert!(matches!(err, StoreError::Parse { .. }));
        assert!(err.to_string().contains("collections.json"));
    }

    #[test]
    fn save_then_load_is_byte_identical() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("collections.json");
        let mut store = CollectionStore::default();
        store.upsert_collection("b", collection("b")).unwrap();
        store.upsert_collection("a", collection("a")).unwrap();
        store.append_artworks("a", vec![artwork("x.html")]).unwrap();
        store.save(&path).unwrap();

        let first = std::fs::read_to_string(&path).unwrap();
        CollectionStore::load(&path).unwrap().save(&path).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn insertion_order_is_preserved() {
        let mut store = CollectionStore::default();
        for key in ["zeta", "alpha", "mid"] {
            store.upsert_collection(key, collection(key)).unwrap();
        }
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(store.key_at(1), Some("zeta"));
        assert_eq!(store.key_at(3), Some("mid"));
        assert_eq!(store.key_at(0), None);
        assert_eq!(store.key_at(4), None);
    }

    #[test]
    fn upsert_overwrites_in_place() {
        let mut store = CollectionStore::default();
        store.upsert_collection("a", collection("a")).unwrap();
        store.upsert_collection("b", collection("b")).unwrap();
        let mut updated = collection("a");
        updated.description = "new".to_string();
        store.upsert_collection("a", updated).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.key_at(1), Some("a"));
        assert_eq!(store.get("a").unwrap().description, "new");
    }

    #[test]
    fn upsert_rejects_mismatched_filename() {
        let mut store = CollectionStore::default();
        let err = store.upsert_collection("other", collection("a")).unwrap_err();
        assert!(matches!(err, StoreError::KeyMismatch { .. }));
        assert!(store.is_empty());
    }

    #[test]
    fn append_skips_existing_filenames() {
        let mut store = CollectionStore::default();
        store.upsert_collection("a", collection("a")).unwrap();
        store.append_artworks("a", vec![artwork("x.html")]).unwrap();

        let outcome = store
            .append_artworks("a", vec![artwork("x.html"), artwork("y.html"), artwork("y.html")])
            .unwrap();
        assert_eq!(outcome.added.len(), 1);
        assert_eq!(outcome.added[0].filename, "y.html");
        assert_eq!(outcome.skipped.len(), 2);

        let filenames: Vec<_> = store
            .get("a")
            .unwrap()
            .artworks
            .iter()
            .map(|a| a.filename.as_str())
            .collect();
        assert_eq!(filenames, vec!["x.html", "y.html"]);
    }

    #[test]
    fn append_to_unknown_collection_fails() {
        let mut store = CollectionStore::default();
        assert!(matches!(
            store.append_artworks("nope", vec![artwork("x.html")]),
            Err(StoreError::UnknownCollection(_))
        ));
    }

    #[test]
    fn reads_camel_case_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("collections.json");
        std::fs::write(
            &path,
            r#"{
  "final-test": {
    "name": "Final Test Collection",
    "description": "Testing",
    "filename": "final-test.html",
    "backgroundImage": "../Artpieces/background.jpg",
    "backgroundOverlay": "rgba(64, 0, 109, 0.8)",
    "artworks": []
  }
}"#,
        )
        .unwrap();
        let store = CollectionStore::load(&path).unwrap();
        let c = store.get("final-test").unwrap();
        assert_eq!(c.name, "Final Test Collection");
        assert_eq!(c.background_image, "../Artpieces/background.jpg");
        // The hand-formatted file above is exactly what save() emits
        assert_eq!(store.to_json().unwrap(), std::fs::read_to_string(&path).unwrap());
    }
}
