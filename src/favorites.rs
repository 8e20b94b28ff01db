//! Favorites bookkeeping: the in-memory mapping plus the storage seam the
//! view-model writes through on every toggle.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::path::Path;
use std::rc::Rc;

use rusqlite::Connection;
use tracing::{debug, warn};

use crate::db::{ensure_schema, get_value, set_value};
use crate::error::StorageError;

/// Storage key for the serialized mapping.
pub const FAVORITES_KEY: &str = "karaokeFavorites";

/// Serialized shape: song id to `true`. A missing key means "not favorited".
pub type FavoritesMap = BTreeMap<String, bool>;

/// Where the favorites mapping lives between sessions.
pub trait FavoritesRepository {
    /// Read the whole mapping. An empty mapping is returned when nothing was
    /// stored yet.
    fn get(&self) -> Result<FavoritesMap, StorageError>;

    /// Replace the stored mapping with `favorites`.
    fn set(&mut self, favorites: &FavoritesMap) -> Result<(), StorageError>;
}

/// The set of favorited song ids.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Favorites {
    ids: FavoritesMap,
}

impl Favorites {
    /// Build from a stored mapping, ignoring any entry not marked `true`.
    pub fn from_map(mut map: FavoritesMap) -> Self {
        map.retain(|_, favorited| *favorited);
        Self { ids: map }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.get(id).copied().unwrap_or(false)
    }

    /// Flip `id` and return its new state. Un-favoriting removes the key.
    pub fn toggle(&mut self, id: &str) -> bool {
        if self.ids.remove(id).is_some() {
            false
        } else {
            self.ids.insert(id.to_string(), true);
            true
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_map(&self) -> &FavoritesMap {
        &self.ids
    }
}

/// Favorites stored as JSON in the SQLite key-value table.
pub struct SqliteFavoritesRepository {
    conn: Connection,
}

impl SqliteFavoritesRepository {
    /// Open (and migrate) the database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, StorageError> {
        let conn =
            ensure_schema(db_path).map_err(|err| StorageError::Unavailable(format!("{err:#}")))?;
        Ok(Self { conn })
    }
}

impl FavoritesRepository for SqliteFavoritesRepository {
    fn get(&self) -> Result<FavoritesMap, StorageError> {
        let stored = get_value(&self.conn, FAVORITES_KEY)
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))?;
        match stored {
            Some(json) => {
                let map: FavoritesMap = serde_json::from_str(&json)?;
                debug!(count = map.len(), "favorites loaded");
                Ok(map)
            }
            None => Ok(FavoritesMap::new()),
        }
    }

    fn set(&mut self, favorites: &FavoritesMap) -> Result<(), StorageError> {
        let json = serde_json::to_string(favorites)?;
        set_value(&self.conn, FAVORITES_KEY, &json)
            .map_err(|err| StorageError::Unavailable(format!("{err:#}")))?;
        debug!(count = favorites.len(), "favorites saved");
        Ok(())
    }
}

/// The SQLite repository at `db_path`, or a disabled in-memory one when no
/// data directory is known or the database cannot be opened. The view-model
/// then keeps working without persistence.
pub fn open_repository(db_path: Option<&Path>) -> Box<dyn FavoritesRepository> {
    let Some(db_path) = db_path else {
        warn!("no data directory, favorites will not be saved");
        return Box::new(InMemoryFavoritesRepository::unavailable());
    };
    match SqliteFavoritesRepository::open(db_path) {
        Ok(repo) => Box::new(repo),
        Err(err) => {
            warn!(error = %err, path = %db_path.display(), "favorites storage unavailable");
            Box::new(InMemoryFavoritesRepository::unavailable())
        }
    }
}

/// Process-local repository for tests and for running without a data
/// directory. Clones share the same backing map, so a test can keep a handle
/// after boxing one into the view-model.
#[derive(Debug, Clone, Default)]
pub struct InMemoryFavoritesRepository {
    inner: Rc<RefCell<MemoryState>>,
}

#[derive(Debug, Default)]
struct MemoryState {
    map: FavoritesMap,
    unavailable: bool,
    writes: usize,
}

impl InMemoryFavoritesRepository {
    /// A working repository preloaded with `map`.
    pub fn with_map(map: FavoritesMap) -> Self {
        let repo = Self::default();
        repo.inner.borrow_mut().map = map;
        repo
    }

    /// A repository whose reads and writes always fail.
    pub fn unavailable() -> Self {
        let repo = Self::default();
        repo.inner.borrow_mut().unavailable = true;
        repo
    }

    /// Copy of the mapping as last written.
    pub fn snapshot(&self) -> FavoritesMap {
        self.inner.borrow().map.clone()
    }

    /// Number of successful `set` calls.
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }
}

impl FavoritesRepository for InMemoryFavoritesRepository {
    fn get(&self) -> Result<FavoritesMap, StorageError> {
        let state = self.inner.borrow();
        if state.unavailable {
            return Err(StorageError::Unavailable("in-memory store disabled".into()));
        }
        Ok(state.map.clone())
    }

    fn set(&mut self, favorites: &FavoritesMap) -> Result<(), StorageError> {
        let mut state = self.inner.borrow_mut();
        if state.unavailable {
            return Err(StorageError::Unavailable("in-memory store disabled".into()));
        }
        state.map = favorites.clone();
        state.writes += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_twice_restores_original_state() {
        let mut favorites = Favorites::default();
        assert!(favorites.toggle("a___b"));
        assert!(favorites.contains("a___b"));
        assert!(!favorites.toggle("a___b"));
        assert!(!favorites.contains("a___b"));
        assert!(favorites.is_empty());
    }

    #[test]
    fn false_entries_are_dropped_on_load() {
        let mut map = FavoritesMap::new();
        map.insert("keep".into(), true);
        map.insert("drop".into(), false);
        let favorites = Favorites::from_map(map);
        assert_eq!(favorites.len(), 1);
        assert!(!favorites.contains("drop"));
    }

    #[test]
    fn sqlite_repository_persists_json_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("favorites.sqlite");

        let mut map = FavoritesMap::new();
        map.insert("jolene___dolly_parton".into(), true);
        SqliteFavoritesRepository::open(&path)
            .unwrap()
            .set(&map)
            .unwrap();

        let reopened = SqliteFavoritesRepository::open(&path).unwrap();
        assert_eq!(reopened.get().unwrap(), map);

        let raw = get_value(&reopened.conn, FAVORITES_KEY).unwrap().unwrap();
        assert_eq!(raw, r#"{"jolene___dolly_parton":true}"#);
    }

    #[test]
    fn sqlite_repository_reports_corrupt_json() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteFavoritesRepository::open(&dir.path().join("f.sqlite")).unwrap();
        set_value(&repo.conn, FAVORITES_KEY, "not json").unwrap();
        assert!(matches!(repo.get(), Err(StorageError::Corrupt(_))));
    }

    #[test]
    fn empty_store_reads_as_empty_mapping() {
        let dir = tempfile::tempdir().unwrap();
        let repo = SqliteFavoritesRepository::open(&dir.path().join("f.sqlite")).unwrap();
        assert!(repo.get().unwrap().is_empty());
    }

    #[test]
    fn unusable_location_falls_back_to_disabled_store() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let repo = open_repository(Some(&blocker.join("songbook.sqlite")));
        assert!(matches!(repo.get(), Err(StorageError::Unavailable(_))));

        let repo = open_repository(None);
        assert!(matches!(repo.get(), Err(StorageError::Unavailable(_))));
    }

    #[test]
    fn usable_location_opens_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let repo = open_repository(Some(&dir.path().join("data").join("songbook.sqlite")));
        assert!(repo.get().unwrap().is_empty());
    }

    #[test]
    fn memory_repository_shares_state_between_clones() {
        let repo = InMemoryFavoritesRepository::default();
        let mut handle = repo.clone();
        let mut map = FavoritesMap::new();
        map.insert("x".into(), true);
        handle.set(&map).unwrap();
        assert_eq!(repo.snapshot(), map);
        assert_eq!(repo.writes(), 1);
    }
}
