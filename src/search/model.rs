use std::cmp::Ordering;
use std::mem;

use tracing::{debug, error, info, warn};

use crate::catalog::{compare_songs, sort_songs, LoadResult};
use crate::error::StorageError;
use crate::favorites::{Favorites, FavoritesRepository};
use crate::models::{SortKey, Song};

use super::state::{derive_visible, page_count, page_slice, ViewState};

/// Lifecycle of the catalog. `Error` can only be reached from `Loading` and
/// is never left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loading,
    Ready,
    Error(String),
}

/// Owns the catalog, the favorites mapping and the current [`ViewState`], and
/// keeps the visible rows in sync with them. Every user operation is ignored
/// until the catalog is `Ready`.
pub struct SearchModel {
    load_state: LoadState,
    catalog: Vec<Song>,
    favorites: Favorites,
    repository: Box<dyn FavoritesRepository>,
    persist: bool,
    state: ViewState,
    visible: Vec<Song>,
    page_size: usize,
}

impl SearchModel {
    /// Start in `Loading` with favorites read from `repository`.
    ///
    /// If storage cannot be reached the model still works, it just stops
    /// writing. Unreadable stored data is discarded but later writes go
    /// through.
    pub fn new(repository: Box<dyn FavoritesRepository>, page_size: usize) -> Self {
        let (favorites, persist) = match repository.get() {
            Ok(map) => (Favorites::from_map(map), true),
            Err(StorageError::Corrupt(err)) => {
                warn!("stored favorites are unreadable, starting empty: {err}");
                (Favorites::default(), true)
            }
            Err(err) => {
                warn!("favorites will not persist across sessions: {err}");
                (Favorites::default(), false)
            }
        };
        debug!(count = favorites.len(), persist, "favorites initialized");

        Self {
            load_state: LoadState::Loading,
            catalog: Vec::new(),
            favorites,
            repository,
            persist,
            state: ViewState::default(),
            visible: Vec::new(),
            page_size,
        }
    }

    /// Start with pagination switched on or off.
    pub fn with_pagination(mut self, paginate: bool) -> Self {
        self.state = mem::take(&mut self.state).with_pagination(paginate);
        self
    }

    /// Apply the single catalog load result. Later calls are ignored.
    pub fn finish_load(&mut self, result: LoadResult) {
        if self.load_state != LoadState::Loading {
            warn!("ignoring catalog result delivered after load completed");
            return;
        }
        match result {
            Ok(songs) => {
                info!(songs = songs.len(), "catalog ready");
                self.catalog = songs;
                self.load_state = LoadState::Ready;
                self.refresh();
            }
            Err(err) => {
                error!("catalog unavailable: {err}");
                self.load_state = LoadState::Error(err.to_string());
            }
        }
    }

    /// Where the single catalog load stands.
    pub fn load_state(&self) -> &LoadState {
        &self.load_state
    }

    pub fn is_ready(&self) -> bool {
        self.load_state == LoadState::Ready
    }

    pub fn catalog(&self) -> &[Song] {
        &self.catalog
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    /// Every row passing the current filter, in display order.
    pub fn visible(&self) -> &[Song] {
        &self.visible
    }

    /// Rows for the current page (all visible rows when pagination is off).
    pub fn page_rows(&self) -> &[Song] {
        page_slice(&self.visible, &self.state, self.page_size)
    }

    /// Current page, 1-based.
    pub fn page(&self) -> usize {
        self.state.page
    }

    pub fn page_count(&self) -> usize {
        page_count(self.visible.len(), self.page_size)
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.favorites.contains(id)
    }

    pub fn has_favorites(&self) -> bool {
        !self.favorites.is_empty()
    }

    pub fn favorites_count(&self) -> usize {
        self.favorites.len()
    }

    /// False once storage proved unreachable at startup.
    pub fn persistence_enabled(&self) -> bool {
        self.persist
    }

    /// The query is too short to search and favorites-only is off.
    pub fn needs_longer_query(&self) -> bool {
        self.state.query_is_short() && !self.state.show_only_favorites
    }

    /// Favorites-only is on but nothing qualifies.
    pub fn show_no_favorites_hint(&self) -> bool {
        self.state.show_only_favorites && self.visible.is_empty()
    }

    /// Replace the query and rebuild the visible rows from the catalog.
    pub fn set_query(&mut self, query: impl Into<String>) {
        if !self.is_ready() {
            return;
        }
        self.state = mem::take(&mut self.state).with_query(query);
        self.refresh();
    }

    /// Reorder the visible rows; membership does not change.
    pub fn set_sort_by(&mut self, sort_by: SortKey) {
        if !self.is_ready() {
            return;
        }
        self.state = mem::take(&mut self.state).with_sort_by(sort_by);
        sort_songs(&mut self.visible, sort_by);
    }

    /// Flip the favorites-only filter and rebuild the visible rows.
    pub fn toggle_favorites_only(&mut self) {
        if !self.is_ready() {
            return;
        }
        let next = !self.state.show_only_favorites;
        self.state = mem::take(&mut self.state).with_favorites_only(next);
        self.refresh();
    }

    /// Flip the favorite marker for `id` and write the whole mapping through
    /// to storage. Returns the new marker, or `None` before the catalog is
    /// ready.
    ///
    /// In favorites-only mode the visible rows are patched directly: an
    /// un-favorited row is removed, a newly favorited one is inserted at its
    /// sorted position if it passes the query.
    pub fn toggle_favorite(&mut self, id: &str) -> Option<bool> {
        if !self.is_ready() {
            return None;
        }
        let favorited = self.favorites.toggle(id);
        debug!(id, favorited, "favorite toggled");
        self.save_favorites();

        if self.state.show_only_favorites {
            if favorited {
                self.insert_visible(id);
            } else {
                self.visible.retain(|song| song.id != id);
            }
            self.clamp_page();
        }
        Some(favorited)
    }

    pub fn toggle_pagination(&mut self) {
        let next = !self.state.paginate;
        self.state = mem::take(&mut self.state).with_pagination(next);
    }

    pub fn set_page(&mut self, page: usize) {
        let count = self.page_count();
        self.state = mem::take(&mut self.state).with_page(page, count);
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page.saturating_add(1));
    }

    pub fn prev_page(&mut self) {
        self.set_page(self.state.page.saturating_sub(1));
    }

    fn refresh(&mut self) {
        self.visible = derive_visible(&self.catalog, &self.favorites, &self.state);
        self.clamp_page();
    }

    fn clamp_page(&mut self) {
        self.set_page(self.state.page);
    }

    fn insert_visible(&mut self, id: &str) {
        let needle = self.state.needle();
        let key = self.state.sort_by;
        let additions: Vec<Song> = self
            .catalog
            .iter()
            .filter(|song| song.id == id)
            .filter(|song| self.state.admits(song, &self.favorites, needle.as_deref()))
            .cloned()
            .collect();
        for song in additions {
            let at = self
                .visible
                .partition_point(|row| compare_songs(row, &song, key) != Ordering::Greater);
            self.visible.insert(at, song);
        }
    }

    fn save_favorites(&mut self) {
        if !self.persist {
            debug!("favorites storage unavailable, change kept in memory only");
            return;
        }
        if let Err(err) = self.repository.set(self.favorites.as_map()) {
            error!("failed to save favorites: {err}");
        }
    }
}
