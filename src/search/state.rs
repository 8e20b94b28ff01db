use crate::catalog::sort_songs;
use crate::favorites::Favorites;
use crate::models::{SortKey, Song};

/// Queries shorter than this (after trimming) do not search the catalog.
pub const MIN_QUERY_CHARS: usize = 3;
/// Rows per page when pagination is on.
pub const DEFAULT_PAGE_SIZE: usize = 100;

/// Everything the user controls about the result list. Values are replaced,
/// never edited in place: each `with_*` returns the next state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub query: String,
    pub sort_by: SortKey,
    pub show_only_favorites: bool,
    /// 1-based.
    pub page: usize,
    pub paginate: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            query: String::new(),
            sort_by: SortKey::default(),
            show_only_favorites: false,
            page: 1,
            paginate: false,
        }
    }
}

impl ViewState {
    /// Replace the query text; results restart at page 1.
    pub fn with_query(self, query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            page: 1,
            ..self
        }
    }

    /// Change the sort column. The current page is kept.
    pub fn with_sort_by(self, sort_by: SortKey) -> Self {
        Self { sort_by, ..self }
    }

    /// Switch the favorites-only filter; results restart at page 1.
    pub fn with_favorites_only(self, show_only_favorites: bool) -> Self {
        Self {
            show_only_favorites,
            page: 1,
            ..self
        }
    }

    /// Switch pagination on or off, back to page 1.
    pub fn with_pagination(self, paginate: bool) -> Self {
        Self {
            paginate,
            page: 1,
            ..self
        }
    }

    /// Move to `page`, clamped into `1..=page_count`.
    pub fn with_page(self, page: usize, page_count: usize) -> Self {
        Self {
            page: page.clamp(1, page_count.max(1)),
            ..self
        }
    }

    /// The query without surrounding whitespace, as used for matching.
    pub fn trimmed_query(&self) -> &str {
        self.query.trim()
    }

    /// True when the trimmed query has fewer than [`MIN_QUERY_CHARS`] characters.
    pub fn query_is_short(&self) -> bool {
        self.trimmed_query().chars().count() < MIN_QUERY_CHARS
    }

    /// Lowercased needle, or `None` when the query is too short to search.
    pub(crate) fn needle(&self) -> Option<String> {
        if self.query_is_short() {
            None
        } else {
            Some(self.trimmed_query().to_lowercase())
        }
    }

    /// Whether `song` belongs in the visible set. `needle` must come from
    /// [`ViewState::needle`] on this same state.
    pub(crate) fn admits(&self, song: &Song, favorites: &Favorites, needle: Option<&str>) -> bool {
        if self.show_only_favorites && !favorites.contains(&song.id) {
            return false;
        }
        match needle {
            Some(needle) => song.matches(needle),
            // A short query only shows anything in favorites-only mode.
            None => self.show_only_favorites,
        }
    }
}

/// Rebuild the visible rows from the full catalog.
///
/// With favorites-only off, a query under [`MIN_QUERY_CHARS`] yields nothing.
/// With it on, a short query yields every favorite and a longer one the
/// favorites that match.
pub fn derive_visible(catalog: &[Song], favorites: &Favorites, state: &ViewState) -> Vec<Song> {
    let needle = state.needle();
    let mut visible: Vec<Song> = catalog
        .iter()
        .filter(|song| state.admits(song, favorites, needle.as_deref()))
        .cloned()
        .collect();
    sort_songs(&mut visible, state.sort_by);
    visible
}

/// Number of pages needed for `len` rows; never zero.
pub fn page_count(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Rows shown for the current page, or every row when pagination is off.
pub fn page_slice<'a>(visible: &'a [Song], state: &ViewState, page_size: usize) -> &'a [Song] {
    if !state.paginate || page_size == 0 {
        return visible;
    }
    let start = (state.page.saturating_sub(1) * page_size).min(visible.len());
    let end = (start + page_size).min(visible.len());
    &visible[start..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Vec<Song> {
        vec![
            Song::new("Tennessee Whiskey", "Chris Stapleton"),
            Song::new("Jolene", "Dolly Parton"),
            Song::new("9 to 5", "Dolly Parton"),
            Song::new("Zombie", "The Cranberries"),
            Song::new("Whiskey Lullaby", "Brad Paisley"),
        ]
    }

    fn favorite(ids: &[&str]) -> Favorites {
        let mut favorites = Favorites::default();
        for id in ids {
            favorites.toggle(id);
        }
        favorites
    }

    #[test]
    fn short_queries_show_nothing_without_favorites_filter() {
        let songs = catalog();
        let favorites = favorite(&[&songs[0].id]);
        for query in ["", " ", "wh", "  do  ", "9 t"] {
            let state = ViewState::default().with_query(query);
            if state.query_is_short() {
                assert!(derive_visible(&songs, &favorites, &state).is_empty(), "{query:?}");
            }
        }
    }

    #[test]
    fn every_visible_row_contains_the_query() {
        let songs = catalog();
        let favorites = Favorites::default();
        for query in ["whiskey", "DOLLY", "ton", "berr", "xyz"] {
            let state = ViewState::default().with_query(query);
            let needle = query.to_lowercase();
            for song in derive_visible(&songs, &favorites, &state) {
                assert!(
                    song.title.to_lowercase().contains(&needle)
                        || song.artist.to_lowercase().contains(&needle)
                );
            }
        }
    }

    #[test]
    fn favorites_only_with_short_query_lists_all_favorites() {
        let songs = catalog();
        let favorites = favorite(&[&songs[1].id, &songs[3].id]);
        let state = ViewState::default().with_favorites_only(true);
        let visible = derive_visible(&songs, &favorites, &state);
        let titles: Vec<&str> = visible.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, vec!["Jolene", "Zombie"]);
    }

    #[test]
    fn favorites_only_with_query_intersects() {
        let songs = catalog();
        let favorites = favorite(&[&songs[0].id, &songs[1].id]);
        let state = ViewState::default()
            .with_favorites_only(true)
            .with_query("whiskey");
        let visible = derive_visible(&songs, &favorites, &state);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Tennessee Whiskey");
    }

    #[test]
    fn query_is_trimmed_before_matching() {
        let songs = catalog();
        let state = ViewState::default().with_query("  jolene  ");
        assert_eq!(derive_visible(&songs, &Favorites::default(), &state).len(), 1);
    }

    #[test]
    fn transitions_reset_page() {
        let state = ViewState::default().with_page(3, 5);
        assert_eq!(state.page, 3);
        assert_eq!(state.clone().with_query("abc").page, 1);
        assert_eq!(state.clone().with_favorites_only(true).page, 1);
        assert_eq!(state.clone().with_sort_by(SortKey::Title).page, 3);
    }

    #[test]
    fn page_moves_clamp() {
        let state = ViewState::default();
        assert_eq!(state.clone().with_page(0, 4).page, 1);
        assert_eq!(state.clone().with_page(9, 4).page, 4);
        assert_eq!(state.with_page(2, 0).page, 1);
    }

    #[test]
    fn last_page_is_partial() {
        let songs: Vec<Song> = (0..7).map(|n| Song::new(format!("Song {n}"), "A")).collect();
        assert_eq!(page_count(songs.len(), 3), 3);
        assert_eq!(page_count(0, 3), 1);

        let state = ViewState::default().with_pagination(true).with_page(3, 3);
        assert_eq!(page_slice(&songs, &state, 3).len(), 1);

        let unpaged = ViewState::default().with_page(3, 3);
        assert_eq!(page_slice(&songs, &unpaged, 3).len(), 7);
    }
}
