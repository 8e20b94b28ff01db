//! Domain models shared by the catalog loader, the search view-model and the
//! terminal front-end. These stay plain data holders; parsing lives in
//! `catalog` and filtering in `search`.

use std::fmt;

/// Placeholder used when a catalog row has no usable title.
pub const UNKNOWN_TITLE: &str = "Unknown Title";
/// Placeholder used when a catalog row has no usable artist.
pub const UNKNOWN_ARTIST: &str = "Unknown Artist";

/// Joins the title and artist halves of a song id.
const ID_SEPARATOR: &str = "___";

#[derive(Debug, Clone, PartialEq, Eq)]
/// One karaoke track from the catalog.
pub struct Song {
    /// Identity derived from title and artist, see [`song_id`]. Favorites are
    /// keyed on it, so it must not change between loads of the same data.
    pub id: String,
    /// Title displayed in the results table.
    pub title: String,
    /// Artist displayed next to the title and used as the default sort key.
    pub artist: String,
}

impl Song {
    /// Build a song and derive its id from the two display fields.
    pub fn new(title: impl Into<String>, artist: impl Into<String>) -> Self {
        let title = title.into();
        let artist = artist.into();
        Self {
            id: song_id(&title, &artist),
            title,
            artist,
        }
    }

    /// Case-insensitive substring test against title or artist. The needle
    /// must already be lowercased.
    pub fn matches(&self, lowercase_needle: &str) -> bool {
        self.title.to_lowercase().contains(lowercase_needle)
            || self.artist.to_lowercase().contains(lowercase_needle)
    }
}

impl fmt::Display for Song {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.title, self.artist)
    }
}

/// Derive the stable identity for a title/artist pair.
///
/// The pair is joined with `___`, lowercased, and every whitespace run becomes
/// a single `_`. Two rows that differ only in case or spacing therefore share
/// an id, which keeps persisted favorites attached across catalog refreshes.
pub fn song_id(title: &str, artist: &str) -> String {
    let joined = format!("{title}{ID_SEPARATOR}{artist}").to_lowercase();
    let mut id = String::with_capacity(joined.len());
    let mut in_whitespace = false;
    for ch in joined.chars() {
        if ch.is_whitespace() {
            if !in_whitespace {
                id.push('_');
            }
            in_whitespace = true;
        } else {
            id.push(ch);
            in_whitespace = false;
        }
    }
    id
}

/// Column the visible results are ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    Title,
    #[default]
    Artist,
}

impl SortKey {
    /// The other key; used by the single sort toggle in the UI.
    pub fn toggled(self) -> Self {
        match self {
            SortKey::Title => SortKey::Artist,
            SortKey::Artist => SortKey::Title,
        }
    }

    /// Lowercase column name for status messages.
    pub fn label(self) -> &'static str {
        match self {
            SortKey::Title => "title",
            SortKey::Artist => "artist",
        }
    }
}
