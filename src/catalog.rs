//! Catalog loading split across logical submodules: where the text comes
//! from, how a line becomes a [`Song`], and how songs are ordered.

mod parse;
mod sort;
mod source;

use std::sync::mpsc::{self, Receiver};
use std::thread;

use tracing::{error, info};

use crate::error::CatalogError;
use crate::models::Song;

pub use parse::parse_catalog;
pub use sort::{compare_songs, compare_text, sort_songs};
pub use source::CatalogSource;

/// Outcome delivered by [`spawn_load`].
pub type LoadResult = Result<Vec<Song>, CatalogError>;

/// Fetch and parse the catalog, returning it sorted by artist then title.
pub fn load_catalog(source: &CatalogSource) -> LoadResult {
    let text = source.fetch()?;
    let songs = parse_catalog(&text);
    info!(songs = songs.len(), source = %source, "song list loaded");
    Ok(songs)
}

/// Run [`load_catalog`] on a worker thread. Exactly one result is sent; the
/// caller polls the receiver from its event loop.
pub fn spawn_load(source: CatalogSource) -> Receiver<LoadResult> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let result = load_catalog(&source);
        if let Err(err) = &result {
            error!(source = %source, "song list load failed: {err}");
        }
        // The receiver is gone only if the UI already exited.
        let _ = tx.send(result);
    });
    rx
}
