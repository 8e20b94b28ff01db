//! Karaoke song lookup: a pipe-delimited catalog loaded in the background,
//! searched and sorted through [`SearchModel`], with favorites kept in an
//! injected [`FavoritesRepository`].
pub mod catalog;
pub mod config;
pub mod db;
pub mod error;
pub mod favorites;
pub mod logging;
pub mod models;
pub mod search;
pub mod transform;
pub mod ui;

pub use catalog::{load_catalog, parse_catalog, spawn_load, CatalogSource, LoadResult};
pub use error::{CatalogError, StorageError, TransformError};
pub use favorites::{
    open_repository, Favorites, FavoritesMap, FavoritesRepository, InMemoryFavoritesRepository,
    SqliteFavoritesRepository,
};
pub use models::{song_id, SortKey, Song};
pub use search::{LoadState, SearchModel, ViewState};

/// The interactive application entry point and state container.
pub use ui::{run_app, App};
