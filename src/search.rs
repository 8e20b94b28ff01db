//! Search/filter view-model. `state` holds the pure pieces (view state values
//! and the from-scratch derivation of the visible rows); `model` owns the
//! catalog, favorites and storage seam and applies user operations.

mod model;
mod state;

pub use model::{LoadState, SearchModel};
pub use state::{
    derive_visible, page_count, page_slice, ViewState, DEFAULT_PAGE_SIZE, MIN_QUERY_CHARS,
};
