//! Ratatui front-end for the songbook. `app` holds the interaction state and
//! drawing code, `terminal` the raw-mode event loop, `helpers` small layout
//! and text utilities shared by both.

mod app;
mod helpers;
mod terminal;

pub use app::App;
pub use terminal::run_app;
