//! Persistence helpers around the embedded SQLite database. The songbook only
//! needs a small key-value table (the terminal stand-in for browser local
//! storage), so every function here wraps one statement.

mod connection;
mod kv;

pub use connection::{ensure_schema, DB_FILE_NAME};
pub use kv::{get_value, set_value};
