use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::debug;

/// SQLite file name stored inside the application data directory.
pub const DB_FILE_NAME: &str = "songbook.sqlite";

/// Ensure the database file exists, run lazy migrations, and return a live
/// connection.
pub fn ensure_schema(db_path: &Path) -> Result<Connection> {
    if let Some(parent) = db_path.parent() {
        fs::create_dir_all(parent).context("failed to create data directory")?;
    }

    let conn = Connection::open(db_path).context("failed to open SQLite database")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS kv_store (
            key TEXT PRIMARY KEY,
            value TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create kv_store table")?;

    debug!(path = %db_path.display(), "database ready");
    Ok(conn)
}
