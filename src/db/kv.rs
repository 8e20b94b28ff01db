use anyhow::{Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

/// Read the value stored under `key`, if any.
pub fn get_value(conn: &Connection, key: &str) -> Result<Option<String>> {
    conn.query_row(
        "SELECT value FROM kv_store WHERE key = ?1",
        params![key],
        |row| row.get(0),
    )
    .optional()
    .context("failed to read stored value")
}

/// Insert or overwrite the value stored under `key`.
pub fn set_value(conn: &Connection, key: &str, value: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO kv_store (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )
    .context("failed to write stored value")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    #[test]
    fn values_round_trip_and_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let conn = ensure_schema(&dir.path().join("kv.sqlite")).unwrap();

        assert_eq!(get_value(&conn, "k").unwrap(), None);
        set_value(&conn, "k", "one").unwrap();
        set_value(&conn, "k", "two").unwrap();
        assert_eq!(get_value(&conn, "k").unwrap().as_deref(), Some("two"));
        assert_eq!(get_value(&conn, "other").unwrap(), None);
    }
}
