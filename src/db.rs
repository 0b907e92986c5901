//! SQLite connection handling.
//!
//! Each actor opens its own connection to the same database file. File-backed
//! databases run in WAL mode with a busy timeout so the two actors and the CLI
//! commands can share the file.

use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;
use tracing::debug;

use crate::framework::StoreError;

/// Where the dashboard tables live.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseLocation {
    File(PathBuf),
    /// A private in-memory database per connection (tests, demos).
    Memory,
}

impl DatabaseLocation {
    /// `":memory:"` selects an in-memory database, anything else is a file path.
    pub fn parse(raw: &str) -> Self {
        if raw == ":memory:" {
            DatabaseLocation::Memory
        } else {
            DatabaseLocation::File(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for DatabaseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatabaseLocation::File(path) => write!(f, "{}", path.display()),
            DatabaseLocation::Memory => f.write_str(":memory:"),
        }
    }
}

/// Opens a connection and applies the connection-level pragmas.
pub fn open(location: &DatabaseLocation) -> Result<Connection, StoreError> {
    let conn = match location {
        DatabaseLocation::File(path) => open_file(path)?,
        DatabaseLocation::Memory => Connection::open_in_memory()?,
    };
    conn.busy_timeout(Duration::from_secs(5))?;
    debug!(%location, "Opened database connection");
    Ok(conn)
}

fn open_file(path: &Path) -> Result<Connection, StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| StoreError::Backend(e.to_string()))?;
    }
    let conn = Connection::open(path)?;
    conn.pragma_update(None, "journal_mode", "WAL")?;
    Ok(conn)
}

/// Returns the column names of `table`, used by the additive migrations.
pub fn table_columns(conn: &Connection, table: &str) -> Result<Vec<String>, StoreError> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table})"))?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(1))?
        .collect::<Result<Vec<_>, _>>()?;
    Ok(columns)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_location() {
        assert_eq!(DatabaseLocation::parse(":memory:"), DatabaseLocation::Memory);
        assert_eq!(
            DatabaseLocation::parse("data/adintel.db"),
            DatabaseLocation::File(PathBuf::from("data/adintel.db"))
        );
    }

    #[test]
    fn test_open_file_creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("adintel.db");
        let conn = open(&DatabaseLocation::File(path.clone())).unwrap();
        conn.execute_batch("CREATE TABLE t (x INTEGER)").unwrap();
        assert!(path.exists());
        assert_eq!(table_columns(&conn, "t").unwrap(), vec!["x".to_string()]);
    }
}
