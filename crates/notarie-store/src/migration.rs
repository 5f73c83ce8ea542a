//! Database schema migrations for the SQLite credential store.
//!
//! We use a simple versioned migration system, plus a one-time import of
//! the legacy token file left behind by earlier client releases. The SQLite
//! store is authoritative: when both exist, the legacy file loses and is
//! removed.

use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use serde::Deserialize;

use crate::error::{Result, StoreError};

/// Current schema version.
pub const CURRENT_VERSION: u32 = 1;

/// Initialize or migrate the database schema.
///
/// This function is idempotent - it can be called multiple times safely.
pub fn migrate(conn: &mut Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS schema_migrations (
            version INTEGER PRIMARY KEY,
            applied_at INTEGER NOT NULL
        )",
        [],
    )?;

    let current: u32 = conn
        .query_row(
            "SELECT COALESCE(MAX(version), 0) FROM schema_migrations",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current < CURRENT_VERSION {
        let tx = conn.transaction()?;

        for version in (current + 1)..=CURRENT_VERSION {
            apply_migration(&tx, version)?;

            tx.execute(
                "INSERT INTO schema_migrations (version, applied_at) VALUES (?1, ?2)",
                rusqlite::params![version, now_millis()],
            )?;
        }

        tx.commit()?;
    }

    Ok(())
}

/// Apply a specific migration version.
fn apply_migration(conn: &Connection, version: u32) -> Result<()> {
    match version {
        1 => apply_v1(conn),
        _ => Err(StoreError::Migration(format!(
            "unknown migration version: {}",
            version
        ))),
    }
}

/// Migration v1: the single-slot credential table.
fn apply_v1(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        -- At most one credential per session store.
        CREATE TABLE session_credential (
            slot INTEGER PRIMARY KEY CHECK (slot = 0),
            token TEXT NOT NULL,
            address TEXT NOT NULL,            -- 0x-prefixed lowercase hex
            expires_at INTEGER NOT NULL,      -- Unix ms
            saved_at INTEGER NOT NULL
        );
        "#,
    )?;

    Ok(())
}

/// Shape of the legacy token file (a JSON credential written by earlier
/// client releases next to their config).
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacyCredential {
    token: String,
    address: String,
    expires_at: i64,
}

/// One-time import of the legacy token file into SQLite.
///
/// Rules:
/// - SQLite already holds a credential: SQLite wins, the file is removed.
/// - SQLite is empty and the file parses: the credential moves into SQLite
///   and the file is removed.
/// - The file is unreadable as a credential: it is removed and nothing is
///   imported (a corrupt cache is not worth failing startup over; the user
///   re-authenticates).
///
/// Returns whether a credential was imported.
pub fn import_legacy(conn: &mut Connection, legacy_path: &Path) -> Result<bool> {
    if !legacy_path.exists() {
        return Ok(false);
    }

    let existing: Option<String> = conn
        .query_row(
            "SELECT token FROM session_credential WHERE slot = 0",
            [],
            |row| row.get(0),
        )
        .optional()?;

    let imported = if existing.is_some() {
        tracing::debug!("legacy token file superseded by durable store");
        false
    } else {
        match read_legacy(legacy_path) {
            Ok(legacy) => {
                conn.execute(
                    "INSERT INTO session_credential (slot, token, address, expires_at, saved_at)
                     VALUES (0, ?1, ?2, ?3, ?4)",
                    rusqlite::params![
                        legacy.token,
                        legacy.address.to_ascii_lowercase(),
                        legacy.expires_at,
                        now_millis()
                    ],
                )?;
                true
            }
            Err(e) => {
                tracing::warn!("discarding unreadable legacy token file: {}", e);
                false
            }
        }
    };

    std::fs::remove_file(legacy_path)?;
    Ok(imported)
}

fn read_legacy(path: &Path) -> Result<LegacyCredential> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| StoreError::InvalidData(e.to_string()))
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_migration_creates_tables() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let tables: Vec<String> = conn
            .prepare("SELECT name FROM sqlite_master WHERE type='table' ORDER BY name")
            .unwrap()
            .query_map([], |row| row.get(0))
            .unwrap()
            .collect::<std::result::Result<Vec<_>, _>>()
            .unwrap();

        assert!(tables.contains(&"session_credential".to_string()));
        assert!(tables.contains(&"schema_migrations".to_string()));
    }

    #[test]
    fn test_migration_idempotent() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();
        migrate(&mut conn).unwrap();

        let version: u32 = conn
            .query_row("SELECT MAX(version) FROM schema_migrations", [], |row| {
                row.get(0)
            })
            .unwrap();
        assert_eq!(version, 1);
    }

    #[test]
    fn test_import_legacy_into_empty_store() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("auth_token.json");
        std::fs::write(
            &legacy,
            r#"{"token":"legacy-tok","address":"0x00000000000000000000000000000000000000aa","expiresAt":9999999999999}"#,
        )
        .unwrap();

        assert!(import_legacy(&mut conn, &legacy).unwrap());
        assert!(!legacy.exists(), "legacy file must be removed");

        let token: String = conn
            .query_row(
                "SELECT token FROM session_credential WHERE slot = 0",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(token, "legacy-tok");
    }

    #[test]
    fn test_durable_store_wins_over_legacy() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();
        conn.execute(
            "INSERT INTO session_credential (slot, token, address, expires_at, saved_at)
             VALUES (0, 'durable-tok', '0x00000000000000000000000000000000000000bb', 1, 1)",
            [],
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("auth_token.json");
        std::fs::write(
            &legacy,
            r#"{"token":"legacy-tok","address":"0x00000000000000000000000000000000000000aa","expiresAt":2}"#,
        )
        .unwrap();

        assert!(!import_legacy(&mut conn, &legacy).unwrap());
        assert!(!legacy.exists());

        let token: String = conn
            .query_row(
                "SELECT token FROM session_credential WHERE slot = 0",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(token, "durable-tok");
    }

    #[test]
    fn test_corrupt_legacy_removed_without_import() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("auth_token.json");
        std::fs::write(&legacy, "not json at all").unwrap();

        assert!(!import_legacy(&mut conn, &legacy).unwrap());
        assert!(!legacy.exists());
    }

    #[test]
    fn test_missing_legacy_is_noop() {
        let mut conn = Connection::open_in_memory().unwrap();
        migrate(&mut conn).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let legacy = dir.path().join("does_not_exist.json");
        assert!(!import_legacy(&mut conn, &legacy).unwrap());
    }
}
