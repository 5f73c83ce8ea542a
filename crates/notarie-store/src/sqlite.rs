//! SQLite implementation of the CredentialStore trait.
//!
//! This is the durable client-side store. It uses rusqlite with bundled
//! SQLite behind a mutex; operations are cheap single-row statements.

use std::path::Path;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use notarie_core::{Address, Credential};
use rusqlite::{params, Connection, OptionalExtension};

use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::CredentialStore;

/// SQLite-based credential store.
///
/// Thread-safe via internal Mutex.
pub struct SqliteCredentialStore {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCredentialStore {
    /// Open a SQLite database at the given path.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open the store and perform the one-time legacy token-file import.
    ///
    /// The SQLite store is authoritative; see [`migration::import_legacy`].
    pub fn open_with_legacy(
        path: impl AsRef<Path>,
        legacy_path: impl AsRef<Path>,
    ) -> Result<Self> {
        let mut conn = Connection::open(path)?;
        migration::migrate(&mut conn)?;
        migration::import_legacy(&mut conn, legacy_path.as_ref())?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        let mut conn = Connection::open_in_memory()?;
        migration::migrate(&mut conn)?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// Execute an operation on the locked connection.
    fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = self.conn.lock().map_err(|e| {
            StoreError::Database(rusqlite::Error::SqliteFailure(
                rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
                Some(format!("mutex poisoned: {}", e)),
            ))
        })?;
        f(&conn)
    }
}

fn row_to_credential(row: &rusqlite::Row<'_>) -> rusqlite::Result<(String, String, i64)> {
    Ok((row.get("token")?, row.get("address")?, row.get("expires_at")?))
}

#[async_trait]
impl CredentialStore for SqliteCredentialStore {
    async fn load(&self) -> Result<Option<Credential>> {
        let row = self.with_conn(|conn| {
            Ok(conn
                .query_row(
                    "SELECT token, address, expires_at FROM session_credential WHERE slot = 0",
                    [],
                    row_to_credential,
                )
                .optional()?)
        })?;

        match row {
            None => Ok(None),
            Some((token, address, expires_at)) => {
                let address = Address::from_hex(&address)
                    .map_err(|e| StoreError::InvalidData(e.to_string()))?;
                Ok(Some(Credential {
                    token,
                    address,
                    expires_at,
                }))
            }
        }
    }

    async fn save(&self, credential: &Credential) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO session_credential (slot, token, address, expires_at, saved_at)
                 VALUES (0, ?1, ?2, ?3, ?4)
                 ON CONFLICT(slot) DO UPDATE SET
                     token = excluded.token,
                     address = excluded.address,
                     expires_at = excluded.expires_at,
                     saved_at = excluded.saved_at",
                params![
                    credential.token,
                    credential.address.to_hex(),
                    credential.expires_at,
                    now_millis()
                ],
            )?;
            Ok(())
        })
    }

    async fn clear(&self) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("DELETE FROM session_credential WHERE slot = 0", [])?;
            Ok(())
        })
    }
}

/// Get current time in milliseconds.
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("time went backwards")
        .as_millis() as i64
}
