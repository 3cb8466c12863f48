//! Shared store handle.
//!
//! # Invariants
//! - Exactly one connection backs a store; clones share it.
//! - A caller holds the lock for the whole of one repository operation, so
//!   check-then-write sequences are atomic with respect to other callers.

use super::{open_db, open_db_in_memory, DbError, DbResult};
use rusqlite::Connection;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

/// Process-wide handle to the backing SQLite database.
///
/// Created once at startup and cloned into whatever needs it. The
/// connection closes when the last clone is dropped.
#[derive(Clone)]
pub struct ProfileStore {
    conn: Arc<Mutex<Connection>>,
}

impl ProfileStore {
    /// Opens (or creates) a file-backed store with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        open_db(path).map(Self::from_connection)
    }

    /// Opens a private in-memory store with migrations applied.
    pub fn open_in_memory() -> DbResult<Self> {
        open_db_in_memory().map(Self::from_connection)
    }

    /// Wraps an already bootstrapped connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Acquires exclusive access to the connection.
    pub fn lock(&self) -> DbResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| DbError::LockPoisoned)
    }
}
