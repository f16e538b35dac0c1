//! Implements a SQLite backed key-value store.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, OptionalExtension};

use crate::{Error, stores::KeyValueStore};

/// Stores values in the `key_value` table of a SQLite database.
///
/// The table must be set up with [initialize](crate::initialize_db) first.
#[derive(Debug, Clone)]
pub struct SQLiteKeyValueStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteKeyValueStore {
    /// Create a new store for the SQLite `connection`.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }
}

impl KeyValueStore for SQLiteKeyValueStore {
    /// Get the value stored under `key`.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection mutex is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn get(&self, key: &str) -> Result<Option<String>, Error> {
        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        let value = connection
            .query_row(
                "SELECT value FROM key_value WHERE key = ?1",
                [key],
                |row| row.get(0),
            )
            .optional()?;

        Ok(value)
    }

    /// Store `value` under `key`, replacing any existing value.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::DatabaseLockError] if the connection mutex is poisoned,
    /// - or [Error::SqlError] if there is some other SQL error.
    fn set(&mut self, key: &str, value: &str) -> Result<(), Error> {
        let connection = self.connection.lock().map_err(|error| {
            tracing::error!("could not acquire database lock: {error}");
            Error::DatabaseLockError
        })?;

        connection.execute(
            "INSERT INTO key_value (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value",
            (key, value),
        )?;

        tracing::debug!("Wrote {} bytes to \"{key}\"", value.len());

        Ok(())
    }
}
