//! SQLite-backed token index.
//!
//! ## Architecture
//!
//! The `Database` struct implements `IndexStore` (see `traits`) over a single
//! SQLite connection guarded by a mutex, so event handlers and queries can
//! share one instance across threads.

pub mod helpers;
mod operations;
pub mod schema;
pub mod statistics;
pub mod traits;

pub use schema::setup_schema;
pub use statistics::IndexStats;
pub use traits::IndexStore;

use crate::errors::{AppError, AppResult};
use rusqlite::Connection;
use std::sync::{Mutex, MutexGuard};
use tracing::info;

/// The token index database
pub struct Database {
    connection: Mutex<Connection>,
}

impl Database {
    /// Open (or create) the index at `database_path` and ensure the schema exists
    ///
    /// `":memory:"` gives a private in-memory index.
    pub fn new(database_path: &str) -> AppResult<Self> {
        let connection = Connection::open(database_path)?;
        setup_schema(&connection)?;

        info!("Database initialised at: {}", database_path);
        Ok(Self {
            connection: Mutex::new(connection),
        })
    }

    pub(crate) fn lock(&self) -> AppResult<MutexGuard<'_, Connection>> {
        self.connection
            .lock()
            .map_err(|_| AppError::InvalidData("database connection mutex poisoned".to_string()))
    }

    /// Execute a function within a database transaction
    pub fn execute_transaction<F, R>(&self, f: F) -> AppResult<R>
    where
        F: FnOnce(&rusqlite::Transaction) -> AppResult<R>,
    {
        let mut connection = self.lock()?;
        let tx = connection.transaction()?;
        let result = f(&tx)?;
        tx.commit()?;
        Ok(result)
    }
}
