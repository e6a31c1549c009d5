//! # Database State
//!
//! Wraps the `Database` handle for use in commands.
//!
//! The `Database` from `stockbook-db` holds a `SqlitePool`, which is
//! thread-safe; commands can run queries concurrently without locking.

use stockbook_db::Database;

/// Wrapper around `Database` for command state.
#[derive(Debug, Clone)]
pub struct DbState {
    db: Database,
}

impl DbState {
    /// Creates a new DbState wrapping the database connection.
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let id = db_state.inner().sales().insert(&new_sale).await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
