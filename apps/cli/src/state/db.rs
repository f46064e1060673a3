//! # Database State

use frutipos_db::Database;

/// Wrapper around `Database` handed to the command handlers.
#[derive(Debug)]
pub struct DbState {
    db: Database,
}

impl DbState {
    pub fn new(db: Database) -> Self {
        DbState { db }
    }

    /// Returns a reference to the inner Database.
    ///
    /// ## Usage
    /// ```rust,ignore
    /// let products = db_state.inner().products().search("papa").await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }
}
