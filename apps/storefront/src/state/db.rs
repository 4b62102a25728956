//! # Database State
//!
//! Wraps the `Database` handle for use in commands. The pool inside is
//! thread-safe, so commands share it without extra locking.

use marquee_db::Database;

#[derive(Debug, Clone)]
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
    /// let cart = db_state.inner().carts().get_or_empty("default").await?;
    /// ```
    pub fn inner(&self) -> &Database {
        &self.db
    }

    /// Closes the pool. Called once by the binary on the way out.
    pub async fn close(&self) {
        self.db.close().await;
    }
}
