//! Service layer wrapping the database handle.
//!
//! All repository methods are implemented as `impl EpochService` blocks in
//! [`crate::repos`].

use crate::EpochDb;
use crate::error::DatabaseError;

/// Entry point for every read and write against the store.
pub struct EpochService {
    db: EpochDb,
}

impl EpochService {
    /// Open a service over a local database file, or `":memory:"` for tests.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened.
    pub async fn new_local(db_path: &str) -> Result<Self, DatabaseError> {
        Ok(Self {
            db: EpochDb::open_local(db_path).await?,
        })
    }

    #[must_use]
    pub const fn from_db(db: EpochDb) -> Self {
        Self { db }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &EpochDb {
        &self.db
    }
}
