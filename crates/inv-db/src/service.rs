//! Service layer orchestrating database mutations with audit and trail.
//!
//! `InventoryService` wraps `InventoryDb` (raw database access) and
//! `TrailWriter` (JSONL persistence). All repo methods are implemented as
//! `impl InventoryService` blocks under `repos/`.

use std::path::PathBuf;

use crate::InventoryDb;
use crate::error::DatabaseError;
use crate::retry::RetryConfig;
use crate::trail::writer::TrailWriter;

/// Orchestrates database mutations with the user-action log and JSONL trail.
///
/// Every mutation method follows this protocol:
/// 1. Check role / ownership
/// 2. Open a savepoint when more than one row changes
/// 3. Execute SQL
/// 4. Append `UserAction` row(s)
/// 5. Append JSONL trail operation (file I/O)
/// 6. Release the savepoint (or roll back on error)
pub struct InventoryService {
    db: InventoryDb,
    trail: TrailWriter,
}

impl InventoryService {
    /// Create a new service wrapping a local database.
    ///
    /// # Arguments
    ///
    /// * `db_path` - Path to the libSQL database file, or `":memory:"` for tests.
    /// * `trail_dir` - Directory for JSONL trail files. Pass `None` to disable
    ///   trail writing.
    /// * `retry` - Busy-database retry policy.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or the trail
    /// directory cannot be created.
    pub async fn new_local(
        db_path: &str,
        trail_dir: Option<PathBuf>,
        retry: RetryConfig,
    ) -> Result<Self, DatabaseError> {
        let db = InventoryDb::open_with_retry(db_path, retry).await?;
        let trail = match trail_dir {
            Some(dir) => TrailWriter::new(dir)?,
            None => TrailWriter::disabled(),
        };
        Ok(Self { db, trail })
    }

    /// Create from an existing `InventoryDb` (for testing).
    #[must_use]
    pub const fn from_db(db: InventoryDb, trail: TrailWriter) -> Self {
        Self { db, trail }
    }

    /// Access the underlying database handle.
    #[must_use]
    pub const fn db(&self) -> &InventoryDb {
        &self.db
    }

    /// Access the trail writer mutably (e.g., to disable it for bulk imports).
    pub const fn trail_mut(&mut self) -> &mut TrailWriter {
        &mut self.trail
    }

    /// Access the trail writer.
    #[must_use]
    pub const fn trail(&self) -> &TrailWriter {
        &self.trail
    }

    /// Run `body` inside a savepoint: released on `Ok`, rolled back on `Err`.
    pub(crate) async fn atomically<T, Fut>(&self, body: Fut) -> Result<T, DatabaseError>
    where
        Fut: std::future::Future<Output = Result<T, DatabaseError>>,
    {
        let sp = self.db.savepoint().await?;
        match body.await {
            Ok(value) => {
                self.db.release(sp).await?;
                Ok(value)
            }
            Err(e) => {
                if let Err(rollback_err) = self.db.rollback_to(sp).await {
                    tracing::warn!("rollback failed after error '{e}': {rollback_err}");
                }
                Err(e)
            }
        }
    }
}
