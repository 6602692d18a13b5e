//! # inv-db
//!
//! libSQL database operations for campus-inventory state.
//!
//! Handles all relational state: the organizational hierarchy, equipment and
//! its characteristics, specification templates, repair/disposal lifecycle,
//! movements, users, support messages and the user-action audit log.
//!
//! Uses the `libsql` crate (C `SQLite` fork) in local mode. Every repository
//! method lives on [`service::InventoryService`].

pub mod access;
pub mod error;
pub mod helpers;
mod migrations;
pub mod repos;
pub mod retry;
pub mod service;
pub mod trail;
pub mod updates;

#[cfg(test)]
mod test_support;

use std::sync::atomic::{AtomicU32, Ordering};

use error::DatabaseError;
use libsql::Builder;
use libsql::params::IntoParams;
use retry::{RetryConfig, is_busy_error};

/// Central database handle for all inventory state operations.
///
/// Wraps a libSQL database and connection. Provides ID generation, retried
/// statement execution and nestable savepoints.
pub struct InventoryDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
    retry: RetryConfig,
    savepoint_seq: AtomicU32,
}

impl InventoryDb {
    /// Open a local database at the given path with default retry settings.
    ///
    /// Runs migrations automatically on every open.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: &str) -> Result<Self, DatabaseError> {
        Self::open_with_retry(path, RetryConfig::default()).await
    }

    /// Open a local database with explicit busy-retry settings.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_with_retry(path: &str, retry: RetryConfig) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let inv_db = Self {
            db,
            conn,
            retry,
            savepoint_seq: AtomicU32::new(0),
        };
        inv_db.run_migrations().await?;
        Ok(inv_db)
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// Generate a prefixed ID via libSQL. Returns e.g., `"eqp-a3f8b2c1"`.
    ///
    /// Uses `randomblob(4)` in SQL to produce 8-char hex, then prepends the prefix.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_id(&self, prefix: &str) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                &format!("SELECT '{prefix}-' || lower(hex(randomblob(4)))"),
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Generate a random version-4 UUID string for QR identification.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn generate_uid(&self) -> Result<String, DatabaseError> {
        let mut rows = self
            .conn
            .query(
                "SELECT lower(hex(randomblob(4))) || '-' || lower(hex(randomblob(2))) || '-4' ||
                        substr(lower(hex(randomblob(2))), 2) || '-' ||
                        substr('89ab', 1 + (abs(random()) % 4), 1) ||
                        substr(lower(hex(randomblob(2))), 2) || '-' || lower(hex(randomblob(6)))",
                (),
            )
            .await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        Ok(row.get::<String>(0)?)
    }

    /// Execute a statement once, without retry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` on failure.
    pub async fn execute(&self, sql: &str, params: impl IntoParams) -> Result<u64, DatabaseError> {
        Ok(self.conn.execute(sql, params).await?)
    }

    /// Execute a statement, retrying while the database is locked.
    ///
    /// `make_params` is called once per attempt because libSQL consumes the
    /// parameters.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` on a non-transient failure or when
    /// retries are exhausted.
    pub async fn execute_with<F, P>(&self, sql: &str, make_params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        let mut delay = self.retry.base_delay;
        loop {
            match self.conn.execute(sql, make_params()).await {
                Ok(n) => return Ok(n),
                Err(e) if attempt < self.retry.max_attempts && is_busy_error(&e) => {
                    tracing::warn!(attempt, "database locked, retrying statement: {e}");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.retry.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Run a query once, without retry.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` on failure.
    pub async fn query(
        &self,
        sql: &str,
        params: impl IntoParams,
    ) -> Result<libsql::Rows, DatabaseError> {
        Ok(self.conn.query(sql, params).await?)
    }

    /// Run a query, retrying while the database is locked.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::LibSql` on a non-transient failure or when
    /// retries are exhausted.
    pub async fn query_with<F, P>(
        &self,
        sql: &str,
        make_params: F,
    ) -> Result<libsql::Rows, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut attempt = 1;
        let mut delay = self.retry.base_delay;
        loop {
            match self.conn.query(sql, make_params()).await {
                Ok(rows) => return Ok(rows),
                Err(e) if attempt < self.retry.max_attempts && is_busy_error(&e) => {
                    tracing::warn!(attempt, "database locked, retrying query: {e}");
                    tokio::time::sleep(delay).await;
                    delay = (delay * 2).min(self.retry.max_delay);
                    attempt += 1;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// Count rows produced by a `SELECT COUNT(*) ...` statement.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn count_with<F, P>(&self, sql: &str, make_params: F) -> Result<u64, DatabaseError>
    where
        F: Fn() -> P,
        P: IntoParams,
    {
        let mut rows = self.query_with(sql, make_params).await?;
        let row = rows.next().await?.ok_or(DatabaseError::NoResult)?;
        let n = row.get::<i64>(0)?;
        Ok(u64::try_from(n).unwrap_or(0))
    }

    /// Open a named savepoint. Savepoints nest, so multi-step operations can
    /// call each other while each stays atomic.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the SAVEPOINT statement fails.
    pub async fn savepoint(&self) -> Result<Savepoint, DatabaseError> {
        let n = self.savepoint_seq.fetch_add(1, Ordering::Relaxed);
        let name = format!("sp_{n}");
        self.conn.execute(&format!("SAVEPOINT {name}"), ()).await?;
        Ok(Savepoint { name })
    }

    /// Release a savepoint, keeping its changes.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the RELEASE statement fails.
    pub async fn release(&self, sp: Savepoint) -> Result<(), DatabaseError> {
        self.conn
            .execute(&format!("RELEASE {}", sp.name), ())
            .await?;
        Ok(())
    }

    /// Undo everything since the savepoint and discard it.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the rollback statements fail.
    pub async fn rollback_to(&self, sp: Savepoint) -> Result<(), DatabaseError> {
        self.conn
            .execute_batch(&format!("ROLLBACK TO {0}; RELEASE {0};", sp.name))
            .await?;
        Ok(())
    }
}

/// Handle for an open savepoint. Consumed by `release` or `rollback_to`.
#[must_use = "a savepoint must be released or rolled back"]
pub struct Savepoint {
    name: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    /// Helper to create an in-memory database for testing.
    async fn test_db() -> InventoryDb {
        InventoryDb::open_local(":memory:").await.unwrap()
    }

    #[tokio::test]
    async fn open_local_creates_schema() {
        let db = test_db().await;

        let tables = [
            "users",
            "support_messages",
            "universities",
            "buildings",
            "floors",
            "faculties",
            "rooms",
            "hierarchy_history",
            "equipment_types",
            "contracts",
            "equipment",
            "specifications",
            "repairs",
            "disposals",
            "movements",
            "user_actions",
        ];
        for table in &tables {
            let mut rows = db
                .conn()
                .query(
                    "SELECT name FROM sqlite_master WHERE type='table' AND name=?1",
                    [*table],
                )
                .await
                .unwrap();
            let row = rows.next().await.unwrap();
            assert!(row.is_some(), "table '{table}' should exist");
        }
    }

    #[tokio::test]
    async fn generate_id_correct_format() {
        let db = test_db().await;
        let id = db.generate_id("eqp").await.unwrap();
        assert!(id.starts_with("eqp-"), "ID should start with 'eqp-': {id}");
        assert_eq!(id.len(), 12, "3 prefix + 1 dash + 8 hex: {id}");

        let hex_part = &id[4..];
        assert!(
            hex_part.chars().all(|c| c.is_ascii_hexdigit()),
            "Random part should be hex: {hex_part}"
        );
    }

    #[tokio::test]
    async fn generate_id_all_prefixes() {
        let db = test_db().await;
        for prefix in inv_core::ids::ALL_PREFIXES {
            let id = db.generate_id(prefix).await.unwrap();
            assert!(id.starts_with(&format!("{prefix}-")));
        }
    }

    #[tokio::test]
    async fn generate_id_uniqueness() {
        let db = test_db().await;
        let mut ids = HashSet::new();
        for _ in 0..200 {
            ids.insert(db.generate_id("rom").await.unwrap());
        }
        assert_eq!(ids.len(), 200);
    }

    #[tokio::test]
    async fn generate_uid_is_uuid_v4_shaped() {
        let db = test_db().await;
        let uid = db.generate_uid().await.unwrap();
        let parts: Vec<&str> = uid.split('-').collect();
        assert_eq!(
            parts.iter().map(|p| p.len()).collect::<Vec<_>>(),
            vec![8, 4, 4, 4, 12],
            "unexpected uid shape: {uid}"
        );
        assert!(parts[2].starts_with('4'));
        assert!(matches!(parts[3].chars().next(), Some('8' | '9' | 'a' | 'b')));
    }

    #[tokio::test]
    async fn idempotent_migrations() {
        let db = test_db().await;
        db.run_migrations().await.unwrap();
        db.run_migrations().await.unwrap();
    }

    #[tokio::test]
    async fn savepoint_rollback_discards_changes() {
        let db = test_db().await;
        let sp = db.savepoint().await.unwrap();
        db.execute(
            "INSERT INTO universities (id, name) VALUES ('uni-00000001', 'Tech')",
            (),
        )
        .await
        .unwrap();
        db.rollback_to(sp).await.unwrap();

        let n = db
            .count_with("SELECT COUNT(*) FROM universities", || ())
            .await
            .unwrap();
        assert_eq!(n, 0);
    }

    #[tokio::test]
    async fn nested_savepoints_release() {
        let db = test_db().await;
        let outer = db.savepoint().await.unwrap();
        let inner = db.savepoint().await.unwrap();
        db.execute(
            "INSERT INTO universities (id, name) VALUES ('uni-00000001', 'Tech')",
            (),
        )
        .await
        .unwrap();
        db.release(inner).await.unwrap();
        db.release(outer).await.unwrap();

        let n = db
            .count_with("SELECT COUNT(*) FROM universities", || ())
            .await
            .unwrap();
        assert_eq!(n, 1);
    }

    #[tokio::test]
    async fn foreign_keys_enforced() {
        let db = test_db().await;
        let result = db
            .execute(
                "INSERT INTO buildings (id, university_id, name) VALUES ('bld-1', 'uni-missing', 'A')",
                (),
            )
            .await;
        assert!(result.is_err());
    }
}
