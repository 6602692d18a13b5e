//! JSONL trail writer.
//!
//! Appends `TrailOperation` records to per-day `{trail_dir}/{YYYY-MM-DD}.jsonl`
//! files. Uses `serde_jsonlines::append_json_lines` for per-line appends.

use std::path::{Path, PathBuf};

use inv_core::trail::TrailOperation;

use crate::error::DatabaseError;

/// Appends trail operations to per-day JSONL files.
///
/// Every mutation in `InventoryService` calls `append()` after its SQL and
/// audit row succeed.
pub struct TrailWriter {
    trail_dir: PathBuf,
    enabled: bool,
}

impl TrailWriter {
    /// Create a new `TrailWriter` pointing at the given directory.
    ///
    /// Creates the directory if it doesn't exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the directory cannot be created.
    pub fn new(trail_dir: PathBuf) -> Result<Self, DatabaseError> {
        std::fs::create_dir_all(&trail_dir).map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(Self {
            trail_dir,
            enabled: true,
        })
    }

    /// Create a disabled writer (for testing or when trail is not needed).
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            trail_dir: PathBuf::new(),
            enabled: false,
        }
    }

    /// Set whether writing is enabled.
    pub const fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether trail writing is currently enabled.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Append a trail operation to the file for the operation's day.
    ///
    /// File path: `{trail_dir}/{first 10 chars of op.ts}.jsonl`
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file write fails.
    pub fn append(&self, op: &TrailOperation) -> Result<(), DatabaseError> {
        if !self.enabled {
            return Ok(());
        }

        let path = self.file_for(&op.ts);
        serde_jsonlines::append_json_lines(&path, [op])
            .map_err(|e| DatabaseError::Other(e.into()))?;
        Ok(())
    }

    /// Read back every operation recorded for a day (`YYYY-MM-DD`).
    ///
    /// Returns an empty list when no file exists for that day.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the file exists but cannot be parsed.
    pub fn read_day(&self, day: &str) -> Result<Vec<TrailOperation>, DatabaseError> {
        let path = self.trail_dir.join(format!("{day}.jsonl"));
        if !path.exists() {
            return Ok(Vec::new());
        }
        serde_jsonlines::json_lines(&path)
            .map_err(|e| DatabaseError::Other(e.into()))?
            .collect::<std::io::Result<Vec<TrailOperation>>>()
            .map_err(|e| DatabaseError::Other(e.into()))
    }

    /// The directory where trail files are stored.
    #[must_use]
    pub fn trail_dir(&self) -> &Path {
        &self.trail_dir
    }

    fn file_for(&self, ts: &str) -> PathBuf {
        let day = ts.get(..10).unwrap_or("undated");
        self.trail_dir.join(format!("{day}.jsonl"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inv_core::enums::{EntityType, TrailOp};

    fn op(ts: &str, id: &str) -> TrailOperation {
        TrailOperation {
            v: 1,
            ts: ts.to_string(),
            user: "usr-00000001".to_string(),
            op: TrailOp::Create,
            entity: EntityType::Equipment,
            id: id.to_string(),
            data: serde_json::json!({"name": "Projector"}),
        }
    }

    #[test]
    fn appends_to_per_day_files() {
        let dir = tempfile::TempDir::new().unwrap();
        let writer = TrailWriter::new(dir.path().join("trail")).unwrap();

        writer.append(&op("2026-03-01T09:00:00+00:00", "eqp-1")).unwrap();
        writer.append(&op("2026-03-01T17:30:00+00:00", "eqp-2")).unwrap();
        writer.append(&op("2026-03-02T08:00:00+00:00", "eqp-3")).unwrap();

        let first = writer.read_day("2026-03-01").unwrap();
        assert_eq!(first.len(), 2);
        assert_eq!(first[1].id, "eqp-2");
        assert_eq!(writer.read_day("2026-03-02").unwrap().len(), 1);
        assert!(writer.read_day("2026-03-03").unwrap().is_empty());
    }

    #[test]
    fn disabled_writer_writes_nothing() {
        let dir = tempfile::TempDir::new().unwrap();
        let mut writer = TrailWriter::new(dir.path().to_path_buf()).unwrap();
        writer.set_enabled(false);
        writer.append(&op("2026-03-01T09:00:00+00:00", "eqp-1")).unwrap();
        assert!(writer.read_day("2026-03-01").unwrap().is_empty());
        assert!(!writer.is_enabled());
    }
}
