//! Structural history of rooms and faculties.
//!
//! Rows are keyed by `(entity_type, entity_id)` without a foreign key, so the
//! record of a split or merge survives deletion of the rooms involved.

use std::collections::HashSet;

use chrono::Utc;

use inv_core::entities::HierarchyHistory;
use inv_core::enums::{EntityType, HistoryAction};
use inv_core::ids::PREFIX_HISTORY;

use crate::error::DatabaseError;
use crate::helpers::{parse_datetime, parse_enum};
use crate::service::InventoryService;

/// Merge sources must name at least two distinct entities.
pub(crate) fn check_merge_sources(ids: &[String], plural: &str) -> Result<(), DatabaseError> {
    if ids.len() < 2 {
        return Err(DatabaseError::Validation(format!("merge needs at least two {plural}")));
    }
    let mut seen = HashSet::with_capacity(ids.len());
    if let Some(repeated) = ids.iter().find(|id| !seen.insert(id.as_str())) {
        return Err(DatabaseError::Validation(format!(
            "{repeated} is listed more than once; merge needs distinct {plural}"
        )));
    }
    Ok(())
}

fn row_to_history(row: &libsql::Row) -> Result<HierarchyHistory, DatabaseError> {
    Ok(HierarchyHistory {
        id: row.get::<String>(0)?,
        entity_type: parse_enum(&row.get::<String>(1)?)?,
        entity_id: row.get::<String>(2)?,
        action: parse_enum(&row.get::<String>(3)?)?,
        description: row.get::<String>(4)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl InventoryService {
    pub(crate) async fn add_history(
        &self,
        entity_type: EntityType,
        entity_id: &str,
        action: HistoryAction,
        description: &str,
    ) -> Result<(), DatabaseError> {
        let id = self.db().generate_id(PREFIX_HISTORY).await?;
        self.db()
            .execute_with(
                "INSERT INTO hierarchy_history (id, entity_type, entity_id, action, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                || {
                    libsql::params![
                        id.as_str(),
                        entity_type.as_str(),
                        entity_id,
                        action.as_str(),
                        description,
                        Utc::now().to_rfc3339()
                    ]
                },
            )
            .await?;
        Ok(())
    }

    async fn history_for(
        &self,
        entity_type: EntityType,
        entity_id: &str,
    ) -> Result<Vec<HierarchyHistory>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, entity_type, entity_id, action, description, created_at
                 FROM hierarchy_history WHERE entity_type = ?1 AND entity_id = ?2
                 ORDER BY created_at DESC, rowid DESC",
                || libsql::params![entity_type.as_str(), entity_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_history(&row)?);
        }
        Ok(out)
    }

    /// Structural history of a room, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn room_history(&self, room_id: &str) -> Result<Vec<HierarchyHistory>, DatabaseError> {
        self.history_for(EntityType::Room, room_id).await
    }

    /// Structural history of a faculty, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn faculty_history(
        &self,
        faculty_id: &str,
    ) -> Result<Vec<HierarchyHistory>, DatabaseError> {
        self.history_for(EntityType::Faculty, faculty_id).await
    }
}
