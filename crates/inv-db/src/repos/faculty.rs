//! Faculties and their structural operations (split, merge, transfer).

use std::collections::HashSet;

use chrono::Utc;

use inv_core::audit_detail::RestructureDetail;
use inv_core::entities::Faculty;
use inv_core::enums::{ActionType, EntityType, HistoryAction, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_FACULTY;

use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_opt_string, parse_datetime};
use crate::repos::action::NewAction;
use crate::repos::history::check_merge_sources;
use crate::service::InventoryService;

const SELECT_COLS: &str = "id, building_id, floor_id, name, created_at";

fn row_to_faculty(row: &libsql::Row) -> Result<Faculty, DatabaseError> {
    Ok(Faculty {
        id: row.get::<String>(0)?,
        building_id: row.get::<String>(1)?,
        floor_id: get_opt_string(row, 2)?,
        name: row.get::<String>(3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

impl InventoryService {
    async fn faculty_name_taken(
        &self,
        building_id: &str,
        name: &str,
        except: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let n = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM faculties WHERE building_id = ?1 AND name = ?2 AND id != ?3",
                || libsql::params![building_id, name, except.unwrap_or("")],
            )
            .await?;
        Ok(n > 0)
    }

    async fn insert_faculty(
        &self,
        building_id: &str,
        floor_id: Option<&str>,
        name: &str,
    ) -> Result<Faculty, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FACULTY).await?;
        self.db()
            .execute_with(
                "INSERT INTO faculties (id, building_id, floor_id, name, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                || libsql::params![id.as_str(), building_id, floor_id, name, now.to_rfc3339()],
            )
            .await?;
        Ok(Faculty {
            id,
            building_id: building_id.to_string(),
            floor_id: floor_id.map(String::from),
            name: name.to_string(),
            created_at: now,
        })
    }

    /// Create a faculty. When `floor_id` is given it must belong to the
    /// building.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown building or floor and `Validation`
    /// for an empty or duplicate name or a foreign floor.
    pub async fn create_faculty(
        &self,
        actor: &Actor,
        building_id: &str,
        floor_id: Option<&str>,
        name: &str,
    ) -> Result<Faculty, DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation("faculty name must not be empty".into()));
        }
        self.get_building(building_id).await?;
        if let Some(floor_id) = floor_id {
            self.floor_in_building(floor_id, building_id).await?;
        }
        if self.faculty_name_taken(building_id, name, None).await? {
            return Err(DatabaseError::Validation(format!(
                "faculty '{name}' already exists in this building"
            )));
        }

        let faculty = self.insert_faculty(building_id, floor_id, name).await?;
        self.add_history(
            EntityType::Faculty,
            &faculty.id,
            HistoryAction::Created,
            &format!("Created faculty {name}"),
        )
        .await?;
        self.record(
            actor,
            NewAction::new(ActionType::CreateFacility, format!("Created faculty: {name}"))
                .on(EntityType::Faculty, &faculty.id),
            TrailOp::Create,
            &faculty,
        )
        .await?;
        Ok(faculty)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_faculty(&self, id: &str) -> Result<Faculty, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(&format!("SELECT {SELECT_COLS} FROM faculties WHERE id = ?1"), || [id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("faculty", id))?;
        row_to_faculty(&row)
    }

    /// Faculties of a building ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_faculties(&self, building_id: &str) -> Result<Vec<Faculty>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM faculties WHERE building_id = ?1 ORDER BY name"),
                || [building_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_faculty(&row)?);
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_faculty(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let faculty = self.get_faculty(id).await?;
        self.db()
            .execute_with("DELETE FROM faculties WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(
                ActionType::DeleteFacility,
                format!("Deleted faculty: {}", faculty.name),
            )
            .on(EntityType::Faculty, id),
            TrailOp::Delete,
            &faculty,
        )
        .await?;
        Ok(())
    }

    /// Split a faculty into new faculties in the same building and floor.
    /// The source faculty is kept.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a name is empty, repeated in the request or
    /// already used in the building. Nothing is written in that case.
    pub async fn split_faculty(
        &self,
        actor: &Actor,
        id: &str,
        new_names: &[String],
    ) -> Result<Vec<Faculty>, DatabaseError> {
        let source = self.get_faculty(id).await?;
        if new_names.is_empty() {
            return Err(DatabaseError::Validation("at least one new faculty name is required".into()));
        }

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for (i, name) in new_names.iter().enumerate() {
            let name = name.trim();
            if name.is_empty() {
                errors.push(format!("faculty {}: name is required", i + 1));
            } else if !seen.insert(name) {
                errors.push(format!("faculty {}: name '{name}' repeated", i + 1));
            } else if self.faculty_name_taken(&source.building_id, name, None).await? {
                errors.push(format!("faculty {}: '{name}' already exists in this building", i + 1));
            }
        }
        if !errors.is_empty() {
            return Err(DatabaseError::Validation(errors.join("; ")));
        }

        self.atomically(async {
            let mut created = Vec::with_capacity(new_names.len());
            for name in new_names {
                let faculty = self
                    .insert_faculty(&source.building_id, source.floor_id.as_deref(), name.trim())
                    .await?;
                self.add_history(
                    EntityType::Faculty,
                    &faculty.id,
                    HistoryAction::Split,
                    &format!("Split from faculty {} (ID: {})", source.name, source.id),
                )
                .await?;
                created.push(faculty);
            }
            let names: Vec<&str> = created.iter().map(|f| f.name.as_str()).collect();
            self.add_history(
                EntityType::Faculty,
                &source.id,
                HistoryAction::Split,
                &format!("Split into faculties: {}", names.join(", ")),
            )
            .await?;

            let detail = RestructureDetail {
                sources: vec![source.id.clone()],
                results: created.iter().map(|f| f.id.clone()).collect(),
            };
            self.record(
                actor,
                NewAction::new(
                    ActionType::CreateFacility,
                    format!("Split faculty {} into {}", source.name, names.join(", ")),
                )
                .on(EntityType::Faculty, &source.id)
                .details(serde_json::to_value(&detail)?),
                TrailOp::Split,
                &detail,
            )
            .await?;
            Ok(created)
        })
        .await
    }

    /// Merge two or more faculties into a new one. Sources are kept and
    /// receive a `merged` history entry.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for fewer than two distinct ids, a duplicate name
    /// or a foreign floor, and `NotFound` if any source does not exist.
    pub async fn merge_faculties(
        &self,
        actor: &Actor,
        ids: &[String],
        name: &str,
        building_id: &str,
        floor_id: Option<&str>,
    ) -> Result<Faculty, DatabaseError> {
        check_merge_sources(ids, "faculties")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation("faculty name must not be empty".into()));
        }
        self.get_building(building_id).await?;
        if let Some(floor_id) = floor_id {
            self.floor_in_building(floor_id, building_id).await?;
        }
        if self.faculty_name_taken(building_id, name, None).await? {
            return Err(DatabaseError::Validation(format!(
                "faculty '{name}' already exists in this building"
            )));
        }
        let mut sources = Vec::with_capacity(ids.len());
        for id in ids {
            sources.push(self.get_faculty(id).await?);
        }

        self.atomically(async {
            let merged = self.insert_faculty(building_id, floor_id, name).await?;
            for source in &sources {
                self.add_history(
                    EntityType::Faculty,
                    &source.id,
                    HistoryAction::Merged,
                    &format!("Merged into faculty {} (ID: {})", merged.name, merged.id),
                )
                .await?;
            }
            let names: Vec<&str> = sources.iter().map(|f| f.name.as_str()).collect();
            self.add_history(
                EntityType::Faculty,
                &merged.id,
                HistoryAction::Merged,
                &format!("Merged from faculties: {}", names.join(", ")),
            )
            .await?;

            let detail = RestructureDetail {
                sources: ids.to_vec(),
                results: vec![merged.id.clone()],
            };
            self.record(
                actor,
                NewAction::new(
                    ActionType::CreateFacility,
                    format!("Merged faculties {} into {name}", names.join(", ")),
                )
                .on(EntityType::Faculty, &merged.id)
                .details(serde_json::to_value(&detail)?),
                TrailOp::Merge,
                &detail,
            )
            .await?;
            Ok(merged)
        })
        .await
    }

    /// Move a faculty to another building and optionally a floor there.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a foreign floor or a name collision in the
    /// target building.
    pub async fn move_faculty(
        &self,
        actor: &Actor,
        id: &str,
        building_id: &str,
        floor_id: Option<&str>,
    ) -> Result<Faculty, DatabaseError> {
        let faculty = self.get_faculty(id).await?;
        let target = self.get_building(building_id).await?;
        if let Some(floor_id) = floor_id {
            self.floor_in_building(floor_id, building_id).await?;
        }
        if self.faculty_name_taken(building_id, &faculty.name, Some(id)).await? {
            return Err(DatabaseError::Validation(format!(
                "faculty '{}' already exists in building {}",
                faculty.name, target.name
            )));
        }
        let from = self.get_building(&faculty.building_id).await?;

        self.atomically(async {
            self.db()
                .execute_with(
                    "UPDATE faculties SET building_id = ?1, floor_id = ?2 WHERE id = ?3",
                    || libsql::params![building_id, floor_id, id],
                )
                .await?;
            self.add_history(
                EntityType::Faculty,
                id,
                HistoryAction::Transferred,
                &format!("Transferred from building {} to building {}", from.name, target.name),
            )
            .await?;
            self.record(
                actor,
                NewAction::new(
                    ActionType::Update,
                    format!("Moved faculty {} to {}", faculty.name, target.name),
                )
                .on(EntityType::Faculty, id)
                .values(Some(faculty.building_id.clone()), Some(building_id.to_string())),
                TrailOp::Transfer,
                &serde_json::json!({ "building_id": building_id, "floor_id": floor_id }),
            )
            .await?;
            Ok(())
        })
        .await?;
        self.get_faculty(id).await
    }
}
