//! Equipment type catalog.

use chrono::Utc;

use inv_core::entities::EquipmentType;
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_EQUIPMENT_TYPE;

use crate::access::require_admin;
use crate::error::{DatabaseError, not_found};
use crate::helpers::parse_datetime;
use crate::repos::action::NewAction;
use crate::service::InventoryService;

fn row_to_type(row: &libsql::Row) -> Result<EquipmentType, DatabaseError> {
    Ok(EquipmentType {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        created_at: parse_datetime(&row.get::<String>(2)?)?,
    })
}

impl InventoryService {
    /// Register an equipment type. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers and `Validation` for an empty
    /// or duplicate name.
    pub async fn create_equipment_type(
        &self,
        actor: &Actor,
        name: &str,
    ) -> Result<EquipmentType, DatabaseError> {
        require_admin(actor, "create equipment types")?;
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation("type name must not be empty".into()));
        }
        let taken = self
            .db()
            .count_with("SELECT COUNT(*) FROM equipment_types WHERE name = ?1", || [name])
            .await?;
        if taken > 0 {
            return Err(DatabaseError::Validation(format!(
                "equipment type '{name}' already exists"
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_EQUIPMENT_TYPE).await?;
        self.db()
            .execute_with(
                "INSERT INTO equipment_types (id, name, created_at) VALUES (?1, ?2, ?3)",
                || libsql::params![id.as_str(), name, now.to_rfc3339()],
            )
            .await?;

        let ty = EquipmentType {
            id,
            name: name.to_string(),
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(ActionType::Create, format!("Created equipment type: {name}"))
                .on(EntityType::EquipmentType, &ty.id),
            TrailOp::Create,
            &ty,
        )
        .await?;
        Ok(ty)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_equipment_type(&self, id: &str) -> Result<EquipmentType, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name, created_at FROM equipment_types WHERE id = ?1",
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| not_found("equipment_type", id))?;
        row_to_type(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_equipment_types(&self) -> Result<Vec<EquipmentType>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name, created_at FROM equipment_types ORDER BY name",
                || (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_type(&row)?);
        }
        Ok(out)
    }

    /// Delete a type. Admin-only; refused while equipment still uses it.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `NotFound` or `InvalidState` (in use).
    pub async fn delete_equipment_type(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "delete equipment types")?;
        let ty = self.get_equipment_type(id).await?;
        let in_use = self
            .db()
            .count_with("SELECT COUNT(*) FROM equipment WHERE type_id = ?1", || [id])
            .await?;
        if in_use > 0 {
            return Err(DatabaseError::InvalidState(format!(
                "equipment type '{}' is used by {in_use} item(s)",
                ty.name
            )));
        }
        self.db()
            .execute_with("DELETE FROM equipment_types WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::Delete, format!("Deleted equipment type: {}", ty.name))
                .on(EntityType::EquipmentType, id),
            TrailOp::Delete,
            &ty,
        )
        .await?;
        Ok(())
    }
}
