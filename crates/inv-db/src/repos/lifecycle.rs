//! Repair and disposal lifecycle.
//!
//! Every status change of an equipment item that has side effects ends up
//! here, whether it comes from the dedicated operations or from a plain
//! status update. An item holds at most one repair and one disposal record.
//!
//! ```text
//! send_to_repair:  room -> original_room_id, status needs_repair, repair in_progress
//! repair completed: original_room_id -> room (if it still exists), status working
//! repair failed:    status disposed, disposal "failed repair"
//! dispose:          room -> original_room_id, status disposed, open repair failed
//! ```

use chrono::Utc;

use inv_core::audit_detail::StatusChangedDetail;
use inv_core::entities::{Disposal, Equipment, Repair};
use inv_core::enums::{ActionType, EntityType, EquipmentStatus, RepairStatus, TrailOp};
use inv_core::errors::CoreError;
use inv_core::identity::Actor;
use inv_core::ids::{PREFIX_DISPOSAL, PREFIX_REPAIR};

use crate::access::{owner_filter, require_owner};
use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_datetime};
use crate::repos::action::NewAction;
use crate::service::InventoryService;

/// Reason recorded when a failed repair ends in disposal.
pub const REASON_FAILED_REPAIR: &str = "failed repair";
/// Reason recorded when an item is disposed through a plain status update.
pub const REASON_STATUS_CHANGE: &str = "status changed to disposed";

const REPAIR_COLS: &str =
    "r.id, r.equipment_id, r.start_date, r.end_date, r.status, r.notes, r.original_room_id, r.created_at";
const DISPOSAL_COLS: &str =
    "d.id, d.equipment_id, d.disposal_date, d.reason, d.notes, d.original_room_id, d.created_at";

fn row_to_repair(row: &libsql::Row) -> Result<Repair, DatabaseError> {
    Ok(Repair {
        id: row.get::<String>(0)?,
        equipment_id: row.get::<String>(1)?,
        start_date: parse_datetime(&row.get::<String>(2)?)?,
        end_date: parse_optional_datetime(get_opt_string(row, 3)?.as_deref())?,
        status: parse_enum(&row.get::<String>(4)?)?,
        notes: get_opt_string(row, 5)?,
        original_room_id: get_opt_string(row, 6)?,
        created_at: parse_datetime(&row.get::<String>(7)?)?,
    })
}

fn row_to_disposal(row: &libsql::Row) -> Result<Disposal, DatabaseError> {
    Ok(Disposal {
        id: row.get::<String>(0)?,
        equipment_id: row.get::<String>(1)?,
        disposal_date: parse_datetime(&row.get::<String>(2)?)?,
        reason: row.get::<String>(3)?,
        notes: get_opt_string(row, 4)?,
        original_room_id: get_opt_string(row, 5)?,
        created_at: parse_datetime(&row.get::<String>(6)?)?,
    })
}

fn status_detail(
    from: EquipmentStatus,
    to: EquipmentStatus,
    reason: Option<&str>,
) -> Result<serde_json::Value, DatabaseError> {
    Ok(serde_json::to_value(StatusChangedDetail {
        from: from.to_string(),
        to: to.to_string(),
        reason: reason.map(String::from),
    })?)
}

fn invalid_transition(eq: &Equipment, to: EquipmentStatus) -> DatabaseError {
    CoreError::InvalidTransition {
        entity_type: "equipment".into(),
        id: eq.id.clone(),
        from: eq.status.to_string(),
        to: to.to_string(),
    }
    .into()
}

impl InventoryService {
    /// Write status and room together and refresh the label.
    async fn set_equipment_state(
        &self,
        id: &str,
        status: EquipmentStatus,
        room_id: Option<&str>,
    ) -> Result<(), DatabaseError> {
        self.db()
            .execute_with(
                "UPDATE equipment SET status = ?1, room_id = ?2, updated_at = ?3 WHERE id = ?4",
                || libsql::params![status.as_str(), room_id, Utc::now().to_rfc3339(), id],
            )
            .await?;
        self.refresh_derived_columns(id).await?;
        Ok(())
    }

    /// The repair record of an item, whatever its status.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn repair_for_equipment(&self, equipment_id: &str) -> Result<Option<Repair>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {REPAIR_COLS} FROM repairs r WHERE r.equipment_id = ?1"),
                || [equipment_id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_repair(&row)).transpose()
    }

    /// The disposal record of an item, if any.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn disposal_for_equipment(
        &self,
        equipment_id: &str,
    ) -> Result<Option<Disposal>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {DISPOSAL_COLS} FROM disposals d WHERE d.equipment_id = ?1"),
                || [equipment_id],
            )
            .await?;
        rows.next().await?.map(|row| row_to_disposal(&row)).transpose()
    }

    /// Take `eq` out of its room into the repair catalog. Runs inside the
    /// caller's transaction.
    pub(crate) async fn start_repair(
        &self,
        actor: &Actor,
        eq: &Equipment,
        notes: Option<&str>,
    ) -> Result<Repair, DatabaseError> {
        match eq.status {
            EquipmentStatus::Disposed => {
                return Err(DatabaseError::InvalidState(format!(
                    "equipment {} is disposed and cannot be repaired",
                    eq.id
                )));
            }
            EquipmentStatus::NeedsRepair => {
                return Err(DatabaseError::InvalidState(format!(
                    "equipment {} is already in repair",
                    eq.id
                )));
            }
            EquipmentStatus::New | EquipmentStatus::Working => {}
        }
        if self.repair_for_equipment(&eq.id).await?.is_some() {
            return Err(DatabaseError::InvalidState(format!(
                "equipment {} already has a repair record",
                eq.id
            )));
        }

        let now = Utc::now();
        let repair = Repair {
            id: self.db().generate_id(PREFIX_REPAIR).await?,
            equipment_id: eq.id.clone(),
            start_date: now,
            end_date: None,
            status: RepairStatus::InProgress,
            notes: notes.map(String::from),
            original_room_id: eq.room_id.clone(),
            created_at: now,
        };
        self.db()
            .execute_with(
                "INSERT INTO repairs (id, equipment_id, start_date, status, notes, original_room_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?3)",
                || {
                    libsql::params![
                        repair.id.as_str(),
                        repair.equipment_id.as_str(),
                        now.to_rfc3339(),
                        repair.status.as_str(),
                        repair.notes.as_deref(),
                        repair.original_room_id.as_deref()
                    ]
                },
            )
            .await?;
        self.set_equipment_state(&eq.id, EquipmentStatus::NeedsRepair, None)
            .await?;
        tracing::debug!(equipment = %eq.id, repair = %repair.id, "sent to repair");

        self.record(
            actor,
            NewAction::new(ActionType::SendToRepair, format!("Sent to repair: {}", eq.name))
                .on(EntityType::Equipment, &eq.id)
                .values(
                    Some(eq.status.to_string()),
                    Some(EquipmentStatus::NeedsRepair.to_string()),
                )
                .details(status_detail(eq.status, EquipmentStatus::NeedsRepair, notes)?),
            TrailOp::Transition,
            &repair,
        )
        .await?;
        self.record(
            actor,
            NewAction::new(ActionType::CreateRepair, format!("Created repair for: {}", eq.name))
                .on(EntityType::Repair, &repair.id),
            TrailOp::Create,
            &repair,
        )
        .await?;
        Ok(repair)
    }

    /// Send an item to repair.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` if the item is disposed, already in repair or
    /// already has a repair record.
    pub async fn send_to_repair(
        &self,
        actor: &Actor,
        equipment_id: &str,
        notes: Option<&str>,
    ) -> Result<Repair, DatabaseError> {
        let eq = self.get_equipment(actor, equipment_id).await?;
        self.atomically(self.start_repair(actor, &eq, notes)).await
    }

    /// Close an in-progress repair as completed or failed. Runs inside the
    /// caller's transaction.
    pub(crate) async fn finish_repair(
        &self,
        actor: &Actor,
        repair: &Repair,
        to: RepairStatus,
        notes: Option<&str>,
    ) -> Result<Repair, DatabaseError> {
        if repair.status != RepairStatus::InProgress {
            return Err(DatabaseError::InvalidState(format!(
                "repair {} is already completed",
                repair.id
            )));
        }
        let now = Utc::now();
        let end_date = (to != RepairStatus::InProgress).then_some(now);
        let notes = notes.map(String::from).or_else(|| repair.notes.clone());
        self.db()
            .execute_with(
                "UPDATE repairs SET status = ?1, end_date = ?2, notes = ?3 WHERE id = ?4",
                || {
                    libsql::params![
                        to.as_str(),
                        end_date.map(|d| d.to_rfc3339()),
                        notes.as_deref(),
                        repair.id.as_str()
                    ]
                },
            )
            .await?;

        let eq = self.load_equipment(&repair.equipment_id).await?;
        match to {
            RepairStatus::InProgress => {}
            RepairStatus::Completed => {
                let room = match repair.original_room_id.as_deref() {
                    Some(room_id) if self.room_exists(room_id).await? => Some(room_id),
                    Some(room_id) => {
                        tracing::warn!(
                            equipment = %eq.id,
                            room = room_id,
                            "original room no longer exists; equipment left unplaced"
                        );
                        None
                    }
                    None => None,
                };
                self.set_equipment_state(&eq.id, EquipmentStatus::Working, room)
                    .await?;
            }
            RepairStatus::Failed => {
                self.set_equipment_state(&eq.id, EquipmentStatus::Disposed, None)
                    .await?;
                if self.disposal_for_equipment(&eq.id).await?.is_none() {
                    self.insert_disposal(
                        actor,
                        &eq,
                        REASON_FAILED_REPAIR,
                        None,
                        repair.original_room_id.as_deref(),
                    )
                    .await?;
                }
            }
        }

        let updated = Repair {
            status: to,
            end_date,
            notes,
            ..repair.clone()
        };
        self.record(
            actor,
            NewAction::new(
                ActionType::UpdateRepair,
                format!("Repair of {} set to {to}", eq.name),
            )
            .on(EntityType::Repair, &repair.id)
            .values(Some(repair.status.to_string()), Some(to.to_string())),
            TrailOp::Transition,
            &updated,
        )
        .await?;
        Ok(updated)
    }

    /// Change the status of a repair. Setting `in_progress` again only
    /// replaces the notes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidState` when the repair is no longer in progress.
    pub async fn update_repair_status(
        &self,
        actor: &Actor,
        repair_id: &str,
        status: RepairStatus,
        notes: Option<&str>,
    ) -> Result<Repair, DatabaseError> {
        let repair = self.get_repair(actor, repair_id).await?;
        self.atomically(self.finish_repair(actor, &repair, status, notes))
            .await
    }

    async fn insert_disposal(
        &self,
        actor: &Actor,
        eq: &Equipment,
        reason: &str,
        notes: Option<&str>,
        original_room_id: Option<&str>,
    ) -> Result<Disposal, DatabaseError> {
        let now = Utc::now();
        let disposal = Disposal {
            id: self.db().generate_id(PREFIX_DISPOSAL).await?,
            equipment_id: eq.id.clone(),
            disposal_date: now,
            reason: reason.to_string(),
            notes: notes.map(String::from),
            original_room_id: original_room_id.map(String::from),
            created_at: now,
        };
        self.db()
            .execute_with(
                "INSERT INTO disposals (id, equipment_id, disposal_date, reason, notes, original_room_id, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?3)",
                || {
                    libsql::params![
                        disposal.id.as_str(),
                        disposal.equipment_id.as_str(),
                        now.to_rfc3339(),
                        disposal.reason.as_str(),
                        disposal.notes.as_deref(),
                        disposal.original_room_id.as_deref()
                    ]
                },
            )
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::CreateDisposal, format!("Created disposal for: {}", eq.name))
                .on(EntityType::Disposal, &disposal.id),
            TrailOp::Create,
            &disposal,
        )
        .await?;
        Ok(disposal)
    }

    /// Write `eq` off. An open repair is closed as failed. Runs inside the
    /// caller's transaction.
    pub(crate) async fn start_disposal(
        &self,
        actor: &Actor,
        eq: &Equipment,
        reason: &str,
        notes: Option<&str>,
    ) -> Result<Disposal, DatabaseError> {
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DatabaseError::Validation("disposal reason must not be empty".into()));
        }
        if eq.status == EquipmentStatus::Disposed {
            return Err(DatabaseError::InvalidState(format!(
                "equipment {} is already disposed",
                eq.id
            )));
        }
        if self.disposal_for_equipment(&eq.id).await?.is_some() {
            return Err(DatabaseError::InvalidState(format!(
                "equipment {} already has a disposal record",
                eq.id
            )));
        }

        let mut original_room = eq.room_id.clone();
        if let Some(repair) = self.repair_for_equipment(&eq.id).await? {
            if repair.status == RepairStatus::InProgress {
                self.db()
                    .execute_with(
                        "UPDATE repairs SET status = 'failed', end_date = ?1 WHERE id = ?2",
                        || libsql::params![Utc::now().to_rfc3339(), repair.id.as_str()],
                    )
                    .await?;
                tracing::debug!(repair = %repair.id, "open repair closed by disposal");
                original_room = original_room.or(repair.original_room_id);
            }
        }

        self.set_equipment_state(&eq.id, EquipmentStatus::Disposed, None)
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::DisposeEquipment, format!("Disposed equipment: {}", eq.name))
                .on(EntityType::Equipment, &eq.id)
                .values(
                    Some(eq.status.to_string()),
                    Some(EquipmentStatus::Disposed.to_string()),
                )
                .details(status_detail(eq.status, EquipmentStatus::Disposed, Some(reason))?),
            TrailOp::Transition,
            &serde_json::json!({ "reason": reason, "notes": notes }),
        )
        .await?;
        self.insert_disposal(actor, eq, reason, notes, original_room.as_deref())
            .await
    }

    /// Dispose of an item.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty reason and `InvalidState` if the
    /// item is already disposed or has a disposal record.
    pub async fn dispose_equipment(
        &self,
        actor: &Actor,
        equipment_id: &str,
        reason: &str,
        notes: Option<&str>,
    ) -> Result<Disposal, DatabaseError> {
        let eq = self.get_equipment(actor, equipment_id).await?;
        self.atomically(self.start_disposal(actor, &eq, reason, notes))
            .await
    }

    /// Carry out a status change requested through a plain update. Runs
    /// inside the caller's transaction.
    pub(crate) async fn transition_equipment(
        &self,
        actor: &Actor,
        eq: &Equipment,
        to: EquipmentStatus,
    ) -> Result<(), DatabaseError> {
        if !eq.status.can_transition_to(to) {
            return Err(invalid_transition(eq, to));
        }
        match (eq.status, to) {
            (_, EquipmentStatus::NeedsRepair) => {
                self.start_repair(actor, eq, None).await?;
            }
            (_, EquipmentStatus::Disposed) => {
                if self.disposal_for_equipment(&eq.id).await?.is_some() {
                    self.set_equipment_state(&eq.id, to, None).await?;
                } else {
                    self.start_disposal(actor, eq, REASON_STATUS_CHANGE, None)
                        .await?;
                }
            }
            (EquipmentStatus::NeedsRepair, EquipmentStatus::Working) => {
                match self.repair_for_equipment(&eq.id).await? {
                    Some(repair) if repair.status == RepairStatus::InProgress => {
                        self.finish_repair(actor, &repair, RepairStatus::Completed, None)
                            .await?;
                    }
                    _ => {
                        self.set_equipment_state(&eq.id, to, eq.room_id.as_deref())
                            .await?;
                    }
                }
            }
            _ => {
                self.set_equipment_state(&eq.id, to, eq.room_id.as_deref())
                    .await?;
            }
        }
        Ok(())
    }

    /// # Errors
    ///
    /// Returns `NotFound`, or `PermissionDenied` when the repaired item
    /// belongs to another manager.
    pub async fn get_repair(&self, actor: &Actor, id: &str) -> Result<Repair, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {REPAIR_COLS}, e.author_id FROM repairs r
                     JOIN equipment e ON e.id = r.equipment_id WHERE r.id = ?1"
                ),
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("repair", id))?;
        require_owner(actor, get_opt_string(&row, 8)?.as_deref(), "access to this repair")?;
        row_to_repair(&row)
    }

    /// Repairs of visible equipment, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_repairs(
        &self,
        actor: &Actor,
        status: Option<RepairStatus>,
    ) -> Result<Vec<Repair>, DatabaseError> {
        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", 2);
        let mut params: Vec<libsql::Value> = vec![status.map(RepairStatus::as_str).into()];
        params.extend(owner_params);
        let sql = format!(
            "SELECT {REPAIR_COLS} FROM repairs r JOIN equipment e ON e.id = r.equipment_id
             WHERE (?1 IS NULL OR r.status = ?1) {owner_sql}
             ORDER BY r.start_date DESC, r.rowid DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_repair(&row)?);
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied`.
    pub async fn get_disposal(&self, actor: &Actor, id: &str) -> Result<Disposal, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {DISPOSAL_COLS}, e.author_id FROM disposals d
                     JOIN equipment e ON e.id = d.equipment_id WHERE d.id = ?1"
                ),
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("disposal", id))?;
        require_owner(actor, get_opt_string(&row, 7)?.as_deref(), "access to this disposal")?;
        row_to_disposal(&row)
    }

    /// Disposals of visible equipment, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_disposals(&self, actor: &Actor) -> Result<Vec<Disposal>, DatabaseError> {
        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", 1);
        let sql = format!(
            "SELECT {DISPOSAL_COLS} FROM disposals d JOIN equipment e ON e.id = d.equipment_id
             WHERE 1 = 1 {owner_sql}
             ORDER BY d.disposal_date DESC, d.rowid DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(owner_params.clone()))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_disposal(&row)?);
        }
        Ok(out)
    }

    /// Amend the reason or notes of a disposal.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty reason, `NotFound` or
    /// `PermissionDenied`.
    pub async fn update_disposal(
        &self,
        actor: &Actor,
        id: &str,
        reason: Option<&str>,
        notes: Option<Option<&str>>,
    ) -> Result<Disposal, DatabaseError> {
        let before = self.get_disposal(actor, id).await?;
        let reason = match reason.map(str::trim) {
            Some("") => {
                return Err(DatabaseError::Validation("disposal reason must not be empty".into()));
            }
            Some(r) => r.to_string(),
            None => before.reason.clone(),
        };
        let notes = notes.map_or_else(|| before.notes.clone(), |n| n.map(String::from));
        self.db()
            .execute_with(
                "UPDATE disposals SET reason = ?1, notes = ?2 WHERE id = ?3",
                || libsql::params![reason.as_str(), notes.as_deref(), id],
            )
            .await?;
        let after = Disposal {
            reason,
            notes,
            ..before.clone()
        };
        self.record(
            actor,
            NewAction::new(ActionType::UpdateDisposal, format!("Updated disposal {id}"))
                .on(EntityType::Disposal, id)
                .values(Some(before.reason), Some(after.reason.clone())),
            TrailOp::Update,
            &after,
        )
        .await?;
        Ok(after)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use inv_core::entities::LOCATION_REPAIR;

    use crate::repos::action::ActionFilter;
    use crate::repos::equipment::NewEquipment;
    use crate::test_support::helpers::*;

    use super::*;

    async fn placed_desk(svc: &InventoryService, actor: &Actor, room_id: &str) -> Equipment {
        let ty = svc.list_equipment_types().await.unwrap().remove(0);
        let mut new = NewEquipment::new(&ty.id, "Desk");
        new.room_id = Some(room_id.to_string());
        new.inn = 4242;
        svc.create_equipment(actor, new).await.unwrap()
    }

    #[tokio::test]
    async fn repair_round_trip_restores_room() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;

        let repair = svc.send_to_repair(&admin, &eq.id, Some("wobbly leg")).await.unwrap();
        assert_eq!(repair.status, RepairStatus::InProgress);
        assert_eq!(repair.original_room_id.as_deref(), Some(c.room_a.id.as_str()));

        let in_repair = svc.get_equipment(&admin, &eq.id).await.unwrap();
        assert_eq!(in_repair.status, EquipmentStatus::NeedsRepair);
        assert_eq!(in_repair.room_id, None);
        assert!(in_repair.qr_payload.unwrap().ends_with("Кабинет: N/A"));

        let done = svc
            .update_repair_status(&admin, &repair.id, RepairStatus::Completed, None)
            .await
            .unwrap();
        assert!(done.end_date.is_some());
        assert_eq!(done.notes.as_deref(), Some("wobbly leg"));

        let back = svc.get_equipment(&admin, &eq.id).await.unwrap();
        assert_eq!(back.status, EquipmentStatus::Working);
        assert_eq!(back.room_id.as_deref(), Some(c.room_a.id.as_str()));
        assert!(back.qr_payload.unwrap().ends_with("Кабинет: 101"));

        let again = svc
            .update_repair_status(&admin, &repair.id, RepairStatus::Failed, None)
            .await;
        assert!(matches!(again, Err(DatabaseError::InvalidState(_))));
    }

    #[tokio::test]
    async fn repair_preconditions() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;

        svc.send_to_repair(&admin, &eq.id, None).await.unwrap();
        assert!(matches!(
            svc.send_to_repair(&admin, &eq.id, None).await,
            Err(DatabaseError::InvalidState(_))
        ));

        let other = placed_desk(&svc, &admin, &c.room_b.id).await;
        svc.dispose_equipment(&admin, &other.id, "broken beyond repair", None)
            .await
            .unwrap();
        assert!(matches!(
            svc.send_to_repair(&admin, &other.id, None).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn failed_repair_disposes() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_b.id).await;

        let repair = svc.send_to_repair(&admin, &eq.id, None).await.unwrap();
        svc.update_repair_status(&admin, &repair.id, RepairStatus::Failed, Some("no parts"))
            .await
            .unwrap();

        let eq = svc.get_equipment(&admin, &eq.id).await.unwrap();
        assert_eq!(eq.status, EquipmentStatus::Disposed);
        assert_eq!(eq.room_id, None);
        let disposal = svc.disposal_for_equipment(&eq.id).await.unwrap().unwrap();
        assert_eq!(disposal.reason, REASON_FAILED_REPAIR);
        assert_eq!(disposal.original_room_id.as_deref(), Some(c.room_b.id.as_str()));
    }

    #[tokio::test]
    async fn completed_repair_with_deleted_room_leaves_item_unplaced() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;
        let repair = svc.send_to_repair(&admin, &eq.id, None).await.unwrap();

        svc.delete_room(&admin, &c.room_a.id).await.unwrap();
        svc.update_repair_status(&admin, &repair.id, RepairStatus::Completed, None)
            .await
            .unwrap();

        let eq = svc.get_equipment(&admin, &eq.id).await.unwrap();
        assert_eq!(eq.status, EquipmentStatus::Working);
        assert_eq!(eq.room_id, None);
    }

    #[tokio::test]
    async fn dispose_closes_open_repair() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;
        svc.send_to_repair(&admin, &eq.id, None).await.unwrap();
        assert_eq!(
            svc.equipment_location(&svc.get_equipment(&admin, &eq.id).await.unwrap())
                .await
                .unwrap(),
            LOCATION_REPAIR
        );

        let disposal = svc
            .dispose_equipment(&admin, &eq.id, "obsolete", Some("sold for parts"))
            .await
            .unwrap();
        assert_eq!(disposal.original_room_id.as_deref(), Some(c.room_a.id.as_str()));
        let repair = svc.repair_for_equipment(&eq.id).await.unwrap().unwrap();
        assert_eq!(repair.status, RepairStatus::Failed);

        assert!(matches!(
            svc.dispose_equipment(&admin, &eq.id, "again", None).await,
            Err(DatabaseError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn dispose_requires_reason() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;
        assert!(matches!(
            svc.dispose_equipment(&admin, &eq.id, "  ", None).await,
            Err(DatabaseError::Validation(_))
        ));
        let eq = svc.get_equipment(&admin, &eq.id).await.unwrap();
        assert_eq!(eq.status, EquipmentStatus::New);
    }

    #[tokio::test]
    async fn audit_trail_of_lifecycle() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let eq = placed_desk(&svc, &admin, &c.room_a.id).await;
        let repair = svc.send_to_repair(&admin, &eq.id, None).await.unwrap();
        svc.update_repair_status(&admin, &repair.id, RepairStatus::Completed, None)
            .await
            .unwrap();

        let types: Vec<ActionType> = svc
            .query_actions(&admin, &ActionFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|a| a.action_type)
            .collect();
        for expected in [
            ActionType::SendToRepair,
            ActionType::CreateRepair,
            ActionType::UpdateRepair,
        ] {
            assert!(types.contains(&expected), "missing {expected}");
        }
    }

    #[tokio::test]
    async fn scoped_listing_and_disposal_update() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let m = manager(&svc, &admin, "k.kuznetsov").await;
        let c = campus(&svc, &admin).await;
        equipment_type(&svc, &admin, "Desk").await;
        let mine = placed_desk(&svc, &m, &c.room_a.id).await;
        let theirs = placed_desk(&svc, &admin, &c.room_b.id).await;

        svc.send_to_repair(&m, &mine.id, None).await.unwrap();
        let foreign = svc.send_to_repair(&admin, &theirs.id, None).await.unwrap();

        assert_eq!(svc.list_repairs(&m, None).await.unwrap().len(), 1);
        assert_eq!(svc.list_repairs(&admin, None).await.unwrap().len(), 2);
        assert_eq!(
            svc.list_repairs(&admin, Some(RepairStatus::Completed))
                .await
                .unwrap()
                .len(),
            0
        );
        assert!(matches!(
            svc.get_repair(&m, &foreign.id).await,
            Err(DatabaseError::PermissionDenied(_))
        ));

        let d = svc.dispose_equipment(&m, &mine.id, "old", None).await.unwrap();
        let d = svc
            .update_disposal(&m, &d.id, Some("water damage"), Some(Some("basement flood")))
            .await
            .unwrap();
        assert_eq!(d.reason, "water damage");
        assert_eq!(d.notes.as_deref(), Some("basement flood"));
        assert_eq!(svc.list_disposals(&m).await.unwrap().len(), 1);
        assert_eq!(svc.get_disposal(&admin, &d.id).await.unwrap(), d);
    }
}
