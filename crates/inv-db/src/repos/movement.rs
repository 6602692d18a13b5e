//! Equipment movements between rooms.

use chrono::Utc;

use inv_core::audit_detail::MoveDetail;
use inv_core::entities::Movement;
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_MOVEMENT;

use crate::access::owner_filter;
use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_opt_string, parse_datetime, placeholders};
use crate::repos::action::NewAction;
use crate::service::InventoryService;

fn row_to_movement(row: &libsql::Row) -> Result<Movement, DatabaseError> {
    Ok(Movement {
        id: row.get::<String>(0)?,
        equipment_id: row.get::<String>(1)?,
        from_room_id: get_opt_string(row, 2)?,
        to_room_id: row.get::<String>(3)?,
        moved_at: parse_datetime(&row.get::<String>(4)?)?,
        note: get_opt_string(row, 5)?,
        user_id: get_opt_string(row, 6)?,
    })
}

/// Drop repeated ids, keeping first occurrences in order.
fn dedup_ids(ids: &[String]) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    ids.iter()
        .filter(|id| seen.insert(id.as_str()))
        .cloned()
        .collect()
}

impl InventoryService {
    /// Move a batch of items from one room to another.
    ///
    /// All items must currently stand in `from_room_id` and be visible to
    /// the actor; otherwise nothing moves. Each item gets a movement row and
    /// a MOVE audit entry, and a batch of more than one item gets one more
    /// MOVE entry covering all of them.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty batch, identical rooms or items
    /// outside `from_room_id`, and `NotFound` for an unknown room.
    pub async fn move_equipment(
        &self,
        actor: &Actor,
        ids: &[String],
        from_room_id: &str,
        to_room_id: &str,
        note: Option<&str>,
    ) -> Result<Vec<Movement>, DatabaseError> {
        let ids = dedup_ids(ids);
        if ids.is_empty() {
            return Err(DatabaseError::Validation("no equipment ids given".into()));
        }
        if from_room_id == to_room_id {
            return Err(DatabaseError::Validation(
                "source and destination room must differ".into(),
            ));
        }
        for room_id in [from_room_id, to_room_id] {
            if !self.room_exists(room_id).await? {
                return Err(not_found("room", room_id));
            }
        }

        let mut params: Vec<libsql::Value> = vec![from_room_id.into()];
        params.extend(ids.iter().map(|id| libsql::Value::from(id.clone())));
        let (owner_sql, owner_params) = owner_filter(actor, "author_id", params.len() + 1);
        params.extend(owner_params);
        let matched = self
            .db()
            .count_with(
                &format!(
                    "SELECT COUNT(*) FROM equipment WHERE room_id = ?1 AND id IN ({}) {owner_sql}",
                    placeholders(2, ids.len())
                ),
                || libsql::params_from_iter(params.clone()),
            )
            .await?;
        if matched != ids.len() as u64 {
            return Err(DatabaseError::Validation(
                "some ids not found or not in room".into(),
            ));
        }

        self.atomically(async {
            let now = Utc::now();
            let mut moved = Vec::with_capacity(ids.len());
            for id in &ids {
                self.db()
                    .execute_with(
                        "UPDATE equipment SET room_id = ?1, updated_at = ?2 WHERE id = ?3",
                        || libsql::params![to_room_id, now.to_rfc3339(), id.as_str()],
                    )
                    .await?;
                self.refresh_derived_columns(id).await?;

                let movement = Movement {
                    id: self.db().generate_id(PREFIX_MOVEMENT).await?,
                    equipment_id: id.clone(),
                    from_room_id: Some(from_room_id.to_string()),
                    to_room_id: to_room_id.to_string(),
                    moved_at: now,
                    note: note.map(String::from),
                    user_id: Some(actor.user_id.clone()),
                };
                self.db()
                    .execute_with(
                        "INSERT INTO movements (id, equipment_id, from_room_id, to_room_id, moved_at, note, user_id)
                         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                        || {
                            libsql::params![
                                movement.id.as_str(),
                                id.as_str(),
                                from_room_id,
                                to_room_id,
                                now.to_rfc3339(),
                                note,
                                actor.user_id.as_str()
                            ]
                        },
                    )
                    .await?;

                let detail = MoveDetail {
                    equipment_ids: vec![id.clone()],
                    from_room_id: from_room_id.to_string(),
                    to_room_id: to_room_id.to_string(),
                    note: note.map(String::from),
                };
                self.record(
                    actor,
                    NewAction::new(ActionType::Move, format!("Moved equipment {id}"))
                        .on(EntityType::Equipment, id)
                        .values(Some(from_room_id.to_string()), Some(to_room_id.to_string()))
                        .details(serde_json::to_value(&detail)?),
                    TrailOp::Move,
                    &movement,
                )
                .await?;
                moved.push(movement);
            }

            if moved.len() > 1 {
                let detail = MoveDetail {
                    equipment_ids: ids.clone(),
                    from_room_id: from_room_id.to_string(),
                    to_room_id: to_room_id.to_string(),
                    note: note.map(String::from),
                };
                self.log_action(
                    actor,
                    NewAction::new(ActionType::Move, format!("Moved {} items", moved.len()))
                        .values(Some(from_room_id.to_string()), Some(to_room_id.to_string()))
                        .details(serde_json::to_value(&detail)?),
                )
                .await?;
            }
            tracing::debug!(count = moved.len(), from = from_room_id, to = to_room_id, "moved equipment");
            Ok(moved)
        })
        .await
    }

    /// Movements of one item, newest first.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied` for the item.
    pub async fn movement_history(
        &self,
        actor: &Actor,
        equipment_id: &str,
    ) -> Result<Vec<Movement>, DatabaseError> {
        self.get_equipment(actor, equipment_id).await?;
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, equipment_id, from_room_id, to_room_id, moved_at, note, user_id
                 FROM movements WHERE equipment_id = ?1
                 ORDER BY moved_at DESC, rowid DESC",
                || [equipment_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_movement(&row)?);
        }
        Ok(out)
    }
}
