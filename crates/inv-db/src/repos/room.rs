//! Rooms: CRUD, structural operations (split, merge, transfer) and
//! shareable room links.

use std::collections::HashSet;

use chrono::Utc;

use inv_core::audit_detail::RestructureDetail;
use inv_core::entities::Room;
use inv_core::enums::{ActionType, EntityType, HistoryAction, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_ROOM;
use inv_core::qr::parse_room_link;

use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_bool, get_opt_string, parse_datetime};
use crate::repos::action::NewAction;
use crate::repos::history::check_merge_sources;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::room::RoomUpdate;

const SELECT_COLS: &str =
    "id, building_id, floor_id, derived_from, author_id, number, name, is_special, uid, created_at";

/// Fields for a new room.
#[derive(Debug, Clone)]
pub struct NewRoom {
    pub building_id: String,
    pub floor_id: String,
    pub number: String,
    pub name: Option<String>,
    pub is_special: bool,
}

/// Optional filters for [`InventoryService::list_rooms`].
#[derive(Debug, Clone, Default)]
pub struct RoomFilter {
    pub building_id: Option<String>,
    pub floor_id: Option<String>,
}

fn row_to_room(row: &libsql::Row) -> Result<Room, DatabaseError> {
    let uid = row.get::<String>(8)?;
    Ok(Room {
        id: row.get::<String>(0)?,
        building_id: row.get::<String>(1)?,
        floor_id: row.get::<String>(2)?,
        derived_from: get_opt_string(row, 3)?,
        author_id: get_opt_string(row, 4)?,
        number: row.get::<String>(5)?,
        name: get_opt_string(row, 6)?,
        is_special: get_bool(row, 7)?,
        qr_payload: uid.clone(),
        uid,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl InventoryService {
    async fn room_number_taken(
        &self,
        floor_id: &str,
        number: &str,
        except: Option<&str>,
    ) -> Result<bool, DatabaseError> {
        let n = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM rooms WHERE floor_id = ?1 AND number = ?2 AND id != ?3",
                || libsql::params![floor_id, number, except.unwrap_or("")],
            )
            .await?;
        Ok(n > 0)
    }

    async fn insert_room(
        &self,
        actor: &Actor,
        new: &NewRoom,
        derived_from: Option<&str>,
    ) -> Result<Room, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ROOM).await?;
        let uid = self.db().generate_uid().await?;
        self.db()
            .execute_with(
                "INSERT INTO rooms (id, building_id, floor_id, derived_from, author_id, number, name,
                                    is_special, uid, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                || {
                    libsql::params![
                        id.as_str(),
                        new.building_id.as_str(),
                        new.floor_id.as_str(),
                        derived_from,
                        actor.user_id.as_str(),
                        new.number.as_str(),
                        new.name.as_deref(),
                        i64::from(new.is_special),
                        uid.as_str(),
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;
        Ok(Room {
            id,
            building_id: new.building_id.clone(),
            floor_id: new.floor_id.clone(),
            derived_from: derived_from.map(String::from),
            author_id: Some(actor.user_id.clone()),
            number: new.number.clone(),
            name: new.name.clone(),
            is_special: new.is_special,
            qr_payload: uid.clone(),
            uid,
            created_at: now,
        })
    }

    /// Create a room. The floor must belong to the building and the number
    /// must be free on that floor.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown building or floor and `Validation`
    /// for an empty or taken number or a foreign floor.
    pub async fn create_room(&self, actor: &Actor, new: NewRoom) -> Result<Room, DatabaseError> {
        let new = NewRoom {
            number: new.number.trim().to_string(),
            ..new
        };
        if new.number.is_empty() {
            return Err(DatabaseError::Validation("room number must not be empty".into()));
        }
        self.get_building(&new.building_id).await?;
        self.floor_in_building(&new.floor_id, &new.building_id).await?;
        if self.room_number_taken(&new.floor_id, &new.number, None).await? {
            return Err(DatabaseError::Validation(format!(
                "room {} already exists on this floor",
                new.number
            )));
        }

        let room = self.insert_room(actor, &new, None).await?;
        self.add_history(
            EntityType::Room,
            &room.id,
            HistoryAction::Created,
            &format!("Created room {}", room.number),
        )
        .await?;
        self.record(
            actor,
            NewAction::new(ActionType::CreateRoom, format!("Created room: {}", room.number))
                .on(EntityType::Room, &room.id),
            TrailOp::Create,
            &room,
        )
        .await?;
        Ok(room)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_room(&self, id: &str) -> Result<Room, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(&format!("SELECT {SELECT_COLS} FROM rooms WHERE id = ?1"), || [id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("room", id))?;
        row_to_room(&row)
    }

    /// # Errors
    ///
    /// Returns `NotFound` when no room carries that uid.
    pub async fn get_room_by_uid(&self, uid: &str) -> Result<Room, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(&format!("SELECT {SELECT_COLS} FROM rooms WHERE uid = ?1"), || [uid])
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("room", uid))?;
        row_to_room(&row)
    }

    pub(crate) async fn room_exists(&self, id: &str) -> Result<bool, DatabaseError> {
        let n = self
            .db()
            .count_with("SELECT COUNT(*) FROM rooms WHERE id = ?1", || [id])
            .await?;
        Ok(n > 0)
    }

    /// Rooms ordered by number, optionally limited to a building and/or floor.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_rooms(&self, filter: &RoomFilter) -> Result<Vec<Room>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {SELECT_COLS} FROM rooms
                     WHERE (?1 IS NULL OR building_id = ?1) AND (?2 IS NULL OR floor_id = ?2)
                     ORDER BY number"
                ),
                || libsql::params![filter.building_id.as_deref(), filter.floor_id.as_deref()],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_room(&row)?);
        }
        Ok(out)
    }

    /// Every room of a building.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown building.
    pub async fn rooms_by_building(&self, building_id: &str) -> Result<Vec<Room>, DatabaseError> {
        self.get_building(building_id).await?;
        self.list_rooms(&RoomFilter {
            building_id: Some(building_id.to_string()),
            floor_id: None,
        })
        .await
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn update_room(
        &self,
        actor: &Actor,
        id: &str,
        update: RoomUpdate,
    ) -> Result<Room, DatabaseError> {
        let before = self.get_room(id).await?;
        let mut set = SetClause::default();
        if let Some(ref name) = update.name {
            set.push_opt("name", name.as_deref());
        }
        if let Some(is_special) = update.is_special {
            set.push("is_special", i64::from(is_special));
        }
        if set.is_empty() {
            return Ok(before);
        }
        let (sql, params) = set.into_sql("rooms", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        let changes = serde_json::to_value(&update)?;
        self.add_history(
            EntityType::Room,
            id,
            HistoryAction::Updated,
            &format!("Updated fields: {changes}"),
        )
        .await?;
        self.record(
            actor,
            NewAction::new(ActionType::Update, format!("Updated room: {}", before.number))
                .on(EntityType::Room, id)
                .details(changes),
            TrailOp::Update,
            &update,
        )
        .await?;
        self.get_room(id).await
    }

    /// Delete a room. Equipment in it is kept without a room and its labels
    /// are regenerated.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_room(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let room = self.get_room(id).await?;
        let housed = self.equipment_ids_in_room(id).await?;

        self.atomically(async {
            self.db()
                .execute_with("DELETE FROM rooms WHERE id = ?1", || [id])
                .await?;
            for eq_id in &housed {
                self.refresh_derived_columns(eq_id).await?;
            }
            self.record(
                actor,
                NewAction::new(ActionType::DeleteRoom, format!("Deleted room: {}", room.number))
                    .on(EntityType::Room, id),
                TrailOp::Delete,
                &room,
            )
            .await?;
            Ok(())
        })
        .await
    }

    /// Split a room into new rooms on the same floor. Children inherit
    /// `is_special` and point back at the parent; the parent stops being
    /// special.
    ///
    /// # Errors
    ///
    /// Returns `Validation` if a number is empty, repeated or already used on
    /// the floor. Nothing is written in that case.
    pub async fn split_room(
        &self,
        actor: &Actor,
        id: &str,
        new_numbers: &[String],
    ) -> Result<Vec<Room>, DatabaseError> {
        let parent = self.get_room(id).await?;
        if new_numbers.is_empty() {
            return Err(DatabaseError::Validation("at least one new room number is required".into()));
        }

        let mut errors = Vec::new();
        let mut seen = HashSet::new();
        for (i, number) in new_numbers.iter().enumerate() {
            let number = number.trim();
            if number.is_empty() {
                errors.push(format!("room {}: number is required", i + 1));
            } else if !seen.insert(number) {
                errors.push(format!("room {}: number {number} repeated", i + 1));
            } else if self.room_number_taken(&parent.floor_id, number, None).await? {
                errors.push(format!("room {}: number {number} already exists on this floor", i + 1));
            }
        }
        if !errors.is_empty() {
            return Err(DatabaseError::Validation(errors.join("; ")));
        }

        let child_name = parent.name.as_ref().map(|n| format!("{n} (split)"));
        self.atomically(async {
            let mut children = Vec::with_capacity(new_numbers.len());
            for number in new_numbers {
                let child = self
                    .insert_room(
                        actor,
                        &NewRoom {
                            building_id: parent.building_id.clone(),
                            floor_id: parent.floor_id.clone(),
                            number: number.trim().to_string(),
                            name: child_name.clone(),
                            is_special: parent.is_special,
                        },
                        Some(&parent.id),
                    )
                    .await?;
                self.add_history(
                    EntityType::Room,
                    &child.id,
                    HistoryAction::Split,
                    &format!("Split from room {} (ID: {})", parent.number, parent.id),
                )
                .await?;
                children.push(child);
            }

            self.db()
                .execute_with("UPDATE rooms SET is_special = 0 WHERE id = ?1", || [id])
                .await?;
            let numbers: Vec<&str> = children.iter().map(|r| r.number.as_str()).collect();
            self.add_history(
                EntityType::Room,
                id,
                HistoryAction::Split,
                &format!("Split into rooms: {}", numbers.join(", ")),
            )
            .await?;

            let detail = RestructureDetail {
                sources: vec![parent.id.clone()],
                results: children.iter().map(|r| r.id.clone()).collect(),
            };
            self.record(
                actor,
                NewAction::new(
                    ActionType::CreateRoom,
                    format!("Split room {} into {}", parent.number, numbers.join(", ")),
                )
                .on(EntityType::Room, id)
                .details(serde_json::to_value(&detail)?),
                TrailOp::Split,
                &detail,
            )
            .await?;
            Ok(children)
        })
        .await
    }

    /// Merge two or more rooms into a new room. Sources are kept, point at
    /// the merged room and stop being special.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for fewer than two distinct ids, a taken number
    /// or a foreign floor, and `NotFound` if any source does not exist.
    pub async fn merge_rooms(
        &self,
        actor: &Actor,
        ids: &[String],
        number: &str,
        floor_id: &str,
        building_id: &str,
    ) -> Result<Room, DatabaseError> {
        check_merge_sources(ids, "rooms")?;
        let number = number.trim();
        if number.is_empty() {
            return Err(DatabaseError::Validation("room number must not be empty".into()));
        }
        self.get_building(building_id).await?;
        self.floor_in_building(floor_id, building_id).await?;
        if self.room_number_taken(floor_id, number, None).await? {
            return Err(DatabaseError::Validation(format!(
                "room {number} already exists on this floor"
            )));
        }
        let mut sources = Vec::with_capacity(ids.len());
        for id in ids {
            sources.push(self.get_room(id).await?);
        }

        self.atomically(async {
            let merged = self
                .insert_room(
                    actor,
                    &NewRoom {
                        building_id: building_id.to_string(),
                        floor_id: floor_id.to_string(),
                        number: number.to_string(),
                        name: None,
                        is_special: sources.iter().any(|r| r.is_special),
                    },
                    None,
                )
                .await?;

            for source in &sources {
                self.add_history(
                    EntityType::Room,
                    &source.id,
                    HistoryAction::Merged,
                    &format!("Merged into room {} (ID: {})", merged.number, merged.id),
                )
                .await?;
                self.db()
                    .execute_with(
                        "UPDATE rooms SET derived_from = ?1, is_special = 0 WHERE id = ?2",
                        || libsql::params![merged.id.as_str(), source.id.as_str()],
                    )
                    .await?;
            }
            let numbers: Vec<&str> = sources.iter().map(|r| r.number.as_str()).collect();
            self.add_history(
                EntityType::Room,
                &merged.id,
                HistoryAction::Merged,
                &format!("Merged from rooms: {}", numbers.join(", ")),
            )
            .await?;

            let detail = RestructureDetail {
                sources: ids.to_vec(),
                results: vec![merged.id.clone()],
            };
            self.record(
                actor,
                NewAction::new(
                    ActionType::CreateRoom,
                    format!("Merged rooms {} into {number}", numbers.join(", ")),
                )
                .on(EntityType::Room, &merged.id)
                .details(serde_json::to_value(&detail)?),
                TrailOp::Merge,
                &detail,
            )
            .await?;
            Ok(merged)
        })
        .await
    }

    /// Move a room to another floor (and building). The room keeps its
    /// number, which must be free on the target floor.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a foreign floor or a number collision.
    pub async fn move_room(
        &self,
        actor: &Actor,
        id: &str,
        floor_id: &str,
        building_id: &str,
    ) -> Result<Room, DatabaseError> {
        let room = self.get_room(id).await?;
        let target_building = self.get_building(building_id).await?;
        let target_floor = self.floor_in_building(floor_id, building_id).await?;
        if self.room_number_taken(floor_id, &room.number, Some(id)).await? {
            return Err(DatabaseError::Validation(format!(
                "room {} already exists on this floor",
                room.number
            )));
        }
        let old_floor = self.get_floor(&room.floor_id).await?;
        let old_building = self.get_building(&room.building_id).await?;

        self.atomically(async {
            self.db()
                .execute_with(
                    "UPDATE rooms SET floor_id = ?1, building_id = ?2 WHERE id = ?3",
                    || libsql::params![floor_id, building_id, id],
                )
                .await?;
            self.add_history(
                EntityType::Room,
                id,
                HistoryAction::Transferred,
                &format!(
                    "Transferred from floor {}, building {} to floor {}, building {}",
                    old_floor.number, old_building.name, target_floor.number, target_building.name
                ),
            )
            .await?;
            self.record(
                actor,
                NewAction::new(
                    ActionType::Update,
                    format!("Moved room {} to {}", room.number, target_building.name),
                )
                .on(EntityType::Room, id)
                .values(Some(room.floor_id.clone()), Some(floor_id.to_string())),
                TrailOp::Transfer,
                &serde_json::json!({ "floor_id": floor_id, "building_id": building_id }),
            )
            .await?;
            Ok(())
        })
        .await?;
        self.get_room(id).await
    }

    /// Resolve a shareable room URL (`…/rooms/{room}/?building={building}`).
    ///
    /// # Errors
    ///
    /// Returns `Validation` for a malformed link or a room outside the named
    /// building, and `NotFound` for an unknown room.
    pub async fn resolve_room_link(&self, url: &str) -> Result<Room, DatabaseError> {
        let link = parse_room_link(url)
            .ok_or_else(|| DatabaseError::Validation(format!("not a room link: {url}")))?;
        let room = self.get_room(&link.room_id).await?;
        if room.building_id != link.building_id {
            return Err(DatabaseError::Validation(format!(
                "room {} is not in building {}",
                room.number, link.building_id
            )));
        }
        Ok(room)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::*;
    use crate::updates::room::RoomUpdateBuilder;

    use super::*;

    #[tokio::test]
    async fn create_assigns_uid_and_payload() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;

        assert_eq!(c.room_a.qr_payload, c.room_a.uid);
        assert_ne!(c.room_a.uid, c.room_b.uid);
        let fetched = svc.get_room_by_uid(&c.room_a.uid).await.unwrap();
        assert_eq!(fetched, c.room_a);
        assert_eq!(
            svc.room_history(&c.room_a.id).await.unwrap()[0].action,
            HistoryAction::Created
        );
    }

    #[tokio::test]
    async fn number_unique_per_floor() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let dup = svc
            .create_room(&admin, new_room(&c.building, &c.floor, "101"))
            .await;
        assert!(matches!(dup, Err(DatabaseError::Validation(_))));

        let floor2 = svc.create_floor(&admin, &c.building.id, 2, None).await.unwrap();
        svc.create_room(&admin, new_room(&c.building, &floor2, "101"))
            .await
            .unwrap();
        assert_eq!(svc.rooms_by_building(&c.building.id).await.unwrap().len(), 3);
        let on_floor2 = svc
            .list_rooms(&RoomFilter {
                floor_id: Some(floor2.id.clone()),
                ..RoomFilter::default()
            })
            .await
            .unwrap();
        assert_eq!(on_floor2.len(), 1);
    }

    #[tokio::test]
    async fn split_inherits_and_clears_special() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let parent = svc
            .update_room(
                &admin,
                &c.room_a.id,
                RoomUpdateBuilder::new()
                    .name(Some("Lecture hall".into()))
                    .is_special(true)
                    .build(),
            )
            .await
            .unwrap();

        let children = svc
            .split_room(&admin, &parent.id, &["101A".into(), "101B".into()])
            .await
            .unwrap();
        assert_eq!(children.len(), 2);
        for child in &children {
            assert_eq!(child.name.as_deref(), Some("Lecture hall (split)"));
            assert!(child.is_special);
            assert_eq!(child.derived_from.as_deref(), Some(parent.id.as_str()));
        }
        assert!(!svc.get_room(&parent.id).await.unwrap().is_special);

        let history = svc.room_history(&parent.id).await.unwrap();
        assert_eq!(history[0].description, "Split into rooms: 101A, 101B");
    }

    #[tokio::test]
    async fn split_rejects_taken_number_atomically() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let result = svc
            .split_room(&admin, &c.room_a.id, &["101C".into(), "102".into()])
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert_eq!(svc.rooms_by_building(&c.building.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn merge_marks_sources() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        svc.update_room(&admin, &c.room_b.id, RoomUpdateBuilder::new().is_special(true).build())
            .await
            .unwrap();

        let merged = svc
            .merge_rooms(
                &admin,
                &[c.room_a.id.clone(), c.room_b.id.clone()],
                "101-102",
                &c.floor.id,
                &c.building.id,
            )
            .await
            .unwrap();
        assert!(merged.is_special);

        let b = svc.get_room(&c.room_b.id).await.unwrap();
        assert_eq!(b.derived_from.as_deref(), Some(merged.id.as_str()));
        assert!(!b.is_special);
        assert_eq!(
            svc.room_history(&merged.id).await.unwrap()[0].description,
            "Merged from rooms: 101, 102"
        );
    }

    #[tokio::test]
    async fn merge_rejects_repeated_rooms() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;

        let same = svc
            .merge_rooms(
                &admin,
                &[c.room_a.id.clone(), c.room_a.id.clone()],
                "900",
                &c.floor.id,
                &c.building.id,
            )
            .await;
        assert!(matches!(same, Err(DatabaseError::Validation(_))));

        let padded = svc
            .merge_rooms(
                &admin,
                &[c.room_a.id.clone(), c.room_b.id.clone(), c.room_a.id.clone()],
                "900",
                &c.floor.id,
                &c.building.id,
            )
            .await;
        assert!(matches!(padded, Err(DatabaseError::Validation(_))));

        let history = svc.room_history(&c.room_a.id).await.unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].action, HistoryAction::Created);
        assert_eq!(svc.rooms_by_building(&c.building.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn move_room_checks_target_floor() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let annex = svc
            .create_building(&admin, &c.university.id, "Annex", None)
            .await
            .unwrap();
        let annex_floor = svc.create_floor(&admin, &annex.id, 3, None).await.unwrap();

        let wrong = svc
            .move_room(&admin, &c.room_a.id, &annex_floor.id, &c.building.id)
            .await;
        assert!(matches!(wrong, Err(DatabaseError::Validation(_))));

        let moved = svc
            .move_room(&admin, &c.room_a.id, &annex_floor.id, &annex.id)
            .await
            .unwrap();
        assert_eq!(moved.building_id, annex.id);
        assert_eq!(
            svc.room_history(&moved.id).await.unwrap()[0].action,
            HistoryAction::Transferred
        );
    }

    #[tokio::test]
    async fn room_link_resolution() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;

        let url = format!(
            "https://inventory.example.edu/rooms/{}/?building={}",
            c.room_a.id, c.building.id
        );
        assert_eq!(svc.resolve_room_link(&url).await.unwrap().id, c.room_a.id);

        let wrong = format!("https://x/rooms/{}/?building=bld-00000000", c.room_a.id);
        assert!(matches!(
            svc.resolve_room_link(&wrong).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(svc.resolve_room_link("https://x/nothing").await.is_err());
    }
}
