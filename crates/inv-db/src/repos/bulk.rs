//! Batch operations on equipment. Each batch is all-or-nothing.

use std::collections::HashSet;

use chrono::Utc;

use inv_core::entities::{Characteristics, Equipment};
use inv_core::enums::{ActionType, EntityType, EquipmentStatus, TrailOp};
use inv_core::identity::Actor;

use crate::access::owner_filter;
use crate::error::{DatabaseError, not_found};
use crate::helpers::placeholders;
use crate::repos::action::NewAction;
use crate::repos::equipment::{NewEquipment, SELECT_COLS, row_to_equipment};
use crate::service::InventoryService;

/// Largest batch accepted by [`InventoryService::bulk_create`].
pub const MAX_BULK_CREATE: u32 = 100;

/// Identical items created in one go, named `"{name_prefix} {n}"` for
/// `n` in `1..=count`.
#[derive(Debug, Clone)]
pub struct BulkCreate {
    pub type_id: String,
    pub room_id: Option<String>,
    pub description: Option<String>,
    pub status: EquipmentStatus,
    pub contract_id: Option<String>,
    pub count: u32,
    pub name_prefix: String,
    pub spec_id: Option<String>,
    pub characteristics: Option<Characteristics>,
}

impl BulkCreate {
    pub fn new(type_id: impl Into<String>, name_prefix: impl Into<String>, count: u32) -> Self {
        Self {
            type_id: type_id.into(),
            room_id: None,
            description: None,
            status: EquipmentStatus::New,
            contract_id: None,
            count,
            name_prefix: name_prefix.into(),
            spec_id: None,
            characteristics: None,
        }
    }
}

/// A new inventory number for one item.
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct InnAssignment {
    pub id: String,
    pub inn: i64,
}

impl InventoryService {
    /// # Errors
    ///
    /// Returns `Validation` for a count outside `1..=100`, an empty prefix or
    /// a characteristic rule violation, and `NotFound` for unknown
    /// references.
    pub async fn bulk_create(
        &self,
        actor: &Actor,
        batch: BulkCreate,
    ) -> Result<Vec<Equipment>, DatabaseError> {
        if batch.count == 0 || batch.count > MAX_BULK_CREATE {
            return Err(DatabaseError::Validation(format!(
                "count must be between 1 and {MAX_BULK_CREATE} (got {})",
                batch.count
            )));
        }
        let prefix = batch.name_prefix.trim();
        if prefix.is_empty() {
            return Err(DatabaseError::Validation("name prefix must not be empty".into()));
        }
        let ty = self.get_equipment_type(&batch.type_id).await?;
        if let Some(ref room_id) = batch.room_id {
            if !self.room_exists(room_id).await? {
                return Err(not_found("room", room_id.as_str()));
            }
        }
        if let Some(ref contract_id) = batch.contract_id {
            self.get_contract(actor, contract_id).await?;
        }
        let characteristics = self
            .resolve_characteristics(
                actor,
                &ty,
                batch.characteristics.clone(),
                batch.spec_id.as_deref(),
            )
            .await?;

        self.atomically(async {
            let mut created = Vec::with_capacity(batch.count as usize);
            for n in 1..=batch.count {
                let new = NewEquipment {
                    room_id: batch.room_id.clone(),
                    description: batch.description.clone(),
                    contract_id: batch.contract_id.clone(),
                    ..NewEquipment::new(&batch.type_id, format!("{prefix} {n}"))
                };
                let eq = self
                    .insert_equipment(actor, &new, characteristics.as_ref())
                    .await?;
                self.record(
                    actor,
                    NewAction::new(ActionType::CreateEquipment, format!("Created equipment: {}", eq.name))
                        .on(EntityType::Equipment, &eq.id),
                    TrailOp::Create,
                    &eq,
                )
                .await?;
                let eq = if batch.status == EquipmentStatus::New {
                    eq
                } else {
                    self.transition_equipment(actor, &eq, batch.status).await?;
                    self.load_equipment(&eq.id).await?
                };
                created.push(eq);
            }
            tracing::info!(count = created.len(), type_name = %ty.name, "bulk created equipment");
            Ok(created)
        })
        .await
    }

    /// Assign inventory numbers to several items and regenerate their
    /// labels.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty list, a negative number, a repeated
    /// item or a non-zero number used twice, and `NotFound` or
    /// `PermissionDenied` for items the actor cannot see.
    pub async fn bulk_update_inn(
        &self,
        actor: &Actor,
        assignments: &[InnAssignment],
    ) -> Result<Vec<Equipment>, DatabaseError> {
        if assignments.is_empty() {
            return Err(DatabaseError::Validation("no inventory numbers given".into()));
        }
        let mut ids = HashSet::new();
        let mut inns = HashSet::new();
        for a in assignments {
            if a.inn < 0 {
                return Err(DatabaseError::Validation(format!(
                    "inventory number must not be negative (got {} for {})",
                    a.inn, a.id
                )));
            }
            if !ids.insert(a.id.as_str()) {
                return Err(DatabaseError::Validation(format!("equipment {} listed twice", a.id)));
            }
            if a.inn != 0 && !inns.insert(a.inn) {
                return Err(DatabaseError::Validation(format!(
                    "inventory number {} assigned twice",
                    a.inn
                )));
            }
        }
        let mut current = Vec::with_capacity(assignments.len());
        for a in assignments {
            current.push(self.get_equipment(actor, &a.id).await?);
        }

        self.atomically(async {
            let now = Utc::now().to_rfc3339();
            let mut updated = Vec::with_capacity(assignments.len());
            for (a, before) in assignments.iter().zip(&current) {
                self.db()
                    .execute_with(
                        "UPDATE equipment SET inn = ?1, updated_at = ?2 WHERE id = ?3",
                        || libsql::params![a.inn, now.as_str(), a.id.as_str()],
                    )
                    .await?;
                self.refresh_derived_columns(&a.id).await?;
                self.record(
                    actor,
                    NewAction::new(ActionType::UpdateInn, format!("Updated inventory number of {}", before.name))
                        .on(EntityType::Equipment, &a.id)
                        .values(Some(before.inn.to_string()), Some(a.inn.to_string())),
                    TrailOp::Update,
                    a,
                )
                .await?;
                updated.push(self.load_equipment(&a.id).await?);
            }
            Ok(updated)
        })
        .await
    }

    /// Delete the listed items the actor can see. Returns how many went.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty list and `NotFound` when none of
    /// the ids is visible.
    pub async fn bulk_delete(&self, actor: &Actor, ids: &[String]) -> Result<u64, DatabaseError> {
        if ids.is_empty() {
            return Err(DatabaseError::Validation("no equipment ids given".into()));
        }
        let mut params: Vec<libsql::Value> =
            ids.iter().map(|id| libsql::Value::from(id.clone())).collect();
        let (owner_sql, owner_params) = owner_filter(actor, "e.author_id", params.len() + 1);
        params.extend(owner_params);
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {SELECT_COLS} FROM equipment e WHERE e.id IN ({}) {owner_sql}",
                    placeholders(1, ids.len())
                ),
                || libsql::params_from_iter(params.clone()),
            )
            .await?;
        let mut visible = Vec::new();
        while let Some(row) = rows.next().await? {
            visible.push(row_to_equipment(&row)?);
        }
        if visible.is_empty() {
            return Err(not_found("equipment", ids.join(", ")));
        }

        self.atomically(async {
            for eq in &visible {
                self.remove_equipment(actor, eq).await?;
            }
            Ok(visible.len() as u64)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use crate::test_support::helpers::*;

    use super::*;

    #[tokio::test]
    async fn bulk_create_names_and_copies_spec() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let pc = equipment_type(&svc, &admin, "Computer").await;
        let spec = svc
            .create_specification(&admin, "Lab PC", office_pc())
            .await
            .unwrap();

        let mut batch = BulkCreate::new(&pc.id, "Lab PC", 3);
        batch.room_id = Some(c.room_a.id.clone());
        batch.spec_id = Some(spec.id.clone());
        let created = svc.bulk_create(&admin, batch).await.unwrap();

        let names: Vec<&str> = created.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Lab PC 1", "Lab PC 2", "Lab PC 3"]);
        assert!(created.iter().all(|e| e.inn == 0 && e.qr_payload.is_none()));
        assert!(created.iter().all(|e| e.characteristics == Some(office_pc())));
    }

    #[tokio::test]
    async fn bulk_create_is_all_or_nothing() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let pc = equipment_type(&svc, &admin, "Computer").await;

        for count in [0, MAX_BULK_CREATE + 1] {
            assert!(matches!(
                svc.bulk_create(&admin, BulkCreate::new(&pc.id, "PC", count)).await,
                Err(DatabaseError::Validation(_))
            ));
        }
        assert!(matches!(
            svc.bulk_create(&admin, BulkCreate::new(&pc.id, "PC", 2)).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(svc.my_equipment(&admin).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn bulk_create_with_status() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let desk = equipment_type(&svc, &admin, "Desk").await;
        let mut batch = BulkCreate::new(&desk.id, "Desk", 2);
        batch.status = EquipmentStatus::Working;
        let created = svc.bulk_create(&admin, batch).await.unwrap();
        assert!(created.iter().all(|e| e.status == EquipmentStatus::Working));
    }

    #[tokio::test]
    async fn inn_assignment_rules() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let desk = equipment_type(&svc, &admin, "Desk").await;
        let mut batch = BulkCreate::new(&desk.id, "Desk", 3);
        batch.room_id = Some(c.room_b.id.clone());
        let items = svc.bulk_create(&admin, batch).await.unwrap();

        let dup = [
            InnAssignment { id: items[0].id.clone(), inn: 7 },
            InnAssignment { id: items[1].id.clone(), inn: 7 },
        ];
        assert!(matches!(
            svc.bulk_update_inn(&admin, &dup).await,
            Err(DatabaseError::Validation(_))
        ));
        let negative = [InnAssignment { id: items[0].id.clone(), inn: -1 }];
        assert!(matches!(
            svc.bulk_update_inn(&admin, &negative).await,
            Err(DatabaseError::Validation(_))
        ));
        assert!(matches!(
            svc.bulk_update_inn(&admin, &[]).await,
            Err(DatabaseError::Validation(_))
        ));

        let ok = [
            InnAssignment { id: items[0].id.clone(), inn: 9001 },
            InnAssignment { id: items[1].id.clone(), inn: 0 },
            InnAssignment { id: items[2].id.clone(), inn: 0 },
        ];
        let updated = svc.bulk_update_inn(&admin, &ok).await.unwrap();
        assert!(updated[0].qr_payload.as_deref().unwrap().contains("ИНН: 9001"));
        assert_eq!(updated[1].qr_payload, None);

        let missing = [InnAssignment { id: "eqp-missing".into(), inn: 1 }];
        assert!(matches!(
            svc.bulk_update_inn(&admin, &missing).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn bulk_delete_skips_invisible() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let m = manager(&svc, &admin, "s.sokolov").await;
        let desk = equipment_type(&svc, &admin, "Desk").await;
        let mine = svc.bulk_create(&m, BulkCreate::new(&desk.id, "Mine", 2)).await.unwrap();
        let theirs = svc.bulk_create(&admin, BulkCreate::new(&desk.id, "Theirs", 1)).await.unwrap();

        let ids: Vec<String> = mine.iter().chain(&theirs).map(|e| e.id.clone()).collect();
        assert_eq!(svc.bulk_delete(&m, &ids).await.unwrap(), 2);
        assert!(svc.get_equipment(&admin, &theirs[0].id).await.is_ok());

        assert!(matches!(
            svc.bulk_delete(&m, &[theirs[0].id.clone()]).await,
            Err(DatabaseError::NotFound { .. })
        ));
        assert!(matches!(
            svc.bulk_delete(&m, &[]).await,
            Err(DatabaseError::Validation(_))
        ));
    }
}
