//! Universities, buildings and floors: the upper levels of the hierarchy.

use chrono::Utc;

use inv_core::entities::{Building, Floor, University};
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::{PREFIX_BUILDING, PREFIX_FLOOR, PREFIX_UNIVERSITY};

use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_opt_string, parse_datetime};
use crate::repos::action::NewAction;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::organization::{BuildingUpdate, UniversityUpdate};

fn row_to_university(row: &libsql::Row) -> Result<University, DatabaseError> {
    Ok(University {
        id: row.get::<String>(0)?,
        name: row.get::<String>(1)?,
        address: get_opt_string(row, 2)?,
        created_at: parse_datetime(&row.get::<String>(3)?)?,
    })
}

fn row_to_building(row: &libsql::Row) -> Result<Building, DatabaseError> {
    Ok(Building {
        id: row.get::<String>(0)?,
        university_id: row.get::<String>(1)?,
        name: row.get::<String>(2)?,
        address: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn row_to_floor(row: &libsql::Row) -> Result<Floor, DatabaseError> {
    Ok(Floor {
        id: row.get::<String>(0)?,
        building_id: row.get::<String>(1)?,
        number: row.get::<i64>(2)?,
        description: get_opt_string(row, 3)?,
        created_at: parse_datetime(&row.get::<String>(4)?)?,
    })
}

fn require_name(name: &str, what: &str) -> Result<(), DatabaseError> {
    if name.trim().is_empty() {
        return Err(DatabaseError::Validation(format!("{what} name must not be empty")));
    }
    Ok(())
}

impl InventoryService {
    // -- universities --------------------------------------------------------

    /// # Errors
    ///
    /// Returns `Validation` for an empty name.
    pub async fn create_university(
        &self,
        actor: &Actor,
        name: &str,
        address: Option<&str>,
    ) -> Result<University, DatabaseError> {
        require_name(name, "university")?;
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_UNIVERSITY).await?;
        self.db()
            .execute_with(
                "INSERT INTO universities (id, name, address, created_at) VALUES (?1, ?2, ?3, ?4)",
                || libsql::params![id.as_str(), name, address, now.to_rfc3339()],
            )
            .await?;

        let university = University {
            id,
            name: name.to_string(),
            address: address.map(String::from),
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(ActionType::Create, format!("Created university: {name}"))
                .on(EntityType::University, &university.id),
            TrailOp::Create,
            &university,
        )
        .await?;
        Ok(university)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_university(&self, id: &str) -> Result<University, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name, address, created_at FROM universities WHERE id = ?1",
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("university", id))?;
        row_to_university(&row)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_universities(&self) -> Result<Vec<University>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, name, address, created_at FROM universities ORDER BY name",
                || (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_university(&row)?);
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `Validation` (empty name).
    pub async fn update_university(
        &self,
        actor: &Actor,
        id: &str,
        update: UniversityUpdate,
    ) -> Result<University, DatabaseError> {
        let before = self.get_university(id).await?;
        let mut set = SetClause::default();
        if let Some(ref name) = update.name {
            require_name(name, "university")?;
            set.push("name", name.as_str());
        }
        if let Some(ref address) = update.address {
            set.push_opt("address", address.as_deref());
        }
        if set.is_empty() {
            return Ok(before);
        }
        let (sql, params) = set.into_sql("universities", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        self.record(
            actor,
            NewAction::new(ActionType::Update, format!("Updated university: {}", before.name))
                .on(EntityType::University, id),
            TrailOp::Update,
            &update,
        )
        .await?;
        self.get_university(id).await
    }

    /// Delete a university and, by cascade, everything under it.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_university(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let university = self.get_university(id).await?;
        self.db()
            .execute_with("DELETE FROM universities WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(
                ActionType::Delete,
                format!("Deleted university: {}", university.name),
            )
            .on(EntityType::University, id),
            TrailOp::Delete,
            &university,
        )
        .await?;
        Ok(())
    }

    // -- buildings -----------------------------------------------------------

    /// # Errors
    ///
    /// Returns `NotFound` if the university does not exist, `Validation` for
    /// an empty name.
    pub async fn create_building(
        &self,
        actor: &Actor,
        university_id: &str,
        name: &str,
        address: Option<&str>,
    ) -> Result<Building, DatabaseError> {
        require_name(name, "building")?;
        self.get_university(university_id).await?;

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_BUILDING).await?;
        self.db()
            .execute_with(
                "INSERT INTO buildings (id, university_id, name, address, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                || libsql::params![id.as_str(), university_id, name, address, now.to_rfc3339()],
            )
            .await?;

        let building = Building {
            id,
            university_id: university_id.to_string(),
            name: name.to_string(),
            address: address.map(String::from),
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(ActionType::CreateBuilding, format!("Created building: {name}"))
                .on(EntityType::Building, &building.id),
            TrailOp::Create,
            &building,
        )
        .await?;
        Ok(building)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_building(&self, id: &str) -> Result<Building, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, university_id, name, address, created_at FROM buildings WHERE id = ?1",
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("building", id))?;
        row_to_building(&row)
    }

    /// Buildings ordered by name, optionally limited to one university.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_buildings(
        &self,
        university_id: Option<&str>,
    ) -> Result<Vec<Building>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, university_id, name, address, created_at FROM buildings
                 WHERE (?1 IS NULL OR university_id = ?1) ORDER BY name",
                || libsql::params![university_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_building(&row)?);
        }
        Ok(out)
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `Validation` (empty name).
    pub async fn update_building(
        &self,
        actor: &Actor,
        id: &str,
        update: BuildingUpdate,
    ) -> Result<Building, DatabaseError> {
        let before = self.get_building(id).await?;
        let mut set = SetClause::default();
        if let Some(ref name) = update.name {
            require_name(name, "building")?;
            set.push("name", name.as_str());
        }
        if let Some(ref address) = update.address {
            set.push_opt("address", address.as_deref());
        }
        if set.is_empty() {
            return Ok(before);
        }
        let (sql, params) = set.into_sql("buildings", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        self.record(
            actor,
            NewAction::new(ActionType::Update, format!("Updated building: {}", before.name))
                .on(EntityType::Building, id),
            TrailOp::Update,
            &update,
        )
        .await?;
        self.get_building(id).await
    }

    /// Delete a building with its floors, faculties and rooms. Equipment in
    /// those rooms is kept and left without a room.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_building(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let building = self.get_building(id).await?;
        self.db()
            .execute_with("DELETE FROM buildings WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(
                ActionType::DeleteBuilding,
                format!("Deleted building: {}", building.name),
            )
            .on(EntityType::Building, id),
            TrailOp::Delete,
            &building,
        )
        .await?;
        Ok(())
    }

    // -- floors --------------------------------------------------------------

    /// # Errors
    ///
    /// Returns `NotFound` if the building does not exist and `Validation` if
    /// the floor number is already used in that building.
    pub async fn create_floor(
        &self,
        actor: &Actor,
        building_id: &str,
        number: i64,
        description: Option<&str>,
    ) -> Result<Floor, DatabaseError> {
        let building = self.get_building(building_id).await?;
        let taken = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM floors WHERE building_id = ?1 AND number = ?2",
                || libsql::params![building_id, number],
            )
            .await?;
        if taken > 0 {
            return Err(DatabaseError::Validation(format!(
                "floor {number} already exists in building {}",
                building.name
            )));
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_FLOOR).await?;
        self.db()
            .execute_with(
                "INSERT INTO floors (id, building_id, number, description, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                || libsql::params![id.as_str(), building_id, number, description, now.to_rfc3339()],
            )
            .await?;

        let floor = Floor {
            id,
            building_id: building_id.to_string(),
            number,
            description: description.map(String::from),
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(
                ActionType::CreateFloor,
                format!("Created floor {number} in {}", building.name),
            )
            .on(EntityType::Floor, &floor.id),
            TrailOp::Create,
            &floor,
        )
        .await?;
        Ok(floor)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn get_floor(&self, id: &str) -> Result<Floor, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, building_id, number, description, created_at FROM floors WHERE id = ?1",
                || [id],
            )
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("floor", id))?;
        row_to_floor(&row)
    }

    /// Floors of a building ordered by number.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_floors(&self, building_id: &str) -> Result<Vec<Floor>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                "SELECT id, building_id, number, description, created_at FROM floors
                 WHERE building_id = ?1 ORDER BY number",
                || [building_id],
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_floor(&row)?);
        }
        Ok(out)
    }

    /// Fetch a floor and check it belongs to `building_id`.
    pub(crate) async fn floor_in_building(
        &self,
        floor_id: &str,
        building_id: &str,
    ) -> Result<Floor, DatabaseError> {
        let floor = self.get_floor(floor_id).await?;
        if floor.building_id != building_id {
            let building = self.get_building(building_id).await?;
            return Err(DatabaseError::Validation(format!(
                "floor {} does not belong to building {}",
                floor.number, building.name
            )));
        }
        Ok(floor)
    }

    /// # Errors
    ///
    /// Returns `NotFound` for an unknown id.
    pub async fn delete_floor(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let floor = self.get_floor(id).await?;
        self.db()
            .execute_with("DELETE FROM floors WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::DeleteFloor, format!("Deleted floor {}", floor.number))
                .on(EntityType::Floor, id),
            TrailOp::Delete,
            &floor,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::repos::action::ActionFilter;
    use crate::test_support::helpers::*;
    use crate::updates::organization::{BuildingUpdateBuilder, UniversityUpdateBuilder};

    use super::*;

    #[tokio::test]
    async fn hierarchy_create_and_list() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;

        assert_eq!(svc.list_universities().await.unwrap().len(), 1);
        let buildings = svc.list_buildings(Some(&c.university.id)).await.unwrap();
        assert_eq!(buildings, vec![c.building.clone()]);
        assert_eq!(svc.list_buildings(None).await.unwrap().len(), 1);
        assert!(svc.list_buildings(Some("uni-none")).await.unwrap().is_empty());
        assert_eq!(svc.list_floors(&c.building.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn building_requires_university() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let result = svc.create_building(&admin, "uni-missing", "A", None).await;
        assert!(matches!(result, Err(DatabaseError::NotFound { .. })));
    }

    #[tokio::test]
    async fn floor_number_unique_per_building() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let dup = svc.create_floor(&admin, &c.building.id, 1, None).await;
        assert!(matches!(dup, Err(DatabaseError::Validation(_))));
        svc.create_floor(&admin, &c.building.id, 2, Some("Labs"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn update_and_delete_building() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;

        let updated = svc
            .update_building(
                &admin,
                &c.building.id,
                BuildingUpdateBuilder::new().name("Main (east)").address(None).build(),
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Main (east)");
        assert_eq!(updated.address, None);

        svc.delete_building(&admin, &c.building.id).await.unwrap();
        assert!(svc.get_room(&c.room_a.id).await.is_err());

        let deletes = svc
            .query_actions(
                &admin,
                &ActionFilter {
                    action_type: Some(ActionType::DeleteBuilding),
                    ..ActionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(deletes.len(), 1);
    }

    #[tokio::test]
    async fn update_university_rejects_empty_name() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let c = campus(&svc, &admin).await;
        let result = svc
            .update_university(
                &admin,
                &c.university.id,
                UniversityUpdateBuilder::new().name("  ").build(),
            )
            .await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
