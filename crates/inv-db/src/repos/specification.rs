//! Specification templates: named characteristic sets reused when creating
//! equipment.

use chrono::Utc;

use inv_core::entities::{Characteristics, Specification};
use inv_core::enums::{ActionType, CharacteristicKind, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_SPECIFICATION;
use inv_core::responses::SpecificationCount;

use crate::access::{owner_filter, require_owner};
use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_json, to_json_text};
use crate::repos::action::NewAction;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::specification::SpecificationUpdate;

const SELECT_COLS: &str = "id, kind, name, author_id, characteristics, created_at";

fn row_to_specification(row: &libsql::Row) -> Result<Specification, DatabaseError> {
    Ok(Specification {
        id: row.get::<String>(0)?,
        kind: parse_enum(&row.get::<String>(1)?)?,
        name: row.get::<String>(2)?,
        author_id: get_opt_string(row, 3)?,
        characteristics: parse_json(&row.get::<String>(4)?)?,
        created_at: parse_datetime(&row.get::<String>(5)?)?,
    })
}

impl InventoryService {
    /// Save a template. Its kind is taken from the characteristics.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty name.
    pub async fn create_specification(
        &self,
        actor: &Actor,
        name: &str,
        characteristics: Characteristics,
    ) -> Result<Specification, DatabaseError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(DatabaseError::Validation(
                "specification name must not be empty".into(),
            ));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SPECIFICATION).await?;
        let kind = characteristics.kind();
        let json = to_json_text(&characteristics)?;
        self.db()
            .execute_with(
                "INSERT INTO specifications (id, kind, name, author_id, characteristics, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                || {
                    libsql::params![
                        id.as_str(),
                        kind.as_str(),
                        name,
                        actor.user_id.as_str(),
                        json.as_str(),
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;

        let spec = Specification {
            id,
            kind,
            name: name.to_string(),
            author_id: Some(actor.user_id.clone()),
            characteristics,
            created_at: now,
        };
        self.record(
            actor,
            NewAction::new(ActionType::Create, format!("Created {kind} specification: {name}"))
                .on(EntityType::Specification, &spec.id),
            TrailOp::Create,
            &spec,
        )
        .await?;
        Ok(spec)
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied` (another manager's template).
    pub async fn get_specification(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<Specification, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM specifications WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| not_found("specification", id))?;
        let spec = row_to_specification(&row)?;
        require_owner(actor, spec.author_id.as_deref(), "using this specification")?;
        Ok(spec)
    }

    /// Templates visible to the actor, newest first.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn list_specifications(
        &self,
        actor: &Actor,
        kind: Option<CharacteristicKind>,
    ) -> Result<Vec<Specification>, DatabaseError> {
        let (owner_sql, owner_params) = owner_filter(actor, "author_id", 2);
        let mut params: Vec<libsql::Value> = vec![kind.map(CharacteristicKind::as_str).into()];
        params.extend(owner_params);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM specifications
             WHERE (?1 IS NULL OR kind = ?1) {owner_sql}
             ORDER BY created_at DESC, rowid DESC"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_specification(&row)?);
        }
        Ok(out)
    }

    /// Rename a template or replace its characteristics. The kind is fixed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound`, `PermissionDenied` or `Validation` (empty name,
    /// kind change).
    pub async fn update_specification(
        &self,
        actor: &Actor,
        id: &str,
        update: SpecificationUpdate,
    ) -> Result<Specification, DatabaseError> {
        let before = self.get_specification(actor, id).await?;
        let mut set = SetClause::default();
        if let Some(ref name) = update.name {
            if name.trim().is_empty() {
                return Err(DatabaseError::Validation(
                    "specification name must not be empty".into(),
                ));
            }
            set.push("name", name.trim());
        }
        if let Some(ref characteristics) = update.characteristics {
            if characteristics.kind() != before.kind {
                return Err(DatabaseError::Validation(format!(
                    "specification is a {} template; got {} characteristics",
                    before.kind,
                    characteristics.kind()
                )));
            }
            set.push("characteristics", to_json_text(characteristics)?);
        }
        if set.is_empty() {
            return Ok(before);
        }
        let (sql, params) = set.into_sql("specifications", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        self.record(
            actor,
            NewAction::new(ActionType::Update, format!("Updated specification: {}", before.name))
                .on(EntityType::Specification, id),
            TrailOp::Update,
            &update,
        )
        .await?;
        self.get_specification(actor, id).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` or `PermissionDenied`.
    pub async fn delete_specification(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        let spec = self.get_specification(actor, id).await?;
        self.db()
            .execute_with("DELETE FROM specifications WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::Delete, format!("Deleted specification: {}", spec.name))
                .on(EntityType::Specification, id),
            TrailOp::Delete,
            &spec,
        )
        .await?;
        Ok(())
    }

    /// Number of visible templates per kind. Kinds without templates are
    /// omitted.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn specification_count(
        &self,
        actor: &Actor,
    ) -> Result<Vec<SpecificationCount>, DatabaseError> {
        let (owner_sql, owner_params) = owner_filter(actor, "author_id", 1);
        let sql = format!(
            "SELECT kind, COUNT(*) FROM specifications WHERE 1 = 1 {owner_sql}
             GROUP BY kind ORDER BY kind"
        );
        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(owner_params.clone()))
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            let count = u64::try_from(row.get::<i64>(1)?).unwrap_or(0);
            if count > 0 {
                out.push(SpecificationCount {
                    kind: parse_enum(&row.get::<String>(0)?)?,
                    count,
                });
            }
        }
        Ok(out)
    }
}
