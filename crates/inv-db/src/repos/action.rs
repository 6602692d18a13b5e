//! User-action audit log.
//!
//! Append-only rows recording who did what to which object. Every mutation
//! goes through [`InventoryService::record`], which writes the audit row and
//! then the matching JSONL trail line.

use chrono::Utc;
use serde::Serialize;

use inv_core::entities::UserAction;
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_ACTION;
use inv_core::trail::TrailOperation;

use crate::error::DatabaseError;
use crate::helpers::{get_opt_string, parse_datetime, parse_enum, parse_optional_json};
use crate::service::InventoryService;

/// Number of entries returned by [`InventoryService::my_actions`].
pub const MY_ACTIONS_LIMIT: u32 = 10;

const SELECT_COLS: &str = "id, user_id, action_type, description, entity_type, entity_id, \
                           old_value, new_value, details, created_at";

/// An audit entry about to be written. The acting user and timestamp are
/// filled in by [`InventoryService::log_action`].
#[derive(Debug, Clone)]
pub struct NewAction {
    pub action_type: ActionType,
    pub description: String,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub details: Option<serde_json::Value>,
}

impl NewAction {
    pub fn new(action_type: ActionType, description: impl Into<String>) -> Self {
        Self {
            action_type,
            description: description.into(),
            entity_type: None,
            entity_id: None,
            old_value: None,
            new_value: None,
            details: None,
        }
    }

    /// Attach the affected object.
    #[must_use]
    pub fn on(mut self, entity: EntityType, id: impl Into<String>) -> Self {
        self.entity_type = Some(entity);
        self.entity_id = Some(id.into());
        self
    }

    #[must_use]
    pub fn values(mut self, old: Option<String>, new: Option<String>) -> Self {
        self.old_value = old;
        self.new_value = new;
        self
    }

    #[must_use]
    pub fn details(mut self, details: serde_json::Value) -> Self {
        self.details = Some(details);
        self
    }
}

/// Filter criteria for audit queries.
#[derive(Debug, Default, Clone)]
pub struct ActionFilter {
    pub user_id: Option<String>,
    pub action_type: Option<ActionType>,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub limit: Option<u32>,
}

fn row_to_action(row: &libsql::Row) -> Result<UserAction, DatabaseError> {
    let entity_type = get_opt_string(row, 4)?
        .map(|s| parse_enum::<EntityType>(&s))
        .transpose()?;
    Ok(UserAction {
        id: row.get::<String>(0)?,
        user_id: get_opt_string(row, 1)?,
        action_type: parse_enum(&row.get::<String>(2)?)?,
        description: row.get::<String>(3)?,
        entity_type,
        entity_id: get_opt_string(row, 5)?,
        old_value: get_opt_string(row, 6)?,
        new_value: get_opt_string(row, 7)?,
        details: parse_optional_json(get_opt_string(row, 8)?.as_deref())?,
        created_at: parse_datetime(&row.get::<String>(9)?)?,
    })
}

impl InventoryService {
    /// Append an audit row on behalf of `actor`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the INSERT fails.
    pub async fn log_action(
        &self,
        actor: &Actor,
        action: NewAction,
    ) -> Result<UserAction, DatabaseError> {
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_ACTION).await?;
        let details = action
            .details
            .as_ref()
            .map(std::string::ToString::to_string);

        self.db()
            .execute_with(
                "INSERT INTO user_actions (id, user_id, action_type, description, entity_type,
                                           entity_id, old_value, new_value, details, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                || {
                    libsql::params![
                        id.as_str(),
                        actor.user_id.as_str(),
                        action.action_type.as_str(),
                        action.description.as_str(),
                        action.entity_type.map(EntityType::as_str),
                        action.entity_id.as_deref(),
                        action.old_value.as_deref(),
                        action.new_value.as_deref(),
                        details.as_deref(),
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;

        Ok(UserAction {
            id,
            user_id: Some(actor.user_id.clone()),
            action_type: action.action_type,
            description: action.description,
            entity_type: action.entity_type,
            entity_id: action.entity_id,
            old_value: action.old_value,
            new_value: action.new_value,
            details: action.details,
            created_at: now,
        })
    }

    /// Append one JSONL trail line.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if `data` cannot be serialized or the write fails.
    pub fn append_trail<T: Serialize + ?Sized>(
        &self,
        actor: &Actor,
        op: TrailOp,
        entity: EntityType,
        id: &str,
        data: &T,
    ) -> Result<(), DatabaseError> {
        self.trail().append(&TrailOperation {
            v: 1,
            ts: Utc::now().to_rfc3339(),
            user: actor.user_id.clone(),
            op,
            entity,
            id: id.to_string(),
            data: serde_json::to_value(data)?,
        })
    }

    /// Write the audit row, then the trail line for the same object.
    ///
    /// Actions without an attached object (bulk summaries) only produce the
    /// audit row.
    pub(crate) async fn record<T: Serialize + ?Sized>(
        &self,
        actor: &Actor,
        action: NewAction,
        op: TrailOp,
        data: &T,
    ) -> Result<UserAction, DatabaseError> {
        let entry = self.log_action(actor, action).await?;
        if let (Some(entity), Some(id)) = (entry.entity_type, entry.entity_id.as_deref()) {
            self.append_trail(actor, op, entity, id, data)?;
        }
        Ok(entry)
    }

    /// Query audit entries, newest first.
    ///
    /// Managers only ever see their own entries regardless of
    /// `filter.user_id`.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn query_actions(
        &self,
        actor: &Actor,
        filter: &ActionFilter,
    ) -> Result<Vec<UserAction>, DatabaseError> {
        let mut conditions = Vec::new();
        let mut params: Vec<libsql::Value> = Vec::new();

        let user_id = if actor.is_admin() {
            filter.user_id.clone()
        } else {
            Some(actor.user_id.clone())
        };
        if let Some(uid) = user_id {
            params.push(libsql::Value::Text(uid));
            conditions.push(format!("user_id = ?{}", params.len()));
        }
        if let Some(at) = filter.action_type {
            params.push(libsql::Value::Text(at.as_str().to_string()));
            conditions.push(format!("action_type = ?{}", params.len()));
        }
        if let Some(et) = filter.entity_type {
            params.push(libsql::Value::Text(et.as_str().to_string()));
            conditions.push(format!("entity_type = ?{}", params.len()));
        }
        if let Some(ref eid) = filter.entity_id {
            params.push(libsql::Value::Text(eid.clone()));
            conditions.push(format!("entity_id = ?{}", params.len()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };
        let limit = filter.limit.unwrap_or(100);
        let sql = format!(
            "SELECT {SELECT_COLS} FROM user_actions {where_clause}
             ORDER BY created_at DESC, rowid DESC LIMIT {limit}"
        );

        let mut rows = self
            .db()
            .query_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let mut actions = Vec::new();
        while let Some(row) = rows.next().await? {
            actions.push(row_to_action(&row)?);
        }
        Ok(actions)
    }

    /// The actor's own most recent actions.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn my_actions(&self, actor: &Actor) -> Result<Vec<UserAction>, DatabaseError> {
        self.query_actions(
            actor,
            &ActionFilter {
                user_id: Some(actor.user_id.clone()),
                limit: Some(MY_ACTIONS_LIMIT),
                ..ActionFilter::default()
            },
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::*;

    use super::*;

    #[tokio::test]
    async fn log_and_query_newest_first() {
        let svc = test_service().await;
        let admin = admin(&svc).await;

        for i in 0..3 {
            svc.log_action(
                &admin,
                NewAction::new(ActionType::Scan, format!("scan {i}"))
                    .on(EntityType::Room, format!("rom-{i}")),
            )
            .await
            .unwrap();
        }

        let actions = svc
            .query_actions(
                &admin,
                &ActionFilter {
                    action_type: Some(ActionType::Scan),
                    ..ActionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(actions.len(), 3);
        assert_eq!(actions[0].description, "scan 2");
        assert_eq!(actions[2].entity_id.as_deref(), Some("rom-0"));
    }

    #[tokio::test]
    async fn details_roundtrip_as_json() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        svc.log_action(
            &admin,
            NewAction::new(ActionType::UpdateInn, "inn changed")
                .values(Some("0".into()), Some("42".into()))
                .details(serde_json::json!({"count": 1})),
        )
        .await
        .unwrap();

        let actions = svc
            .query_actions(
                &admin,
                &ActionFilter {
                    action_type: Some(ActionType::UpdateInn),
                    ..ActionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(actions[0].details, Some(serde_json::json!({"count": 1})));
        assert_eq!(actions[0].new_value.as_deref(), Some("42"));
        assert_eq!(actions[0].entity_type, None);
    }

    #[tokio::test]
    async fn managers_only_see_their_own_actions() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let manager = manager(&svc, &admin, "m.ivanova").await;

        svc.log_action(&admin, NewAction::new(ActionType::Scan, "admin scan"))
            .await
            .unwrap();
        svc.log_action(&manager, NewAction::new(ActionType::Scan, "manager scan"))
            .await
            .unwrap();

        let seen = svc
            .query_actions(
                &manager,
                &ActionFilter {
                    user_id: Some(admin.user_id.clone()),
                    action_type: Some(ActionType::Scan),
                    ..ActionFilter::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].description, "manager scan");
    }

    #[tokio::test]
    async fn my_actions_capped() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        for i in 0..15 {
            svc.log_action(&admin, NewAction::new(ActionType::Scan, format!("s{i}")))
                .await
                .unwrap();
        }
        let mine = svc.my_actions(&admin).await.unwrap();
        assert_eq!(mine.len(), MY_ACTIONS_LIMIT as usize);
        assert_eq!(mine[0].description, "s14");
    }

    #[tokio::test]
    async fn record_writes_trail_line() {
        let dir = tempfile::TempDir::new().unwrap();
        let svc = test_service_with_trail(dir.path().to_path_buf()).await;
        let admin = admin(&svc).await;

        svc.record(
            &admin,
            NewAction::new(ActionType::Scan, "scan").on(EntityType::Room, "rom-1"),
            TrailOp::Scan,
            &serde_json::json!({"uid": "x"}),
        )
        .await
        .unwrap();

        let day = Utc::now().format("%Y-%m-%d").to_string();
        let ops = svc.trail().read_day(&day).unwrap();
        let scan = ops.iter().find(|op| op.op == TrailOp::Scan).unwrap();
        assert_eq!(scan.id, "rom-1");
        assert_eq!(scan.user, admin.user_id);
    }
}
