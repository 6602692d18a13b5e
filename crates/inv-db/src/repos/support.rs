//! Support messages from users to the administrators.

use chrono::Utc;

use inv_core::entities::SupportMessage;
use inv_core::enums::{ActionType, EntityType, TrailOp};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_SUPPORT;

use crate::access::require_admin;
use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_bool, parse_datetime, placeholders};
use crate::repos::action::NewAction;
use crate::service::InventoryService;

const SELECT_COLS: &str = "id, sender_id, subject, message, sent_at, is_resolved, is_notified";

fn row_to_message(row: &libsql::Row) -> Result<SupportMessage, DatabaseError> {
    Ok(SupportMessage {
        id: row.get::<String>(0)?,
        sender_id: row.get::<String>(1)?,
        subject: row.get::<String>(2)?,
        message: row.get::<String>(3)?,
        sent_at: parse_datetime(&row.get::<String>(4)?)?,
        is_resolved: get_bool(row, 5)?,
        is_notified: get_bool(row, 6)?,
    })
}

impl InventoryService {
    /// Send a message to the administrators. Any active user may do this.
    ///
    /// # Errors
    ///
    /// Returns `Validation` for an empty subject or body.
    pub async fn send_support_message(
        &self,
        actor: &Actor,
        subject: &str,
        message: &str,
    ) -> Result<SupportMessage, DatabaseError> {
        if subject.trim().is_empty() || message.trim().is_empty() {
            return Err(DatabaseError::Validation(
                "subject and message must not be empty".into(),
            ));
        }
        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_SUPPORT).await?;
        self.db()
            .execute_with(
                "INSERT INTO support_messages (id, sender_id, subject, message, sent_at)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                || {
                    libsql::params![
                        id.as_str(),
                        actor.user_id.as_str(),
                        subject,
                        message,
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;

        let msg = SupportMessage {
            id,
            sender_id: actor.user_id.clone(),
            subject: subject.to_string(),
            message: message.to_string(),
            sent_at: now,
            is_resolved: false,
            is_notified: false,
        };
        self.record(
            actor,
            NewAction::new(
                ActionType::CreateSupportMessage,
                format!("Support message: {subject}"),
            )
            .on(EntityType::SupportMessage, &msg.id),
            TrailOp::Create,
            &msg,
        )
        .await?;
        Ok(msg)
    }

    async fn load_support_message(&self, id: &str) -> Result<SupportMessage, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM support_messages WHERE id = ?1"),
                || [id],
            )
            .await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| not_found("support_message", id))?;
        row_to_message(&row)
    }

    async fn select_messages(&self, where_clause: &str) -> Result<Vec<SupportMessage>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!(
                    "SELECT {SELECT_COLS} FROM support_messages {where_clause}
                     ORDER BY sent_at DESC, rowid DESC"
                ),
                || (),
            )
            .await?;
        let mut out = Vec::new();
        while let Some(row) = rows.next().await? {
            out.push(row_to_message(&row)?);
        }
        Ok(out)
    }

    /// All messages, newest first. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers.
    pub async fn list_support_messages(
        &self,
        actor: &Actor,
    ) -> Result<Vec<SupportMessage>, DatabaseError> {
        require_admin(actor, "read support messages")?;
        self.select_messages("").await
    }

    /// Messages no admin has been notified about yet. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers.
    pub async fn list_new_support_messages(
        &self,
        actor: &Actor,
    ) -> Result<Vec<SupportMessage>, DatabaseError> {
        require_admin(actor, "read support messages")?;
        self.select_messages("WHERE is_notified = 0").await
    }

    /// Mark messages as seen. Returns the number of rows changed. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers.
    pub async fn mark_support_notified(
        &self,
        actor: &Actor,
        ids: &[String],
    ) -> Result<u64, DatabaseError> {
        require_admin(actor, "mark support messages")?;
        if ids.is_empty() {
            return Ok(0);
        }
        let sql = format!(
            "UPDATE support_messages SET is_notified = 1
             WHERE is_notified = 0 AND id IN ({})",
            placeholders(1, ids.len())
        );
        let params: Vec<libsql::Value> = ids.iter().map(|id| id.as_str().into()).collect();
        let changed = self
            .db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;

        if changed > 0 {
            self.log_action(
                actor,
                NewAction::new(
                    ActionType::UpdateSupportMessage,
                    format!("Marked {changed} support message(s) as notified"),
                )
                .details(serde_json::json!({ "ids": ids })),
            )
            .await?;
        }
        Ok(changed)
    }

    /// Mark a message resolved. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `NotFound`.
    pub async fn resolve_support_message(
        &self,
        actor: &Actor,
        id: &str,
    ) -> Result<SupportMessage, DatabaseError> {
        require_admin(actor, "resolve support messages")?;
        let msg = self.load_support_message(id).await?;
        self.db()
            .execute_with(
                "UPDATE support_messages SET is_resolved = 1, is_notified = 1 WHERE id = ?1",
                || [id],
            )
            .await?;
        self.record(
            actor,
            NewAction::new(
                ActionType::UpdateSupportMessage,
                format!("Resolved support message: {}", msg.subject),
            )
            .on(EntityType::SupportMessage, id),
            TrailOp::Update,
            &serde_json::json!({ "is_resolved": true }),
        )
        .await?;
        Ok(SupportMessage {
            is_resolved: true,
            is_notified: true,
            ..msg
        })
    }

    /// Delete a message. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `NotFound`.
    pub async fn delete_support_message(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "delete support messages")?;
        let msg = self.load_support_message(id).await?;
        self.db()
            .execute_with("DELETE FROM support_messages WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(
                ActionType::DeleteSupportMessage,
                format!("Deleted support message: {}", msg.subject),
            )
            .on(EntityType::SupportMessage, id),
            TrailOp::Delete,
            &msg,
        )
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::helpers::*;

    use super::*;

    #[tokio::test]
    async fn send_list_and_notify() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let manager = manager(&svc, &admin, "o.orlova").await;

        let first = svc
            .send_support_message(&manager, "Printer", "Room 101 printer jams")
            .await
            .unwrap();
        svc.send_support_message(&manager, "Access", "Need room 204")
            .await
            .unwrap();

        assert!(svc.list_support_messages(&manager).await.is_err());
        let all = svc.list_support_messages(&admin).await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].subject, "Access");

        let changed = svc
            .mark_support_notified(&admin, &[first.id.clone()])
            .await
            .unwrap();
        assert_eq!(changed, 1);
        let fresh = svc.list_new_support_messages(&admin).await.unwrap();
        assert_eq!(fresh.len(), 1);
        assert_eq!(fresh[0].subject, "Access");
    }

    #[tokio::test]
    async fn resolve_and_delete() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        let msg = svc
            .send_support_message(&admin, "Projector", "Bulb is out")
            .await
            .unwrap();

        let resolved = svc.resolve_support_message(&admin, &msg.id).await.unwrap();
        assert!(resolved.is_resolved);

        svc.delete_support_message(&admin, &msg.id).await.unwrap();
        assert!(matches!(
            svc.resolve_support_message(&admin, &msg.id).await,
            Err(DatabaseError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn empty_message_rejected() {
        let svc = test_service().await;
        let admin = admin(&svc).await;
        assert!(matches!(
            svc.send_support_message(&admin, " ", "body").await,
            Err(DatabaseError::Validation(_))
        ));
    }
}
