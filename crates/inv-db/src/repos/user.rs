//! User repository: accounts, roles and activation.

use chrono::Utc;

use inv_core::entities::User;
use inv_core::enums::{ActionType, EntityType, TrailOp, UserRole};
use inv_core::identity::Actor;
use inv_core::ids::PREFIX_USER;

use crate::access::require_admin;
use crate::error::{DatabaseError, not_found};
use crate::helpers::{get_bool, get_opt_string, parse_datetime, parse_enum};
use crate::repos::action::NewAction;
use crate::service::InventoryService;
use crate::updates::SetClause;
use crate::updates::user::UserUpdate;

const SELECT_COLS: &str =
    "id, username, first_name, last_name, phone, email, role, is_active, created_at";

/// Fields for a new account.
#[derive(Debug, Clone, Default)]
pub struct NewUser {
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub role: UserRole,
}

fn row_to_user(row: &libsql::Row) -> Result<User, DatabaseError> {
    Ok(User {
        id: row.get::<String>(0)?,
        username: row.get::<String>(1)?,
        first_name: row.get::<String>(2)?,
        last_name: row.get::<String>(3)?,
        phone: get_opt_string(row, 4)?,
        email: get_opt_string(row, 5)?,
        role: parse_enum(&row.get::<String>(6)?)?,
        is_active: get_bool(row, 7)?,
        created_at: parse_datetime(&row.get::<String>(8)?)?,
    })
}

impl InventoryService {
    /// Create the first admin account. Only allowed while no users exist.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Validation` if any user already exists.
    pub async fn bootstrap_admin(&self, new: NewUser) -> Result<User, DatabaseError> {
        if self.user_count().await? > 0 {
            return Err(DatabaseError::Validation(
                "users already exist; ask an admin to create your account".into(),
            ));
        }
        let user = self
            .insert_user(NewUser {
                role: UserRole::Admin,
                ..new
            })
            .await?;
        let actor = user.actor();
        self.record(
            &actor,
            NewAction::new(
                ActionType::CreateUser,
                format!("Bootstrapped admin: {}", user.username),
            )
            .on(EntityType::User, &user.id),
            TrailOp::Create,
            &user,
        )
        .await?;
        tracing::info!(username = %user.username, "bootstrapped first admin");
        Ok(user)
    }

    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails.
    pub async fn user_count(&self) -> Result<u64, DatabaseError> {
        self.db()
            .count_with("SELECT COUNT(*) FROM users", || ())
            .await
    }

    /// Create an account. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers and `Validation` for an empty
    /// or taken username or a taken email.
    pub async fn create_user(&self, actor: &Actor, new: NewUser) -> Result<User, DatabaseError> {
        require_admin(actor, "create users")?;
        let user = self.insert_user(new).await?;
        self.record(
            actor,
            NewAction::new(ActionType::CreateUser, format!("Created user: {}", user.username))
                .on(EntityType::User, &user.id),
            TrailOp::Create,
            &user,
        )
        .await?;
        Ok(user)
    }

    async fn insert_user(&self, new: NewUser) -> Result<User, DatabaseError> {
        let username = new.username.trim().to_string();
        if username.is_empty() {
            return Err(DatabaseError::Validation("username must not be empty".into()));
        }
        if self.find_user_by_username(&username).await?.is_some() {
            return Err(DatabaseError::Validation(format!(
                "username '{username}' is already taken"
            )));
        }
        if let Some(email) = new.email.as_deref() {
            self.ensure_email_free(email, None).await?;
        }

        let now = Utc::now();
        let id = self.db().generate_id(PREFIX_USER).await?;
        self.db()
            .execute_with(
                "INSERT INTO users (id, username, first_name, last_name, phone, email, role, is_active, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1, ?8)",
                || {
                    libsql::params![
                        id.as_str(),
                        username.as_str(),
                        new.first_name.as_str(),
                        new.last_name.as_str(),
                        new.phone.as_deref(),
                        new.email.as_deref(),
                        new.role.as_str(),
                        now.to_rfc3339()
                    ]
                },
            )
            .await?;

        Ok(User {
            id,
            username,
            first_name: new.first_name,
            last_name: new.last_name,
            phone: new.phone,
            email: new.email,
            role: new.role,
            is_active: true,
            created_at: now,
        })
    }

    async fn ensure_email_free(&self, email: &str, except: Option<&str>) -> Result<(), DatabaseError> {
        let taken = self
            .db()
            .count_with(
                "SELECT COUNT(*) FROM users WHERE email = ?1 AND id != ?2",
                || libsql::params![email, except.unwrap_or("")],
            )
            .await?;
        if taken > 0 {
            return Err(DatabaseError::Validation(format!(
                "email '{email}' is already in use"
            )));
        }
        Ok(())
    }

    pub(crate) async fn load_user(&self, id: &str) -> Result<User, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(&format!("SELECT {SELECT_COLS} FROM users WHERE id = ?1"), || [id])
            .await?;
        let row = rows.next().await?.ok_or_else(|| not_found("user", id))?;
        row_to_user(&row)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, DatabaseError> {
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM users WHERE username = ?1"),
                || [username],
            )
            .await?;
        match rows.next().await? {
            Some(row) => Ok(Some(row_to_user(&row)?)),
            None => Ok(None),
        }
    }

    /// Fetch a user. Admins may read anyone; others only themselves.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` or `NotFound`.
    pub async fn get_user(&self, actor: &Actor, id: &str) -> Result<User, DatabaseError> {
        if !actor.is_admin() && actor.user_id != id {
            return Err(DatabaseError::PermissionDenied(
                "only an admin may view other users".into(),
            ));
        }
        self.load_user(id).await
    }

    /// # Errors
    ///
    /// Returns `NotFound` when no account has that username.
    pub async fn get_user_by_username(&self, username: &str) -> Result<User, DatabaseError> {
        self.find_user_by_username(username)
            .await?
            .ok_or_else(|| not_found("user", username))
    }

    /// Turn a username into the acting identity for a command.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for unknown users and `PermissionDenied` for
    /// deactivated accounts.
    pub async fn resolve_actor(&self, username: &str) -> Result<Actor, DatabaseError> {
        let user = self.get_user_by_username(username).await?;
        if !user.is_active {
            return Err(DatabaseError::PermissionDenied(format!(
                "user '{username}' is deactivated"
            )));
        }
        Ok(user.actor())
    }

    /// All accounts, ordered by username. Admin-only.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied` for managers.
    pub async fn list_users(&self, actor: &Actor) -> Result<Vec<User>, DatabaseError> {
        require_admin(actor, "list users")?;
        let mut rows = self
            .db()
            .query_with(
                &format!("SELECT {SELECT_COLS} FROM users ORDER BY username"),
                || (),
            )
            .await?;
        let mut users = Vec::new();
        while let Some(row) = rows.next().await? {
            users.push(row_to_user(&row)?);
        }
        Ok(users)
    }

    /// Update profile fields. Users may edit themselves; only admins may edit
    /// others or change a role.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `NotFound` or `Validation` (email taken).
    pub async fn update_user(
        &self,
        actor: &Actor,
        id: &str,
        update: UserUpdate,
    ) -> Result<User, DatabaseError> {
        if !actor.is_admin() && actor.user_id != id {
            return Err(DatabaseError::PermissionDenied(
                "only an admin may edit other users".into(),
            ));
        }
        if update.role.is_some() {
            require_admin(actor, "change roles")?;
        }
        let before = self.load_user(id).await?;

        let mut set = SetClause::default();
        if let Some(ref v) = update.first_name {
            set.push("first_name", v.as_str());
        }
        if let Some(ref v) = update.last_name {
            set.push("last_name", v.as_str());
        }
        if let Some(ref v) = update.phone {
            set.push_opt("phone", v.as_deref());
        }
        if let Some(ref v) = update.email {
            if let Some(email) = v.as_deref() {
                self.ensure_email_free(email, Some(id)).await?;
            }
            set.push_opt("email", v.as_deref());
        }
        if let Some(role) = update.role {
            set.push("role", role.as_str());
        }
        if set.is_empty() {
            return Ok(before);
        }

        let (sql, params) = set.into_sql("users", id);
        self.db()
            .execute_with(&sql, || libsql::params_from_iter(params.clone()))
            .await?;
        let user = self.load_user(id).await?;

        self.record(
            actor,
            NewAction::new(ActionType::UpdateUser, format!("Updated user: {}", user.username))
                .on(EntityType::User, id)
                .details(serde_json::to_value(&update)?),
            TrailOp::Update,
            &update,
        )
        .await?;
        Ok(user)
    }

    /// Delete an account. Admin-only; admins cannot delete themselves.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `Validation` (self) or `NotFound`.
    pub async fn delete_user(&self, actor: &Actor, id: &str) -> Result<(), DatabaseError> {
        require_admin(actor, "delete users")?;
        if actor.user_id == id {
            return Err(DatabaseError::Validation("you cannot delete yourself".into()));
        }
        let user = self.load_user(id).await?;
        self.db()
            .execute_with("DELETE FROM users WHERE id = ?1", || [id])
            .await?;
        self.record(
            actor,
            NewAction::new(ActionType::DeleteUser, format!("Deleted user: {}", user.username))
                .on(EntityType::User, id),
            TrailOp::Delete,
            &user,
        )
        .await?;
        Ok(())
    }

    /// Flip `is_active`. Admin-only; admins cannot deactivate themselves.
    ///
    /// # Errors
    ///
    /// Returns `PermissionDenied`, `Validation` (self) or `NotFound`.
    pub async fn toggle_user_active(&self, actor: &Actor, id: &str) -> Result<User, DatabaseError> {
        require_admin(actor, "activate or deactivate users")?;
        if actor.user_id == id {
            return Err(DatabaseError::Validation(
                "you cannot deactivate yourself".into(),
            ));
        }
        let before = self.load_user(id).await?;
        let active = !before.is_active;
        self.db()
            .execute_with("UPDATE users SET is_active = ?1 WHERE id = ?2", || {
                libsql::params![i64::from(active), id]
            })
            .await?;

        self.record(
            actor,
            NewAction::new(
                ActionType::UpdateUser,
                format!(
                    "{} user: {}",
                    if active { "Activated" } else { "Deactivated" },
                    before.username
                ),
            )
            .on(EntityType::User, id)
            .values(
                Some(before.is_active.to_string()),
                Some(active.to_string()),
            ),
            TrailOp::Update,
            &serde_json::json!({ "is_active": active }),
        )
        .await?;

        Ok(User {
            is_active: active,
            ..before
        })
    }
}
