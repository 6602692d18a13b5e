//! Role and ownership checks.
//!
//! Admins may do everything. Managers only see and mutate contracts,
//! equipment and specifications they authored; user administration and the
//! support inbox are admin-only.

use inv_core::identity::Actor;

use crate::error::DatabaseError;

/// Fail unless the actor is an admin.
///
/// # Errors
///
/// Returns `DatabaseError::PermissionDenied` naming the attempted operation.
pub fn require_admin(actor: &Actor, operation: &str) -> Result<(), DatabaseError> {
    if actor.is_admin() {
        Ok(())
    } else {
        Err(DatabaseError::PermissionDenied(format!(
            "only an admin may {operation}"
        )))
    }
}

/// Fail unless the actor is an admin or authored the row.
///
/// # Errors
///
/// Returns `DatabaseError::PermissionDenied` naming the attempted operation.
pub fn require_owner(
    actor: &Actor,
    author_id: Option<&str>,
    operation: &str,
) -> Result<(), DatabaseError> {
    if actor.owns(author_id) {
        Ok(())
    } else {
        Err(DatabaseError::PermissionDenied(format!(
            "{operation} is limited to the author or an admin"
        )))
    }
}

/// SQL fragment restricting rows to those visible to the actor.
///
/// Returns `("AND {column} = ?{idx}", [user_id])` for managers and an empty
/// filter for admins. `idx` is the next free positional parameter.
#[must_use]
pub fn owner_filter(actor: &Actor, column: &str, idx: usize) -> (String, Vec<libsql::Value>) {
    if actor.is_admin() {
        (String::new(), Vec::new())
    } else {
        (
            format!("AND {column} = ?{idx}"),
            vec![libsql::Value::Text(actor.user_id.clone())],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use inv_core::enums::UserRole;

    #[test]
    fn owner_filter_only_for_managers() {
        let admin = Actor::new("usr-a", UserRole::Admin);
        let manager = Actor::new("usr-m", UserRole::Manager);

        let (sql, params) = owner_filter(&admin, "author_id", 3);
        assert!(sql.is_empty());
        assert!(params.is_empty());

        let (sql, params) = owner_filter(&manager, "e.author_id", 3);
        assert_eq!(sql, "AND e.author_id = ?3");
        assert_eq!(params.len(), 1);
    }

    #[test]
    fn guards() {
        let manager = Actor::new("usr-m", UserRole::Manager);
        assert!(require_admin(&manager, "create users").is_err());
        assert!(require_owner(&manager, Some("usr-m"), "edit").is_ok());
        assert!(matches!(
            require_owner(&manager, Some("usr-x"), "edit"),
            Err(DatabaseError::PermissionDenied(_))
        ));
    }
}
