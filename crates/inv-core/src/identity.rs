use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::UserRole;

/// The user on whose behalf an operation runs.
///
/// Resolved by `inv-cli` from `--user` (or `general.user`) and passed to every
/// mutating `InventoryService` method. Carries only what permission checks
/// need.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Actor {
    pub user_id: String,
    pub role: UserRole,
}

impl Actor {
    #[must_use]
    pub fn new(user_id: impl Into<String>, role: UserRole) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    /// Admins may touch anything; managers only rows they authored.
    #[must_use]
    pub fn owns(&self, author_id: Option<&str>) -> bool {
        self.is_admin() || author_id == Some(self.user_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_rules() {
        let admin = Actor::new("usr-00000001", UserRole::Admin);
        let manager = Actor::new("usr-00000002", UserRole::Manager);

        assert!(admin.owns(None));
        assert!(admin.owns(Some("usr-00000002")));
        assert!(manager.owns(Some("usr-00000002")));
        assert!(!manager.owns(Some("usr-00000001")));
        assert!(!manager.owns(None));
    }
}
