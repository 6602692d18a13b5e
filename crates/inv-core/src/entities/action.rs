use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{ActionType, EntityType};

/// An append-only audit entry: who did what to which object.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct UserAction {
    pub id: String,
    pub user_id: Option<String>,
    pub action_type: ActionType,
    pub description: String,
    pub entity_type: Option<EntityType>,
    pub entity_id: Option<String>,
    pub old_value: Option<String>,
    pub new_value: Option<String>,
    pub details: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}
