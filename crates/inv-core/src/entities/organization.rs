use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, HistoryAction};

/// Top of the organizational hierarchy.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct University {
    pub id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Building {
    pub id: String,
    pub university_id: String,
    pub name: String,
    pub address: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A floor of a building. `number` is unique within the building.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Floor {
    pub id: String,
    pub building_id: String,
    pub number: i64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An academic unit housed in a building. `name` is unique within the building.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Faculty {
    pub id: String,
    pub building_id: String,
    pub floor_id: Option<String>,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A room on a floor. `number` is unique within the floor.
///
/// `derived_from` links a room produced by a split to its parent, and a room
/// consumed by a merge to the merged result.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Room {
    pub id: String,
    pub building_id: String,
    pub floor_id: String,
    pub derived_from: Option<String>,
    pub author_id: Option<String>,
    pub number: String,
    pub name: Option<String>,
    pub is_special: bool,
    pub uid: String,
    pub qr_payload: String,
    pub created_at: DateTime<Utc>,
}

/// Structural change to a room or faculty (split, merge, transfer).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct HierarchyHistory {
    pub id: String,
    pub entity_type: EntityType,
    pub entity_id: String,
    pub action: HistoryAction,
    pub description: String,
    pub created_at: DateTime<Utc>,
}
