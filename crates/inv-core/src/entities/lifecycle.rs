use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::RepairStatus;

/// Repair record. At most one per equipment item.
///
/// `original_room_id` remembers where the item stood so a completed repair
/// can put it back.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Repair {
    pub id: String,
    pub equipment_id: String,
    pub start_date: DateTime<Utc>,
    pub end_date: Option<DateTime<Utc>>,
    pub status: RepairStatus,
    pub notes: Option<String>,
    pub original_room_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Disposal record. At most one per equipment item.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Disposal {
    pub id: String,
    pub equipment_id: String,
    pub disposal_date: DateTime<Utc>,
    pub reason: String,
    pub notes: Option<String>,
    pub original_room_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A relocation of one equipment item between rooms.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Movement {
    pub id: String,
    pub equipment_id: String,
    pub from_room_id: Option<String>,
    pub to_room_id: String,
    pub moved_at: DateTime<Utc>,
    pub note: Option<String>,
    pub user_id: Option<String>,
}
