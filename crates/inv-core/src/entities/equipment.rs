use chrono::{DateTime, NaiveDate, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::Characteristics;
use crate::enums::{CharacteristicKind, EquipmentStatus};

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EquipmentType {
    pub id: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl EquipmentType {
    /// Characteristic family implied by the type name, if any.
    #[must_use]
    pub fn characteristic_kind(&self) -> Option<CharacteristicKind> {
        CharacteristicKind::from_type_name(&self.name)
    }
}

/// A purchase or service contract that equipment can reference.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ContractDocument {
    pub id: String,
    pub number: String,
    pub file: Option<String>,
    pub valid_until: Option<NaiveDate>,
    pub author_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An inventoried physical item.
///
/// `inn` is the inventory number; 0 means "not assigned yet" and implies no
/// QR payload. `room_id` is `None` while the item is in repair or disposed.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Equipment {
    pub id: String,
    pub type_id: String,
    pub room_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub status: EquipmentStatus,
    pub is_active: bool,
    pub inn: i64,
    pub author_id: Option<String>,
    pub contract_id: Option<String>,
    pub uid: String,
    pub qr_payload: Option<String>,
    pub characteristics: Option<Characteristics>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Location label shown for repaired equipment.
pub const LOCATION_REPAIR: &str = "Repair catalog";
/// Location label shown for disposed equipment.
pub const LOCATION_DISPOSAL: &str = "Disposal";

impl Equipment {
    /// Human-readable location: the lifecycle catalog for items out of
    /// service, otherwise the given room number (or `N/A`).
    #[must_use]
    pub fn location(&self, room_number: Option<&str>) -> String {
        match self.status {
            EquipmentStatus::NeedsRepair => LOCATION_REPAIR.to_string(),
            EquipmentStatus::Disposed => LOCATION_DISPOSAL.to_string(),
            EquipmentStatus::New | EquipmentStatus::Working => room_number
                .unwrap_or(crate::qr::NO_ROOM)
                .to_string(),
        }
    }
}

/// A named, reusable characteristic template owned by a user.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct Specification {
    pub id: String,
    pub kind: CharacteristicKind,
    pub name: String,
    pub author_id: Option<String>,
    pub characteristics: Characteristics,
    pub created_at: DateTime<Utc>,
}
