//! Typed audit detail payloads.
//!
//! Each `UserAction` can carry a structured `details` JSON blob. These types
//! fix the shape of the most common ones.

use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Detail for lifecycle status changes (repair, disposal, equipment status).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct StatusChangedDetail {
    pub from: String,
    pub to: String,
    pub reason: Option<String>,
}

/// Old and new value of a single changed field.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FieldChange {
    pub old: serde_json::Value,
    pub new: serde_json::Value,
}

/// Detail for `ActionType::UpdateEquipment` and other field-level updates.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ChangesDetail {
    pub id: String,
    pub name: String,
    pub changes: BTreeMap<String, FieldChange>,
}

impl ChangesDetail {
    /// Diff two JSON objects field by field. Fields present in only one side
    /// are reported with `null` on the other.
    #[must_use]
    pub fn diff(
        id: &str,
        name: &str,
        before: &serde_json::Value,
        after: &serde_json::Value,
    ) -> Self {
        let mut changes = BTreeMap::new();
        let empty = serde_json::Map::new();
        let old = before.as_object().unwrap_or(&empty);
        let new = after.as_object().unwrap_or(&empty);
        for key in old.keys().chain(new.keys()) {
            if key == "updated_at" || changes.contains_key(key) {
                continue;
            }
            let o = old.get(key).cloned().unwrap_or_default();
            let n = new.get(key).cloned().unwrap_or_default();
            if o != n {
                changes.insert(key.clone(), FieldChange { old: o, new: n });
            }
        }
        Self {
            id: id.to_string(),
            name: name.to_string(),
            changes,
        }
    }
}

/// Detail for `ActionType::Move`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct MoveDetail {
    pub equipment_ids: Vec<String>,
    pub from_room_id: String,
    pub to_room_id: String,
    pub note: Option<String>,
}

/// Detail for structural room and faculty changes (split, merge, transfer).
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RestructureDetail {
    pub sources: Vec<String>,
    pub results: Vec<String>,
}

/// Detail for `ActionType::Scan`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct ScanDetail {
    pub object_type: String,
    pub object_id: String,
    pub data: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn diff_reports_only_changed_fields() {
        let before = json!({"name": "PC", "inn": 0, "updated_at": "a"});
        let after = json!({"name": "PC", "inn": 42, "updated_at": "b", "room_id": "rom-1"});
        let detail = ChangesDetail::diff("eqp-1", "PC", &before, &after);

        assert_eq!(detail.changes.len(), 2);
        assert_eq!(detail.changes["inn"].old, json!(0));
        assert_eq!(detail.changes["inn"].new, json!(42));
        assert_eq!(detail.changes["room_id"].old, serde_json::Value::Null);
    }
}
