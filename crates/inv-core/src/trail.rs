//! JSONL trail operation envelope.
//!
//! Every mutation is recorded as a `TrailOperation` in per-day
//! `.inventory/trail/{YYYY-MM-DD}.jsonl` files, next to the `user_actions`
//! audit table. The trail is an append-only export that survives database
//! resets.
//!
//! The `v` field supports schema versioning: trail lines without a `v` field
//! deserialize with `v == 1` via `#[serde(default)]`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::enums::{EntityType, TrailOp};

/// Default trail version for lines written without a `v` field.
const fn default_trail_version() -> u32 {
    1
}

/// A single operation recorded in the JSONL trail.
///
/// The `data` field contains the full entity state for `Create` ops and the
/// changed fields for `Update`; lifecycle and structural ops carry their
/// audit detail.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TrailOperation {
    /// Schema version. Defaults to 1 for old trails without this field.
    #[serde(default = "default_trail_version")]
    pub v: u32,

    /// ISO 8601 timestamp of the operation.
    pub ts: String,

    /// ID of the user that performed the operation.
    pub user: String,

    /// What kind of mutation this represents.
    pub op: TrailOp,

    /// Which entity type was affected.
    pub entity: EntityType,

    /// ID of the affected entity.
    pub id: String,

    /// Operation payload. Schema depends on `op` and `entity`.
    pub data: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enums::{EntityType, TrailOp};

    #[test]
    fn trail_op_roundtrip() {
        let op = TrailOperation {
            v: 1,
            ts: "2026-02-08T12:00:00Z".to_string(),
            user: "usr-a3f8b2c1".to_string(),
            op: TrailOp::Create,
            entity: EntityType::Equipment,
            id: "eqp-deadbeef".to_string(),
            data: serde_json::json!({"name": "ПК 1"}),
        };

        let json = serde_json::to_string(&op).unwrap();
        let recovered: TrailOperation = serde_json::from_str(&json).unwrap();
        assert_eq!(recovered, op);
    }

    #[test]
    fn trail_op_default_version() {
        let json = r#"{"ts":"2026-01-01T00:00:00Z","user":"usr-00000000","op":"create","entity":"room","id":"rom-11111111","data":{}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 1);
    }

    #[test]
    fn trail_op_transition_payload() {
        let json = r#"{"v":2,"ts":"2026-02-08T12:00:00Z","user":"usr-00000000","op":"transition","entity":"repair","id":"rep-11111111","data":{"from":"in_progress","to":"completed"}}"#;
        let op: TrailOperation = serde_json::from_str(json).unwrap();
        assert_eq!(op.v, 2);
        assert_eq!(op.op, TrailOp::Transition);
        assert_eq!(op.entity, EntityType::Repair);
    }
}
