//! Status enums, entity types, action types, and characteristic value enums.
//!
//! All enums use `snake_case` serialization via `#[serde(rename_all = "snake_case")]`.
//! Status enums with state machines provide `allowed_next_states()` to enforce
//! valid transitions at the application layer.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// EquipmentStatus
// ---------------------------------------------------------------------------

/// Lifecycle status of an equipment item.
///
/// ```text
/// new → working → needs_repair → working   (repair completed)
///                              → disposed  (repair failed)
///              → disposed
/// new → needs_repair | disposed
/// ```
///
/// `disposed` is terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentStatus {
    #[default]
    New,
    Working,
    NeedsRepair,
    Disposed,
}

impl EquipmentStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Working, Self::NeedsRepair, Self::Disposed];

    /// Valid next states from the current state.
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::New => &[Self::Working, Self::NeedsRepair, Self::Disposed],
            Self::Working => &[Self::NeedsRepair, Self::Disposed],
            Self::NeedsRepair => &[Self::Working, Self::Disposed],
            Self::Disposed => &[],
        }
    }

    /// Check whether transitioning to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Working => "working",
            Self::NeedsRepair => "needs_repair",
            Self::Disposed => "disposed",
        }
    }
}

impl fmt::Display for EquipmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// RepairStatus
// ---------------------------------------------------------------------------

/// Status of a repair record.
///
/// ```text
/// in_progress → completed
///             → failed
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RepairStatus {
    InProgress,
    Completed,
    Failed,
}

impl RepairStatus {
    #[must_use]
    pub const fn allowed_next_states(self) -> &'static [Self] {
        match self {
            Self::InProgress => &[Self::Completed, Self::Failed],
            Self::Completed | Self::Failed => &[],
        }
    }

    #[must_use]
    pub fn can_transition_to(self, next: Self) -> bool {
        self.allowed_next_states().contains(&next)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for RepairStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// UserRole
// ---------------------------------------------------------------------------

/// Role of an inventory user. New users default to `manager`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Admin,
    #[default]
    Manager,
}

impl UserRole {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Manager => "manager",
        }
    }

    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ActionType
// ---------------------------------------------------------------------------

/// Kind of a user action recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ActionType {
    Create,
    Update,
    UpdateInn,
    Move,
    Delete,
    CreateRoom,
    DeleteRoom,
    CreateEquipment,
    UpdateEquipment,
    DeleteEquipment,
    CreateUser,
    UpdateUser,
    DeleteUser,
    CreateSupportMessage,
    UpdateSupportMessage,
    DeleteSupportMessage,
    CreateBuilding,
    DeleteBuilding,
    CreateFloor,
    DeleteFloor,
    CreateFacility,
    DeleteFacility,
    Scan,
    CreateRepair,
    UpdateRepair,
    CreateDisposal,
    UpdateDisposal,
    SendToRepair,
    DisposeEquipment,
}

impl ActionType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::UpdateInn => "update_inn",
            Self::Move => "move",
            Self::Delete => "delete",
            Self::CreateRoom => "create_room",
            Self::DeleteRoom => "delete_room",
            Self::CreateEquipment => "create_equipment",
            Self::UpdateEquipment => "update_equipment",
            Self::DeleteEquipment => "delete_equipment",
            Self::CreateUser => "create_user",
            Self::UpdateUser => "update_user",
            Self::DeleteUser => "delete_user",
            Self::CreateSupportMessage => "create_support_message",
            Self::UpdateSupportMessage => "update_support_message",
            Self::DeleteSupportMessage => "delete_support_message",
            Self::CreateBuilding => "create_building",
            Self::DeleteBuilding => "delete_building",
            Self::CreateFloor => "create_floor",
            Self::DeleteFloor => "delete_floor",
            Self::CreateFacility => "create_facility",
            Self::DeleteFacility => "delete_facility",
            Self::Scan => "scan",
            Self::CreateRepair => "create_repair",
            Self::UpdateRepair => "update_repair",
            Self::CreateDisposal => "create_disposal",
            Self::UpdateDisposal => "update_disposal",
            Self::SendToRepair => "send_to_repair",
            Self::DisposeEquipment => "dispose_equipment",
        }
    }
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// EntityType
// ---------------------------------------------------------------------------

/// Every persisted entity kind. Used in the audit log and the JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    University,
    Building,
    Floor,
    Faculty,
    Room,
    EquipmentType,
    Contract,
    Equipment,
    Specification,
    Movement,
    Repair,
    Disposal,
    User,
    SupportMessage,
}

impl EntityType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::University => "university",
            Self::Building => "building",
            Self::Floor => "floor",
            Self::Faculty => "faculty",
            Self::Room => "room",
            Self::EquipmentType => "equipment_type",
            Self::Contract => "contract",
            Self::Equipment => "equipment",
            Self::Specification => "specification",
            Self::Movement => "movement",
            Self::Repair => "repair",
            Self::Disposal => "disposal",
            Self::User => "user",
            Self::SupportMessage => "support_message",
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// TrailOp
// ---------------------------------------------------------------------------

/// Kind of mutation recorded in the JSONL trail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum TrailOp {
    Create,
    Update,
    Delete,
    Transition,
    Move,
    Split,
    Merge,
    Transfer,
    Scan,
}

impl TrailOp {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Transition => "transition",
            Self::Move => "move",
            Self::Split => "split",
            Self::Merge => "merge",
            Self::Transfer => "transfer",
            Self::Scan => "scan",
        }
    }
}

impl fmt::Display for TrailOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// HistoryAction
// ---------------------------------------------------------------------------

/// Structural change recorded in room and faculty history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Created,
    Updated,
    Split,
    Merged,
    Transferred,
}

impl HistoryAction {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Updated => "updated",
            Self::Split => "split",
            Self::Merged => "merged",
            Self::Transferred => "transferred",
        }
    }
}

impl fmt::Display for HistoryAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// QrObjectType
// ---------------------------------------------------------------------------

/// What a scanned QR code is expected to identify.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QrObjectType {
    Room,
    Equipment,
}

impl QrObjectType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Room => "room",
            Self::Equipment => "equipment",
        }
    }
}

impl fmt::Display for QrObjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CharacteristicKind
// ---------------------------------------------------------------------------

/// Family of type-specific attributes an equipment type carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CharacteristicKind {
    Computer,
    Notebook,
    Monoblok,
    Printer,
    Extender,
    Router,
    Tv,
    Projector,
    Whiteboard,
    Monitor,
}

impl CharacteristicKind {
    pub const ALL: [Self; 10] = [
        Self::Computer,
        Self::Notebook,
        Self::Monoblok,
        Self::Printer,
        Self::Extender,
        Self::Router,
        Self::Tv,
        Self::Projector,
        Self::Whiteboard,
        Self::Monitor,
    ];

    /// Resolve the characteristic family from a free-form equipment type name.
    ///
    /// Matching is case-insensitive and ignores surrounding whitespace. Both
    /// the Russian names used on campus and their English equivalents are
    /// recognized. Returns `None` for types without type-specific attributes.
    #[must_use]
    pub fn from_type_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        let kind = match name.as_str() {
            "компьютер" | "computer" => Self::Computer,
            "ноутбук" | "notebook" | "laptop" => Self::Notebook,
            "моноблок" | "monoblock" | "monoblok" => Self::Monoblok,
            "принтер" | "мфу" | "printer" => Self::Printer,
            "удлинитель" | "сетевой фильтр" | "extender" => Self::Extender,
            "роутер" | "router" => Self::Router,
            "телевизор" | "тв" | "tv" => Self::Tv,
            "проектор" | "projector" => Self::Projector,
            "электронная доска" | "whiteboard" => Self::Whiteboard,
            "монитор" | "monitor" => Self::Monitor,
            _ => return None,
        };
        Some(kind)
    }

    /// Whether this family carries disks and GPUs.
    #[must_use]
    pub const fn has_components(self) -> bool {
        matches!(self, Self::Computer | Self::Notebook | Self::Monoblok)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Computer => "computer",
            Self::Notebook => "notebook",
            Self::Monoblok => "monoblok",
            Self::Printer => "printer",
            Self::Extender => "extender",
            Self::Router => "router",
            Self::Tv => "tv",
            Self::Projector => "projector",
            Self::Whiteboard => "whiteboard",
            Self::Monitor => "monitor",
        }
    }
}

impl fmt::Display for CharacteristicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Characteristic value enums
// ---------------------------------------------------------------------------

/// Storage device technology.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DiskType {
    Hdd,
    Ssd,
    Nvme,
}

impl DiskType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Hdd => "hdd",
            Self::Ssd => "ssd",
            Self::Nvme => "nvme",
        }
    }
}

impl fmt::Display for DiskType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Projector throw distance class.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum ThrowType {
    #[default]
    Standard,
    Short,
    UltraShort,
}

impl ThrowType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Short => "short",
            Self::UltraShort => "ultra_short",
        }
    }
}

impl fmt::Display for ThrowType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interactive whiteboard touch technology.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum TouchType {
    #[default]
    Infrared,
    Capacitive,
}

impl TouchType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Infrared => "infrared",
            Self::Capacitive => "capacitive",
        }
    }
}

impl fmt::Display for TouchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Monitor panel technology.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum PanelType {
    #[default]
    Ips,
    Tn,
    Va,
    Oled,
}

impl PanelType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ips => "ips",
            Self::Tn => "tn",
            Self::Va => "va",
            Self::Oled => "oled",
        }
    }
}

impl fmt::Display for PanelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(
        status_needs_repair,
        EquipmentStatus,
        EquipmentStatus::NeedsRepair,
        "needs_repair"
    );
    test_serde_roundtrip!(
        repair_in_progress,
        RepairStatus,
        RepairStatus::InProgress,
        "in_progress"
    );
    test_serde_roundtrip!(role_admin, UserRole, UserRole::Admin, "admin");
    test_serde_roundtrip!(
        action_send_to_repair,
        ActionType,
        ActionType::SendToRepair,
        "send_to_repair"
    );
    test_serde_roundtrip!(
        action_create_facility,
        ActionType,
        ActionType::CreateFacility,
        "create_facility"
    );
    test_serde_roundtrip!(
        entity_type_support_message,
        EntityType,
        EntityType::SupportMessage,
        "support_message"
    );
    test_serde_roundtrip!(trail_op_transfer, TrailOp, TrailOp::Transfer, "transfer");
    test_serde_roundtrip!(
        throw_ultra_short,
        ThrowType,
        ThrowType::UltraShort,
        "ultra_short"
    );
    test_serde_roundtrip!(panel_oled, PanelType, PanelType::Oled, "oled");

    // --- Transition tests ---

    #[rstest]
    #[case(EquipmentStatus::New, EquipmentStatus::Working)]
    #[case(EquipmentStatus::New, EquipmentStatus::NeedsRepair)]
    #[case(EquipmentStatus::New, EquipmentStatus::Disposed)]
    #[case(EquipmentStatus::Working, EquipmentStatus::NeedsRepair)]
    #[case(EquipmentStatus::Working, EquipmentStatus::Disposed)]
    #[case(EquipmentStatus::NeedsRepair, EquipmentStatus::Working)]
    #[case(EquipmentStatus::NeedsRepair, EquipmentStatus::Disposed)]
    fn equipment_valid_transitions(#[case] from: EquipmentStatus, #[case] to: EquipmentStatus) {
        assert!(from.can_transition_to(to), "{from} -> {to} should be allowed");
    }

    #[rstest]
    #[case(EquipmentStatus::Working, EquipmentStatus::New)]
    #[case(EquipmentStatus::NeedsRepair, EquipmentStatus::New)]
    #[case(EquipmentStatus::Disposed, EquipmentStatus::Working)]
    #[case(EquipmentStatus::Disposed, EquipmentStatus::NeedsRepair)]
    #[case(EquipmentStatus::Working, EquipmentStatus::Working)]
    fn equipment_invalid_transitions(#[case] from: EquipmentStatus, #[case] to: EquipmentStatus) {
        assert!(!from.can_transition_to(to), "{from} -> {to} should be rejected");
    }

    #[test]
    fn disposed_is_terminal() {
        assert!(EquipmentStatus::Disposed.allowed_next_states().is_empty());
    }

    #[test]
    fn repair_transitions() {
        assert!(RepairStatus::InProgress.can_transition_to(RepairStatus::Completed));
        assert!(RepairStatus::InProgress.can_transition_to(RepairStatus::Failed));
        assert!(!RepairStatus::Completed.can_transition_to(RepairStatus::Failed));
        assert!(!RepairStatus::Failed.can_transition_to(RepairStatus::InProgress));
    }

    #[test]
    fn default_status_and_role() {
        assert_eq!(EquipmentStatus::default(), EquipmentStatus::New);
        assert_eq!(UserRole::default(), UserRole::Manager);
    }

    // --- Type name mapping ---

    #[rstest]
    #[case("Компьютер", Some(CharacteristicKind::Computer))]
    #[case("  ноутбук ", Some(CharacteristicKind::Notebook))]
    #[case("МФУ", Some(CharacteristicKind::Printer))]
    #[case("принтер", Some(CharacteristicKind::Printer))]
    #[case("Сетевой фильтр", Some(CharacteristicKind::Extender))]
    #[case("удлинитель", Some(CharacteristicKind::Extender))]
    #[case("Электронная доска", Some(CharacteristicKind::Whiteboard))]
    #[case("телевизор", Some(CharacteristicKind::Tv))]
    #[case("Monitor", Some(CharacteristicKind::Monitor))]
    #[case("стул", None)]
    #[case("", None)]
    fn type_name_mapping(#[case] name: &str, #[case] expected: Option<CharacteristicKind>) {
        assert_eq!(CharacteristicKind::from_type_name(name), expected);
    }

    #[test]
    fn component_bearing_kinds() {
        let with: Vec<_> = CharacteristicKind::ALL
            .into_iter()
            .filter(|k| k.has_components())
            .collect();
        assert_eq!(
            with,
            vec![
                CharacteristicKind::Computer,
                CharacteristicKind::Notebook,
                CharacteristicKind::Monoblok
            ]
        );
    }

    // --- Display / as_str tests ---

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", EquipmentStatus::NeedsRepair), "needs_repair");
        assert_eq!(format!("{}", RepairStatus::Failed), "failed");
        assert_eq!(format!("{}", UserRole::Manager), "manager");
        assert_eq!(format!("{}", ActionType::UpdateInn), "update_inn");
        assert_eq!(format!("{}", EntityType::EquipmentType), "equipment_type");
        assert_eq!(format!("{}", TrailOp::Scan), "scan");
        assert_eq!(format!("{}", HistoryAction::Transferred), "transferred");
        assert_eq!(format!("{}", QrObjectType::Equipment), "equipment");
        assert_eq!(format!("{}", CharacteristicKind::Tv), "tv");
        assert_eq!(format!("{}", DiskType::Nvme), "nvme");
        assert_eq!(format!("{}", TouchType::Capacitive), "capacitive");
    }
}
