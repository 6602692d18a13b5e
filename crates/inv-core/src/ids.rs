//! ID prefix constants.
//!
//! IDs are generated in SQL as `{prefix}-{8 hex chars}` (see
//! `InventoryDb::generate_id`). The prefix makes an ID self-describing in logs,
//! trail files and CLI output.

pub const PREFIX_UNIVERSITY: &str = "uni";
pub const PREFIX_BUILDING: &str = "bld";
pub const PREFIX_FLOOR: &str = "flr";
pub const PREFIX_FACULTY: &str = "fac";
pub const PREFIX_ROOM: &str = "rom";
pub const PREFIX_HISTORY: &str = "hst";
pub const PREFIX_EQUIPMENT_TYPE: &str = "etp";
pub const PREFIX_CONTRACT: &str = "ctr";
pub const PREFIX_EQUIPMENT: &str = "eqp";
pub const PREFIX_SPECIFICATION: &str = "spc";
pub const PREFIX_MOVEMENT: &str = "mov";
pub const PREFIX_REPAIR: &str = "rep";
pub const PREFIX_DISPOSAL: &str = "dsp";
pub const PREFIX_USER: &str = "usr";
pub const PREFIX_SUPPORT: &str = "sup";
pub const PREFIX_ACTION: &str = "act";

/// Every prefix in use. Prefixes must be unique.
pub const ALL_PREFIXES: &[&str] = &[
    PREFIX_UNIVERSITY,
    PREFIX_BUILDING,
    PREFIX_FLOOR,
    PREFIX_FACULTY,
    PREFIX_ROOM,
    PREFIX_HISTORY,
    PREFIX_EQUIPMENT_TYPE,
    PREFIX_CONTRACT,
    PREFIX_EQUIPMENT,
    PREFIX_SPECIFICATION,
    PREFIX_MOVEMENT,
    PREFIX_REPAIR,
    PREFIX_DISPOSAL,
    PREFIX_USER,
    PREFIX_SUPPORT,
    PREFIX_ACTION,
];
