mod actions;
mod bulk;
mod equipment;
mod lifecycle;
mod organization;
mod reference;
mod user;

pub use actions::ActionsCommands;
pub use bulk::BulkCommands;
pub use equipment::{
    CharacteristicArgs, EquipmentCommands, EquipmentCreateArgs, EquipmentListArgs,
    EquipmentUpdateArgs,
};
pub use lifecycle::{DisposalCommands, RepairCommands};
pub use organization::{
    BuildingCommands, FacultyCommands, FloorCommands, RoomCommands, UniversityCommands,
};
pub use reference::{ContractCommands, EquipmentTypeCommands, SpecCommands};
pub use user::{SupportCommands, UserCommands};
