//! Entity structs for all inventory domain objects.
//!
//! Each entity maps to a table in the libSQL database (see
//! `inv-db/migrations/001_initial.sql`). All structs derive `Serialize`,
//! `Deserialize`, and `JsonSchema` for JSON output and schema validation.

mod action;
mod characteristics;
mod equipment;
mod lifecycle;
mod organization;
mod user;

pub use action::UserAction;
pub use characteristics::{Characteristics, Disk, Gpu};
pub use equipment::{
    ContractDocument, Equipment, EquipmentType, LOCATION_DISPOSAL, LOCATION_REPAIR, Specification,
};
pub use lifecycle::{Disposal, Movement, Repair};
pub use organization::{Building, Faculty, Floor, HierarchyHistory, Room, University};
pub use user::{SupportMessage, User};
