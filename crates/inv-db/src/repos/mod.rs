//! Repository modules.
//!
//! Each module adds methods to [`InventoryService`](crate::service::InventoryService)
//! via `impl InventoryService` blocks.

pub mod action;
pub mod bulk;
pub mod contract;
pub mod equipment;
pub mod equipment_type;
pub mod faculty;
pub mod history;
pub mod lifecycle;
pub mod movement;
pub mod organization;
pub mod room;
pub mod scan;
pub mod specification;
pub mod statistics;
pub mod support;
pub mod user;
