pub mod actions;
pub mod building;
pub mod bulk;
pub mod contract;
pub mod dispatch;
pub mod disposal;
pub mod equipment;
pub mod equipment_type;
pub mod faculty;
pub mod floor;
pub mod init;
pub mod movement;
pub mod repair;
pub mod room;
pub mod scan;
pub mod shared;
pub mod spec;
pub mod stats;
pub mod support;
pub mod university;
pub mod user;
