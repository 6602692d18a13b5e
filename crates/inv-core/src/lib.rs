//! # inv-core
//!
//! Core types, ID prefixes, and error types for campus-inventory.
//!
//! This crate provides the foundational types shared across all inventory crates:
//! - Entity structs for the organizational hierarchy, equipment, lifecycle
//!   records, users and the audit log
//! - Status enums with state machine transitions
//! - Type-specific characteristic sets and equipment-type name mapping
//! - QR payload encoding and room link parsing
//! - SVG rendering of printable QR labels and label sheets
//! - ID prefix constants
//! - Cross-cutting error types
//! - Trail operation envelope for JSONL persistence
//! - Query response types (pagination, grouping, statistics)

pub mod audit_detail;
pub mod entities;
pub mod enums;
pub mod errors;
pub mod identity;
pub mod ids;
pub mod label;
pub mod qr;
pub mod responses;
pub mod trail;
