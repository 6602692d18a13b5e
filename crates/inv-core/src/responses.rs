//! Composite response types returned by query operations and printed as JSON
//! by `cinv`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::entities::{Equipment, Room};
use crate::enums::{CharacteristicKind, EquipmentStatus};

/// Default number of items per page.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Upper bound on a requested page size.
pub const MAX_PAGE_SIZE: u32 = 100;

/// A 1-based page request. Page size is clamped to `1..=MAX_PAGE_SIZE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Page {
    pub page: u32,
    pub page_size: u32,
}

impl Page {
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    #[must_use]
    pub const fn offset(self) -> u64 {
        (self.page as u64 - 1) * self.page_size as u64
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_SIZE)
    }
}

/// One page of results plus the total number of matching rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Equipment of one room grouped under its type name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EquipmentGroup {
    pub name: String,
    pub items: Vec<Equipment>,
}

/// Number of specification templates of one kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct SpecificationCount {
    pub kind: CharacteristicKind,
    pub count: u64,
}

/// Count of equipment per lifecycle status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct StatusBreakdown {
    pub new: u64,
    pub working: u64,
    pub needs_repair: u64,
    pub disposed: u64,
}

impl StatusBreakdown {
    pub const fn add(&mut self, status: EquipmentStatus, n: u64) {
        match status {
            EquipmentStatus::New => self.new += n,
            EquipmentStatus::Working => self.working += n,
            EquipmentStatus::NeedsRepair => self.needs_repair += n,
            EquipmentStatus::Disposed => self.disposed += n,
        }
    }

    #[must_use]
    pub const fn total(&self) -> u64 {
        self.new + self.working + self.needs_repair + self.disposed
    }
}

/// Share of each status in percent, rounded to two decimals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct StatusPercentage {
    pub new: f64,
    pub working: f64,
    pub needs_repair: f64,
    pub disposed: f64,
}

impl From<&StatusBreakdown> for StatusPercentage {
    #[allow(clippy::cast_precision_loss)]
    fn from(b: &StatusBreakdown) -> Self {
        let total = b.total();
        let pct = |n: u64| {
            if total == 0 {
                0.0
            } else {
                (n as f64 / total as f64 * 10_000.0).round() / 100.0
            }
        };
        Self {
            new: pct(b.new),
            working: pct(b.working),
            needs_repair: pct(b.needs_repair),
            disposed: pct(b.disposed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OverallStats {
    pub total_equipment: u64,
    pub status_breakdown: StatusBreakdown,
    pub status_percentage: StatusPercentage,
}

/// Equipment counts for one bucket (a type, building, floor or room).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct BucketStats {
    pub id: String,
    pub label: String,
    pub total_equipment: u64,
    pub status_breakdown: StatusBreakdown,
}

/// Full distribution report for the equipment visible to a user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EquipmentStatistics {
    pub overall_stats: OverallStats,
    pub equipment_by_type: Vec<BucketStats>,
    pub building_stats: Vec<BucketStats>,
    pub floor_stats: Vec<BucketStats>,
    pub room_stats: Vec<BucketStats>,
}

/// Printable label data of one equipment item with an inventory number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EquipmentLabel {
    pub id: String,
    pub uid: String,
    pub name: String,
    pub inn: i64,
    pub payload: String,
}

/// What a QR scan resolved to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "object_type", content = "object", rename_all = "snake_case")]
pub enum ScanResult {
    Room(Room),
    Equipment(Equipment),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_clamps_and_offsets() {
        assert_eq!(Page::new(0, 0), Page { page: 1, page_size: 1 });
        assert_eq!(Page::new(3, 500).page_size, MAX_PAGE_SIZE);
        assert_eq!(Page::new(3, 10).offset(), 20);
        assert_eq!(Page::default().page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn percentages_round_to_two_decimals() {
        let mut b = StatusBreakdown::default();
        b.add(EquipmentStatus::Working, 2);
        b.add(EquipmentStatus::Disposed, 1);
        let p = StatusPercentage::from(&b);
        assert!((p.working - 66.67).abs() < f64::EPSILON);
        assert!((p.disposed - 33.33).abs() < f64::EPSILON);
        assert!(p.new.abs() < f64::EPSILON);
    }

    #[test]
    fn empty_breakdown_is_all_zero() {
        let p = StatusPercentage::from(&StatusBreakdown::default());
        assert_eq!(p, StatusPercentage::default());
    }
}
