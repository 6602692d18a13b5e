//! Equipment update builder.

use serde::Serialize;

use inv_core::entities::Characteristics;
use inv_core::enums::EquipmentStatus;

#[derive(Debug, Clone, Default, Serialize)]
pub struct EquipmentUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub room_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inn: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contract_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
    /// Routed through the lifecycle rather than written directly.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<EquipmentStatus>,
}

#[derive(Default)]
pub struct EquipmentUpdateBuilder(EquipmentUpdate);

impl EquipmentUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn description(mut self, val: Option<String>) -> Self {
        self.0.description = Some(val);
        self
    }

    pub fn room_id(mut self, val: Option<String>) -> Self {
        self.0.room_id = Some(val);
        self
    }

    pub fn inn(mut self, val: i64) -> Self {
        self.0.inn = Some(val);
        self
    }

    pub fn contract_id(mut self, val: Option<String>) -> Self {
        self.0.contract_id = Some(val);
        self
    }

    pub fn is_active(mut self, val: bool) -> Self {
        self.0.is_active = Some(val);
        self
    }

    pub fn characteristics(mut self, val: Characteristics) -> Self {
        self.0.characteristics = Some(val);
        self
    }

    pub fn status(mut self, val: EquipmentStatus) -> Self {
        self.0.status = Some(val);
        self
    }

    pub fn build(self) -> EquipmentUpdate {
        self.0
    }
}
