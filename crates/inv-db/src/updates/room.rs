//! Room update builder.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct RoomUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_special: Option<bool>,
}

#[derive(Default)]
pub struct RoomUpdateBuilder(RoomUpdate);

impl RoomUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, val: Option<String>) -> Self {
        self.0.name = Some(val);
        self
    }

    pub fn is_special(mut self, val: bool) -> Self {
        self.0.is_special = Some(val);
        self
    }

    pub fn build(self) -> RoomUpdate {
        self.0
    }
}
