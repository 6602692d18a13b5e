//! Specification update builder.

use serde::Serialize;

use inv_core::entities::Characteristics;

#[derive(Debug, Clone, Default, Serialize)]
pub struct SpecificationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Must keep the template's kind.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characteristics: Option<Characteristics>,
}

#[derive(Default)]
pub struct SpecificationUpdateBuilder(SpecificationUpdate);

impl SpecificationUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn characteristics(mut self, val: Characteristics) -> Self {
        self.0.characteristics = Some(val);
        self
    }

    pub fn build(self) -> SpecificationUpdate {
        self.0
    }
}
