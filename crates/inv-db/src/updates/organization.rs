//! University and building update builders.

use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct UniversityUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
}

#[derive(Default)]
pub struct UniversityUpdateBuilder(UniversityUpdate);

impl UniversityUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn address(mut self, val: Option<String>) -> Self {
        self.0.address = Some(val);
        self
    }

    pub fn build(self) -> UniversityUpdate {
        self.0
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BuildingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<Option<String>>,
}

#[derive(Default)]
pub struct BuildingUpdateBuilder(BuildingUpdate);

impl BuildingUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, val: impl Into<String>) -> Self {
        self.0.name = Some(val.into());
        self
    }

    pub fn address(mut self, val: Option<String>) -> Self {
        self.0.address = Some(val);
        self
    }

    pub fn build(self) -> BuildingUpdate {
        self.0
    }
}
