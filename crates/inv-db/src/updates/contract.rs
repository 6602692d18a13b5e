//! Contract update builder.

use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Default, Serialize)]
pub struct ContractUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_until: Option<Option<NaiveDate>>,
}

#[derive(Default)]
pub struct ContractUpdateBuilder(ContractUpdate);

impl ContractUpdateBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn number(mut self, val: impl Into<String>) -> Self {
        self.0.number = Some(val.into());
        self
    }

    pub fn file(mut self, val: Option<String>) -> Self {
        self.0.file = Some(val);
        self
    }

    pub fn valid_until(mut self, val: Option<NaiveDate>) -> Self {
        self.0.valid_until = Some(val);
        self
    }

    pub fn build(self) -> ContractUpdate {
        self.0
    }
}
