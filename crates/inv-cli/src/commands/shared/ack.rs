use serde::Serialize;

/// Response for commands whose only result is that they happened.
#[derive(Debug, Serialize)]
pub struct Ack<'a> {
    pub id: &'a str,
    pub action: &'static str,
}

impl<'a> Ack<'a> {
    #[must_use]
    pub const fn deleted(id: &'a str) -> Self {
        Self {
            id,
            action: "deleted",
        }
    }
}

/// Response for batch commands that report how many rows they touched.
#[derive(Debug, Serialize)]
pub struct Affected {
    pub action: &'static str,
    pub count: u64,
}
