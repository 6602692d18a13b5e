use serde::de::DeserializeOwned;

/// Parse a snake_case enum value using serde-deserialization.
pub fn parse_enum<T>(raw: &str, field: &str) -> anyhow::Result<T>
where
    T: DeserializeOwned,
{
    let normalized = raw.trim().replace('-', "_");
    let json = format!("\"{normalized}\"");
    serde_json::from_str(&json).map_err(|error| anyhow::anyhow!("invalid {field} '{raw}': {error}"))
}

/// Parse an optional enum flag.
pub fn parse_opt_enum<T>(raw: Option<&str>, field: &str) -> anyhow::Result<Option<T>>
where
    T: DeserializeOwned,
{
    raw.map(|value| parse_enum(value, field)).transpose()
}

#[cfg(test)]
mod tests {
    use inv_core::enums::{EquipmentStatus, RepairStatus, UserRole};

    use super::{parse_enum, parse_opt_enum};

    #[test]
    fn parses_snake_case_enum() {
        let status: RepairStatus = parse_enum("completed", "status").expect("status should parse");
        assert_eq!(status, RepairStatus::Completed);
    }

    #[test]
    fn parses_hyphenated_alias() {
        let status: EquipmentStatus =
            parse_enum("needs-repair", "status").expect("status should parse");
        assert_eq!(status, EquipmentStatus::NeedsRepair);
    }

    #[test]
    fn errors_on_invalid_enum() {
        let err = parse_enum::<UserRole>("root", "role").expect_err("should fail");
        assert!(err.to_string().contains("invalid role 'root'"));
    }

    #[test]
    fn absent_flag_stays_none() {
        let role = parse_opt_enum::<UserRole>(None, "role").expect("none should parse");
        assert_eq!(role, None);
    }
}
