//! Conversions from raw flag values to domain input.

use anyhow::Context;
use chrono::NaiveDate;
use inv_core::entities::Characteristics;
use inv_db::repos::bulk::InnAssignment;

/// Parse a characteristic set given as JSON tagged by `kind`.
pub fn parse_characteristics(raw: &str) -> anyhow::Result<Characteristics> {
    serde_json::from_str(raw).context("invalid --characteristics JSON")
}

pub fn parse_opt_characteristics(raw: Option<&str>) -> anyhow::Result<Option<Characteristics>> {
    raw.map(parse_characteristics).transpose()
}

/// Parse a `YYYY-MM-DD` date flag.
pub fn parse_date(raw: &str, field: &str) -> anyhow::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .with_context(|| format!("invalid {field} '{raw}': expected YYYY-MM-DD"))
}

/// Parse `ID=INN` pairs for batch inventory-number assignment.
pub fn parse_inn_assignments(raw: &[String]) -> anyhow::Result<Vec<InnAssignment>> {
    raw.iter()
        .map(|pair| {
            let (id, inn) = pair
                .split_once('=')
                .with_context(|| format!("invalid assignment '{pair}': expected ID=INN"))?;
            let inn = inn
                .trim()
                .parse::<i64>()
                .with_context(|| format!("invalid inventory number in '{pair}'"))?;
            Ok(InnAssignment {
                id: id.trim().to_string(),
                inn,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use inv_core::enums::CharacteristicKind;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn characteristics_from_tagged_json() {
        let c = parse_characteristics(r#"{"kind":"extender","length":"3m"}"#)
            .expect("should parse");
        assert_eq!(c.kind(), CharacteristicKind::Extender);
        assert!(parse_characteristics(r#"{"cpu":"i5"}"#).is_err());
        assert_eq!(parse_opt_characteristics(None).expect("none"), None);
    }

    #[test]
    fn dates_are_iso() {
        let d = parse_date("2027-01-31", "valid_until").expect("should parse");
        assert_eq!(d, NaiveDate::from_ymd_opt(2027, 1, 31).expect("valid date"));
        let err = parse_date("31.01.2027", "valid_until").expect_err("should fail");
        assert!(err.to_string().contains("valid_until"));
    }

    #[test]
    fn inn_pairs() {
        let parsed = parse_inn_assignments(&["eqp-1=1001".into(), " eqp-2 = 1002".into()])
            .expect("should parse");
        assert_eq!(
            parsed,
            vec![
                InnAssignment {
                    id: "eqp-1".into(),
                    inn: 1001
                },
                InnAssignment {
                    id: "eqp-2".into(),
                    inn: 1002
                },
            ]
        );
        assert!(parse_inn_assignments(&["eqp-1".into()]).is_err());
        assert!(parse_inn_assignments(&["eqp-1=abc".into()]).is_err());
    }
}
