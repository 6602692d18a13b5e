//! Rendering of command results as pretty JSON, single-line JSON or a table.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Columns shown first, in this order, when present. The rest follow
/// alphabetically.
const LEADING_COLUMNS: &[&str] = &[
    "id",
    "number",
    "name",
    "username",
    "status",
    "inn",
    "room_id",
    "equipment_id",
];

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => Ok(render_table(serde_json::to_value(value)?)),
        OutputFormat::Raw => Ok(serde_json::to_string(value)?),
    }
}

/// Print a serializable response in the requested format.
pub fn output<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<()> {
    let rendered = render(value, format)?;
    println!("{rendered}");
    Ok(())
}

fn options() -> table::TableOptions {
    let prefs = ui::prefs();
    table::TableOptions {
        max_width: prefs.term_width,
        color: prefs.table_color,
    }
}

fn render_table(value: Value) -> String {
    match value {
        Value::Array(items) => render_rows(&items),
        Value::Object(map) if is_page(&map) => {
            let items = map
                .get("items")
                .and_then(Value::as_array)
                .map_or(&[][..], Vec::as_slice);
            format!(
                "{}\npage {} ({} per page), {} total",
                render_rows(items),
                cell(&map, "page"),
                cell(&map, "page_size"),
                cell(&map, "total")
            )
        }
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            sort_columns(&mut keys);
            let rows: Vec<Vec<String>> = keys
                .into_iter()
                .map(|key| vec![key.clone(), cell(&map, key)])
                .collect();
            table::render_entity_table(&["field", "value"], &rows, options())
        }
        Value::Null => String::from("(none)"),
        scalar => table::render_entity_table(&["value"], &[vec![value_to_cell(&scalar)]], options()),
    }
}

/// A `Paged<T>` response: an item list plus paging counters.
fn is_page(map: &Map<String, Value>) -> bool {
    map.get("items").is_some_and(Value::is_array) && map.contains_key("total")
}

fn render_rows(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }
    if !items.iter().all(Value::is_object) {
        let rows: Vec<Vec<String>> = items.iter().map(|item| vec![value_to_cell(item)]).collect();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let mut headers: Vec<&String> = Vec::new();
    for map in items.iter().filter_map(Value::as_object) {
        for key in map.keys() {
            if !headers.contains(&key) {
                headers.push(key);
            }
        }
    }
    sort_columns(&mut headers);

    let rows: Vec<Vec<String>> = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| headers.iter().map(|header| cell(map, header)).collect())
        .collect();
    let header_refs: Vec<&str> = headers.iter().map(|h| h.as_str()).collect();
    table::render_entity_table(&header_refs, &rows, options())
}

fn sort_columns(keys: &mut [&String]) {
    keys.sort_by_key(|key| {
        let rank = LEADING_COLUMNS
            .iter()
            .position(|leading| *leading == key.as_str())
            .unwrap_or(LEADING_COLUMNS.len());
        (rank, (*key).clone())
    });
}

fn cell(map: &Map<String, Value>, key: &str) -> String {
    map.get(key).map_or_else(|| String::from("-"), value_to_cell)
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        // Multi-line QR payloads collapse onto one row.
        Value::String(v) => v.replace('\n', " | "),
        Value::Object(map) if map.contains_key("kind") => cell(map, "kind"),
        other => serde_json::to_string(other).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use serde::Serialize;

    use super::render;
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct FloorRow {
        id: &'static str,
        number: i64,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = FloorRow { id: "flr-1", number: -1 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "flr-1");
        assert_eq!(parsed["number"], -1);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = FloorRow { id: "flr-1", number: -1 };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        assert!(!out.contains('\n'));
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "flr-1");
    }

    #[test]
    fn object_renders_as_field_value_rows() {
        let value = FloorRow { id: "flr-1", number: -1 };
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("field"));
        assert!(lines[2].starts_with("id"));
        assert!(lines[3].starts_with("number"));
    }

    #[test]
    fn paged_response_renders_items_and_footer() {
        let page = serde_json::json!({
            "items": [
                {"status": "working", "id": "eqp-1", "characteristics": {"kind": "tv", "model": "X"}},
                {"status": "new", "id": "eqp-2", "characteristics": null},
            ],
            "total": 12,
            "page": 2,
            "page_size": 2,
        });
        let out = render(&page, OutputFormat::Table).expect("table render should work");
        let header = out.lines().next().expect("header line");
        assert!(header.starts_with("id"));
        assert!(header.find("status") < header.find("characteristics"));
        assert!(out.contains(" tv "));
        assert!(out.ends_with("page 2 (2 per page), 12 total"));
    }

    #[test]
    fn qr_payload_stays_on_one_row() {
        let rows = serde_json::json!([{"id": "eqp-1", "qr_payload": "UID: u\nИНН: 5"}]);
        let out = render(&rows, OutputFormat::Table).expect("table render should work");
        assert_eq!(out.lines().count(), 3);
        assert!(out.contains("UID: u | ИНН: 5"));
    }

    #[test]
    fn null_renders_placeholder() {
        let out = render(&Option::<FloorRow>::None, OutputFormat::Table).expect("render");
        assert_eq!(out, "(none)");
    }
}
