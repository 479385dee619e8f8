use serde::Serialize;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::ui;

pub mod table;

/// Render a serializable response to a string in the requested format.
pub fn render<T: Serialize>(value: &T, format: OutputFormat) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(value)?),
        OutputFormat::Table => render_table(value),
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

/// Objects become key/value rows, except that an object holding exactly one
/// array of records (a page, a timeline) is shown as that array's table
/// followed by the remaining scalar fields.
fn render_table<T: Serialize>(value: &T) -> anyhow::Result<String> {
    let value = serde_json::to_value(value)?;
    match value {
        Value::Array(items) => Ok(render_array_table(&items)),
        Value::Object(map) => {
            let is_records = |v: &Value| v.as_array().is_some_and(|a| a.iter().all(Value::is_object));
            let lists = map.values().filter(|v| is_records(v)).count();
            let mut entries = map.into_iter().collect::<Vec<_>>();
            entries.sort_by(|a, b| a.0.cmp(&b.0));

            if lists == 1 {
                if let Some(pos) = entries.iter().position(|(_, v)| is_records(v)) {
                    let (_, items) = entries.remove(pos);
                    let rows = items.as_array().map_or_else(String::new, |a| render_array_table(a));
                    let rest = key_value_table(&entries);
                    return Ok(format!("{rows}\n\n{rest}"));
                }
            }
            Ok(key_value_table(&entries))
        }
        scalar => Ok(table::render_entity_table(
            &["value"],
            &[vec![value_to_cell(&scalar)]],
            options(),
        )),
    }
}

fn key_value_table(entries: &[(String, Value)]) -> String {
    let rows = entries
        .iter()
        .map(|(key, value)| vec![key.clone(), value_to_cell(value)])
        .collect::<Vec<_>>();
    table::render_entity_table(&["key", "value"], &rows, options())
}

fn render_array_table(items: &[Value]) -> String {
    if items.is_empty() {
        return String::from("(no rows)");
    }

    if !items.iter().all(Value::is_object) {
        let rows = items
            .iter()
            .map(|item| vec![value_to_cell(item)])
            .collect::<Vec<_>>();
        return table::render_entity_table(&["value"], &rows, options());
    }

    let mut headers = Vec::<String>::new();
    for map in items.iter().filter_map(Value::as_object) {
        for (key, value) in map {
            // Nested collections (sources, commentary) do not fit in a cell.
            if value.is_array() || headers.contains(key) {
                continue;
            }
            headers.push(key.clone());
        }
    }

    if headers.is_empty() {
        return String::from("(no columns)");
    }

    order_headers(&mut headers);

    let header_refs = headers.iter().map(String::as_str).collect::<Vec<_>>();
    let rows = items
        .iter()
        .filter_map(Value::as_object)
        .map(|map| {
            headers
                .iter()
                .map(|header| map.get(header).map_or_else(|| String::from("-"), value_to_cell))
                .collect::<Vec<_>>()
        })
        .collect::<Vec<_>>();

    table::render_entity_table(&header_refs, &rows, options())
}

/// `id` first, then alphabetical.
fn order_headers(headers: &mut [String]) {
    headers.sort_by(|a, b| (a != "id", a).cmp(&(b != "id", b)));
}

fn value_to_cell(value: &Value) -> String {
    match value {
        Value::Null => String::from("-"),
        Value::Bool(v) => v.to_string(),
        Value::Number(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::Array(items) if items.is_empty() => String::from("[]"),
        Value::Array(items) => format!("[{} items]", items.len()),
        Value::Object(_) => serde_json::to_string(value).unwrap_or_else(|_| String::from("<invalid-json>")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde::Serialize;

    use super::{order_headers, render, table::render_entity_table};
    use crate::cli::OutputFormat;

    #[derive(Serialize)]
    struct Example {
        id: &'static str,
        value: u32,
    }

    #[derive(Serialize)]
    #[serde(rename_all = "camelCase")]
    struct Page {
        snapshots: Vec<Example>,
        total_pages: u32,
    }

    #[test]
    fn json_render_is_valid_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Json).expect("json render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert_eq!(parsed["value"], 7);
    }

    #[test]
    fn raw_render_is_single_line_json() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Raw).expect("raw render should work");
        let parsed: serde_json::Value = serde_json::from_str(&out).expect("json should parse");
        assert_eq!(parsed["id"], "x");
        assert!(!out.contains('\n'));
    }

    #[test]
    fn table_render_for_object_is_tabular() {
        let value = Example { id: "x", value: 7 };
        let out = render(&value, OutputFormat::Table).expect("table render should work");
        assert!(out.lines().next().is_some_and(|line| line.contains("key")));
        assert!(out.contains("id"));
        assert!(out.contains("value"));
    }

    #[test]
    fn table_render_unwraps_single_record_list() {
        let page = Page {
            snapshots: vec![Example { id: "snp-1", value: 1 }, Example { id: "snp-2", value: 2 }],
            total_pages: 3,
        };
        let out = render(&page, OutputFormat::Table).expect("table render should work");
        let lines: Vec<&str> = out.lines().collect();
        assert!(lines[0].starts_with("id"));
        assert!(lines[2].starts_with("snp-1"));
        assert!(out.contains("totalPages"));
    }

    #[test]
    fn empty_list_renders_placeholder() {
        let out = render(&Vec::<Example>::new(), OutputFormat::Table).expect("render");
        assert_eq!(out, "(no rows)");
    }

    #[test]
    fn id_column_comes_first() {
        let mut headers = vec!["name".to_string(), "domain".to_string(), "id".to_string()];
        order_headers(&mut headers);
        assert_eq!(headers, vec!["id", "domain", "name"]);
    }

    #[test]
    fn table_alignment_handles_mixed_widths() {
        let headers = ["id", "name", "domain"];
        let rows = vec![
            vec!["cmp-1".to_string(), "Google".to_string(), "google.com".to_string()],
            vec![
                "cmp-200".to_string(),
                "Apple Inc.".to_string(),
                "a.very.long.domain.example".to_string(),
            ],
        ];

        let table = render_entity_table(
            &headers,
            &rows,
            super::table::TableOptions {
                max_width: None,
                color: false,
            },
        );
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines.len() >= 4);
        assert!(lines[0].contains("id"));
        assert!(lines[0].contains("domain"));
        assert!(lines[1].chars().all(|c| c == '-'));
    }
}
