pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Flatten a result object into dotted field/value rows, so nested sections
/// (property snapshot, STR metrics) render alongside the top-level metrics.
pub(crate) fn flatten_fields(value: &Value) -> Vec<(String, String)> {
    let mut rows = Vec::new();
    match value {
        Value::Object(map) => {
            for (key, val) in map {
                match val {
                    Value::Object(_) => {
                        for (nested_key, nested_val) in flatten_fields(val) {
                            rows.push((format!("{key}.{nested_key}"), nested_val));
                        }
                    }
                    other => rows.push((key.clone(), scalar_to_string(other))),
                }
            }
        }
        other => rows.push((String::new(), scalar_to_string(other))),
    }
    rows
}

pub(crate) fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(scalar_to_string).collect();
            items.join(", ")
        }
        Value::Object(_) => serde_json::to_string(value).unwrap_or_default(),
    }
}
