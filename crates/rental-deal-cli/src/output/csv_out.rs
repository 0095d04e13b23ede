use serde_json::Value;
use std::io;

use super::flatten_fields;

/// Write output as field/value CSV to stdout.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let _ = wtr.write_record(["field", "value"]);
    for (field, rendered) in flatten_fields(result) {
        let _ = wtr.write_record([field.as_str(), rendered.as_str()]);
    }

    let _ = wtr.flush();
}
