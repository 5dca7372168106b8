use serde_json::Value;
use std::io;

use super::row_array;

/// Write output as CSV to stdout.
///
/// Density curves become one `x,y` row per sample; every other result is
/// written as two-column `field,value` records.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let result = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Some(rows) = row_array(result) {
        write_array_csv(&mut wtr, rows);
    } else if let Value::Object(map) = result {
        let _ = wtr.write_record(["field", "value"]);
        for (key, val) in map {
            write_field(&mut wtr, key, val);
        }
    } else if let Value::Array(arr) = result {
        write_array_csv(&mut wtr, arr);
    } else {
        let _ = wtr.write_record([&format_csv_value(result)]);
    }

    let _ = wtr.flush();
}

/// Nested objects are flattened to dotted keys (`worst_case.asset_value`).
fn write_field(wtr: &mut csv::Writer<io::StdoutLock<'_>>, key: &str, val: &Value) {
    match val {
        Value::Object(inner) => {
            for (k, v) in inner {
                write_field(wtr, &format!("{key}.{k}"), v);
            }
        }
        Value::Array(arr) if arr.first().map(Value::is_object).unwrap_or(false) => {
            let _ = wtr.write_record([key, &format!("[{} rows]", arr.len())]);
        }
        _ => {
            let _ = wtr.write_record([key, &format_csv_value(val)]);
        }
    }
}

fn write_array_csv(wtr: &mut csv::Writer<io::StdoutLock<'_>>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<&str> = first.keys().map(|k| k.as_str()).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| map.get(*h).map(format_csv_value).unwrap_or_default())
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([&format_csv_value(item)]);
        }
    }
}

fn format_csv_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => String::new(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
