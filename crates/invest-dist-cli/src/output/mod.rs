pub mod csv_out;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use serde_json::Value;

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => match serde_json::to_string_pretty(value) {
            Ok(s) => println!("{}", s),
            Err(e) => eprintln!("JSON serialization error: {}", e),
        },
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// The array of row objects inside a result, if there is one
/// (e.g. the `samples` of a density curve).
pub fn row_array(result: &Value) -> Option<&Vec<Value>> {
    let map = result.as_object()?;
    map.get("samples")
        .or_else(|| map.get("density_curve").and_then(|c| c.get("samples")))
        .and_then(Value::as_array)
        .filter(|rows| rows.first().map(Value::is_object).unwrap_or(false))
}
