use serde_json::Value;

/// Print just the headline number of a result.
///
/// Looks for well-known fields in priority order, descending one level into
/// `worst_case` / `statistics` for full reports, then falls back to the first
/// field.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_paths: [&[&str]; 8] = [
        &["asset_value"],
        &["probability"],
        &["worst_case", "asset_value"],
        &["worst_case_difference"],
        &["mean"],
        &["p50"],
        &["initialAssets"],
        &["totalAssets"],
    ];

    for path in priority_paths {
        if let Some(val) = lookup(result_obj, path) {
            if !val.is_null() {
                println!("{}", format_minimal(val));
                return;
            }
        }
    }

    if let Value::Object(map) = result_obj {
        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, format_minimal(val));
            return;
        }
    }

    println!("{}", format_minimal(result_obj));
}

fn lookup<'a>(value: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(value, |v, key| v.get(*key))
}

fn format_minimal(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}
