use serde_json::Value;

use super::plain;

/// Print just the headline figure of the output.
///
/// Looks for well-known result fields in priority order, then falls back to
/// the first field of the result object.
pub fn print_minimal(value: &Value) {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    let priority_keys = [
        "periodic_payment",
        "total_payment",
        "added",
        "cleared",
        "remaining",
    ];

    if let Value::Object(map) = result_obj {
        for key in &priority_keys {
            if let Some(val) = map.get(*key) {
                if !val.is_null() {
                    println!("{}", plain(val));
                    return;
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            println!("{}: {}", key, plain(val));
            return;
        }
    }

    if let Value::Array(rows) = result_obj {
        println!("{}", rows.len());
        return;
    }

    println!("{}", plain(result_obj));
}
