use serde_json::Value;

use super::plain_scalar;

/// Headline fields, most specific first.
const PRIORITY_KEYS: [&str; 5] = [
    "preferred_model",
    "total_3yr_profit",
    "gross_profit",
    "break_even_month",
    "roi_percentage",
];

/// Print just the key answer value from the output.
pub fn print_minimal(value: &Value) {
    println!("{}", minimal_line(value));
}

fn minimal_line(value: &Value) -> String {
    let result_obj = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    if let Value::Object(map) = result_obj {
        for key in PRIORITY_KEYS {
            if let Some(val) = map.get(key) {
                if !val.is_null() {
                    return plain_scalar(val);
                }
            }
        }

        if let Some((key, val)) = map.iter().next() {
            return format!("{}: {}", key, plain_scalar(val));
        }
    }

    if let Value::Array(arr) = result_obj {
        return format!("{} rows", arr.len());
    }

    plain_scalar(result_obj)
}
