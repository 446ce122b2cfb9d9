use serde_json::{Map, Value};
use tabled::{builder::Builder, Table};

use super::{display_scalar, flatten_object};

/// Format output as tables using the tabled crate.
pub fn print_table(value: &Value) {
    match value {
        Value::Object(map) => {
            if let Some(result) = map.get("result") {
                print_result_table(result, map);
            } else {
                print_flat_object(map);
            }
        }
        Value::Array(arr) => {
            print_array_table(arr);
        }
        _ => {
            println!("{}", value);
        }
    }
}

fn print_result_table(result: &Value, envelope: &Map<String, Value>) {
    match result {
        Value::Object(res_map) => print_flat_object(res_map),
        Value::Array(arr) => print_array_table(arr),
        other => println!("{}", other),
    }

    if let Some(Value::Array(warnings)) = envelope.get("warnings") {
        if !warnings.is_empty() {
            println!("\nWarnings:");
            for w in warnings {
                if let Value::String(s) = w {
                    println!("  - {}", s);
                }
            }
        }
    }

    if let Some(Value::String(meth)) = envelope.get("methodology") {
        println!("\nMethodology: {}", meth);
    }
}

/// Scalars go into one Field/Value table; arrays of records get their own
/// table, arrays of scalars are summarised.
fn print_flat_object(map: &Map<String, Value>) {
    let flat = flatten_object(map);

    let mut builder = Builder::default();
    builder.push_record(["Field", "Value"]);
    let mut sections: Vec<(String, &Vec<Value>)> = Vec::new();

    for (key, val) in &flat {
        match val {
            Value::Array(items) if items.iter().any(Value::is_object) => {
                if let Some(Value::Array(original)) = lookup(map, key) {
                    sections.push((key.clone(), original));
                }
            }
            Value::Array(items) => {
                builder.push_record([key.clone(), summarise_series(key, items)]);
            }
            scalar => builder.push_record([key.clone(), display_scalar(key, scalar)]),
        }
    }
    println!("{}", Table::from(builder));

    for (key, items) in sections {
        println!("\n{}:", key);
        print_array_table(items);
    }
}

fn print_array_table(arr: &[Value]) {
    if arr.is_empty() {
        println!("(empty)");
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = flatten_object(first).into_iter().map(|(k, _)| k).collect();
        let mut builder = Builder::default();
        builder.push_record(headers.clone());

        for item in arr {
            if let Value::Object(map) = item {
                let flat = flatten_object(map);
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        flat.iter()
                            .find(|(k, _)| k == h)
                            .map(|(k, v)| display_scalar(k, v))
                            .unwrap_or_default()
                    })
                    .collect();
                builder.push_record(row);
            }
        }

        println!("{}", Table::from(builder));
    } else {
        for item in arr {
            println!("{}", display_scalar("", item));
        }
    }
}

/// `36 values, last ₹-8.32L` style summary for long numeric series.
fn summarise_series(key: &str, items: &[Value]) -> String {
    match items.last() {
        Some(last) => format!("{} values, last {}", items.len(), display_scalar(key, last)),
        None => "(empty)".to_string(),
    }
}

/// Follow a dotted key back into the original nested map.
fn lookup<'a>(map: &'a Map<String, Value>, dotted: &str) -> Option<&'a Value> {
    let mut parts = dotted.split('.');
    let mut current = map.get(parts.next()?)?;
    for part in parts {
        current = current.as_object()?.get(part)?;
    }
    Some(current)
}
