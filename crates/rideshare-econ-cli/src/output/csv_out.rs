use serde_json::{Map, Value};
use std::io;

use super::{flatten_object, plain_scalar};

/// Write output as CSV to stdout.
///
/// Arrays of records (projection rows, sensitivity points) become one row
/// per record with dotted headers; single results become field,value pairs.
pub fn print_csv(value: &Value) {
    let stdout = io::stdout();
    let mut wtr = csv::Writer::from_writer(stdout.lock());

    let body = value
        .as_object()
        .and_then(|m| m.get("result"))
        .unwrap_or(value);

    match body {
        Value::Object(map) => match map.get("points") {
            Some(Value::Array(points)) => write_array_csv(&mut wtr, points),
            _ => write_field_value_csv(&mut wtr, map),
        },
        Value::Array(arr) => write_array_csv(&mut wtr, arr),
        other => {
            let _ = wtr.write_record([plain_scalar(other)]);
        }
    }

    let _ = wtr.flush();
}

fn write_field_value_csv<W: io::Write>(wtr: &mut csv::Writer<W>, map: &Map<String, Value>) {
    let _ = wtr.write_record(["field", "value"]);
    for (key, val) in flatten_object(map) {
        let cell = match val {
            Value::Array(ref items) if items.iter().all(|v| !v.is_object()) => items
                .iter()
                .map(plain_scalar)
                .collect::<Vec<_>>()
                .join(";"),
            ref other => plain_scalar(other),
        };
        let _ = wtr.write_record([key, cell]);
    }
}

fn write_array_csv<W: io::Write>(wtr: &mut csv::Writer<W>, arr: &[Value]) {
    if arr.is_empty() {
        return;
    }

    if let Some(Value::Object(first)) = arr.first() {
        let headers: Vec<String> = flatten_object(first).into_iter().map(|(k, _)| k).collect();
        let _ = wtr.write_record(&headers);

        for item in arr {
            if let Value::Object(map) = item {
                let flat = flatten_object(map);
                let row: Vec<String> = headers
                    .iter()
                    .map(|h| {
                        flat.iter()
                            .find(|(k, _)| k == h)
                            .map(|(_, v)| plain_scalar(v))
                            .unwrap_or_default()
                    })
                    .collect();
                let _ = wtr.write_record(&row);
            }
        }
    } else {
        for item in arr {
            let _ = wtr.write_record([plain_scalar(item)]);
        }
    }
}
