pub mod csv_out;
pub mod currency;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// Pretty-print JSON to stdout.
fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(e) => eprintln!("JSON serialization error: {}", e),
    }
}

/// Fields holding currency amounts, rendered with lakh abbreviation in tables.
const MONEY_FIELDS: &[&str] = &[
    "total_turnover",
    "net_revenue",
    "total_costs",
    "gross_profit",
    "profit_per_driver",
    "initial_investment",
    "total_3yr_profit",
    "pre_tax_profit",
    "driver_payout",
    "platform_fee",
    "profit_gap_3yr",
    "monthly_profit_gap",
    "cumulative_profit",
    "amount",
    "aggregator",
    "fleet",
    "avg_ticket_size",
    "driver_salary",
    "agg_driver_acquisition_cost",
    "fleet_driver_acquisition_cost",
    "ev_cost",
    "ev_maintenance",
    "ev_fuel_cost",
    "fixed_costs",
    "agg_ops_salary",
];

/// Fields holding 0–100 percentages.
const PERCENT_FIELDS: &[&str] = &[
    "roi_percentage",
    "utilization_rate",
    "driver_churn_rate",
    "tax_rate",
];

/// Render a scalar for human display, using the field name to pick a format.
pub(crate) fn display_scalar(key: &str, value: &Value) -> String {
    let leaf = key.rsplit('.').next().unwrap_or(key);
    if let Some(d) = as_decimal(value) {
        if MONEY_FIELDS.contains(&leaf) {
            return currency::format_currency(d);
        }
        if PERCENT_FIELDS.contains(&leaf) {
            return currency::format_percent(d);
        }
    }
    plain_scalar(value)
}

pub(crate) fn plain_scalar(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null => "null".to_string(),
        _ => serde_json::to_string(value).unwrap_or_default(),
    }
}

fn as_decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Flatten nested objects into dotted keys (`aggregator.gross_profit`).
///
/// Arrays are left in place; callers decide how to show them.
pub(crate) fn flatten_object(map: &Map<String, Value>) -> Vec<(String, Value)> {
    let mut out = Vec::new();
    flatten_into("", map, &mut out);
    out
}

fn flatten_into(prefix: &str, map: &Map<String, Value>, out: &mut Vec<(String, Value)>) {
    for (key, val) in map {
        let full = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };
        match val {
            Value::Object(inner) => flatten_into(&full, inner, out),
            other => out.push((full, other.clone())),
        }
    }
}
