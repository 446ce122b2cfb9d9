use clap::Args;
use serde_json::Value;

use rideshare_econ_core::{
    analyze_aggregator_model, analyze_comparison, analyze_fleet_model, compute_aggregator_metrics,
    compute_fleet_metrics, BusinessModel, ParameterBundle,
};

use super::params::BundleArgs;

/// Arguments for a single-model or comparison run
#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub bundle: BundleArgs,
}

/// Arguments for the month-by-month projection table
#[derive(Args)]
pub struct ProjectionArgs {
    /// Model to project: aggregator, fleet
    #[arg(long, default_value = "fleet")]
    pub model: BusinessModel,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

pub fn run_aggregator(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bundle = args.bundle.load()?;
    let result = analyze_aggregator_model(&bundle)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fleet(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bundle = args.bundle.load()?;
    let result = analyze_fleet_model(&bundle)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_compare(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bundle = args.bundle.load()?;
    let result = analyze_comparison(&bundle)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_projections(args: ProjectionArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let bundle = args.bundle.load()?;
    projection_rows(&bundle, args.model)
}

/// Per-month rows for one model, as a JSON array.
fn projection_rows(
    bundle: &ParameterBundle,
    model: BusinessModel,
) -> Result<Value, Box<dyn std::error::Error>> {
    let projections = match model {
        BusinessModel::Aggregator => compute_aggregator_metrics(bundle)?.metrics.monthly_projections,
        BusinessModel::Fleet => compute_fleet_metrics(bundle)?.metrics.monthly_projections,
    };
    Ok(serde_json::to_value(projections.rows())?)
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(ParameterBundle::default())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    #[test]
    fn test_projection_rows_are_array_of_36() {
        let rows = projection_rows(&ParameterBundle::default(), BusinessModel::Fleet).unwrap();
        let arr = rows.as_array().unwrap();
        assert_eq!(arr.len(), 36);
        assert_eq!(arr[0]["month"], 1);
        let first: Decimal = arr[0]["cumulative_profit"].as_str().unwrap().parse().unwrap();
        assert_eq!(first, dec!(-1773120));
    }

    #[test]
    fn test_defaults_serialize_as_object() {
        let value = run_defaults().unwrap();
        assert_eq!(value["working_days"], 26);
    }
}
