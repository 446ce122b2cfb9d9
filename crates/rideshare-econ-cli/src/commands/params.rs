use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rideshare_econ_core::params::PARAMETER_FIELDS;
use rideshare_econ_core::ParameterBundle;

use crate::input;

/// Where the parameter bundle comes from, plus per-field overrides.
///
/// Precedence: flags, then `--input` (or piped stdin), then built-in defaults.
/// Files may be partial; missing fields keep their default value.
#[derive(Args, Debug, Default)]
pub struct BundleArgs {
    /// Path to a JSON or YAML parameter bundle
    #[arg(long)]
    pub input: Option<String>,

    /// Average fare per ride
    #[arg(long)]
    pub avg_ticket_size: Option<Decimal>,

    /// Rides per driver per day
    #[arg(long)]
    pub rides_per_day: Option<Decimal>,

    /// Working days per month
    #[arg(long)]
    pub working_days: Option<u32>,

    /// Utilisation rate, 0-100
    #[arg(long)]
    pub utilization_rate: Option<Decimal>,

    /// Monthly salary per fleet driver
    #[arg(long)]
    pub driver_salary: Option<Decimal>,

    /// Number of aggregator drivers
    #[arg(long)]
    pub num_agg_drivers: Option<u32>,

    /// Number of fleet drivers (one EV each)
    #[arg(long)]
    pub num_fleet_drivers: Option<u32>,

    /// One-time acquisition cost per aggregator driver
    #[arg(long)]
    pub agg_driver_acquisition_cost: Option<Decimal>,

    /// One-time acquisition cost per fleet driver
    #[arg(long)]
    pub fleet_driver_acquisition_cost: Option<Decimal>,

    /// Purchase price of one EV
    #[arg(long)]
    pub ev_cost: Option<Decimal>,

    /// Monthly maintenance/insurance per EV
    #[arg(long)]
    pub ev_maintenance: Option<Decimal>,

    /// Monthly fuel/mileage cost per EV
    #[arg(long)]
    pub ev_fuel_cost: Option<Decimal>,

    /// Monthly driver churn, 0-100
    #[arg(long)]
    pub driver_churn_rate: Option<Decimal>,

    /// Tax rate, 0-100
    #[arg(long)]
    pub tax_rate: Option<Decimal>,

    /// Monthly fixed costs
    #[arg(long)]
    pub fixed_costs: Option<Decimal>,

    /// Monthly ops-team salary
    #[arg(long)]
    pub agg_ops_salary: Option<Decimal>,
}

impl BundleArgs {
    /// Resolve the bundle from file/stdin/defaults and apply flag overrides.
    pub fn load(&self) -> Result<ParameterBundle, Box<dyn std::error::Error>> {
        let source = if let Some(ref path) = self.input {
            Some(input::read_value(path)?)
        } else {
            input::read_stdin()?
        };
        let bundle = merge_onto_defaults(source)?;
        Ok(self.apply_overrides(bundle))
    }

    fn apply_overrides(&self, mut b: ParameterBundle) -> ParameterBundle {
        if let Some(v) = self.avg_ticket_size {
            b.avg_ticket_size = v;
        }
        if let Some(v) = self.rides_per_day {
            b.rides_per_day = v;
        }
        if let Some(v) = self.working_days {
            b.working_days = v;
        }
        if let Some(v) = self.utilization_rate {
            b.utilization_rate = v;
        }
        if let Some(v) = self.driver_salary {
            b.driver_salary = v;
        }
        if let Some(v) = self.num_agg_drivers {
            b.num_agg_drivers = v;
        }
        if let Some(v) = self.num_fleet_drivers {
            b.num_fleet_drivers = v;
        }
        if let Some(v) = self.agg_driver_acquisition_cost {
            b.agg_driver_acquisition_cost = v;
        }
        if let Some(v) = self.fleet_driver_acquisition_cost {
            b.fleet_driver_acquisition_cost = v;
        }
        if let Some(v) = self.ev_cost {
            b.ev_cost = v;
        }
        if let Some(v) = self.ev_maintenance {
            b.ev_maintenance = v;
        }
        if let Some(v) = self.ev_fuel_cost {
            b.ev_fuel_cost = v;
        }
        if let Some(v) = self.driver_churn_rate {
            b.driver_churn_rate = v;
        }
        if let Some(v) = self.tax_rate {
            b.tax_rate = v;
        }
        if let Some(v) = self.fixed_costs {
            b.fixed_costs = v;
        }
        if let Some(v) = self.agg_ops_salary {
            b.agg_ops_salary = v;
        }
        b
    }
}

/// Overlay a (possibly partial) JSON object on the default bundle.
pub fn merge_onto_defaults(
    source: Option<Value>,
) -> Result<ParameterBundle, Box<dyn std::error::Error>> {
    let Some(source) = source else {
        return Ok(ParameterBundle::default());
    };
    let Value::Object(overrides) = source else {
        return Err("Parameter bundle must be a JSON/YAML object".into());
    };

    let mut merged = serde_json::to_value(ParameterBundle::default())?;
    if let Value::Object(ref mut map) = merged {
        for (key, value) in overrides {
            if !PARAMETER_FIELDS.contains(&key.as_str()) {
                return Err(format!(
                    "Unknown parameter '{}'. Known parameters: {}",
                    key,
                    PARAMETER_FIELDS.join(", ")
                )
                .into());
            }
            map.insert(key, value);
        }
    }

    Ok(serde_json::from_value(merged)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use serde_json::json;

    #[test]
    fn test_no_source_gives_defaults() {
        let bundle = merge_onto_defaults(None).unwrap();
        assert_eq!(bundle, ParameterBundle::default());
    }

    #[test]
    fn test_partial_source_keeps_defaults() {
        let bundle =
            merge_onto_defaults(Some(json!({"tax_rate": 18, "num_fleet_drivers": 40}))).unwrap();
        assert_eq!(bundle.tax_rate, dec!(18));
        assert_eq!(bundle.num_fleet_drivers, 40);
        assert_eq!(bundle.ev_cost, dec!(180000));
    }

    #[test]
    fn test_string_decimals_accepted() {
        let bundle = merge_onto_defaults(Some(json!({"avg_ticket_size": "92.50"}))).unwrap();
        assert_eq!(bundle.avg_ticket_size, dec!(92.5));
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = merge_onto_defaults(Some(json!({"surge": 2}))).unwrap_err();
        assert!(err.to_string().contains("Unknown parameter 'surge'"));
    }

    #[test]
    fn test_non_object_rejected() {
        assert!(merge_onto_defaults(Some(json!([1, 2, 3]))).is_err());
    }

    #[test]
    fn test_flags_override_source() {
        let args = BundleArgs {
            tax_rate: Some(dec!(5)),
            num_agg_drivers: Some(250),
            ..BundleArgs::default()
        };
        let base = merge_onto_defaults(Some(json!({"tax_rate": 18}))).unwrap();
        let bundle = args.apply_overrides(base);
        assert_eq!(bundle.tax_rate, dec!(5));
        assert_eq!(bundle.num_agg_drivers, 250);
    }
}
