use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::RideEconError;
use crate::types::{Money, Percent};
use crate::RideEconResult;

// ---------------------------------------------------------------------------
// Parameter bundle
// ---------------------------------------------------------------------------

/// Every business assumption both models are computed from.
///
/// The bundle is immutable once built: callers construct it (or deserialise
/// it), the engine validates it on entry and never mutates it. Counts are
/// unsigned so a negative driver count cannot be represented at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterBundle {
    /// Average fare per ride
    pub avg_ticket_size: Money,
    /// Rides per driver per working day at full utilisation
    pub rides_per_day: Decimal,
    /// Working days per month
    pub working_days: u32,
    /// Share of working time spent on paid rides, 0–100
    pub utilization_rate: Percent,
    /// Monthly salary per fleet driver (aggregator drivers draw none)
    pub driver_salary: Money,
    pub num_agg_drivers: u32,
    pub num_fleet_drivers: u32,
    /// One-time onboarding cost per aggregator driver
    pub agg_driver_acquisition_cost: Money,
    /// One-time onboarding cost per fleet driver
    pub fleet_driver_acquisition_cost: Money,
    /// Purchase price of one EV
    pub ev_cost: Money,
    /// Monthly maintenance and insurance per EV
    pub ev_maintenance: Money,
    /// Monthly fuel/charging cost per EV at 100% utilisation
    pub ev_fuel_cost: Money,
    /// Monthly driver churn, 0–100. Zero means drivers never leave.
    pub driver_churn_rate: Percent,
    /// Tax rate applied to positive pre-tax profit, 0–100
    pub tax_rate: Percent,
    /// Monthly fixed overhead
    pub fixed_costs: Money,
    /// Monthly ops-team salary (aggregator model)
    pub agg_ops_salary: Money,
}

/// Names of every numeric field, in declaration order.
pub const PARAMETER_FIELDS: [&str; 16] = [
    "avg_ticket_size",
    "rides_per_day",
    "working_days",
    "utilization_rate",
    "driver_salary",
    "num_agg_drivers",
    "num_fleet_drivers",
    "agg_driver_acquisition_cost",
    "fleet_driver_acquisition_cost",
    "ev_cost",
    "ev_maintenance",
    "ev_fuel_cost",
    "driver_churn_rate",
    "tax_rate",
    "fixed_costs",
    "agg_ops_salary",
];

/// Largest accepted monetary amount per field.
pub const MAX_AMOUNT: Money = dec!(1000000000000);

/// Largest accepted rides per driver per day.
pub const MAX_RIDES_PER_DAY: Decimal = dec!(10000);

/// Largest accepted driver count for either model.
pub const MAX_DRIVERS: u32 = 1_000_000;

/// Longest accepted working month.
pub const MAX_WORKING_DAYS: u32 = 31;

impl Default for ParameterBundle {
    /// Reference scenario: a 100-driver aggregator against a 10-EV fleet.
    fn default() -> Self {
        ParameterBundle {
            avg_ticket_size: dec!(80),
            rides_per_day: dec!(20),
            working_days: 26,
            utilization_rate: dec!(100),
            driver_salary: dec!(25000),
            num_agg_drivers: 100,
            num_fleet_drivers: 10,
            agg_driver_acquisition_cost: dec!(2000),
            fleet_driver_acquisition_cost: dec!(5000),
            ev_cost: dec!(180000),
            ev_maintenance: dec!(1500),
            ev_fuel_cost: dec!(4000),
            driver_churn_rate: dec!(10),
            tax_rate: dec!(0),
            fixed_costs: dec!(50000),
            agg_ops_salary: dec!(75000),
        }
    }
}

impl ParameterBundle {
    /// Check every field against its domain.
    ///
    /// Returns the first violation as `InvalidParameter`, naming the field.
    pub fn validate(&self) -> RideEconResult<()> {
        require_amount("avg_ticket_size", self.avg_ticket_size, true)?;
        require_positive("rides_per_day", self.rides_per_day)?;
        if self.rides_per_day > MAX_RIDES_PER_DAY {
            return Err(invalid(
                "rides_per_day",
                &format!("Cannot exceed {MAX_RIDES_PER_DAY}"),
            ));
        }
        if self.working_days == 0 || self.working_days > MAX_WORKING_DAYS {
            return Err(invalid(
                "working_days",
                &format!("Working days must be between 1 and {MAX_WORKING_DAYS}"),
            ));
        }
        require_percent("utilization_rate", self.utilization_rate)?;
        require_amount("driver_salary", self.driver_salary, false)?;
        require_driver_count("num_agg_drivers", self.num_agg_drivers)?;
        require_driver_count("num_fleet_drivers", self.num_fleet_drivers)?;
        require_amount(
            "agg_driver_acquisition_cost",
            self.agg_driver_acquisition_cost,
            false,
        )?;
        require_amount(
            "fleet_driver_acquisition_cost",
            self.fleet_driver_acquisition_cost,
            false,
        )?;
        require_amount("ev_cost", self.ev_cost, false)?;
        require_amount("ev_maintenance", self.ev_maintenance, false)?;
        require_amount("ev_fuel_cost", self.ev_fuel_cost, false)?;
        require_percent("driver_churn_rate", self.driver_churn_rate)?;
        require_percent("tax_rate", self.tax_rate)?;
        require_amount("fixed_costs", self.fixed_costs, false)?;
        require_amount("agg_ops_salary", self.agg_ops_salary, false)?;
        Ok(())
    }

    /// Read a field by name as a decimal.
    pub fn field(&self, name: &str) -> RideEconResult<Decimal> {
        let value = match name {
            "avg_ticket_size" => self.avg_ticket_size,
            "rides_per_day" => self.rides_per_day,
            "working_days" => Decimal::from(self.working_days),
            "utilization_rate" => self.utilization_rate,
            "driver_salary" => self.driver_salary,
            "num_agg_drivers" => Decimal::from(self.num_agg_drivers),
            "num_fleet_drivers" => Decimal::from(self.num_fleet_drivers),
            "agg_driver_acquisition_cost" => self.agg_driver_acquisition_cost,
            "fleet_driver_acquisition_cost" => self.fleet_driver_acquisition_cost,
            "ev_cost" => self.ev_cost,
            "ev_maintenance" => self.ev_maintenance,
            "ev_fuel_cost" => self.ev_fuel_cost,
            "driver_churn_rate" => self.driver_churn_rate,
            "tax_rate" => self.tax_rate,
            "fixed_costs" => self.fixed_costs,
            "agg_ops_salary" => self.agg_ops_salary,
            other => return Err(RideEconError::UnknownParameter(other.to_string())),
        };
        Ok(value)
    }

    /// Return a copy of the bundle with one field replaced.
    ///
    /// Integer fields (`working_days`, driver counts) only accept whole,
    /// non-negative values. The copy is not validated; the engine does that.
    pub fn with_field(&self, name: &str, value: Decimal) -> RideEconResult<ParameterBundle> {
        let mut next = self.clone();
        match name {
            "avg_ticket_size" => next.avg_ticket_size = value,
            "rides_per_day" => next.rides_per_day = value,
            "working_days" => next.working_days = to_count(name, value)?,
            "utilization_rate" => next.utilization_rate = value,
            "driver_salary" => next.driver_salary = value,
            "num_agg_drivers" => next.num_agg_drivers = to_count(name, value)?,
            "num_fleet_drivers" => next.num_fleet_drivers = to_count(name, value)?,
            "agg_driver_acquisition_cost" => next.agg_driver_acquisition_cost = value,
            "fleet_driver_acquisition_cost" => next.fleet_driver_acquisition_cost = value,
            "ev_cost" => next.ev_cost = value,
            "ev_maintenance" => next.ev_maintenance = value,
            "ev_fuel_cost" => next.ev_fuel_cost = value,
            "driver_churn_rate" => next.driver_churn_rate = value,
            "tax_rate" => next.tax_rate = value,
            "fixed_costs" => next.fixed_costs = value,
            "agg_ops_salary" => next.agg_ops_salary = value,
            other => return Err(RideEconError::UnknownParameter(other.to_string())),
        }
        Ok(next)
    }
}

// ---------------------------------------------------------------------------
// Validation helpers
// ---------------------------------------------------------------------------

fn invalid(field: &str, reason: &str) -> RideEconError {
    RideEconError::InvalidParameter {
        field: field.to_string(),
        reason: reason.to_string(),
    }
}

fn require_positive(field: &str, value: Decimal) -> RideEconResult<()> {
    if value <= Decimal::ZERO {
        return Err(invalid(field, "Must be greater than zero"));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: Decimal) -> RideEconResult<()> {
    if value < Decimal::ZERO {
        return Err(invalid(field, "Cannot be negative"));
    }
    Ok(())
}

/// Money fields: non-negative (or positive when `strict`) and at most
/// [`MAX_AMOUNT`], which keeps every product the models form inside the
/// decimal range.
fn require_amount(field: &str, value: Money, strict: bool) -> RideEconResult<()> {
    if strict {
        require_positive(field, value)?;
    } else {
        require_non_negative(field, value)?;
    }
    if value > MAX_AMOUNT {
        return Err(invalid(field, &format!("Cannot exceed {MAX_AMOUNT}")));
    }
    Ok(())
}

fn require_driver_count(field: &str, value: u32) -> RideEconResult<()> {
    if value > MAX_DRIVERS {
        return Err(invalid(field, &format!("Cannot exceed {MAX_DRIVERS} drivers")));
    }
    Ok(())
}

fn require_percent(field: &str, value: Decimal) -> RideEconResult<()> {
    if value < Decimal::ZERO || value > dec!(100) {
        return Err(invalid(field, "Percentage must be between 0 and 100"));
    }
    Ok(())
}

fn to_count(field: &str, value: Decimal) -> RideEconResult<u32> {
    if !value.fract().is_zero() {
        return Err(invalid(field, "Must be a whole number"));
    }
    value
        .to_u32()
        .ok_or_else(|| invalid(field, "Must be a non-negative whole number"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_bundle_is_valid() {
        assert!(ParameterBundle::default().validate().is_ok());
    }

    #[test]
    fn test_zero_ticket_size_rejected() {
        let bundle = ParameterBundle {
            avg_ticket_size: dec!(0),
            ..ParameterBundle::default()
        };
        match bundle.validate() {
            Err(RideEconError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "avg_ticket_size")
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_zero_working_days_rejected() {
        let bundle = ParameterBundle {
            working_days: 0,
            ..ParameterBundle::default()
        };
        assert!(bundle.validate().is_err());
    }

    #[test]
    fn test_percent_bounds() {
        let over = ParameterBundle {
            tax_rate: dec!(100.5),
            ..ParameterBundle::default()
        };
        assert!(over.validate().is_err());

        let negative_churn = ParameterBundle {
            driver_churn_rate: dec!(-1),
            ..ParameterBundle::default()
        };
        assert!(negative_churn.validate().is_err());

        let edges = ParameterBundle {
            utilization_rate: dec!(0),
            tax_rate: dec!(100),
            driver_churn_rate: dec!(0),
            ..ParameterBundle::default()
        };
        assert!(edges.validate().is_ok());
    }

    #[test]
    fn test_negative_cost_rejected() {
        let bundle = ParameterBundle {
            ev_fuel_cost: dec!(-0.01),
            ..ParameterBundle::default()
        };
        match bundle.validate() {
            Err(RideEconError::InvalidParameter { field, .. }) => assert_eq!(field, "ev_fuel_cost"),
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_values_rejected() {
        let huge_fare = ParameterBundle {
            avg_ticket_size: dec!(1000000000000000000000),
            rides_per_day: dec!(1000000),
            ..ParameterBundle::default()
        };
        match huge_fare.validate() {
            Err(RideEconError::InvalidParameter { field, .. }) => {
                assert_eq!(field, "avg_ticket_size")
            }
            other => panic!("Expected InvalidParameter, got {other:?}"),
        }

        let busy = ParameterBundle {
            rides_per_day: dec!(10001),
            ..ParameterBundle::default()
        };
        assert!(busy.validate().is_err());

        let long_month = ParameterBundle {
            working_days: 32,
            ..ParameterBundle::default()
        };
        assert!(long_month.validate().is_err());

        let crowd = ParameterBundle {
            num_fleet_drivers: MAX_DRIVERS + 1,
            ..ParameterBundle::default()
        };
        assert!(crowd.validate().is_err());
    }

    #[test]
    fn test_upper_bounds_are_inclusive() {
        let bundle = ParameterBundle {
            avg_ticket_size: MAX_AMOUNT,
            rides_per_day: MAX_RIDES_PER_DAY,
            working_days: MAX_WORKING_DAYS,
            num_agg_drivers: MAX_DRIVERS,
            num_fleet_drivers: MAX_DRIVERS,
            driver_salary: MAX_AMOUNT,
            ev_cost: MAX_AMOUNT,
            ev_fuel_cost: MAX_AMOUNT,
            ..ParameterBundle::default()
        };
        assert!(bundle.validate().is_ok());
    }

    #[test]
    fn test_every_listed_field_is_readable() {
        let bundle = ParameterBundle::default();
        for name in PARAMETER_FIELDS {
            assert!(bundle.field(name).is_ok(), "field {name} not readable");
        }
        assert_eq!(bundle.field("working_days").unwrap(), dec!(26));
    }

    #[test]
    fn test_with_field_replaces_one_value() {
        let base = ParameterBundle::default();
        let next = base.with_field("utilization_rate", dec!(75)).unwrap();
        assert_eq!(next.utilization_rate, dec!(75));
        assert_eq!(next.avg_ticket_size, base.avg_ticket_size);
        assert_eq!(base.utilization_rate, dec!(100));
    }

    #[test]
    fn test_with_field_rejects_fractional_count() {
        let base = ParameterBundle::default();
        assert!(base.with_field("num_fleet_drivers", dec!(2.5)).is_err());
        assert!(base.with_field("num_fleet_drivers", dec!(-3)).is_err());
        let ok = base.with_field("num_fleet_drivers", dec!(12)).unwrap();
        assert_eq!(ok.num_fleet_drivers, 12);
    }

    #[test]
    fn test_unknown_field() {
        let base = ParameterBundle::default();
        assert!(matches!(
            base.with_field("surge_multiplier", dec!(1)),
            Err(RideEconError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_bundle_deserializes_from_json() {
        let json = serde_json::to_value(ParameterBundle::default()).unwrap();
        let back: ParameterBundle = serde_json::from_value(json).unwrap();
        assert_eq!(back, ParameterBundle::default());
    }
}
