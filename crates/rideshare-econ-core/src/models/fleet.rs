use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::RideEconError;
use crate::metrics::{labels, BreakEvenRides, BusinessMetrics, CostLine};
use crate::params::ParameterBundle;
use crate::projection::{first_break_even_month, project_months};
use crate::revenue::{
    checked_ratio, compute_base_revenue, driver_divisor, expected_tenure_months,
    monthly_acquisition_cost, monthly_rides_per_driver, tax_on_profit, APP_SHARE, FLEET_SHARE,
};
use crate::types::{
    with_metadata, BusinessModel, ComputationOutput, Money, Rate, PROJECTION_HORIZON_MONTHS,
};
use crate::RideEconResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Fleet model results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetMetrics {
    #[serde(flatten)]
    pub metrics: BusinessMetrics,
    /// Share of turnover kept by the fleet owner (0.93)
    pub revenue_share: Rate,
    /// Turnover taken by the ride app; not a fleet cost
    pub platform_fee: Money,
    /// Months until the EV outlay is recovered (same as `break_even_month`)
    pub ev_payback_months: Option<u32>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compute the fleet model for a bundle.
pub fn compute_fleet_metrics(params: &ParameterBundle) -> RideEconResult<FleetMetrics> {
    params.validate()?;
    build_fleet(params, &mut Vec::new())
}

/// Compute the fleet model wrapped in the standard output envelope.
pub fn analyze_fleet_model(
    params: &ParameterBundle,
) -> RideEconResult<ComputationOutput<FleetMetrics>> {
    let start = Instant::now();
    params.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let output = build_fleet(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Fleet ownership model: 93% of turnover, salaried drivers, EV capex seeding \
         cumulative profit, break-even by cumulative-profit scan over 36 months",
        params,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Core fleet calculation. Assumes a validated bundle.
pub(crate) fn build_fleet(
    params: &ParameterBundle,
    warnings: &mut Vec<String>,
) -> RideEconResult<FleetMetrics> {
    let drivers = params.num_fleet_drivers;
    let fleet_size = Decimal::from(drivers);

    let turnover = compute_base_revenue(
        params.avg_ticket_size,
        params.rides_per_day,
        params.working_days,
        params.utilization_rate,
        drivers,
    );
    let net_revenue = turnover * FLEET_SHARE;

    // --- Recurring costs ---
    let acquisition = monthly_acquisition_cost(
        params.fleet_driver_acquisition_cost,
        drivers,
        params.driver_churn_rate,
    );
    let driver_salaries = params.driver_salary * fleet_size;
    let maintenance = params.ev_maintenance * fleet_size;
    // Fuel scales with utilisation; maintenance does not
    let fuel = params.ev_fuel_cost * fleet_size * params.utilization_rate / dec!(100);
    let fixed_costs = params.fixed_costs;

    // --- Capital ---
    let initial_investment = params.ev_cost * fleet_size;

    let operating_costs = acquisition + driver_salaries + maintenance + fuel + fixed_costs;
    let pre_tax_profit = net_revenue - operating_costs;
    let tax = tax_on_profit(pre_tax_profit, params.tax_rate);
    let total_costs = operating_costs + tax;

    let cost_breakdown = vec![
        CostLine::monthly(labels::DRIVER_SALARIES, driver_salaries),
        CostLine::monthly(labels::DRIVER_ACQUISITION, acquisition),
        CostLine::one_time(labels::EV_INVESTMENT, initial_investment),
        CostLine::monthly(labels::MAINTENANCE, maintenance),
        CostLine::monthly(labels::FUEL, fuel),
        CostLine::monthly(labels::FIXED_COSTS, fixed_costs),
        CostLine::monthly(labels::TAXES, tax),
    ];

    let gross_profit = net_revenue - total_costs;
    let profit_per_driver = gross_profit / driver_divisor(drivers);

    let break_even_rides = if gross_profit <= Decimal::ZERO {
        BreakEvenRides::Infinite
    } else {
        BreakEvenRides::Rides(checked_ratio(
            total_costs,
            params.avg_ticket_size * FLEET_SHARE,
            "fleet break-even rides",
        )?)
    };

    let monthly_projections = project_months(
        gross_profit,
        total_costs,
        net_revenue,
        turnover,
        drivers,
        initial_investment,
        PROJECTION_HORIZON_MONTHS,
    );

    let break_even_month = first_break_even_month(&monthly_projections.cumulative_profit);

    // Final cumulative entry already nets out the EV outlay
    let total_3yr_profit = monthly_projections.final_cumulative_profit();
    let roi_percentage = if initial_investment > Decimal::ZERO {
        checked_ratio(total_3yr_profit, initial_investment, "fleet ROI")?
            .checked_mul(dec!(100))
            .ok_or_else(|| RideEconError::ArithmeticOverflow {
                context: "fleet ROI".into(),
            })?
    } else {
        Decimal::ZERO
    };

    let expected_tenure_months = expected_tenure_months(params.driver_churn_rate)?;

    // --- Diagnostics ---
    if drivers == 0 {
        warnings.push(
            "No fleet drivers: no EVs purchased, ROI reported as 0 and per-driver figures \
             use a divisor of 1"
                .to_string(),
        );
    }
    if params.driver_churn_rate.is_zero() {
        warnings
            .push("Driver churn is zero: fleet acquisition cost is not amortised".to_string());
    }
    if gross_profit <= Decimal::ZERO {
        warnings.push(format!(
            "Fleet is not profitable (monthly gross profit {gross_profit}); \
             break-even rides are unreachable"
        ));
    } else if break_even_month.is_none() {
        warnings.push(format!(
            "EV investment of {initial_investment} is not recovered within \
             {PROJECTION_HORIZON_MONTHS} months"
        ));
    }

    tracing::debug!(
        model = "fleet",
        drivers,
        %turnover,
        %net_revenue,
        %total_costs,
        %gross_profit,
        %initial_investment,
        break_even_month = ?break_even_month,
        "fleet metrics computed"
    );

    Ok(FleetMetrics {
        metrics: BusinessMetrics {
            model: BusinessModel::Fleet,
            total_turnover: turnover,
            net_revenue,
            total_costs,
            gross_profit,
            profit_per_driver,
            break_even_rides,
            initial_investment,
            cost_breakdown,
            monthly_projections,
            break_even_month,
            roi_percentage,
            total_3yr_profit,
            pre_tax_profit,
            expected_tenure_months,
            monthly_rides_per_driver: monthly_rides_per_driver(
                params.rides_per_day,
                params.working_days,
                params.utilization_rate,
            ),
        },
        revenue_share: FLEET_SHARE,
        platform_fee: turnover * APP_SHARE,
        ev_payback_months: break_even_month,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    /// 10 EVs at the reference fares, no tax.
    fn reference_bundle() -> ParameterBundle {
        ParameterBundle::default()
    }

    #[test]
    fn test_reference_case_figures() {
        let m = compute_fleet_metrics(&reference_bundle()).unwrap();
        // turnover = 80*20*26*10 = 416,000; net = 386,880
        assert_eq!(m.metrics.total_turnover, dec!(416000));
        assert_eq!(m.metrics.net_revenue, dec!(386880));
        // salaries 250,000; acquisition 5000*10*10/100 = 5,000
        // maintenance 15,000; fuel 40,000; fixed 50,000
        assert_eq!(m.metrics.cost(labels::DRIVER_SALARIES), Some(dec!(250000)));
        assert_eq!(m.metrics.cost(labels::DRIVER_ACQUISITION), Some(dec!(5000)));
        assert_eq!(m.metrics.cost(labels::MAINTENANCE), Some(dec!(15000)));
        assert_eq!(m.metrics.cost(labels::FUEL), Some(dec!(40000)));
        assert_eq!(m.metrics.total_costs, dec!(360000));
        assert_eq!(m.metrics.gross_profit, dec!(26880));
        assert_eq!(m.metrics.profit_per_driver, dec!(2688));
        assert_eq!(m.metrics.initial_investment, dec!(1800000));
        assert_eq!(m.platform_fee, dec!(29120));
    }

    #[test]
    fn test_ev_investment_is_one_time_line() {
        let m = compute_fleet_metrics(&reference_bundle()).unwrap();
        let ev = m
            .metrics
            .cost_breakdown
            .iter()
            .find(|l| l.label == labels::EV_INVESTMENT)
            .unwrap();
        assert!(!ev.recurring);
        assert_eq!(ev.amount, dec!(1800000));
        assert_eq!(m.metrics.recurring_costs(), m.metrics.total_costs);
        assert_eq!(m.metrics.cost_breakdown.len(), 7);
        assert_eq!(m.metrics.cost_breakdown[2].label, "EV Investment (One-time)");
    }

    #[test]
    fn test_fuel_scales_with_utilization() {
        let bundle = ParameterBundle {
            utilization_rate: dec!(50),
            ..reference_bundle()
        };
        let m = compute_fleet_metrics(&bundle).unwrap();
        assert_eq!(m.metrics.cost(labels::FUEL), Some(dec!(20000)));
        assert_eq!(m.metrics.cost(labels::MAINTENANCE), Some(dec!(15000)));
    }

    #[test]
    fn test_investment_not_recovered_in_horizon() {
        // 1,800,000 / 26,880 per month ≈ 67 months
        let out = analyze_fleet_model(&reference_bundle()).unwrap();
        assert_eq!(out.result.metrics.break_even_month, None);
        assert_eq!(out.result.ev_payback_months, None);
        assert!(!out.result.metrics.break_even_rides.is_infinite());
        assert!(out.warnings.iter().any(|w| w.contains("not recovered")));
        // -1,800,000 + 36 * 26,880 = -832,320
        assert_eq!(out.result.metrics.total_3yr_profit, dec!(-832320));
    }

    #[test]
    fn test_payback_inside_horizon() {
        let bundle = ParameterBundle {
            ev_cost: dec!(50000),
            ..reference_bundle()
        };
        let m = compute_fleet_metrics(&bundle).unwrap();
        // investment 500,000 / 26,880 = 18.6 => month 19
        assert_eq!(m.metrics.break_even_month, Some(19));
        assert_eq!(m.ev_payback_months, Some(19));
        // total = -500,000 + 36 * 26,880 = 467,680; ROI = 93.536%
        assert_eq!(m.metrics.total_3yr_profit, dec!(467680));
        assert_eq!(m.metrics.roi_percentage, dec!(93.536));
    }

    #[test]
    fn test_tax_applied_on_positive_profit() {
        let bundle = ParameterBundle {
            tax_rate: dec!(25),
            ..reference_bundle()
        };
        let m = compute_fleet_metrics(&bundle).unwrap();
        assert_eq!(m.metrics.pre_tax_profit, dec!(26880));
        assert_eq!(m.metrics.cost(labels::TAXES), Some(dec!(6720)));
        assert_eq!(m.metrics.gross_profit, dec!(20160));
    }

    #[test]
    fn test_vanishing_ev_cost_reports_overflow() {
        // A three-year loss of ~1.5M over a 1e-25 outlay does not fit in a Decimal
        let bundle = ParameterBundle {
            ev_cost: Decimal::new(1, 25),
            num_fleet_drivers: 1,
            ..reference_bundle()
        };
        assert!(bundle.validate().is_ok());
        match compute_fleet_metrics(&bundle) {
            Err(RideEconError::ArithmeticOverflow { context }) => assert_eq!(context, "fleet ROI"),
            other => panic!("Expected ArithmeticOverflow, got {other:?}"),
        }
    }

    #[test]
    fn test_largest_accepted_bundle_computes() {
        use crate::params::{MAX_AMOUNT, MAX_DRIVERS, MAX_RIDES_PER_DAY, MAX_WORKING_DAYS};
        let bundle = ParameterBundle {
            avg_ticket_size: MAX_AMOUNT,
            rides_per_day: MAX_RIDES_PER_DAY,
            working_days: MAX_WORKING_DAYS,
            num_fleet_drivers: MAX_DRIVERS,
            driver_salary: MAX_AMOUNT,
            fleet_driver_acquisition_cost: MAX_AMOUNT,
            ev_cost: MAX_AMOUNT,
            ev_maintenance: MAX_AMOUNT,
            ev_fuel_cost: MAX_AMOUNT,
            fixed_costs: MAX_AMOUNT,
            driver_churn_rate: dec!(100),
            tax_rate: dec!(50),
            ..reference_bundle()
        };
        let m = compute_fleet_metrics(&bundle).unwrap();
        assert!(m.metrics.gross_profit > Decimal::ZERO);
        assert_eq!(m.metrics.monthly_projections.horizon(), 36);
    }

    #[test]
    fn test_no_capex_breaks_even_in_first_month() {
        let bundle = ParameterBundle {
            ev_cost: dec!(0),
            ..reference_bundle()
        };
        let m = compute_fleet_metrics(&bundle).unwrap();
        assert_eq!(m.metrics.break_even_month, Some(1));
        assert_eq!(m.metrics.roi_percentage, dec!(0));
    }

    #[test]
    fn test_unprofitable_fleet() {
        let bundle = ParameterBundle {
            driver_salary: dec!(40000),
            ..reference_bundle()
        };
        let out = analyze_fleet_model(&bundle).unwrap();
        assert!(out.result.metrics.gross_profit < dec!(0));
        assert!(out.result.metrics.break_even_rides.is_infinite());
        assert_eq!(out.result.metrics.break_even_month, None);
        assert!(out.warnings.iter().any(|w| w.contains("not profitable")));
    }

    #[test]
    fn test_flattened_serialization() {
        let m = compute_fleet_metrics(&reference_bundle()).unwrap();
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["model"], "fleet");
        assert_eq!(json["revenue_share"], "0.93");
        assert!(json["break_even_month"].is_null());
        assert_eq!(
            json["monthly_projections"]["cumulative_profit"]
                .as_array()
                .unwrap()
                .len(),
            36
        );
    }
}
