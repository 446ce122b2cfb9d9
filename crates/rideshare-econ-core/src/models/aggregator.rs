use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::metrics::{labels, BreakEvenRides, BusinessMetrics, CostLine};
use crate::params::ParameterBundle;
use crate::projection::project_months;
use crate::revenue::{
    checked_ratio, compute_base_revenue, driver_divisor, expected_tenure_months,
    monthly_acquisition_cost, monthly_rides_per_driver, tax_on_profit, AGGREGATOR_SHARE,
};
use crate::types::{
    with_metadata, BusinessModel, ComputationOutput, Money, Rate, PROJECTION_HORIZON_MONTHS,
};
use crate::RideEconResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Aggregator model results.
///
/// The aggregator owns no vehicles and pays no driver salaries; its revenue
/// is the commission on turnover.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregatorMetrics {
    #[serde(flatten)]
    pub metrics: BusinessMetrics,
    /// Commission kept by the aggregator (0.03)
    pub commission_rate: Rate,
    /// Turnover that flows straight to drivers; never on the aggregator's books
    pub driver_payout: Money,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Compute the aggregator model for a bundle.
pub fn compute_aggregator_metrics(params: &ParameterBundle) -> RideEconResult<AggregatorMetrics> {
    params.validate()?;
    build_aggregator(params, &mut Vec::new())
}

/// Compute the aggregator model wrapped in the standard output envelope.
pub fn analyze_aggregator_model(
    params: &ParameterBundle,
) -> RideEconResult<ComputationOutput<AggregatorMetrics>> {
    let start = Instant::now();
    params.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let output = build_aggregator(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Aggregator commission model: 3% of turnover, tenure-amortised acquisition, \
         36-month constant projection (ROI reported against a unit denominator)",
        params,
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Calculation
// ---------------------------------------------------------------------------

/// Core aggregator calculation. Assumes a validated bundle.
pub(crate) fn build_aggregator(
    params: &ParameterBundle,
    warnings: &mut Vec<String>,
) -> RideEconResult<AggregatorMetrics> {
    let drivers = params.num_agg_drivers;

    let turnover = compute_base_revenue(
        params.avg_ticket_size,
        params.rides_per_day,
        params.working_days,
        params.utilization_rate,
        drivers,
    );
    let net_revenue = turnover * AGGREGATOR_SHARE;

    // --- Costs ---
    let acquisition = monthly_acquisition_cost(
        params.agg_driver_acquisition_cost,
        drivers,
        params.driver_churn_rate,
    );
    // Aggregator drivers are independent earners
    let driver_salaries = Decimal::ZERO;
    let ops_salary = params.agg_ops_salary;
    let fixed_costs = params.fixed_costs;

    let pre_tax_profit = net_revenue - (acquisition + driver_salaries + ops_salary + fixed_costs);
    let tax = tax_on_profit(pre_tax_profit, params.tax_rate);
    let total_costs = acquisition + driver_salaries + ops_salary + fixed_costs + tax;

    let cost_breakdown = vec![
        CostLine::monthly(labels::DRIVER_SALARIES, driver_salaries),
        CostLine::monthly(labels::DRIVER_ACQUISITION, acquisition),
        CostLine::monthly(labels::OPS_TEAM_SALARY, ops_salary),
        CostLine::monthly(labels::FIXED_COSTS, fixed_costs),
        CostLine::monthly(labels::TAXES, tax),
    ];

    let gross_profit = net_revenue - total_costs;
    let profit_per_driver = gross_profit / driver_divisor(drivers);

    // --- Break-even ---
    let break_even_rides = if gross_profit <= Decimal::ZERO {
        BreakEvenRides::Infinite
    } else {
        BreakEvenRides::Rides(checked_ratio(
            total_costs,
            params.avg_ticket_size * AGGREGATOR_SHARE,
            "aggregator break-even rides",
        )?)
    };
    // No capital outlay: month 1 regardless of profitability
    let break_even_month = Some(1);

    let monthly_projections = project_months(
        gross_profit,
        total_costs,
        net_revenue,
        turnover,
        drivers,
        Decimal::ZERO,
        PROJECTION_HORIZON_MONTHS,
    );

    // gross_profit * 36, summed from the projection so the two always agree
    let total_3yr_profit = monthly_projections.total_gross_profit();
    let roi_percentage = total_3yr_profit * dec!(100);

    let expected_tenure_months = expected_tenure_months(params.driver_churn_rate)?;

    // --- Diagnostics ---
    if drivers == 0 {
        warnings.push(
            "No aggregator drivers: turnover is zero and per-driver figures use a divisor of 1"
                .to_string(),
        );
    }
    if params.driver_churn_rate.is_zero() {
        warnings.push(
            "Driver churn is zero: aggregator acquisition cost is not amortised".to_string(),
        );
    }
    if gross_profit <= Decimal::ZERO {
        warnings.push(format!(
            "Aggregator is not profitable (monthly gross profit {gross_profit}); \
             break-even rides are unreachable"
        ));
        warnings.push(
            "Aggregator break-even month is reported as 1 although cumulative profit \
             never turns positive"
                .to_string(),
        );
    }

    tracing::debug!(
        model = "aggregator",
        drivers,
        %turnover,
        %net_revenue,
        %total_costs,
        %gross_profit,
        "aggregator metrics computed"
    );

    Ok(AggregatorMetrics {
        metrics: BusinessMetrics {
            model: BusinessModel::Aggregator,
            total_turnover: turnover,
            net_revenue,
            total_costs,
            gross_profit,
            profit_per_driver,
            break_even_rides,
            initial_investment: Decimal::ZERO,
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
        commission_rate: AGGREGATOR_SHARE,
        driver_payout: turnover - net_revenue,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
