use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::models::aggregator::{build_aggregator, AggregatorMetrics};
use crate::models::fleet::{build_fleet, FleetMetrics};
use crate::params::ParameterBundle;
use crate::types::{with_metadata, BusinessModel, ComputationOutput, Money};
use crate::RideEconResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Cumulative profit of both models in one month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelinePoint {
    pub month: u32,
    pub aggregator: Money,
    pub fleet: Money,
}

/// Both models side by side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelComparison {
    pub aggregator: AggregatorMetrics,
    pub fleet: FleetMetrics,
    /// Model with the higher 3-year profit; aggregator on a tie
    pub preferred_model: BusinessModel,
    /// fleet.total_3yr_profit - aggregator.total_3yr_profit
    pub profit_gap_3yr: Money,
    /// fleet.gross_profit - aggregator.gross_profit
    pub monthly_profit_gap: Money,
    /// First month the fleet's cumulative profit reaches the aggregator's
    pub crossover_month: Option<u32>,
    pub cumulative_timeline: Vec<TimelinePoint>,
}

// ---------------------------------------------------------------------------
// Entry points
// ---------------------------------------------------------------------------

/// Run both models on the same bundle and compare them.
pub fn compare_models(params: &ParameterBundle) -> RideEconResult<ModelComparison> {
    params.validate()?;
    build_comparison(params, &mut Vec::new())
}

/// [`compare_models`] wrapped in the standard output envelope.
pub fn analyze_comparison(
    params: &ParameterBundle,
) -> RideEconResult<ComputationOutput<ModelComparison>> {
    let start = Instant::now();
    params.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let output = build_comparison(params, &mut warnings)?;

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "Aggregator vs fleet comparison over a 36-month horizon",
        params,
        warnings,
        elapsed,
        output,
    ))
}

pub(crate) fn build_comparison(
    params: &ParameterBundle,
    warnings: &mut Vec<String>,
) -> RideEconResult<ModelComparison> {
    let aggregator = build_aggregator(params, warnings)?;
    let fleet = build_fleet(params, warnings)?;

    let agg = &aggregator.metrics;
    let flt = &fleet.metrics;

    let profit_gap_3yr = flt.total_3yr_profit - agg.total_3yr_profit;
    let monthly_profit_gap = flt.gross_profit - agg.gross_profit;
    let preferred_model = if profit_gap_3yr > Decimal::ZERO {
        BusinessModel::Fleet
    } else {
        BusinessModel::Aggregator
    };

    let cumulative_timeline: Vec<TimelinePoint> = agg
        .monthly_projections
        .month
        .iter()
        .zip(agg.monthly_projections.cumulative_profit.iter())
        .zip(flt.monthly_projections.cumulative_profit.iter())
        .map(|((month, a), f)| TimelinePoint {
            month: *month,
            aggregator: *a,
            fleet: *f,
        })
        .collect();

    let crossover_month = cumulative_timeline
        .iter()
        .find(|p| p.fleet >= p.aggregator)
        .map(|p| p.month);

    tracing::debug!(
        preferred = %preferred_model,
        %profit_gap_3yr,
        crossover_month = ?crossover_month,
        "model comparison computed"
    );

    Ok(ModelComparison {
        aggregator,
        fleet,
        preferred_model,
        profit_gap_3yr,
        monthly_profit_gap,
        crossover_month,
        cumulative_timeline,
    })
}
