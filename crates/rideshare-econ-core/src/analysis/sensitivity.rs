use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::analysis::comparison::build_comparison;
use crate::error::RideEconError;
use crate::metrics::BusinessMetrics;
use crate::params::ParameterBundle;
use crate::types::{with_metadata, BusinessModel, ComputationOutput, Money};
use crate::RideEconResult;

/// Upper bound on evaluated points across the whole grid.
pub const MAX_GRID_POINTS: usize = 10_000;

/// A bundle field swept from `min` to `max` in `step` increments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SweepVariable {
    pub name: String,
    pub min: Decimal,
    pub max: Decimal,
    pub step: Decimal,
}

/// Input for a one- or two-way sensitivity sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityInput {
    /// Base case; every point starts from here
    pub base: ParameterBundle,
    pub variable_1: SweepVariable,
    /// Optional second variable, producing a full grid
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2: Option<SweepVariable>,
}

/// Headline figures of one model at one sweep point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPoint {
    pub gross_profit: Money,
    pub total_3yr_profit: Money,
    pub break_even_month: Option<u32>,
    pub roi_percentage: Decimal,
}

impl From<&BusinessMetrics> for ModelPoint {
    fn from(m: &BusinessMetrics) -> Self {
        ModelPoint {
            gross_profit: m.gross_profit,
            total_3yr_profit: m.total_3yr_profit,
            break_even_month: m.break_even_month,
            roi_percentage: m.roi_percentage,
        }
    }
}

/// Both models evaluated at one combination of sweep values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub variable_1_value: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2_value: Option<Decimal>,
    pub aggregator: ModelPoint,
    pub fleet: ModelPoint,
    pub preferred_model: BusinessModel,
}

/// Output of a sensitivity sweep. Points are row-major over variable 1.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityOutput {
    pub variable_1_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_2_name: Option<String>,
    pub variable_1_values: Vec<Decimal>,
    pub variable_2_values: Vec<Decimal>,
    pub points: Vec<SensitivityPoint>,
}

/// Generate the sweep values for a variable from min to max with step.
fn generate_sweep_values(var: &SweepVariable) -> RideEconResult<Vec<Decimal>> {
    if var.step <= Decimal::ZERO {
        return Err(RideEconError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Step must be positive".into(),
        });
    }
    if var.min > var.max {
        return Err(RideEconError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: "Min must be <= max".into(),
        });
    }

    // A span or ratio outside the decimal range counts as too many points
    let count = var
        .max
        .checked_sub(var.min)
        .and_then(|span| span.checked_div(var.step))
        .and_then(|n| n.floor().to_usize())
        .unwrap_or(usize::MAX);
    if count >= MAX_GRID_POINTS {
        return Err(RideEconError::InvalidInput {
            field: format!("variable:{}", var.name),
            reason: format!("Sweep exceeds {MAX_GRID_POINTS} points"),
        });
    }

    let mut values = Vec::with_capacity(count + 2);
    let mut current = var.min;
    for _ in 0..=count {
        if current > var.max {
            break;
        }
        values.push(current);
        match current.checked_add(var.step) {
            Some(next) if next > current => current = next,
            _ => break,
        }
    }
    // Ensure max is included if step doesn't land exactly on it
    if let Some(&last) = values.last() {
        if last < var.max {
            values.push(var.max);
        }
    }

    Ok(values)
}

fn evaluate_point(
    base: &ParameterBundle,
    var_1: (&str, Decimal),
    var_2: Option<(&str, Decimal)>,
) -> RideEconResult<SensitivityPoint> {
    let mut params = base.with_field(var_1.0, var_1.1)?;
    if let Some((name, value)) = var_2 {
        params = params.with_field(name, value)?;
    }
    params.validate()?;

    let comparison = build_comparison(&params, &mut Vec::new())?;

    Ok(SensitivityPoint {
        variable_1_value: var_1.1,
        variable_2_value: var_2.map(|(_, v)| v),
        aggregator: ModelPoint::from(&comparison.aggregator.metrics),
        fleet: ModelPoint::from(&comparison.fleet.metrics),
        preferred_model: comparison.preferred_model,
    })
}

/// Sweep one or two bundle fields and evaluate both models at every point.
pub fn run_sensitivity(
    input: &SensitivityInput,
) -> RideEconResult<ComputationOutput<SensitivityOutput>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    input.base.validate()?;
    // Reject unknown names before sweeping
    input.base.field(&input.variable_1.name)?;
    if let Some(ref v2) = input.variable_2 {
        input.base.field(&v2.name)?;
        if v2.name == input.variable_1.name {
            return Err(RideEconError::InvalidInput {
                field: "variable_2".into(),
                reason: "Must differ from variable_1".into(),
            });
        }
    }

    let v1_values = generate_sweep_values(&input.variable_1)?;
    let v2_values = match input.variable_2 {
        Some(ref v2) => generate_sweep_values(v2)?,
        None => Vec::new(),
    };

    let grid_size = v1_values.len() * v2_values.len().max(1);
    if grid_size > MAX_GRID_POINTS {
        return Err(RideEconError::InvalidInput {
            field: "variable_2".into(),
            reason: format!("Grid of {grid_size} points exceeds {MAX_GRID_POINTS}"),
        });
    }

    let v1_name = input.variable_1.name.as_str();
    let mut points = Vec::with_capacity(grid_size);
    for &v1 in &v1_values {
        match input.variable_2 {
            Some(ref v2) => {
                for &v2_value in &v2_values {
                    points.push(evaluate_point(
                        &input.base,
                        (v1_name, v1),
                        Some((v2.name.as_str(), v2_value)),
                    )?);
                }
            }
            None => points.push(evaluate_point(&input.base, (v1_name, v1), None)?),
        }
    }

    let switches = points
        .windows(2)
        .filter(|w| w[0].preferred_model != w[1].preferred_model)
        .count();
    if switches > 0 && input.variable_2.is_none() {
        warnings.push(format!(
            "Preferred model changes {switches} time(s) across the {v1_name} sweep"
        ));
    }

    tracing::debug!(
        variable_1 = v1_name,
        points = points.len(),
        "sensitivity sweep evaluated"
    );

    let output = SensitivityOutput {
        variable_1_name: input.variable_1.name.clone(),
        variable_2_name: input.variable_2.as_ref().map(|v| v.name.clone()),
        variable_1_values: v1_values,
        variable_2_values: v2_values,
        points,
    };

    let elapsed = start.elapsed().as_micros() as u64;

    Ok(with_metadata(
        "One/two-way sensitivity sweep re-running both models at each point",
        input,
        warnings,
        elapsed,
        output,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn sweep(name: &str, min: Decimal, max: Decimal, step: Decimal) -> SweepVariable {
        SweepVariable {
            name: name.to_string(),
            min,
            max,
            step,
        }
    }

    #[test]
    fn test_sweep_values_include_max() {
        let values = generate_sweep_values(&sweep("x", dec!(0), dec!(10), dec!(4))).unwrap();
        assert_eq!(values, vec![dec!(0), dec!(4), dec!(8), dec!(10)]);
    }

    #[test]
    fn test_sweep_single_point() {
        let values = generate_sweep_values(&sweep("x", dec!(5), dec!(5), dec!(1))).unwrap();
        assert_eq!(values, vec![dec!(5)]);
    }

    #[test]
    fn test_sweep_rejects_bad_step() {
        assert!(generate_sweep_values(&sweep("x", dec!(0), dec!(1), dec!(0))).is_err());
        assert!(generate_sweep_values(&sweep("x", dec!(2), dec!(1), dec!(1))).is_err());
        assert!(generate_sweep_values(&sweep("x", dec!(0), dec!(1), dec!(0.00001))).is_err());
    }

    #[test]
    fn test_sweep_spanning_decimal_range_rejected() {
        let err =
            generate_sweep_values(&sweep("x", Decimal::MIN, Decimal::MAX, dec!(1))).unwrap_err();
        assert!(matches!(err, RideEconError::InvalidInput { .. }));
    }

    #[test]
    fn test_sweep_stops_at_decimal_ceiling() {
        let values =
            generate_sweep_values(&sweep("x", Decimal::MAX, Decimal::MAX, dec!(1))).unwrap();
        assert_eq!(values, vec![Decimal::MAX]);

        let below = Decimal::MAX - dec!(1);
        let values = generate_sweep_values(&sweep("x", below, Decimal::MAX, dec!(1))).unwrap();
        assert_eq!(values, vec![below, Decimal::MAX]);
    }

    #[test]
    fn test_one_way_sweep() {
        let input = SensitivityInput {
            base: ParameterBundle::default(),
            variable_1: sweep("utilization_rate", dec!(50), dec!(100), dec!(25)),
            variable_2: None,
        };
        let out = run_sensitivity(&input).unwrap();
        assert_eq!(out.result.points.len(), 3);
        assert_eq!(out.result.variable_1_values, vec![dec!(50), dec!(75), dec!(100)]);
        assert!(out.result.variable_2_values.is_empty());
        // Higher utilisation never lowers the aggregator's profit
        let profits: Vec<Decimal> = out
            .result
            .points
            .iter()
            .map(|p| p.aggregator.gross_profit)
            .collect();
        assert!(profits.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_two_way_grid_is_row_major() {
        let input = SensitivityInput {
            base: ParameterBundle::default(),
            variable_1: sweep("num_fleet_drivers", dec!(10), dec!(20), dec!(10)),
            variable_2: Some(sweep("tax_rate", dec!(0), dec!(30), dec!(15))),
        };
        let out = run_sensitivity(&input).unwrap();
        assert_eq!(out.result.points.len(), 6);
        assert_eq!(out.result.points[0].variable_1_value, dec!(10));
        assert_eq!(out.result.points[2].variable_2_value, Some(dec!(30)));
        assert_eq!(out.result.points[3].variable_1_value, dec!(20));
    }

    #[test]
    fn test_unknown_variable() {
        let input = SensitivityInput {
            base: ParameterBundle::default(),
            variable_1: sweep("surge", dec!(1), dec!(2), dec!(1)),
            variable_2: None,
        };
        assert!(matches!(
            run_sensitivity(&input),
            Err(RideEconError::UnknownParameter(_))
        ));
    }

    #[test]
    fn test_point_outside_domain_rejected() {
        let input = SensitivityInput {
            base: ParameterBundle::default(),
            variable_1: sweep("tax_rate", dec!(90), dec!(110), dec!(10)),
            variable_2: None,
        };
        assert!(matches!(
            run_sensitivity(&input),
            Err(RideEconError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_same_variable_twice_rejected() {
        let input = SensitivityInput {
            base: ParameterBundle::default(),
            variable_1: sweep("tax_rate", dec!(0), dec!(10), dec!(5)),
            variable_2: Some(sweep("tax_rate", dec!(0), dec!(10), dec!(5))),
        };
        assert!(run_sensitivity(&input).is_err());
    }
}
