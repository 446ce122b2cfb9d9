#![cfg(feature = "sensitivity")]

use rideshare_econ_core::analysis::sensitivity::{run_sensitivity, SensitivityInput, SweepVariable};
use rideshare_econ_core::{BusinessModel, ParameterBundle, RideEconError};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Sensitivity
// ===========================================================================

#[test]
fn test_fleet_size_sweep_scales_investment_linearly() {
    let input = SensitivityInput {
        base: ParameterBundle::default(),
        variable_1: SweepVariable {
            name: "num_fleet_drivers".into(),
            min: dec!(10),
            max: dec!(30),
            step: dec!(10),
        },
        variable_2: None,
    };
    let out = run_sensitivity(&input).unwrap();
    let profits: Vec<Decimal> = out
        .result
        .points
        .iter()
        .map(|p| p.fleet.gross_profit)
        .collect();
    // Each 10 EVs add 26,880 + 50,000 (fixed costs are shared)
    assert_eq!(profits, vec![dec!(26880), dec!(103760), dec!(180640)]);
    // Aggregator side is untouched by the fleet size
    assert!(out
        .result
        .points
        .windows(2)
        .all(|w| w[0].aggregator == w[1].aggregator));
}

#[test]
fn test_churn_sweep_reaches_zero() {
    let input = SensitivityInput {
        base: ParameterBundle::default(),
        variable_1: SweepVariable {
            name: "driver_churn_rate".into(),
            min: dec!(0),
            max: dec!(20),
            step: dec!(10),
        },
        variable_2: None,
    };
    let out = run_sensitivity(&input).unwrap();
    let first = &out.result.points[0];
    let last = &out.result.points[2];
    // Churn only adds amortised acquisition cost
    assert!(first.aggregator.gross_profit > last.aggregator.gross_profit);
    assert!(first.fleet.gross_profit > last.fleet.gross_profit);
}

#[test]
fn test_preferred_model_switch_is_reported() {
    let input = SensitivityInput {
        base: ParameterBundle::default(),
        variable_1: SweepVariable {
            name: "ev_cost".into(),
            min: dec!(20000),
            max: dec!(180000),
            step: dec!(80000),
        },
        variable_2: None,
    };
    let out = run_sensitivity(&input).unwrap();
    let preferred: Vec<BusinessModel> = out
        .result
        .points
        .iter()
        .map(|p| p.preferred_model)
        .collect();
    assert_eq!(
        preferred,
        vec![
            BusinessModel::Fleet,
            BusinessModel::Fleet,
            BusinessModel::Aggregator
        ]
    );
    assert_eq!(out.warnings.len(), 1);
}

#[test]
fn test_out_of_range_sweep_point_is_rejected_not_panicking() {
    let input = SensitivityInput {
        base: ParameterBundle::default(),
        variable_1: SweepVariable {
            name: "avg_ticket_size".into(),
            min: dec!(80),
            max: dec!(1000000000000000000000),
            step: dec!(999999999999999999920),
        },
        variable_2: None,
    };
    assert!(matches!(
        run_sensitivity(&input),
        Err(RideEconError::InvalidParameter { .. })
    ));
}
