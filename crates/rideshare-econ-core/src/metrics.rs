use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::projection::MonthlyProjections;
use crate::types::{BusinessModel, Money};

// ---------------------------------------------------------------------------
// Shared output types
// ---------------------------------------------------------------------------

/// Monthly rides needed to cover total costs.
///
/// `Infinite` when the model makes no profit: no volume at the current cost
/// base reaches break-even.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakEvenRides {
    Rides(Decimal),
    Infinite,
}

impl BreakEvenRides {
    pub fn is_infinite(&self) -> bool {
        matches!(self, BreakEvenRides::Infinite)
    }

    pub fn rides(&self) -> Option<Decimal> {
        match self {
            BreakEvenRides::Rides(r) => Some(*r),
            BreakEvenRides::Infinite => None,
        }
    }
}

/// A single labelled cost line. Order in the breakdown is display order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostLine {
    pub label: String,
    pub amount: Money,
    /// False for one-time outlays such as EV purchases
    pub recurring: bool,
}

impl CostLine {
    pub(crate) fn monthly(label: &str, amount: Money) -> Self {
        CostLine {
            label: label.to_string(),
            amount,
            recurring: true,
        }
    }

    pub(crate) fn one_time(label: &str, amount: Money) -> Self {
        CostLine {
            label: label.to_string(),
            amount,
            recurring: false,
        }
    }
}

/// Figures every model reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusinessMetrics {
    pub model: BusinessModel,
    /// Ride revenue before the commission split, per month
    pub total_turnover: Money,
    /// Share of turnover retained by this model, per month
    pub net_revenue: Money,
    /// All monthly costs including tax
    pub total_costs: Money,
    /// net_revenue - total_costs
    pub gross_profit: Money,
    pub profit_per_driver: Money,
    pub break_even_rides: BreakEvenRides,
    /// One-time capital outlay before month 1
    pub initial_investment: Money,
    pub cost_breakdown: Vec<CostLine>,
    pub monthly_projections: MonthlyProjections,
    /// First 1-based month with non-negative cumulative profit
    pub break_even_month: Option<u32>,
    pub roi_percentage: Decimal,
    pub total_3yr_profit: Money,
    /// Profit before tax; tax is levied only when this is positive
    pub pre_tax_profit: Money,
    /// Months a driver is expected to stay; absent when churn is zero
    pub expected_tenure_months: Option<Decimal>,
    pub monthly_rides_per_driver: Decimal,
}

impl BusinessMetrics {
    /// Amount recorded under `label` in the cost breakdown.
    pub fn cost(&self, label: &str) -> Option<Money> {
        self.cost_breakdown
            .iter()
            .find(|line| line.label == label)
            .map(|line| line.amount)
    }

    /// Sum of the recurring cost lines (equals `total_costs`).
    pub fn recurring_costs(&self) -> Money {
        self.cost_breakdown
            .iter()
            .filter(|line| line.recurring)
            .map(|line| line.amount)
            .sum()
    }
}

/// Cost-breakdown labels.
pub mod labels {
    pub const DRIVER_SALARIES: &str = "Driver Salaries";
    pub const DRIVER_ACQUISITION: &str = "Driver Acquisition (Monthly)";
    pub const OPS_TEAM_SALARY: &str = "Ops Team Salary";
    pub const EV_INVESTMENT: &str = "EV Investment (One-time)";
    pub const MAINTENANCE: &str = "Maintenance";
    pub const FUEL: &str = "Fuel/Mileage";
    pub const FIXED_COSTS: &str = "Fixed Costs";
    pub const TAXES: &str = "Taxes";
}
