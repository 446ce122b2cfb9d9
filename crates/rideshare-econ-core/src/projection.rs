use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::revenue::driver_divisor;
use crate::types::Money;

/// Month-by-month projection, one column per metric.
///
/// Every column except `cumulative_profit` is constant across the horizon;
/// the model carries no growth or seasonality.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyProjections {
    /// 1-based month index
    pub month: Vec<u32>,
    pub total_turnover: Vec<Money>,
    pub net_revenue: Vec<Money>,
    pub total_costs: Vec<Money>,
    pub gross_profit: Vec<Money>,
    pub profit_per_driver: Vec<Money>,
    /// Running profit, net of the upfront investment
    pub cumulative_profit: Vec<Money>,
}

/// One row of [`MonthlyProjections`], for tabular display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionRow {
    pub month: u32,
    pub total_turnover: Money,
    pub net_revenue: Money,
    pub total_costs: Money,
    pub gross_profit: Money,
    pub profit_per_driver: Money,
    pub cumulative_profit: Money,
}

/// Repeat the monthly figures over `horizon` months and accumulate profit.
///
/// The cumulative column starts at `-initial_investment` and each month adds
/// `monthly_profit`, so `cumulative[0] = monthly_profit - initial_investment`.
pub fn project_months(
    monthly_profit: Money,
    monthly_costs: Money,
    monthly_revenue: Money,
    monthly_turnover: Money,
    num_drivers: u32,
    initial_investment: Money,
    horizon: u32,
) -> MonthlyProjections {
    let len = horizon as usize;
    let per_driver = monthly_profit / driver_divisor(num_drivers);

    let mut cumulative_profit = Vec::with_capacity(len);
    let mut cumulative = -initial_investment;
    for _ in 0..horizon {
        cumulative += monthly_profit;
        cumulative_profit.push(cumulative);
    }

    MonthlyProjections {
        month: (1..=horizon).collect(),
        total_turnover: vec![monthly_turnover; len],
        net_revenue: vec![monthly_revenue; len],
        total_costs: vec![monthly_costs; len],
        gross_profit: vec![monthly_profit; len],
        profit_per_driver: vec![per_driver; len],
        cumulative_profit,
    }
}

/// First 1-based month whose cumulative profit is non-negative.
pub fn first_break_even_month(cumulative_profit: &[Money]) -> Option<u32> {
    cumulative_profit
        .iter()
        .position(|c| *c >= Decimal::ZERO)
        .map(|i| i as u32 + 1)
}

impl MonthlyProjections {
    pub fn horizon(&self) -> usize {
        self.month.len()
    }

    /// Last cumulative value, or zero for an empty horizon.
    pub fn final_cumulative_profit(&self) -> Money {
        self.cumulative_profit
            .last()
            .copied()
            .unwrap_or(Decimal::ZERO)
    }

    /// Sum of the monthly gross-profit column.
    pub fn total_gross_profit(&self) -> Money {
        self.gross_profit.iter().copied().sum()
    }

    /// Transpose the columns into per-month rows.
    pub fn rows(&self) -> Vec<ProjectionRow> {
        (0..self.horizon())
            .map(|i| ProjectionRow {
                month: self.month[i],
                total_turnover: self.total_turnover[i],
                net_revenue: self.net_revenue[i],
                total_costs: self.total_costs[i],
                gross_profit: self.gross_profit[i],
                profit_per_driver: self.profit_per_driver[i],
                cumulative_profit: self.cumulative_profit[i],
            })
            .collect()
    }
}
