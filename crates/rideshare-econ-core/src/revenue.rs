use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::RideEconError;
use crate::types::{Money, Percent, Rate};
use crate::RideEconResult;

/// Share of turnover the aggregator keeps as commission.
pub const AGGREGATOR_SHARE: Rate = dec!(0.03);

/// Share of turnover the fleet owner keeps.
pub const FLEET_SHARE: Rate = dec!(0.93);

/// Platform fee the ride app takes from the fleet's turnover.
pub const APP_SHARE: Rate = dec!(0.07);

const HUNDRED: Decimal = dec!(100);

/// Rides one driver completes in a month.
pub fn monthly_rides_per_driver(
    rides_per_day: Decimal,
    working_days: u32,
    utilization_rate: Percent,
) -> Decimal {
    rides_per_day * Decimal::from(working_days) * utilization_rate / HUNDRED
}

/// Monthly turnover before any commission split.
///
/// `avg_ticket_size * rides_per_day * working_days * utilisation% * drivers`.
/// Zero drivers yield zero turnover.
pub fn compute_base_revenue(
    avg_ticket_size: Money,
    rides_per_day: Decimal,
    working_days: u32,
    utilization_rate: Percent,
    num_drivers: u32,
) -> Money {
    let monthly_rides = monthly_rides_per_driver(rides_per_day, working_days, utilization_rate);
    avg_ticket_size * monthly_rides * Decimal::from(num_drivers)
}

/// Months a driver is expected to stay: `100 / churn%`.
///
/// `None` when churn is zero (drivers never leave).
pub fn expected_tenure_months(churn_rate: Percent) -> RideEconResult<Option<Decimal>> {
    if churn_rate > Decimal::ZERO {
        checked_ratio(HUNDRED, churn_rate, "expected tenure").map(Some)
    } else {
        Ok(None)
    }
}

/// One-time acquisition cost spread over the expected tenure.
///
/// Zero churn means infinite tenure, so nothing is amortised. Computed as
/// `cost * drivers * churn / 100`, which equals dividing by the tenure
/// without rounding the tenure first.
pub fn monthly_acquisition_cost(
    cost_per_driver: Money,
    num_drivers: u32,
    churn_rate: Percent,
) -> Money {
    if churn_rate > Decimal::ZERO {
        cost_per_driver * Decimal::from(num_drivers) * churn_rate / HUNDRED
    } else {
        Decimal::ZERO
    }
}

/// Tax on positive pre-tax profit. Losses never produce a refund.
pub fn tax_on_profit(pre_tax_profit: Money, tax_rate: Percent) -> Money {
    (pre_tax_profit * tax_rate / HUNDRED).max(Decimal::ZERO)
}

/// `numerator / denominator`, failing instead of panicking when the quotient
/// leaves the decimal range or the denominator has rounded to zero.
pub(crate) fn checked_ratio(
    numerator: Decimal,
    denominator: Decimal,
    context: &str,
) -> RideEconResult<Decimal> {
    numerator
        .checked_div(denominator)
        .ok_or_else(|| RideEconError::ArithmeticOverflow {
            context: context.to_string(),
        })
}

/// Divisor for per-driver figures; an empty roster divides by one.
pub(crate) fn driver_divisor(num_drivers: u32) -> Decimal {
    Decimal::from(num_drivers.max(1))
}
