//! Ride-sharing economics: an aggregator that takes a commission versus a
//! fleet operator that owns EVs and salaries its drivers.
//!
//! Every calculation is a pure function of a [`ParameterBundle`]. Money and
//! percentages are [`rust_decimal::Decimal`] throughout.

pub mod error;
pub mod metrics;
pub mod params;
pub mod projection;
pub mod revenue;
pub mod types;

pub mod models;

#[cfg(feature = "comparison")]
pub mod analysis;

pub use error::RideEconError;
pub use metrics::{BreakEvenRides, BusinessMetrics, CostLine};
pub use params::ParameterBundle;
pub use types::*;

#[cfg(feature = "aggregator")]
pub use models::aggregator::{analyze_aggregator_model, compute_aggregator_metrics, AggregatorMetrics};

#[cfg(feature = "fleet")]
pub use models::fleet::{analyze_fleet_model, compute_fleet_metrics, FleetMetrics};

#[cfg(feature = "comparison")]
pub use analysis::comparison::{analyze_comparison, compare_models, ModelComparison};

/// Standard result type for all ride-economics operations
pub type RideEconResult<T> = Result<T, RideEconError>;
