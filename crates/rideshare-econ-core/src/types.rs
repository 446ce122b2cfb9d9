use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Fractions of one (0.03 = 3%). Used for the fixed revenue splits.
pub type Rate = Decimal;

/// Percentages on a 0–100 scale, as entered by the operator
/// (utilisation, churn, tax).
pub type Percent = Decimal;

/// Length of every monthly projection, in months.
pub const PROJECTION_HORIZON_MONTHS: u32 = 36;

/// The two business models under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BusinessModel {
    /// Drivers bring their own vehicles; the platform keeps a commission.
    Aggregator,
    /// The operator owns the EVs and pays driver salaries.
    Fleet,
}

impl std::fmt::Display for BusinessModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BusinessModel::Aggregator => write!(f, "aggregator"),
            BusinessModel::Fleet => write!(f, "fleet"),
        }
    }
}

impl std::str::FromStr for BusinessModel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "aggregator" | "agg" => Ok(BusinessModel::Aggregator),
            "fleet" => Ok(BusinessModel::Fleet),
            other => Err(format!(
                "Unknown model '{other}'. Available models: aggregator, fleet"
            )),
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
