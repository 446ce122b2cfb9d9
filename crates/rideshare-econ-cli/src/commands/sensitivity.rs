use clap::Args;
use serde_json::Value;

use rideshare_econ_core::analysis::sensitivity::{self, SensitivityInput, SweepVariable};

use super::params::BundleArgs;

/// Arguments for sensitivity analysis
#[derive(Args)]
pub struct SensitivityArgs {
    /// First sweep variable in format name:min:max:step
    /// (e.g. "utilization_rate:40:100:10")
    #[arg(long)]
    pub var1: String,

    /// Second sweep variable (optional, creates a 2D grid)
    #[arg(long)]
    pub var2: Option<String>,

    #[command(flatten)]
    pub bundle: BundleArgs,
}

fn parse_sweep_var(raw: &str) -> Result<SweepVariable, Box<dyn std::error::Error>> {
    let parts: Vec<&str> = raw.split(':').collect();
    if parts.len() != 4 {
        return Err(format!(
            "Sweep variable must be name:min:max:step, got '{}'",
            raw
        )
        .into());
    }
    Ok(SweepVariable {
        name: parts[0].to_string(),
        min: parts[1].parse()?,
        max: parts[2].parse()?,
        step: parts[3].parse()?,
    })
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let variable_1 = parse_sweep_var(&args.var1)?;
    let variable_2 = args.var2.as_deref().map(parse_sweep_var).transpose()?;

    let input = SensitivityInput {
        base: args.bundle.load()?,
        variable_1,
        variable_2,
    };

    let result = sensitivity::run_sensitivity(&input)?;
    Ok(serde_json::to_value(result)?)
}
