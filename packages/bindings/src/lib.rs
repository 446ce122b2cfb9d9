use napi::Result as NapiResult;
use napi_derive::napi;

use rideshare_econ_core::{BusinessModel, ParameterBundle};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Business models
// ---------------------------------------------------------------------------

#[napi]
pub fn aggregator_metrics(input_json: String) -> NapiResult<String> {
    let input: ParameterBundle = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rideshare_econ_core::analyze_aggregator_model(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fleet_metrics(input_json: String) -> NapiResult<String> {
    let input: ParameterBundle = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rideshare_econ_core::analyze_fleet_model(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(serde::Deserialize)]
struct ProjectionBindingInput {
    #[serde(flatten)]
    params: ParameterBundle,
    model: BusinessModel,
}

#[napi]
pub fn monthly_projections(input_json: String) -> NapiResult<String> {
    let binding_input: ProjectionBindingInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let projections = match binding_input.model {
        BusinessModel::Aggregator => {
            rideshare_econ_core::compute_aggregator_metrics(&binding_input.params)
                .map_err(to_napi_error)?
                .metrics
                .monthly_projections
        }
        BusinessModel::Fleet => {
            rideshare_econ_core::compute_fleet_metrics(&binding_input.params)
                .map_err(to_napi_error)?
                .metrics
                .monthly_projections
        }
    };
    serde_json::to_string(&projections.rows()).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn compare_models(input_json: String) -> NapiResult<String> {
    let input: ParameterBundle = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rideshare_econ_core::analyze_comparison(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_analysis(input_json: String) -> NapiResult<String> {
    let input: rideshare_econ_core::analysis::sensitivity::SensitivityInput =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = rideshare_econ_core::analysis::sensitivity::run_sensitivity(&input)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Parameters
// ---------------------------------------------------------------------------

#[napi]
pub fn default_parameters() -> NapiResult<String> {
    serde_json::to_string(&ParameterBundle::default()).map_err(to_napi_error)
}

#[napi]
pub fn validate_parameters(input_json: String) -> NapiResult<String> {
    let input: ParameterBundle = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    input.validate().map_err(to_napi_error)?;
    serde_json::to_string(&input).map_err(to_napi_error)
}
