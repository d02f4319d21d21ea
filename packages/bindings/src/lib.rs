use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use bess_finance_core::{model, scenarios, time_value};
use bess_finance_core::{ParameterRecord, RawInputs};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

/// Raw inputs from JSON; an empty string means the defaults.
fn parse_inputs(input_json: &str) -> NapiResult<RawInputs> {
    if input_json.trim().is_empty() {
        return Ok(RawInputs::default());
    }
    serde_json::from_str(input_json).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Model
// ---------------------------------------------------------------------------

#[napi]
pub fn build_params(input_json: String) -> NapiResult<String> {
    let record = bess_finance_core::build_params(&parse_inputs(&input_json)?);
    serde_json::to_string(&record).map_err(to_napi_error)
}

#[napi]
pub fn run_model(input_json: String) -> NapiResult<String> {
    let output = model::model_from_inputs(&parse_inputs(&input_json)?).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn run_model_from_record(record_json: String) -> NapiResult<String> {
    let record: ParameterRecord = serde_json::from_str(&record_json).map_err(to_napi_error)?;
    let output = model::model_storage_project(&record).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Sensitivity
// ---------------------------------------------------------------------------

#[napi]
pub fn tornado(input_json: String) -> NapiResult<String> {
    let base = bess_finance_core::build_params(&parse_inputs(&input_json)?);
    let output = scenarios::run_tornado(&base).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn sensitivity_report(input_json: String) -> NapiResult<String> {
    let base = bess_finance_core::build_params(&parse_inputs(&input_json)?);
    let output = scenarios::build_sensitivity_report(&base).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct MetricsRequest {
    cash_flows: Vec<Decimal>,
    #[serde(default)]
    rate: Decimal,
}

#[napi]
pub fn investment_metrics(input_json: String) -> NapiResult<String> {
    let request: MetricsRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        time_value::cash_flow_metrics(request.rate, &request.cash_flows).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
