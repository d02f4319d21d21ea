use clap::Args;
use serde_json::Value;

use bess_finance_core::model::{model_from_inputs, model_storage_project};
use bess_finance_core::{ParameterRecord, RawInputs};

use super::SourceArgs;
use crate::input;

/// Arguments for the project model
#[derive(Args)]
pub struct ModelArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Treat the input as an already-normalised parameter record
    #[arg(long)]
    pub record: bool,
}

pub fn run_model(args: ModelArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let output = if args.record {
        let record: ParameterRecord = input::load(args.source.input.as_deref())?
            .ok_or("--record requires --input <file> or a record piped on stdin")?;
        model_storage_project(&record)?
    } else {
        model_from_inputs(&args.source.raw_inputs()?)?
    };
    Ok(serde_json::to_value(output)?)
}

pub fn run_defaults() -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(RawInputs::default())?)
}

/// Arguments for printing the normalised parameter record
#[derive(Args)]
pub struct ParamsArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

pub fn run_params(args: ParamsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    Ok(serde_json::to_value(args.source.params()?)?)
}
