pub mod export;
pub mod metrics;
pub mod model;
pub mod sensitivity;

use clap::Args;
use rust_decimal::Decimal;

use bess_finance_core::{build_params, ParameterRecord, RawInputs};

use crate::input;

/// Where the raw inputs come from, plus flag overrides applied on top.
#[derive(Args)]
pub struct SourceArgs {
    /// Path to a JSON or YAML file of raw inputs (stdin is read when piped)
    #[arg(long)]
    pub input: Option<String>,

    /// Usable capacity in MWh
    #[arg(long)]
    pub capacity: Option<Decimal>,

    /// Charging price per kWh
    #[arg(long)]
    pub charge_price: Option<Decimal>,

    /// Discharge price per kWh
    #[arg(long)]
    pub discharge_price: Option<Decimal>,

    /// Total CAPEX
    #[arg(long)]
    pub capex: Option<Decimal>,

    /// Debt amount
    #[arg(long)]
    pub debt_amount: Option<Decimal>,

    /// Project life in years
    #[arg(long)]
    pub project_life: Option<Decimal>,

    /// Annual degradation in percent
    #[arg(long)]
    pub degradation: Option<Decimal>,
}

impl SourceArgs {
    /// Raw inputs from file or stdin (defaults otherwise), with flags applied.
    pub fn raw_inputs(&self) -> Result<RawInputs, Box<dyn std::error::Error>> {
        let mut raw: RawInputs = input::load(self.input.as_deref())?.unwrap_or_default();

        if let Some(v) = self.capacity {
            raw.capacity = v;
        }
        if let Some(v) = self.charge_price {
            raw.charge_price_kwh = v;
        }
        if let Some(v) = self.discharge_price {
            raw.discharge_price_kwh = v;
        }
        if let Some(v) = self.capex {
            raw.capex = v;
        }
        if let Some(v) = self.debt_amount {
            raw.debt_amount = v;
        }
        if let Some(v) = self.project_life {
            raw.project_life = v;
        }
        if let Some(v) = self.degradation {
            raw.degradation_pct = v;
        }
        Ok(raw)
    }

    /// Normalised parameter record built from [`SourceArgs::raw_inputs`].
    pub fn params(&self) -> Result<ParameterRecord, Box<dyn std::error::Error>> {
        Ok(build_params(&self.raw_inputs()?))
    }
}
