use clap::Args;
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;
use std::time::Instant;

use bess_finance_core::model::ModelResult;
use bess_finance_core::scenarios::sensitivity::STANDARD_MULTIPLIERS;
use bess_finance_core::scenarios::{self, SensitivityReport, TornadoOutput};
use bess_finance_core::{with_metadata, ParameterKey};

use super::SourceArgs;

/// Arguments for a single-parameter sweep
#[derive(Args)]
pub struct SensitivityArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Parameter to sweep (e.g. discharge_price, capex, fixed_om)
    #[arg(long)]
    pub param: ParameterKey,

    /// Multipliers applied to the base value (comma-separated, e.g. "-1,0.8,1.2")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true)]
    pub multipliers: Option<Vec<Decimal>>,
}

/// Arguments for the IRR tornado
#[derive(Args)]
pub struct TornadoArgs {
    #[command(flatten)]
    pub source: SourceArgs,
}

/// Arguments for the full sensitivity report
#[derive(Args)]
pub struct ReportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Include the complete model result for every run
    #[arg(long)]
    pub full: bool,
}

/// One sweep run reduced to its headline metrics.
#[derive(Debug, Serialize)]
struct SweepRow {
    point: Decimal,
    value: Decimal,
    irr: Decimal,
    npv: Decimal,
    payback: Decimal,
    equity_irr: Decimal,
}

impl SweepRow {
    fn new(point: Decimal, value: Decimal, result: &ModelResult) -> Self {
        SweepRow {
            point,
            value,
            irr: result.metrics.irr,
            npv: result.metrics.npv,
            payback: result.metrics.payback,
            equity_irr: result.metrics.equity_irr,
        }
    }
}

#[derive(Debug, Serialize)]
struct ReportSummary {
    spread: Vec<SweepRow>,
    capex: Vec<SweepRow>,
    efficiency: Vec<SweepRow>,
    degradation: Vec<SweepRow>,
    tornado: TornadoOutput,
}

impl From<SensitivityReport> for ReportSummary {
    fn from(r: SensitivityReport) -> Self {
        ReportSummary {
            spread: r
                .spread
                .iter()
                .map(|p| SweepRow::new(p.multiplier, p.spread, &p.result))
                .collect(),
            capex: r
                .capex
                .iter()
                .map(|p| SweepRow::new(p.multiplier, p.value, &p.result))
                .collect(),
            efficiency: r
                .efficiency
                .iter()
                .map(|p| SweepRow::new(p.efficiency, p.year1_revenue, &p.result))
                .collect(),
            degradation: r
                .degradation
                .iter()
                .map(|p| SweepRow::new(p.rate, p.year10_capacity, &p.result))
                .collect(),
            tornado: r.tornado,
        }
    }
}

pub fn run_sensitivity(args: SensitivityArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let base = args.source.params()?;
    let multipliers = args
        .multipliers
        .unwrap_or_else(|| STANDARD_MULTIPLIERS.to_vec());

    let points = scenarios::run_sensitivity(&base, args.param, &multipliers)?;
    let rows: Vec<SweepRow> = points
        .iter()
        .map(|p| SweepRow::new(p.multiplier, p.value, &p.result))
        .collect();

    let warnings = points
        .iter()
        .filter(|p| !p.result.metrics.irr_converged)
        .map(|p| format!("IRR did not converge at multiplier {}", p.multiplier))
        .collect();

    let output = with_metadata(
        "One-at-a-time multiplier sweep",
        &serde_json::json!({
            "parameter": args.param.as_str(),
            "label": args.param.label(),
            "base_value": args.param.value(&base).to_string(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        rows,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_tornado(args: TornadoArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let tornado = scenarios::run_tornado(&args.source.params()?)?;

    let warnings = tornado
        .bars
        .iter()
        .filter(|b| !b.converged)
        .map(|b| format!("{}: perturbed IRR did not converge", b.label))
        .collect();

    let output = with_metadata(
        "IRR tornado, ranked by percentage-point range",
        &serde_json::json!({
            "low_multiplier": tornado.low_multiplier.to_string(),
            "high_multiplier": tornado.high_multiplier.to_string(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        tornado,
    );
    Ok(serde_json::to_value(output)?)
}

pub fn run_report(args: ReportArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let report = scenarios::build_sensitivity_report(&args.source.params()?)?;
    if args.full {
        return Ok(serde_json::to_value(report)?);
    }

    let summary = with_metadata(
        &report.methodology,
        &report.assumptions,
        report.warnings,
        report.metadata.computation_time_us,
        ReportSummary::from(report.result),
    );
    Ok(serde_json::to_value(summary)?)
}
