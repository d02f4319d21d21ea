use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;
use std::time::Instant;

use bess_finance_core::time_value::cash_flow_metrics;
use bess_finance_core::with_metadata;

/// Arguments for ad-hoc cash flow metrics
#[derive(Args)]
pub struct MetricsArgs {
    /// Cash flows from year 0 (comma-separated, e.g. "-100,30,30,30,30,30")
    #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
    pub cash_flows: Vec<Decimal>,

    /// Discount rate for NPV as a decimal (0.08 = 8%)
    #[arg(long, default_value = "0", allow_hyphen_values = true)]
    pub rate: Decimal,
}

pub fn run_metrics(args: MetricsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let start = Instant::now();
    let metrics = cash_flow_metrics(args.rate, &args.cash_flows)?;

    let mut warnings = Vec::new();
    if !metrics.irr_converged {
        warnings.push(format!("IRR did not converge; {} is the last iterate", metrics.irr));
    }
    if metrics.payback_years >= Decimal::from(args.cash_flows.len() as u64) {
        warnings.push("Initial outlay is not recovered".to_string());
    }

    let output = with_metadata(
        "Newton-Raphson IRR, discounted NPV, interpolated payback",
        &serde_json::json!({
            "rate": args.rate.to_string(),
            "periods": args.cash_flows.len(),
        }),
        warnings,
        start.elapsed().as_micros() as u64,
        metrics,
    );
    Ok(serde_json::to_value(output)?)
}
