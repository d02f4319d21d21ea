use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;
use std::fs::File;
use std::io::{self, Write};

use bess_finance_core::model::model_from_inputs;

use super::SourceArgs;
use crate::output::{series, whole, CASH_FLOW_LINES, INCOME_LINES};

/// Arguments for the line-item CSV export
#[derive(Args)]
pub struct ExportArgs {
    #[command(flatten)]
    pub source: SourceArgs,

    /// Write to this file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

pub fn run_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let output = model_from_inputs(&args.source.raw_inputs()?)?;
    for w in &output.warnings {
        eprintln!("warning: {}", w);
    }
    let result = serde_json::to_value(&output.result)?;

    let sink: Box<dyn Write> = match &args.out {
        Some(path) => Box::new(
            File::create(path).map_err(|e| format!("Failed to create '{}': {}", path, e))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    write_statements(sink, &result)?;

    if let Some(path) = &args.out {
        eprintln!("wrote {}", path);
    }
    Ok(())
}

/// Line items by year, cash flow rows from year 0, then the headline metrics.
fn write_statements<W: Write>(sink: W, result: &Value) -> Result<(), Box<dyn std::error::Error>> {
    let mut wtr = csv::WriterBuilder::new().flexible(true).from_writer(sink);
    let years = result["years"].as_u64().unwrap_or(0);

    let mut header = vec!["Line Item".to_string()];
    header.extend((0..=years).map(|y| format!("Year {}", y)));
    wtr.write_record(&header)?;

    wtr.write_record(["INCOME STATEMENT"])?;
    for (label, group, field) in INCOME_LINES {
        let mut row = vec![label.to_string(), String::new()];
        row.extend(series(result, group, field).into_iter().map(whole));
        wtr.write_record(&row)?;
    }

    wtr.write_record(["CASH FLOW"])?;
    for (label, group, field) in CASH_FLOW_LINES {
        let mut row = vec![label.to_string()];
        row.extend(series(result, group, field).into_iter().map(whole));
        wtr.write_record(&row)?;
    }

    let metric = |name: &str| crate::output::decimal(&result["metrics"][name]).unwrap_or_default();
    wtr.write_record(["METRICS"])?;
    wtr.write_record(["Project IRR", &percent(metric("irr"))])?;
    wtr.write_record(["NPV", &whole(metric("npv"))])?;
    wtr.write_record(["Payback", &format!("{} years", metric("payback").round_dp(1))])?;
    wtr.write_record(["Equity IRR", &percent(metric("equity_irr"))])?;

    wtr.flush()?;
    Ok(())
}

fn percent(rate: Decimal) -> String {
    format!("{}%", (rate * dec!(100)).round_dp(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use bess_finance_core::RawInputs;

    #[test]
    fn test_export_layout() {
        let output = model_from_inputs(&RawInputs::default()).unwrap();
        let result = serde_json::to_value(&output.result).unwrap();
        let mut buf = Vec::new();
        write_statements(&mut buf, &result).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert!(lines[0].starts_with("Line Item,Year 0,Year 1"));
        assert!(lines[0].ends_with("Year 20"));
        assert!(lines[2].starts_with("Arbitrage Revenue,,"));
        assert!(text.contains("\nFree Cash Flow,-35574071,"));
        assert!(text.contains("\nEquity CF,-10672221,"));
        assert!(lines.iter().any(|l| l.starts_with("Payback,") && l.ends_with("years")));
    }

    #[test]
    fn test_percent_format() {
        assert_eq!(percent(dec!(0.15238)), "15.2%");
    }
}
