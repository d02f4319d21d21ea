pub mod csv_out;
pub mod json;
pub mod minimal;
pub mod table;

use crate::OutputFormat;
use rust_decimal::Decimal;
use serde_json::Value;

/// Income statement rows: label, result group, series field. Years 1..N.
pub const INCOME_LINES: [(&str, &str, &str); 16] = [
    ("Arbitrage Revenue", "revenue", "arbitrage_revenue"),
    ("PPA Revenue", "revenue", "ppa_revenue"),
    ("Ancillary Services", "revenue", "ancillary_revenue"),
    ("Other Revenue", "revenue", "other_revenue"),
    ("Total Revenue", "revenue", "total_revenue"),
    ("Insurance", "opex", "insurance"),
    ("Variable O&M", "opex", "variable_om"),
    ("Fixed O&M", "opex", "fixed_om"),
    ("Total OPEX", "opex", "total_opex"),
    ("EBITDA", "income", "ebitda"),
    ("Depreciation", "income", "depreciation"),
    ("EBIT", "income", "ebit"),
    ("Interest", "income", "interest"),
    ("EBT", "income", "ebt"),
    ("Tax", "income", "tax"),
    ("Net Income", "income", "net_income"),
];

/// Cash flow rows. Years 0..N.
pub const CASH_FLOW_LINES: [(&str, &str, &str); 3] = [
    ("Free Cash Flow", "cash_flows", "project_cash_flows"),
    ("Cumulative CF", "cash_flows", "cumulative_cash_flows"),
    ("Equity CF", "cash_flows", "equity_cash_flows"),
];

/// Dispatch output to the appropriate formatter.
pub fn format_output(format: &OutputFormat, value: &Value) {
    match format {
        OutputFormat::Json => json::print_json(value),
        OutputFormat::Table => table::print_table(value),
        OutputFormat::Csv => csv_out::print_csv(value),
        OutputFormat::Minimal => minimal::print_minimal(value),
    }
}

/// True when `result` is a serialised model result.
pub fn is_model_result(result: &Value) -> bool {
    result.get("year_labels").is_some() && result.get("cash_flows").is_some()
}

/// A year series from a serialised model result, empty if absent.
pub fn series(result: &Value, group: &str, field: &str) -> Vec<Decimal> {
    result
        .get(group)
        .and_then(|g| g.get(field))
        .and_then(Value::as_array)
        .map(|values| values.iter().filter_map(decimal).collect())
        .unwrap_or_default()
}

/// Decimals serialise as strings; accept plain numbers too.
pub fn decimal(value: &Value) -> Option<Decimal> {
    match value {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.to_string().parse().ok(),
        _ => None,
    }
}

/// Whole currency units, rounding half up.
pub fn whole(value: Decimal) -> String {
    bess_finance_core::params::builder::round_half_up(value).to_string()
}
