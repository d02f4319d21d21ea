use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Energy quantities in MWh
pub type Energy = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// One value per project year; index 0 is year 1.
pub type YearSeries = Vec<Decimal>;

/// Index 0 is the time-zero outflow, followed by one flow per project year.
pub type CashFlowVector = Vec<Money>;

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

/// Compound a base amount by `(1 + rate)^y` for y = 0..years-1.
///
/// Saturates at `Decimal::MAX` / `Decimal::MIN` rather than panicking on
/// absurd rates; every consumer of the series must add and multiply with
/// saturating ops too.
pub(crate) fn compounding_series(base: Decimal, rate: Rate, years: usize) -> YearSeries {
    let growth = Decimal::ONE.saturating_add(rate);
    let mut factor = Decimal::ONE;
    let mut series = Vec::with_capacity(years);
    for _ in 0..years {
        series.push(base.saturating_mul(factor));
        factor = factor.saturating_mul(growth);
    }
    series
}

/// `base * (1 + rate)^periods`, saturating.
pub(crate) fn compounded(base: Decimal, rate: Rate, periods: u32) -> Decimal {
    let growth = Decimal::ONE.saturating_add(rate);
    (0..periods).fold(base, |value, _| value.saturating_mul(growth))
}

/// Sum that saturates instead of overflowing.
pub(crate) fn saturating_sum<'a>(values: impl IntoIterator<Item = &'a Decimal>) -> Decimal {
    values
        .into_iter()
        .fold(Decimal::ZERO, |acc, v| acc.saturating_add(*v))
}

/// True when a value has been pinned at the edge of Decimal range.
pub(crate) fn is_saturated(value: Decimal) -> bool {
    value == Decimal::MAX || value == Decimal::MIN
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_compounding_series_starts_flat() {
        let s = compounding_series(dec!(100), dec!(0.10), 3);
        assert_eq!(s, vec![dec!(100), dec!(110), dec!(121)]);
    }

    #[test]
    fn test_compounding_series_zero_rate() {
        let s = compounding_series(dec!(7), Decimal::ZERO, 4);
        assert!(s.iter().all(|v| *v == dec!(7)));
    }

    #[test]
    fn test_compounding_series_saturates() {
        let s = compounding_series(dec!(1_000_000), dec!(1), 120);
        assert_eq!(s[119], Decimal::MAX);
        // Alternating growth of -2 ends pinned at one edge of the range
        let s = compounding_series(dec!(1), dec!(-3), 120);
        assert_eq!(s[1], dec!(-2));
        assert!(is_saturated(s[119]));
    }

    #[test]
    fn test_compounded_matches_series() {
        let s = compounding_series(dec!(10), dec!(-0.025), 10);
        assert_eq!(compounded(dec!(10), dec!(-0.025), 9), s[9]);
        assert_eq!(compounded(dec!(10), dec!(5), 0), dec!(10));
    }

    #[test]
    fn test_saturating_sum() {
        let v = vec![Decimal::MAX, dec!(1), dec!(5)];
        assert_eq!(saturating_sum(&v), Decimal::MAX);
        assert_eq!(saturating_sum(&[dec!(1), dec!(2)]), dec!(3));
        assert!(is_saturated(Decimal::MIN));
        assert!(!is_saturated(dec!(0)));
    }

    #[test]
    fn test_envelope_metadata() {
        let out = with_metadata("m", &serde_json::json!({"a": 1}), vec![], 5, 42u32);
        assert_eq!(out.result, 42);
        assert_eq!(out.metadata.computation_time_us, 5);
        assert_eq!(out.assumptions["a"], 1);
    }
}
