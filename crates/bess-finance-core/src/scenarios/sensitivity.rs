use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::evaluate_each;
use super::tornado::{run_tornado, TornadoOutput};
use crate::error::BessFinanceError;
use crate::model::{run_model, ModelResult};
use crate::params::{ParameterKey, ParameterRecord};
use crate::types::*;
use crate::BessFinanceResult;

/// Multipliers for the spread and CAPEX panels: -20%, base, +20%.
pub const STANDARD_MULTIPLIERS: [Decimal; 3] = [dec!(0.8), dec!(1.0), dec!(1.2)];

/// Degradation rates for the degradation panel.
pub const STANDARD_DEGRADATION_RATES: [Rate; 3] = [dec!(0.015), dec!(0.025), dec!(0.035)];

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One run of a single-parameter multiplier sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityPoint {
    pub parameter: ParameterKey,
    pub multiplier: Decimal,
    /// Parameter value used for this run
    pub value: Decimal,
    pub result: ModelResult,
}

/// One run of the energy price spread sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpreadPoint {
    pub multiplier: Decimal,
    /// Discharge minus charge price, per MWh
    pub spread: Money,
    pub result: ModelResult,
}

/// One run of the degradation sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DegradationPoint {
    pub rate: Rate,
    /// Capacity remaining in year 10, MWh
    pub year10_capacity: Energy,
    pub result: ModelResult,
}

/// One run of the round-trip efficiency sweep.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EfficiencyPoint {
    pub efficiency: Rate,
    pub year1_revenue: Money,
    pub result: ModelResult,
}

/// The standard sensitivity panels for one base case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SensitivityReport {
    pub spread: Vec<SpreadPoint>,
    pub capex: Vec<SensitivityPoint>,
    pub efficiency: Vec<EfficiencyPoint>,
    pub degradation: Vec<DegradationPoint>,
    pub tornado: TornadoOutput,
}

// ---------------------------------------------------------------------------
// Sweeps
// ---------------------------------------------------------------------------

/// Re-run the model with `key` scaled by each multiplier.
pub fn run_sensitivity(
    base: &ParameterRecord,
    key: ParameterKey,
    multipliers: &[Decimal],
) -> BessFinanceResult<Vec<SensitivityPoint>> {
    require_points("multipliers", multipliers)?;
    evaluate_each(multipliers, |&multiplier| {
        let params = key.scaled(base, multiplier);
        Ok(SensitivityPoint {
            parameter: key,
            multiplier,
            value: key.value(&params),
            result: run_model(&params)?,
        })
    })
}

/// Scale the discharge price and report the resulting price spread.
pub fn run_spread_sensitivity(
    base: &ParameterRecord,
    multipliers: &[Decimal],
) -> BessFinanceResult<Vec<SpreadPoint>> {
    require_points("multipliers", multipliers)?;
    evaluate_each(multipliers, |&multiplier| {
        let params = ParameterKey::DischargePrice.scaled(base, multiplier);
        Ok(SpreadPoint {
            multiplier,
            spread: params.discharge_price.saturating_sub(params.charge_price),
            result: run_model(&params)?,
        })
    })
}

/// Substitute each degradation rate in turn.
pub fn run_degradation_sensitivity(
    base: &ParameterRecord,
    rates: &[Rate],
) -> BessFinanceResult<Vec<DegradationPoint>> {
    require_points("rates", rates)?;
    evaluate_each(rates, |&rate| {
        let params = ParameterKey::Degradation.with_value(base, rate);
        Ok(DegradationPoint {
            rate,
            year10_capacity: compounded(params.capacity, -rate, 9),
            result: run_model(&params)?,
        })
    })
}

/// Substitute each round-trip efficiency in turn.
pub fn run_efficiency_sensitivity(
    base: &ParameterRecord,
    efficiencies: &[Rate],
) -> BessFinanceResult<Vec<EfficiencyPoint>> {
    require_points("efficiencies", efficiencies)?;
    evaluate_each(efficiencies, |&efficiency| {
        let params = ParameterKey::Rte.with_value(base, efficiency);
        let result = run_model(&params)?;
        Ok(EfficiencyPoint {
            efficiency,
            year1_revenue: result.revenue.total_revenue[0],
            result,
        })
    })
}

/// Efficiency points around the base: -5%, base, +5% capped at 100%.
pub fn standard_efficiencies(base: &ParameterRecord) -> [Rate; 3] {
    [
        base.rte.saturating_mul(dec!(0.95)),
        base.rte,
        base.rte.saturating_mul(dec!(1.05)).min(Decimal::ONE),
    ]
}

/// Run every standard panel: price spread, CAPEX, efficiency, degradation
/// and the IRR tornado.
pub fn build_sensitivity_report(
    base: &ParameterRecord,
) -> BessFinanceResult<ComputationOutput<SensitivityReport>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let report = SensitivityReport {
        spread: run_spread_sensitivity(base, &STANDARD_MULTIPLIERS)?,
        capex: run_sensitivity(base, ParameterKey::Capex, &STANDARD_MULTIPLIERS)?,
        efficiency: run_efficiency_sensitivity(base, &standard_efficiencies(base))?,
        degradation: run_degradation_sensitivity(base, &STANDARD_DEGRADATION_RATES)?,
        tornado: run_tornado(base)?,
    };

    let unconverged = report
        .spread
        .iter()
        .map(|p| &p.result)
        .chain(report.capex.iter().map(|p| &p.result))
        .chain(report.efficiency.iter().map(|p| &p.result))
        .chain(report.degradation.iter().map(|p| &p.result))
        .filter(|r| !r.metrics.irr_converged)
        .count();
    if unconverged > 0 {
        warnings.push(format!(
            "{unconverged} sweep run(s) returned a non-converged project IRR"
        ));
    }
    if report.tornado.bars.iter().any(|b| !b.converged) {
        warnings.push("Tornado contains non-converged IRR values".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "One-at-a-time sensitivity panels with ±10% IRR tornado",
        &serde_json::json!({
            "spread_multipliers": STANDARD_MULTIPLIERS.map(|m| m.to_string()),
            "capex_multipliers": STANDARD_MULTIPLIERS.map(|m| m.to_string()),
            "efficiencies": standard_efficiencies(base).map(|e| e.to_string()),
            "degradation_rates": STANDARD_DEGRADATION_RATES.map(|r| r.to_string()),
            "tornado_low": report.tornado.low_multiplier.to_string(),
            "tornado_high": report.tornado.high_multiplier.to_string(),
        }),
        warnings,
        elapsed,
        report,
    ))
}

fn require_points(field: &str, points: &[Decimal]) -> BessFinanceResult<()> {
    if points.is_empty() {
        return Err(BessFinanceError::InvalidInput {
            field: field.into(),
            reason: "At least one sweep point is required".into(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{build_params, RawInputs};

    fn base() -> ParameterRecord {
        build_params(&RawInputs::default())
    }

    #[test]
    fn test_capex_sweep_orders_irr() {
        let points = run_sensitivity(&base(), ParameterKey::Capex, &STANDARD_MULTIPLIERS).unwrap();
        assert_eq!(points.len(), 3);
        assert_eq!(points[1].value, base().capex);
        // Cheaper project, higher return
        assert!(points[0].result.metrics.irr > points[1].result.metrics.irr);
        assert!(points[1].result.metrics.irr > points[2].result.metrics.irr);
    }

    #[test]
    fn test_base_multiplier_matches_base_run() {
        let b = base();
        let points = run_sensitivity(&b, ParameterKey::FixedOm, &[Decimal::ONE]).unwrap();
        let direct = run_model(&b).unwrap();
        assert_eq!(points[0].result.metrics.irr, direct.metrics.irr);
        assert_eq!(points[0].result.metrics.npv, direct.metrics.npv);
    }

    #[test]
    fn test_spread_reported() {
        let b = base();
        let points = run_spread_sensitivity(&b, &STANDARD_MULTIPLIERS).unwrap();
        assert_eq!(points[1].spread, b.discharge_price - b.charge_price);
        assert_eq!(points[2].spread, b.discharge_price * dec!(1.2) - b.charge_price);
    }

    #[test]
    fn test_degradation_year10_capacity() {
        let b = base();
        let points = run_degradation_sensitivity(&b, &[Decimal::ZERO, dec!(0.5)]).unwrap();
        assert_eq!(points[0].year10_capacity, b.capacity);
        assert_eq!(points[1].year10_capacity, b.capacity * dec!(0.001953125));
        assert_eq!(points[1].result.params.degradation, dec!(0.5));
    }

    #[test]
    fn test_runaway_degradation_sweep() {
        let mut b = base();
        b.project_life = 100;
        let rates = [dec!(1), dec!(3), dec!(100_000_000_000_000_000_000)];
        let points = run_degradation_sensitivity(&b, &rates).unwrap();
        assert_eq!(points[0].year10_capacity, Decimal::ZERO);
        assert_eq!(points[1].year10_capacity, b.capacity * dec!(-512));
        assert!(points[2].year10_capacity < Decimal::ZERO);
    }

    #[test]
    fn test_efficiency_caps_at_one() {
        let mut b = base();
        b.rte = dec!(0.98);
        let effs = standard_efficiencies(&b);
        assert_eq!(effs[2], Decimal::ONE);
        let points = run_efficiency_sensitivity(&b, &effs).unwrap();
        assert!(points[0].year1_revenue < points[2].year1_revenue);
    }

    #[test]
    fn test_empty_sweep_rejected() {
        assert!(run_sensitivity(&base(), ParameterKey::Capex, &[]).is_err());
    }

    #[test]
    fn test_report_has_all_panels() {
        let out = build_sensitivity_report(&base()).unwrap();
        let r = &out.result;
        assert_eq!(r.spread.len(), 3);
        assert_eq!(r.capex.len(), 3);
        assert_eq!(r.efficiency.len(), 3);
        assert_eq!(r.degradation.len(), 3);
        assert_eq!(r.tornado.bars.len(), 6);
    }
}
