use bess_finance_core::model::{model_from_inputs, model_storage_project, run_model};
use bess_finance_core::params::{build_params, RawInputs};
use bess_finance_core::{BessFinanceError, ParameterRecord};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn long_horizon(years: u32) -> ParameterRecord {
    let mut p = build_params(&RawInputs::default());
    p.project_life = years;
    p
}

fn is_saturated(v: Decimal) -> bool {
    v == Decimal::MAX || v == Decimal::MIN
}

// ===========================================================================
// Degradation at or above 100%
// ===========================================================================

#[test]
fn test_runaway_degradation_full_pipeline() {
    let mut p = long_horizon(100);
    p.degradation = dec!(3);
    let r = run_model(&p).unwrap();
    assert_eq!(r.energy.effective_capacity.len(), 100);
    assert!(is_saturated(r.energy.effective_capacity[99]));
    assert_eq!(r.cash_flows.project_cash_flows.len(), 101);
    assert_eq!(r.cash_flows.project_cash_flows[0], -p.capex);
}

#[test]
fn test_exhausted_capacity_full_pipeline() {
    let mut p = long_horizon(60);
    p.degradation = Decimal::ONE;
    let out = model_storage_project(&p).unwrap();
    let r = &out.result;
    assert!(r.energy.effective_capacity[1..].iter().all(|c| c.is_zero()));
    assert!(out.warnings.iter().any(|w| w.contains("exhausts capacity")));
}

// ===========================================================================
// Escalation compounding past Decimal range
// ===========================================================================

#[test]
fn test_runaway_inflation_full_pipeline() {
    let mut p = long_horizon(100);
    p.inflation_rate = Decimal::ONE;
    let out = model_storage_project(&p).unwrap();
    assert_eq!(out.result.opex.total_opex[99], Decimal::MAX);
    assert!(out.warnings.iter().any(|w| w.contains("Decimal limit")));
}

#[test]
fn test_runaway_ppa_escalation_full_pipeline() {
    let mut p = long_horizon(120);
    p.ppa_escalation = dec!(0.8);
    let r = run_model(&p).unwrap();
    assert_eq!(r.revenue.total_revenue[119], Decimal::MAX);
    assert!(r.metrics.npv > Decimal::ZERO);
}

#[cfg(feature = "sensitivity")]
#[test]
fn test_tornado_over_runaway_degradation() {
    use bess_finance_core::scenarios::run_tornado;

    let mut p = long_horizon(100);
    p.degradation = dec!(3);
    let out = run_tornado(&p).unwrap();
    assert_eq!(out.bars.len(), 6);
}

// ===========================================================================
// Project life bounds
// ===========================================================================

#[test]
fn test_oversized_record_life_rejected() {
    let p = long_horizon(4_000_000_000);
    assert!(matches!(
        run_model(&p),
        Err(BessFinanceError::InvalidInput { .. })
    ));
}

#[test]
fn test_oversized_raw_life_rejected_not_shortened() {
    let raw = RawInputs {
        project_life: dec!(5_000_000_000),
        ..RawInputs::default()
    };
    assert_eq!(build_params(&raw).project_life, u32::MAX);
    assert!(model_from_inputs(&raw).is_err());
}
