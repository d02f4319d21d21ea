use bess_finance_core::time_value::{cash_flow_metrics, irr, npv, payback_period, solve_irr};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// NPV
// ===========================================================================

#[test]
fn test_npv_at_zero_is_sum() {
    let samples = [
        vec![dec!(-100), dec!(30), dec!(30), dec!(30), dec!(30), dec!(30)],
        vec![dec!(-5000), dec!(1200.5), dec!(-300), dec!(4100.25)],
        vec![dec!(42)],
        vec![],
    ];
    for flows in samples {
        let total: Decimal = flows.iter().sum();
        assert_eq!(npv(Decimal::ZERO, &flows).unwrap(), total);
    }
}

#[test]
fn test_annuity_npv_and_irr() {
    let flows = vec![dec!(-100), dec!(30), dec!(30), dec!(30), dec!(30), dec!(30)];
    assert_eq!(npv(Decimal::ZERO, &flows).unwrap(), dec!(50));
    let sol = irr(&flows);
    assert!(sol.converged);
    assert!(
        (sol.rate - dec!(0.152)).abs() < dec!(0.001),
        "Expected IRR ~15.2%, got {}",
        sol.rate
    );
}

// ===========================================================================
// IRR root property
// ===========================================================================

#[test]
fn test_npv_vanishes_at_irr() {
    let samples = [
        vec![dec!(-1000), dec!(400), dec!(400), dec!(400)],
        vec![dec!(-35_574_071), dec!(2_500_000), dec!(2_450_000), dec!(2_400_000), dec!(2_350_000),
             dec!(2_300_000), dec!(2_250_000), dec!(2_200_000), dec!(2_150_000), dec!(2_100_000),
             dec!(2_050_000), dec!(2_000_000), dec!(1_950_000), dec!(1_900_000), dec!(1_850_000),
             dec!(1_800_000), dec!(1_750_000), dec!(1_700_000), dec!(1_650_000), dec!(1_600_000),
             dec!(1_550_000)],
        vec![dec!(-100), dec!(0), dec!(0), dec!(300)],
        vec![dec!(-100), dec!(60)],
    ];
    for flows in samples {
        let sol = irr(&flows);
        assert!(sol.converged, "did not converge for {:?}", flows);
        let residual = npv(sol.rate, &flows).unwrap();
        assert!(residual.abs() < dec!(0.01), "residual {residual} at {}", sol.rate);
    }
}

#[test]
fn test_irr_without_sign_change_is_flagged() {
    let sol = irr(&[dec!(-100), dec!(-10), dec!(-10)]);
    assert!(!sol.converged);
    assert!(solve_irr(&[dec!(-100), dec!(-10), dec!(-10)]).is_err());
}

#[test]
fn test_solve_irr_matches_irr() {
    let flows = [dec!(-1000), dec!(400), dec!(400), dec!(400)];
    assert_eq!(solve_irr(&flows).unwrap(), irr(&flows).rate);
}

// ===========================================================================
// Payback
// ===========================================================================

#[test]
fn test_payback_never_recovered_is_length() {
    assert_eq!(payback_period(&[dec!(-100), dec!(-10), dec!(-10)]), dec!(3));
}

#[test]
fn test_payback_integer_crossing_is_exact() {
    let flows = [dec!(-90), dec!(30), dec!(30), dec!(30), dec!(30)];
    assert_eq!(payback_period(&flows), dec!(3));
}

#[test]
fn test_payback_interpolation() {
    let flows = [dec!(-100), dec!(30), dec!(30), dec!(30), dec!(30), dec!(30)];
    // 90 after three years, 10 of the fourth year's 30 needed
    let pb = payback_period(&flows);
    assert!((pb - dec!(3.3333333)).abs() < dec!(0.000001));
}

#[test]
fn test_metrics_bundle() {
    let m = cash_flow_metrics(dec!(0.10), &[dec!(-1000), dec!(300), dec!(400), dec!(500)]).unwrap();
    assert!((m.npv - dec!(-21.04)).abs() < dec!(0.01));
    assert_eq!(m.total_cash_flow, dec!(200));
    assert!(m.irr < dec!(0.10));
}
