use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::BessFinanceError;
use crate::params::builder::{MAX_PROJECT_LIFE, MIN_PROJECT_LIFE};
use crate::params::{build_params, ParameterRecord, RawInputs};
use crate::projection::{build_opex, build_revenue, project_energy};
use crate::projection::{EnergyProjection, OpexSchedule, RevenueSchedule};
use crate::statements::{build_cash_flows, build_debt_schedule, build_income_statement};
use crate::statements::{CashFlowStatement, DebtSchedule, DebtTerms, IncomeStatement};
use crate::time_value::{irr, npv, payback_period};
use crate::types::*;
use crate::BessFinanceResult;

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// Headline project and equity returns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Unlevered project IRR
    pub irr: Rate,
    pub irr_converged: bool,
    /// Project NPV at the record's discount rate
    pub npv: Money,
    /// Years to recover CAPEX from unlevered cash flow
    pub payback: Years,
    /// Levered equity IRR
    pub equity_irr: Rate,
    pub equity_irr_converged: bool,
    pub equity_npv: Money,
}

/// Full model output for one parameter record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelResult {
    /// Number of project years
    pub years: u32,
    /// Year labels 1..=years
    pub year_labels: Vec<u32>,
    pub energy: EnergyProjection,
    pub revenue: RevenueSchedule,
    pub opex: OpexSchedule,
    pub income: IncomeStatement,
    pub debt: DebtSchedule,
    pub cash_flows: CashFlowStatement,
    pub metrics: InvestmentMetrics,
    /// The record this result was derived from
    pub params: ParameterRecord,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Run the full pipeline: energy, revenue, opex, debt, income statement,
/// cash flows and return metrics.
///
/// Pure and deterministic. Fails only on records whose durations are zero,
/// whose project life exceeds [`MAX_PROJECT_LIFE`], or whose discount rate
/// is at or below -100%. Values that leave Decimal range saturate.
pub fn run_model(params: &ParameterRecord) -> BessFinanceResult<ModelResult> {
    validate_record(params)?;

    let n = params.project_life as usize;

    let energy = project_energy(params);
    let revenue = build_revenue(params, &energy);
    let opex = build_opex(params);
    let debt = build_debt_schedule(&DebtTerms::from_params(params), n);
    let income = build_income_statement(params, &revenue, &opex, &debt);
    let cash_flows = build_cash_flows(params, &income, &debt);

    let project = irr(&cash_flows.project_cash_flows);
    let equity = irr(&cash_flows.equity_cash_flows);

    let metrics = InvestmentMetrics {
        irr: project.rate,
        irr_converged: project.converged,
        npv: npv(params.discount_rate, &cash_flows.project_cash_flows)?,
        payback: payback_period(&cash_flows.project_cash_flows),
        equity_irr: equity.rate,
        equity_irr_converged: equity.converged,
        equity_npv: npv(params.discount_rate, &cash_flows.equity_cash_flows)?,
    };

    Ok(ModelResult {
        years: params.project_life,
        year_labels: (1..=params.project_life).collect(),
        energy,
        revenue,
        opex,
        income,
        debt,
        cash_flows,
        metrics,
        params: params.clone(),
    })
}

/// Run the model and wrap the result with methodology, assumptions and
/// warnings.
pub fn model_storage_project(
    params: &ParameterRecord,
) -> BessFinanceResult<ComputationOutput<ModelResult>> {
    let start = Instant::now();

    let result = run_model(params)?;
    let warnings = collect_warnings(&result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Battery Storage Project Finance Model (straight-line depreciation, straight-line debt)",
        &serde_json::json!({
            "capacity_mwh": params.capacity.to_string(),
            "project_life": params.project_life,
            "capex": params.capex.to_string(),
            "debt_amount": params.debt_amount.to_string(),
            "loan_term": params.loan_term,
            "tax_rate": params.tax_rate.to_string(),
            "discount_rate": params.discount_rate.to_string(),
            "insurance_inflates": false,
            "variable_om_basis": "nameplate throughput",
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Normalise user-facing inputs and run the enveloped model.
pub fn model_from_inputs(inputs: &RawInputs) -> BessFinanceResult<ComputationOutput<ModelResult>> {
    model_storage_project(&build_params(inputs))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_record(p: &ParameterRecord) -> BessFinanceResult<()> {
    if p.project_life == 0 {
        return Err(BessFinanceError::InvalidInput {
            field: "project_life".into(),
            reason: "Project life must be at least 1 year".into(),
        });
    }
    if p.project_life > MAX_PROJECT_LIFE {
        return Err(BessFinanceError::InvalidInput {
            field: "project_life".into(),
            reason: format!(
                "Project life of {} years exceeds the {MAX_PROJECT_LIFE}-year maximum",
                p.project_life
            ),
        });
    }
    if p.loan_term == 0 {
        return Err(BessFinanceError::InvalidInput {
            field: "loan_term".into(),
            reason: "Loan term must be at least 1 year".into(),
        });
    }
    if p.discount_rate <= dec!(-1) {
        return Err(BessFinanceError::InvalidInput {
            field: "discount_rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

fn collect_warnings(result: &ModelResult) -> Vec<String> {
    let p = &result.params;
    let m = &result.metrics;
    let mut warnings = Vec::new();

    if p.project_life < MIN_PROJECT_LIFE {
        warnings.push(format!(
            "Project life of {} years is below the {MIN_PROJECT_LIFE}-year minimum applied to user inputs",
            p.project_life
        ));
    }
    if p.degradation >= Decimal::ONE {
        warnings.push(format!(
            "Degradation of {} per year exhausts capacity after the first year",
            p.degradation
        ));
    }
    if p.discharge_price.saturating_mul(p.rte) < p.charge_price {
        warnings.push(format!(
            "Arbitrage spread is negative: discharge {} x RTE {} < charge {}",
            p.discharge_price, p.rte, p.charge_price
        ));
    }
    if p.debt_amount > p.capex {
        warnings.push(format!(
            "Debt ({}) exceeds CAPEX ({}); equity outflow at year 0 is positive",
            p.debt_amount, p.capex
        ));
    }
    if !m.irr_converged {
        warnings.push(format!(
            "Project IRR did not converge; {} is the last iterate",
            m.irr
        ));
    }
    if !m.equity_irr_converged {
        warnings.push(format!(
            "Equity IRR did not converge; {} is the last iterate",
            m.equity_irr
        ));
    }
    if m.payback >= Decimal::from(result.cash_flows.project_cash_flows.len() as u64) {
        warnings.push("CAPEX is not recovered within the project life".into());
    }
    let saturated = result
        .revenue
        .total_revenue
        .iter()
        .chain(&result.opex.total_opex)
        .chain(&result.cash_flows.project_cash_flows)
        .chain(&result.cash_flows.equity_cash_flows)
        .any(|v| is_saturated(*v));
    if saturated {
        warnings.push(
            "Some values left the representable range and were capped at the Decimal limit".into(),
        );
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::RawInputs;

    #[test]
    fn test_default_project_runs() {
        let out = model_from_inputs(&RawInputs::default()).unwrap();
        let r = &out.result;
        assert_eq!(r.years, 20);
        assert_eq!(r.year_labels.first(), Some(&1));
        assert_eq!(r.year_labels.last(), Some(&20));
        assert_eq!(r.revenue.total_revenue.len(), 20);
        assert_eq!(r.cash_flows.project_cash_flows.len(), 21);
    }

    #[test]
    fn test_npv_is_undiscounted_total_by_default() {
        let r = run_model(&build_params(&RawInputs::default())).unwrap();
        let total: Decimal = r.cash_flows.project_cash_flows.iter().sum();
        assert_eq!(r.metrics.npv, total);
    }

    #[test]
    fn test_zero_life_rejected() {
        let mut p = build_params(&RawInputs::default());
        p.project_life = 0;
        assert!(run_model(&p).is_err());
    }

    #[test]
    fn test_zero_loan_term_rejected() {
        let mut p = build_params(&RawInputs::default());
        p.loan_term = 0;
        assert!(run_model(&p).is_err());
    }

    #[test]
    fn test_excessive_life_rejected() {
        let mut p = build_params(&RawInputs::default());
        p.project_life = 4_000_000_000;
        assert!(matches!(
            run_model(&p),
            Err(BessFinanceError::InvalidInput { ref field, .. }) if field == "project_life"
        ));
        p.project_life = MAX_PROJECT_LIFE;
        assert!(run_model(&p).is_ok());
    }

    #[test]
    fn test_saturation_warns() {
        let mut p = build_params(&RawInputs::default());
        p.inflation_rate = dec!(1);
        p.project_life = 100;
        let out = model_storage_project(&p).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Decimal limit")));
    }

    #[test]
    fn test_short_life_warns() {
        let mut p = build_params(&RawInputs::default());
        p.project_life = 3;
        let out = model_storage_project(&p).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("Project life")));
    }

    #[test]
    fn test_negative_spread_warns() {
        let raw = RawInputs {
            discharge_price_kwh: dec!(2),
            ..RawInputs::default()
        };
        let out = model_from_inputs(&raw).unwrap();
        assert!(out.warnings.iter().any(|w| w.contains("spread is negative")));
    }

    #[test]
    fn test_discounting_lowers_npv() {
        let mut p = build_params(&RawInputs::default());
        let undiscounted = run_model(&p).unwrap().metrics.npv;
        p.discount_rate = dec!(0.08);
        let discounted = run_model(&p).unwrap().metrics.npv;
        assert!(discounted < undiscounted);
    }
}
