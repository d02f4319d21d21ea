use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::debt_schedule::DebtSchedule;
use super::income::IncomeStatement;
use crate::params::ParameterRecord;
use crate::types::{CashFlowVector, Money, YearSeries};

/// Unlevered (project) and levered (equity) cash flows.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowStatement {
    /// EBIT taxed as if the project were all-equity funded
    pub unlevered_net_income: YearSeries,
    pub unlevered_ocf: YearSeries,
    /// No recurring capex is modelled, so this equals unlevered OCF
    pub unlevered_fcf: YearSeries,
    /// `[-capex, unlevered_fcf..]`
    pub project_cash_flows: CashFlowVector,
    /// Running total of `project_cash_flows`, starting at `-capex`
    pub cumulative_cash_flows: CashFlowVector,
    pub levered_ocf: YearSeries,
    pub levered_fcf: YearSeries,
    /// `[-(capex - debt), levered_fcf..]`
    pub equity_cash_flows: CashFlowVector,
}

/// Initial equity cheque: the part of CAPEX not funded by debt.
pub fn equity_investment(p: &ParameterRecord) -> Money {
    p.capex.saturating_sub(p.debt_amount)
}

/// Build both cash flow views from the income statement and debt schedule.
pub fn build_cash_flows(
    p: &ParameterRecord,
    income: &IncomeStatement,
    debt: &DebtSchedule,
) -> CashFlowStatement {
    let after_tax = Decimal::ONE.saturating_sub(p.tax_rate);

    let unlevered_net_income: YearSeries = income
        .ebit
        .iter()
        .map(|ebit| ebit.saturating_mul(after_tax))
        .collect();
    let unlevered_ocf: YearSeries = unlevered_net_income
        .iter()
        .zip(&income.depreciation)
        .map(|(ni, dep)| ni.saturating_add(*dep))
        .collect();
    let unlevered_fcf = unlevered_ocf.clone();

    let project_cash_flows = prepend_outflow(-p.capex, &unlevered_fcf);
    let cumulative_cash_flows = project_cash_flows
        .iter()
        .scan(Decimal::ZERO, |running, cf| {
            *running = running.saturating_add(*cf);
            Some(*running)
        })
        .collect();

    let levered_ocf: YearSeries = income
        .net_income
        .iter()
        .zip(&income.depreciation)
        .map(|(ni, dep)| ni.saturating_add(*dep))
        .collect();
    let levered_fcf: YearSeries = levered_ocf
        .iter()
        .zip(&debt.principal)
        .map(|(ocf, principal)| ocf.saturating_sub(*principal))
        .collect();
    let equity_cash_flows = prepend_outflow(-equity_investment(p), &levered_fcf);

    CashFlowStatement {
        unlevered_net_income,
        unlevered_ocf,
        unlevered_fcf,
        project_cash_flows,
        cumulative_cash_flows,
        levered_ocf,
        levered_fcf,
        equity_cash_flows,
    }
}

fn prepend_outflow(initial: Money, annual: &[Money]) -> CashFlowVector {
    let mut flows = Vec::with_capacity(annual.len() + 1);
    flows.push(initial);
    flows.extend_from_slice(annual);
    flows
}
