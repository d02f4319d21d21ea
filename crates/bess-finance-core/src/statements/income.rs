use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::debt_schedule::DebtSchedule;
use crate::params::ParameterRecord;
use crate::projection::{OpexSchedule, RevenueSchedule};
use crate::types::YearSeries;

/// Levered income statement, one entry per project year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomeStatement {
    pub ebitda: YearSeries,
    pub depreciation: YearSeries,
    pub ebit: YearSeries,
    pub interest: YearSeries,
    pub ebt: YearSeries,
    /// Tax on positive EBT only; losses are not carried forward
    pub tax: YearSeries,
    pub net_income: YearSeries,
}

/// Build the income statement from revenue, opex and debt interest.
///
/// CAPEX depreciates straight-line over the full project life.
pub fn build_income_statement(
    p: &ParameterRecord,
    revenue: &RevenueSchedule,
    opex: &OpexSchedule,
    debt: &DebtSchedule,
) -> IncomeStatement {
    let n = p.project_life as usize;
    let annual_depreciation = p.capex / Decimal::from(p.project_life.max(1));

    let mut statement = IncomeStatement {
        ebitda: Vec::with_capacity(n),
        depreciation: vec![annual_depreciation; n],
        ebit: Vec::with_capacity(n),
        interest: debt.interest.clone(),
        ebt: Vec::with_capacity(n),
        tax: Vec::with_capacity(n),
        net_income: Vec::with_capacity(n),
    };

    for y in 0..n {
        let ebitda = revenue.total_revenue[y].saturating_sub(opex.total_opex[y]);
        let ebit = ebitda.saturating_sub(annual_depreciation);
        let ebt = ebit.saturating_sub(debt.interest[y]);
        let tax = if ebt > Decimal::ZERO {
            ebt.saturating_mul(p.tax_rate)
        } else {
            Decimal::ZERO
        };

        statement.ebitda.push(ebitda);
        statement.ebit.push(ebit);
        statement.ebt.push(ebt);
        statement.tax.push(tax);
        statement.net_income.push(ebt.saturating_sub(tax));
    }

    statement
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{build_params, RawInputs};
    use crate::projection::{build_opex, build_revenue, project_energy};
    use crate::statements::debt_schedule::{build_debt_schedule, DebtTerms};
    use rust_decimal_macros::dec;

    fn statement_for(p: &ParameterRecord) -> IncomeStatement {
        let energy = project_energy(p);
        let revenue = build_revenue(p, &energy);
        let opex = build_opex(p);
        let debt = build_debt_schedule(&DebtTerms::from_params(p), p.project_life as usize);
        build_income_statement(p, &revenue, &opex, &debt)
    }

    #[test]
    fn test_depreciation_every_year() {
        let mut p = build_params(&RawInputs::default());
        p.capex = dec!(1_000_000);
        p.project_life = 8;
        let is = statement_for(&p);
        assert_eq!(is.depreciation.len(), 8);
        assert!(is.depreciation.iter().all(|d| *d == dec!(125_000)));
    }

    #[test]
    fn test_cascade_identities() {
        let p = build_params(&RawInputs::default());
        let is = statement_for(&p);
        for y in 0..p.project_life as usize {
            assert_eq!(is.ebit[y], is.ebitda[y] - is.depreciation[y]);
            assert_eq!(is.ebt[y], is.ebit[y] - is.interest[y]);
            assert_eq!(is.net_income[y], is.ebt[y] - is.tax[y]);
        }
    }

    #[test]
    fn test_losses_not_taxed() {
        let mut p = build_params(&RawInputs::default());
        p.discharge_price = Decimal::ZERO;
        p.ppa_volume = Decimal::ZERO;
        let is = statement_for(&p);
        assert!(is.ebt.iter().all(|v| *v < Decimal::ZERO));
        assert!(is.tax.iter().all(|v| v.is_zero()));
        assert_eq!(is.net_income, is.ebt);
    }

    #[test]
    fn test_positive_ebt_taxed() {
        let mut p = build_params(&RawInputs::default());
        p.debt_amount = Decimal::ZERO;
        p.capex = dec!(100);
        p.ppa_volume = dec!(1000);
        p.ppa_price = dec!(10_000);
        let is = statement_for(&p);
        assert!(is.ebt[0] > Decimal::ZERO);
        assert_eq!(is.tax[0], is.ebt[0] * p.tax_rate);
    }
}
