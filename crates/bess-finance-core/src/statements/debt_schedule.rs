use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::params::ParameterRecord;
use crate::types::*;

/// Terms of the single amortising project loan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtTerms {
    pub amount: Money,
    pub rate: Rate,
    /// Repayment period in whole years; must be at least 1
    pub term_years: u32,
}

impl DebtTerms {
    pub fn from_params(p: &ParameterRecord) -> Self {
        DebtTerms {
            amount: p.debt_amount,
            rate: p.debt_rate,
            term_years: p.loan_term,
        }
    }

    /// Equal principal instalment repaid each year of the term.
    pub fn annual_principal(&self) -> Money {
        self.amount / Decimal::from(self.term_years.max(1))
    }
}

/// Year-by-year loan balances. Interest accrues on the opening balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DebtSchedule {
    pub opening_balance: YearSeries,
    pub principal: YearSeries,
    pub interest: YearSeries,
    pub closing_balance: YearSeries,
    pub total_interest_paid: Money,
    pub total_principal_paid: Money,
}

/// Build a straight-line amortisation schedule over `years` project years.
///
/// Principal stops after `term_years` or once the balance is cleared,
/// whichever comes first; a cleared loan carries no further interest.
pub fn build_debt_schedule(terms: &DebtTerms, years: usize) -> DebtSchedule {
    let annual_principal = terms.annual_principal();
    let term = terms.term_years as usize;

    let mut opening_balance = Vec::with_capacity(years);
    let mut principal = Vec::with_capacity(years);
    let mut interest = Vec::with_capacity(years);
    let mut closing_balance: YearSeries = Vec::with_capacity(years);

    for y in 0..years {
        let opening = match y {
            0 => terms.amount,
            _ if closing_balance[y - 1] > Decimal::ZERO => closing_balance[y - 1],
            _ => Decimal::ZERO,
        };
        let repayment = if opening > Decimal::ZERO && y < term {
            annual_principal.min(opening)
        } else {
            Decimal::ZERO
        };

        opening_balance.push(opening);
        principal.push(repayment);
        interest.push(opening.saturating_mul(terms.rate));
        closing_balance.push(opening - repayment);
    }

    DebtSchedule {
        total_interest_paid: saturating_sum(&interest),
        total_principal_paid: saturating_sum(&principal),
        opening_balance,
        principal,
        interest,
        closing_balance,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn terms(amount: Money, term_years: u32) -> DebtTerms {
        DebtTerms {
            amount,
            rate: dec!(0.05),
            term_years,
        }
    }

    #[test]
    fn test_straight_line_schedule() {
        let sched = build_debt_schedule(&terms(dec!(1000), 5), 8);
        assert_eq!(sched.principal[0], dec!(200));
        assert_eq!(sched.interest[0], dec!(50));
        assert_eq!(sched.closing_balance[0], dec!(800));
        assert_eq!(sched.opening_balance[1], dec!(800));
        assert_eq!(sched.interest[1], dec!(40));
        assert_eq!(sched.closing_balance[4], Decimal::ZERO);
        assert_eq!(sched.total_principal_paid, dec!(1000));
        // 50 + 40 + 30 + 20 + 10
        assert_eq!(sched.total_interest_paid, dec!(150));
    }

    #[test]
    fn test_no_activity_after_term() {
        let sched = build_debt_schedule(&terms(dec!(1000), 5), 8);
        for y in 5..8 {
            assert_eq!(sched.opening_balance[y], Decimal::ZERO);
            assert_eq!(sched.principal[y], Decimal::ZERO);
            assert_eq!(sched.interest[y], Decimal::ZERO);
        }
    }

    #[test]
    fn test_term_longer_than_project_leaves_balance() {
        let sched = build_debt_schedule(&terms(dec!(1000), 10), 5);
        assert_eq!(sched.closing_balance[4], dec!(500));
        assert_eq!(sched.total_principal_paid, dec!(500));
    }

    #[test]
    fn test_zero_debt() {
        let sched = build_debt_schedule(&terms(Decimal::ZERO, 3), 5);
        assert!(sched.principal.iter().all(|v| v.is_zero()));
        assert!(sched.interest.iter().all(|v| v.is_zero()));
        assert_eq!(sched.total_interest_paid, Decimal::ZERO);
    }

    #[test]
    fn test_extreme_rate_saturates_interest() {
        let sched = build_debt_schedule(
            &DebtTerms {
                amount: Decimal::MAX,
                rate: dec!(2),
                term_years: 100,
            },
            3,
        );
        assert_eq!(sched.interest[0], Decimal::MAX);
        assert_eq!(sched.total_interest_paid, Decimal::MAX);
    }

    #[test]
    fn test_uneven_instalment_clears_exactly() {
        let sched = build_debt_schedule(&terms(dec!(100), 3), 5);
        assert!(sched.closing_balance[2].abs() < dec!(0.0000001));
        assert_eq!(sched.principal[3], Decimal::ZERO);
    }
}
