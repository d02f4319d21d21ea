use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::BessFinanceError;
use crate::types::{saturating_sum, Money, Rate, Years};
use crate::BessFinanceResult;

pub const IRR_INITIAL_GUESS: Rate = dec!(0.1);
pub const MAX_IRR_ITERATIONS: u32 = 1000;
/// Stop once successive Newton steps move the rate by less than this.
pub const IRR_TOLERANCE: Decimal = dec!(0.00000001);
const MIN_DERIVATIVE: Decimal = dec!(0.000000000000001);

// Out-of-range iterates are re-seated rather than clamped to the bound.
const RATE_FLOOR: Rate = dec!(-0.99);
const RATE_CEILING: Rate = dec!(10);
const RESEAT_LOW: Rate = dec!(-0.5);
const RESEAT_HIGH: Rate = dec!(1);

/// Best-effort IRR with a convergence flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct IrrSolution {
    pub rate: Rate,
    pub converged: bool,
    pub iterations: u32,
}

/// Headline return metrics for a single cash flow vector.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashFlowMetrics {
    pub irr: Rate,
    pub irr_converged: bool,
    pub npv: Money,
    pub payback_years: Years,
    pub total_cash_flow: Money,
}

/// Net Present Value of a series of cash flows, index 0 undiscounted.
pub fn npv(rate: Rate, cash_flows: &[Money]) -> BessFinanceResult<Money> {
    if rate <= dec!(-1) {
        return Err(BessFinanceError::InvalidInput {
            field: "rate".into(),
            reason: "Discount rate must be greater than -100%".into(),
        });
    }

    let one_plus_r = Decimal::ONE.saturating_add(rate);
    let mut discount = Decimal::ONE;
    let mut result = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.saturating_mul(one_plus_r);
        }
        // A factor that underflows contributes nothing further.
        match cf.checked_div(discount) {
            Some(term) => result = result.saturating_add(term),
            None => break,
        }
    }

    Ok(result)
}

/// NPV and its derivative with respect to the rate, or `None` when a
/// discount factor leaves Decimal range.
fn npv_and_derivative(rate: Rate, cash_flows: &[Money]) -> Option<(Decimal, Decimal)> {
    let one_plus_r = Decimal::ONE.saturating_add(rate);
    let mut discount = Decimal::ONE;
    let mut npv_val = Decimal::ZERO;
    let mut dnpv = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        if t > 0 {
            discount = discount.checked_mul(one_plus_r)?;
        }
        npv_val = npv_val.checked_add(cf.checked_div(discount)?)?;
        if t > 0 {
            let t_dec = Decimal::from(t as u64);
            let denom = discount.checked_mul(one_plus_r)?;
            dnpv = dnpv.checked_sub(t_dec.checked_mul(*cf)?.checked_div(denom)?)?;
        }
    }

    Some((npv_val, dnpv))
}

/// Internal Rate of Return using Newton-Raphson from a 10% starting rate.
///
/// Always returns a rate. `converged` is false when the slope flattens,
/// Decimal range is exceeded, or the iteration limit is reached; the rate
/// is then the last iterate.
pub fn irr(cash_flows: &[Money]) -> IrrSolution {
    irr_with_guess(cash_flows, IRR_INITIAL_GUESS)
}

/// [`irr`] with an explicit starting rate.
pub fn irr_with_guess(cash_flows: &[Money], guess: Rate) -> IrrSolution {
    let mut rate = guess;

    for i in 0..MAX_IRR_ITERATIONS {
        let stalled = IrrSolution {
            rate,
            converged: false,
            iterations: i,
        };
        let Some((npv_val, dnpv)) = npv_and_derivative(rate, cash_flows) else {
            return stalled;
        };
        if dnpv.abs() < MIN_DERIVATIVE {
            return stalled;
        }
        let Some(step) = npv_val.checked_div(dnpv) else {
            return stalled;
        };

        let Some(new_rate) = rate.checked_sub(step) else {
            return stalled;
        };
        if (new_rate - rate).abs() < IRR_TOLERANCE {
            return IrrSolution {
                rate: new_rate,
                converged: true,
                iterations: i + 1,
            };
        }

        rate = new_rate;
        if rate < RATE_FLOOR {
            rate = RESEAT_LOW;
        }
        if rate > RATE_CEILING {
            rate = RESEAT_HIGH;
        }
    }

    IrrSolution {
        rate,
        converged: false,
        iterations: MAX_IRR_ITERATIONS,
    }
}

/// Strict IRR: fails instead of returning a non-converged rate.
pub fn solve_irr(cash_flows: &[Money]) -> BessFinanceResult<Rate> {
    if cash_flows.len() < 2 {
        return Err(BessFinanceError::InsufficientData(
            "IRR requires at least 2 cash flows".into(),
        ));
    }

    let solution = irr(cash_flows);
    if solution.converged {
        Ok(solution.rate)
    } else {
        Err(BessFinanceError::ConvergenceFailure {
            function: "IRR".into(),
            iterations: solution.iterations,
            last_delta: npv(solution.rate, cash_flows).unwrap_or(Decimal::MAX),
        })
    }
}

/// Years until cumulative cash flow turns non-negative, interpolated
/// linearly inside the crossing year.
///
/// Returns `cash_flows.len()` when the investment is never recovered.
pub fn payback_period(cash_flows: &[Money]) -> Years {
    let mut cumulative = Decimal::ZERO;

    for (t, cf) in cash_flows.iter().enumerate() {
        let previous = cumulative;
        cumulative = cumulative.saturating_add(*cf);
        if t > 0 && cumulative >= Decimal::ZERO {
            if *cf > Decimal::ZERO {
                let fraction = (-previous).checked_div(*cf).unwrap_or(Decimal::ONE);
                return Decimal::from(t as u64 - 1) + fraction.min(Decimal::ONE);
            }
            return Decimal::from(t as u64);
        }
    }

    Decimal::from(cash_flows.len() as u64)
}

/// IRR, NPV, payback and undiscounted total for an ad-hoc cash flow vector.
pub fn cash_flow_metrics(rate: Rate, cash_flows: &[Money]) -> BessFinanceResult<CashFlowMetrics> {
    let solution = irr(cash_flows);
    Ok(CashFlowMetrics {
        irr: solution.rate,
        irr_converged: solution.converged,
        npv: npv(rate, cash_flows)?,
        payback_years: payback_period(cash_flows),
        total_cash_flow: saturating_sum(cash_flows),
    })
}
