use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::evaluate_each;
use crate::model::run_model;
use crate::params::{ParameterKey, ParameterRecord};
use crate::types::Rate;
use crate::BessFinanceResult;

/// Parameters shown on the standard IRR tornado.
pub const TORNADO_PARAMETERS: [ParameterKey; 6] = [
    ParameterKey::DischargePrice,
    ParameterKey::ChargePrice,
    ParameterKey::Capex,
    ParameterKey::Capacity,
    ParameterKey::FixedOm,
    ParameterKey::PpaPrice,
];

pub const TORNADO_LOW: Decimal = dec!(0.9);
pub const TORNADO_HIGH: Decimal = dec!(1.1);

const PERCENTAGE_POINTS: Decimal = dec!(100);

/// IRR response of one parameter to a symmetric perturbation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TornadoBar {
    pub parameter: ParameterKey,
    pub label: String,
    pub base_irr: Rate,
    pub irr_low: Rate,
    pub irr_high: Rate,
    /// (irr_low - base_irr) in percentage points
    pub delta_low_pp: Decimal,
    /// (irr_high - base_irr) in percentage points
    pub delta_high_pp: Decimal,
    /// |delta_high_pp - delta_low_pp|, the ranking key
    pub range_pp: Decimal,
    /// Both perturbed runs converged
    pub converged: bool,
}

/// Tornado bars ranked by descending range.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TornadoOutput {
    pub base_irr: Rate,
    pub low_multiplier: Decimal,
    pub high_multiplier: Decimal,
    pub bars: Vec<TornadoBar>,
}

/// Standard ±10% IRR tornado over [`TORNADO_PARAMETERS`].
pub fn run_tornado(base: &ParameterRecord) -> BessFinanceResult<TornadoOutput> {
    run_tornado_with(base, &TORNADO_PARAMETERS, TORNADO_LOW, TORNADO_HIGH)
}

/// IRR tornado for arbitrary parameters and multipliers.
///
/// Ties in range keep the order of `keys`.
pub fn run_tornado_with(
    base: &ParameterRecord,
    keys: &[ParameterKey],
    low: Decimal,
    high: Decimal,
) -> BessFinanceResult<TornadoOutput> {
    let base_irr = run_model(base)?.metrics.irr;

    let mut bars = evaluate_each(keys, |&key| {
        let low_run = run_model(&key.scaled(base, low))?.metrics;
        let high_run = run_model(&key.scaled(base, high))?.metrics;

        let delta_low_pp = (low_run.irr - base_irr) * PERCENTAGE_POINTS;
        let delta_high_pp = (high_run.irr - base_irr) * PERCENTAGE_POINTS;
        Ok(TornadoBar {
            parameter: key,
            label: key.label().to_string(),
            base_irr,
            irr_low: low_run.irr,
            irr_high: high_run.irr,
            delta_low_pp,
            delta_high_pp,
            range_pp: (delta_high_pp - delta_low_pp).abs(),
            converged: low_run.irr_converged && high_run.irr_converged,
        })
    })?;

    bars.sort_by(|a, b| b.range_pp.cmp(&a.range_pp));

    Ok(TornadoOutput {
        base_irr,
        low_multiplier: low,
        high_multiplier: high,
        bars,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{build_params, RawInputs};

    #[test]
    fn test_bars_ranked_by_range() {
        let out = run_tornado(&build_params(&RawInputs::default())).unwrap();
        assert_eq!(out.bars.len(), 6);
        for pair in out.bars.windows(2) {
            assert!(pair[0].range_pp >= pair[1].range_pp);
        }
    }

    #[test]
    fn test_capex_bar_direction() {
        let out = run_tornado(&build_params(&RawInputs::default())).unwrap();
        let capex = out
            .bars
            .iter()
            .find(|b| b.parameter == ParameterKey::Capex)
            .unwrap();
        assert!(capex.irr_low > capex.base_irr);
        assert!(capex.irr_high < capex.base_irr);
        assert_eq!(capex.label, "CAPEX");
    }

    #[test]
    fn test_insensitive_parameter_is_flat() {
        let mut base = build_params(&RawInputs::default());
        base.admin_cost = Decimal::ZERO;
        let out = run_tornado_with(&base, &[ParameterKey::AdminCost], TORNADO_LOW, TORNADO_HIGH)
            .unwrap();
        let bar = &out.bars[0];
        assert_eq!(bar.irr_low, bar.base_irr);
        assert_eq!(bar.irr_high, bar.base_irr);
        assert_eq!(bar.range_pp, Decimal::ZERO);
    }
}
