use serde::{Deserialize, Serialize};

use crate::params::ParameterRecord;
use crate::types::YearSeries;

/// Year-by-year usable capacity and energy throughput.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnergyProjection {
    /// Capacity after degradation, MWh
    pub effective_capacity: YearSeries,
    /// Energy drawn from the grid, MWh
    pub energy_charged: YearSeries,
    /// Energy delivered after round-trip losses, MWh
    pub energy_sold: YearSeries,
}

/// Compound degradation from the nameplate capacity and derive energy flows.
///
/// Year 1 runs at full capacity. Degradation is not clamped, so a rate of
/// 1 or more drives capacity to zero or below.
pub fn project_energy(p: &ParameterRecord) -> EnergyProjection {
    let n = p.project_life as usize;
    let retention = rust_decimal::Decimal::ONE.saturating_sub(p.degradation);

    let mut effective_capacity = Vec::with_capacity(n);
    let mut capacity = p.capacity;
    for _ in 0..n {
        effective_capacity.push(capacity);
        capacity = capacity.saturating_mul(retention);
    }

    let energy_charged: YearSeries = effective_capacity
        .iter()
        .map(|cap| cap.saturating_mul(p.arb_days).saturating_mul(p.availability))
        .collect();
    let energy_sold = energy_charged
        .iter()
        .map(|ec| ec.saturating_mul(p.rte))
        .collect();

    EnergyProjection {
        effective_capacity,
        energy_charged,
        energy_sold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::{build_params, RawInputs};
    use rust_decimal::Decimal;
    use rust_decimal::MathematicalOps;
    use rust_decimal_macros::dec;

    fn record(degradation: Decimal) -> ParameterRecord {
        let mut p = build_params(&RawInputs::default());
        p.capacity = dec!(10);
        p.arb_days = dec!(300);
        p.availability = dec!(0.95);
        p.rte = dec!(0.9);
        p.degradation = degradation;
        p.project_life = 10;
        p
    }

    #[test]
    fn test_zero_degradation_is_flat() {
        let e = project_energy(&record(Decimal::ZERO));
        assert_eq!(e.effective_capacity.len(), 10);
        assert!(e.effective_capacity.iter().all(|c| *c == dec!(10)));
    }

    #[test]
    fn test_degradation_compounds() {
        let d = dec!(0.025);
        let e = project_energy(&record(d));
        for (y, cap) in e.effective_capacity.iter().enumerate() {
            let expected = dec!(10) * (Decimal::ONE - d).powi(y as i64);
            assert!((cap - expected).abs() < dec!(0.0000000001), "year {y}");
        }
    }

    #[test]
    fn test_energy_chain() {
        let e = project_energy(&record(Decimal::ZERO));
        // 10 * 300 * 0.95 = 2850 charged, 2565 sold
        assert_eq!(e.energy_charged[0], dec!(2850));
        assert_eq!(e.energy_sold[0], dec!(2565));
    }

    #[test]
    fn test_full_degradation_not_clamped() {
        let e = project_energy(&record(dec!(1.5)));
        assert_eq!(e.effective_capacity[1], dec!(-5));
        assert_eq!(e.effective_capacity[2], dec!(2.5));
    }

    #[test]
    fn test_runaway_degradation_saturates() {
        let mut p = record(dec!(3));
        p.project_life = 100;
        let e = project_energy(&p);
        assert_eq!(e.effective_capacity.len(), 100);
        assert_eq!(e.effective_capacity[1], dec!(-20));
        // (-2)^99 leaves Decimal range on the negative side
        assert_eq!(e.effective_capacity[99], Decimal::MIN);
        assert!(e.energy_sold[99] < Decimal::ZERO);
    }
}
