use serde::{Deserialize, Serialize};

use super::energy::EnergyProjection;
use crate::params::ParameterRecord;
use crate::types::{compounding_series, YearSeries};

/// Annual revenue by stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevenueSchedule {
    /// Energy sold x discharge price
    pub sell_revenue: YearSeries,
    /// Energy charged x charge price
    pub charge_cost: YearSeries,
    /// Sell revenue net of charge cost; negative when the spread is negative
    pub arbitrage_revenue: YearSeries,
    pub ppa_revenue: YearSeries,
    pub ancillary_revenue: YearSeries,
    pub other_revenue: YearSeries,
    pub total_revenue: YearSeries,
}

/// Build the four revenue streams for every project year.
///
/// PPA revenue escalates by `(1 + ppa_escalation)^y` with `y` the zero-based
/// year index, so year 1 is billed at the base price.
pub fn build_revenue(p: &ParameterRecord, energy: &EnergyProjection) -> RevenueSchedule {
    let n = p.project_life as usize;

    let sell_revenue: YearSeries = energy
        .energy_sold
        .iter()
        .map(|es| es.saturating_mul(p.discharge_price))
        .collect();
    let charge_cost: YearSeries = energy
        .energy_charged
        .iter()
        .map(|ec| ec.saturating_mul(p.charge_price))
        .collect();
    let arbitrage_revenue: YearSeries = sell_revenue
        .iter()
        .zip(&charge_cost)
        .map(|(sell, charge)| sell.saturating_sub(*charge))
        .collect();

    let ppa_revenue = compounding_series(
        p.ppa_volume.saturating_mul(p.ppa_price),
        p.ppa_escalation,
        n,
    );
    let ancillary_revenue = vec![p.ancillary_revenue; n];
    let other_revenue = vec![p.other_revenue; n];

    let total_revenue = (0..n)
        .map(|y| {
            arbitrage_revenue[y]
                .saturating_add(ppa_revenue[y])
                .saturating_add(ancillary_revenue[y])
                .saturating_add(other_revenue[y])
        })
        .collect();

    RevenueSchedule {
        sell_revenue,
        charge_cost,
        arbitrage_revenue,
        ppa_revenue,
        ancillary_revenue,
        other_revenue,
        total_revenue,
    }
}
