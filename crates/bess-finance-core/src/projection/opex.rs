use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::params::ParameterRecord;
use crate::types::{compounding_series, Energy, YearSeries};

/// Operating expenses by line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpexSchedule {
    pub insurance: YearSeries,
    pub variable_om: YearSeries,
    pub fixed_om: YearSeries,
    pub total_opex: YearSeries,
}

/// Nameplate throughput in MWh per year: capacity x cycles/day x 365.
pub fn annual_throughput(p: &ParameterRecord) -> Energy {
    p.capacity
        .saturating_mul(p.cycles_per_day)
        .saturating_mul(dec!(365))
}

/// Build the operating-cost lines for every project year.
///
/// Insurance and variable O&M are flat; variable O&M is charged on
/// nameplate throughput, not degraded capacity. Fixed O&M, admin and
/// preventive maintenance inflate together from year 1.
pub fn build_opex(p: &ParameterRecord) -> OpexSchedule {
    let n = p.project_life as usize;

    let insurance = vec![p.capex.saturating_mul(p.insurance_rate); n];
    let variable_om = vec![annual_throughput(p).saturating_mul(p.var_om_rate); n];
    let fixed_base = p
        .fixed_om
        .saturating_add(p.admin_cost)
        .saturating_add(p.preventive_maintenance);
    let fixed_om = compounding_series(fixed_base, p.inflation_rate, n);

    let total_opex = (0..n)
        .map(|y| {
            insurance[y]
                .saturating_add(variable_om[y])
                .saturating_add(fixed_om[y])
        })
        .collect();

    OpexSchedule {
        insurance,
        variable_om,
        fixed_om,
        total_opex,
    }
}
