use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::record::ParameterRecord;
use crate::types::{Energy, Money, Rate};

/// Minimum project life in years after rounding.
pub const MIN_PROJECT_LIFE: u32 = 5;

/// Minimum loan term in years after rounding.
pub const MIN_LOAN_TERM: u32 = 1;

/// Longest project life the model will project.
pub const MAX_PROJECT_LIFE: u32 = 1_000;

const KWH_PER_MWH: Decimal = dec!(1000);

// ---------------------------------------------------------------------------
// Raw (user-facing) inputs
// ---------------------------------------------------------------------------

/// Inputs as a user enters them: percentages as percentages, energy prices
/// per kWh. Missing fields fall back to [`RawInputs::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawInputs {
    // Technical
    /// Usable capacity in MWh
    pub capacity: Energy,
    pub arb_days: Decimal,
    /// Availability in percent
    pub availability_pct: Decimal,
    /// Round-trip efficiency in percent
    pub rte_pct: Decimal,
    pub cycles_per_day: Decimal,

    // Energy pricing, per kWh
    pub charge_price_kwh: Money,
    pub discharge_price_kwh: Money,

    // Revenue
    /// PPA tariff per kWh, used to derive the per-MWh PPA price
    pub ppa_rate_kwh: Money,
    /// Explicit PPA volume (MWh/yr); derived from the technical inputs when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppa_volume: Option<Energy>,
    /// Explicit PPA unit price per MWh; derived from `ppa_rate_kwh` when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ppa_price: Option<Money>,
    pub ppa_escalation_pct: Decimal,
    pub ancillary: Money,
    pub other_revenue: Money,

    // Cost & investment
    pub capex: Money,
    pub insurance_pct: Decimal,
    /// Variable O&M per MWh of throughput
    pub var_om: Money,
    pub fixed_om: Money,
    pub admin_cost: Money,
    pub preventive_maintenance: Money,
    pub inflation_pct: Decimal,
    pub project_life: Decimal,
    pub degradation_pct: Decimal,

    // Debt
    pub debt_amount: Money,
    pub debt_rate_pct: Decimal,
    pub loan_term: Decimal,

    pub tax_rate_pct: Decimal,
}

impl Default for RawInputs {
    fn default() -> Self {
        RawInputs {
            capacity: dec!(1.8),
            arb_days: dec!(280),
            availability_pct: dec!(98),
            rte_pct: dec!(90),
            cycles_per_day: dec!(1),
            charge_price_kwh: dec!(3),
            discharge_price_kwh: dec!(4.5),
            ppa_rate_kwh: dec!(6),
            ppa_volume: None,
            ppa_price: None,
            ppa_escalation_pct: Decimal::ZERO,
            ancillary: Decimal::ZERO,
            other_revenue: Decimal::ZERO,
            capex: dec!(35_574_071),
            insurance_pct: dec!(0.3),
            var_om: dec!(90),
            fixed_om: dec!(250_000),
            admin_cost: Decimal::ZERO,
            preventive_maintenance: Decimal::ZERO,
            inflation_pct: dec!(3.0),
            project_life: dec!(20),
            degradation_pct: dec!(3.0),
            debt_amount: dec!(24_901_850),
            debt_rate_pct: dec!(7),
            loan_term: dec!(10),
            tax_rate_pct: dec!(30),
        }
    }
}

// ---------------------------------------------------------------------------
// Unit conversions
// ---------------------------------------------------------------------------

/// Percentage to fraction (7.5 -> 0.075).
pub fn pct_to_fraction(pct: Decimal) -> Rate {
    pct / dec!(100)
}

/// Price per kWh to price per MWh.
pub fn price_per_mwh(per_kwh: Money) -> Money {
    per_kwh.saturating_mul(KWH_PER_MWH)
}

/// Round half towards positive infinity, so 2.5 -> 3 and -2.5 -> -2.
pub fn round_half_up(value: Decimal) -> Decimal {
    value.saturating_add(dec!(0.5)).floor()
}

/// Rounded whole years, at least `minimum`. Values beyond `u32` saturate
/// at `u32::MAX` so the model rejects them instead of shortening them.
fn whole_years(raw: Decimal, minimum: u32) -> u32 {
    let rounded = round_half_up(raw);
    match rounded.to_u32() {
        Some(years) => years.max(minimum),
        None if rounded > Decimal::ZERO => u32::MAX,
        None => minimum,
    }
}

/// Annual PPA volume implied by the technical inputs, rounded to whole MWh.
pub fn derive_ppa_volume(
    capacity: Energy,
    cycles_per_day: Decimal,
    arb_days: Decimal,
    rte: Rate,
    availability: Rate,
) -> Energy {
    round_half_up(
        capacity
            .saturating_mul(cycles_per_day)
            .saturating_mul(arb_days)
            .saturating_mul(rte)
            .saturating_mul(availability),
    )
}

/// PPA unit price per MWh from a per-kWh tariff, rounded to a whole unit.
pub fn derive_ppa_price(ppa_rate_kwh: Money) -> Money {
    round_half_up(price_per_mwh(ppa_rate_kwh))
}

// ---------------------------------------------------------------------------
// Builder
// ---------------------------------------------------------------------------

/// Normalise user-facing inputs into a [`ParameterRecord`].
///
/// Never fails: durations are clamped to their minimums and the discount
/// rate is fixed at zero, so NPV reads as the undiscounted cash flow total.
pub fn build_params(inputs: &RawInputs) -> ParameterRecord {
    let availability = pct_to_fraction(inputs.availability_pct);
    let rte = pct_to_fraction(inputs.rte_pct);

    let ppa_volume = inputs.ppa_volume.unwrap_or_else(|| {
        derive_ppa_volume(
            inputs.capacity,
            inputs.cycles_per_day,
            inputs.arb_days,
            rte,
            availability,
        )
    });
    let ppa_price = inputs
        .ppa_price
        .unwrap_or_else(|| derive_ppa_price(inputs.ppa_rate_kwh));

    ParameterRecord {
        capacity: inputs.capacity,
        arb_days: inputs.arb_days,
        availability,
        rte,
        charge_price: price_per_mwh(inputs.charge_price_kwh),
        discharge_price: price_per_mwh(inputs.discharge_price_kwh),
        degradation: pct_to_fraction(inputs.degradation_pct),
        cycles_per_day: inputs.cycles_per_day,
        ppa_volume,
        ppa_price,
        ppa_escalation: pct_to_fraction(inputs.ppa_escalation_pct),
        ancillary_revenue: inputs.ancillary,
        other_revenue: inputs.other_revenue,
        capex: inputs.capex,
        insurance_rate: pct_to_fraction(inputs.insurance_pct),
        var_om_rate: inputs.var_om,
        fixed_om: inputs.fixed_om,
        admin_cost: inputs.admin_cost,
        preventive_maintenance: inputs.preventive_maintenance,
        inflation_rate: pct_to_fraction(inputs.inflation_pct),
        project_life: whole_years(inputs.project_life, MIN_PROJECT_LIFE),
        debt_amount: inputs.debt_amount,
        debt_rate: pct_to_fraction(inputs.debt_rate_pct),
        loan_term: whole_years(inputs.loan_term, MIN_LOAN_TERM),
        tax_rate: pct_to_fraction(inputs.tax_rate_pct),
        discount_rate: Decimal::ZERO,
    }
}
