use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::BessFinanceError;
use crate::types::{Energy, Money, Rate};

/// Normalised inputs for one model run. Rates are fractions, prices are per
/// MWh, durations are whole years.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterRecord {
    // Technical
    /// Usable capacity in MWh
    pub capacity: Energy,
    /// Arbitrage days per year
    pub arb_days: Decimal,
    /// Availability fraction (0.98 = 98%)
    pub availability: Rate,
    /// Round-trip efficiency fraction
    pub rte: Rate,
    /// Price paid to charge, per MWh
    pub charge_price: Money,
    /// Price received on discharge, per MWh
    pub discharge_price: Money,
    /// Annual capacity degradation fraction
    pub degradation: Rate,
    pub cycles_per_day: Decimal,

    // Revenue
    /// Contracted PPA volume in MWh per year
    pub ppa_volume: Energy,
    /// PPA unit price per MWh
    pub ppa_price: Money,
    pub ppa_escalation: Rate,
    pub ancillary_revenue: Money,
    pub other_revenue: Money,

    // Costs
    pub capex: Money,
    /// Annual insurance as a fraction of CAPEX
    pub insurance_rate: Rate,
    /// Variable O&M per MWh of nameplate throughput
    pub var_om_rate: Money,
    pub fixed_om: Money,
    pub admin_cost: Money,
    pub preventive_maintenance: Money,
    pub inflation_rate: Rate,
    pub project_life: u32,

    // Debt
    pub debt_amount: Money,
    pub debt_rate: Rate,
    pub loan_term: u32,

    pub tax_rate: Rate,
    pub discount_rate: Rate,
}

/// Every Decimal-valued field of [`ParameterRecord`] that a sweep can vary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKey {
    Capacity,
    ArbDays,
    Availability,
    Rte,
    ChargePrice,
    DischargePrice,
    Degradation,
    CyclesPerDay,
    PpaVolume,
    PpaPrice,
    PpaEscalation,
    AncillaryRevenue,
    OtherRevenue,
    Capex,
    InsuranceRate,
    VarOmRate,
    FixedOm,
    AdminCost,
    PreventiveMaintenance,
    InflationRate,
    DebtAmount,
    DebtRate,
    TaxRate,
    DiscountRate,
}

impl ParameterKey {
    pub const ALL: [ParameterKey; 24] = [
        ParameterKey::Capacity,
        ParameterKey::ArbDays,
        ParameterKey::Availability,
        ParameterKey::Rte,
        ParameterKey::ChargePrice,
        ParameterKey::DischargePrice,
        ParameterKey::Degradation,
        ParameterKey::CyclesPerDay,
        ParameterKey::PpaVolume,
        ParameterKey::PpaPrice,
        ParameterKey::PpaEscalation,
        ParameterKey::AncillaryRevenue,
        ParameterKey::OtherRevenue,
        ParameterKey::Capex,
        ParameterKey::InsuranceRate,
        ParameterKey::VarOmRate,
        ParameterKey::FixedOm,
        ParameterKey::AdminCost,
        ParameterKey::PreventiveMaintenance,
        ParameterKey::InflationRate,
        ParameterKey::DebtAmount,
        ParameterKey::DebtRate,
        ParameterKey::TaxRate,
        ParameterKey::DiscountRate,
    ];

    /// Human-readable label used in sweep and tornado output.
    pub fn label(self) -> &'static str {
        match self {
            ParameterKey::Capacity => "Capacity",
            ParameterKey::ArbDays => "Arbitrage Days",
            ParameterKey::Availability => "Availability",
            ParameterKey::Rte => "Round-Trip Efficiency",
            ParameterKey::ChargePrice => "Charge Price",
            ParameterKey::DischargePrice => "Discharge Price",
            ParameterKey::Degradation => "Degradation",
            ParameterKey::CyclesPerDay => "Cycles per Day",
            ParameterKey::PpaVolume => "PPA Volume",
            ParameterKey::PpaPrice => "PPA Price",
            ParameterKey::PpaEscalation => "PPA Escalation",
            ParameterKey::AncillaryRevenue => "Ancillary Services",
            ParameterKey::OtherRevenue => "Other Revenue",
            ParameterKey::Capex => "CAPEX",
            ParameterKey::InsuranceRate => "Insurance Rate",
            ParameterKey::VarOmRate => "Variable O&M",
            ParameterKey::FixedOm => "Fixed O&M",
            ParameterKey::AdminCost => "Admin Cost",
            ParameterKey::PreventiveMaintenance => "Preventive Maintenance",
            ParameterKey::InflationRate => "Inflation",
            ParameterKey::DebtAmount => "Debt Amount",
            ParameterKey::DebtRate => "Debt Rate",
            ParameterKey::TaxRate => "Tax Rate",
            ParameterKey::DiscountRate => "Discount Rate",
        }
    }

    /// Snake-case identifier, the same spelling serde uses.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterKey::Capacity => "capacity",
            ParameterKey::ArbDays => "arb_days",
            ParameterKey::Availability => "availability",
            ParameterKey::Rte => "rte",
            ParameterKey::ChargePrice => "charge_price",
            ParameterKey::DischargePrice => "discharge_price",
            ParameterKey::Degradation => "degradation",
            ParameterKey::CyclesPerDay => "cycles_per_day",
            ParameterKey::PpaVolume => "ppa_volume",
            ParameterKey::PpaPrice => "ppa_price",
            ParameterKey::PpaEscalation => "ppa_escalation",
            ParameterKey::AncillaryRevenue => "ancillary_revenue",
            ParameterKey::OtherRevenue => "other_revenue",
            ParameterKey::Capex => "capex",
            ParameterKey::InsuranceRate => "insurance_rate",
            ParameterKey::VarOmRate => "var_om_rate",
            ParameterKey::FixedOm => "fixed_om",
            ParameterKey::AdminCost => "admin_cost",
            ParameterKey::PreventiveMaintenance => "preventive_maintenance",
            ParameterKey::InflationRate => "inflation_rate",
            ParameterKey::DebtAmount => "debt_amount",
            ParameterKey::DebtRate => "debt_rate",
            ParameterKey::TaxRate => "tax_rate",
            ParameterKey::DiscountRate => "discount_rate",
        }
    }

    /// Current value of this field in `record`.
    pub fn value(self, r: &ParameterRecord) -> Decimal {
        match self {
            ParameterKey::Capacity => r.capacity,
            ParameterKey::ArbDays => r.arb_days,
            ParameterKey::Availability => r.availability,
            ParameterKey::Rte => r.rte,
            ParameterKey::ChargePrice => r.charge_price,
            ParameterKey::DischargePrice => r.discharge_price,
            ParameterKey::Degradation => r.degradation,
            ParameterKey::CyclesPerDay => r.cycles_per_day,
            ParameterKey::PpaVolume => r.ppa_volume,
            ParameterKey::PpaPrice => r.ppa_price,
            ParameterKey::PpaEscalation => r.ppa_escalation,
            ParameterKey::AncillaryRevenue => r.ancillary_revenue,
            ParameterKey::OtherRevenue => r.other_revenue,
            ParameterKey::Capex => r.capex,
            ParameterKey::InsuranceRate => r.insurance_rate,
            ParameterKey::VarOmRate => r.var_om_rate,
            ParameterKey::FixedOm => r.fixed_om,
            ParameterKey::AdminCost => r.admin_cost,
            ParameterKey::PreventiveMaintenance => r.preventive_maintenance,
            ParameterKey::InflationRate => r.inflation_rate,
            ParameterKey::DebtAmount => r.debt_amount,
            ParameterKey::DebtRate => r.debt_rate,
            ParameterKey::TaxRate => r.tax_rate,
            ParameterKey::DiscountRate => r.discount_rate,
        }
    }

    /// Copy of `record` with this field replaced by `value`.
    pub fn with_value(self, record: &ParameterRecord, value: Decimal) -> ParameterRecord {
        let mut out = record.clone();
        *self.field(&mut out) = value;
        out
    }

    /// Copy of `record` with this field multiplied by `multiplier`.
    pub fn scaled(self, record: &ParameterRecord, multiplier: Decimal) -> ParameterRecord {
        let mut out = record.clone();
        let slot = self.field(&mut out);
        *slot = slot.saturating_mul(multiplier);
        out
    }

    fn field(self, r: &mut ParameterRecord) -> &mut Decimal {
        match self {
            ParameterKey::Capacity => &mut r.capacity,
            ParameterKey::ArbDays => &mut r.arb_days,
            ParameterKey::Availability => &mut r.availability,
            ParameterKey::Rte => &mut r.rte,
            ParameterKey::ChargePrice => &mut r.charge_price,
            ParameterKey::DischargePrice => &mut r.discharge_price,
            ParameterKey::Degradation => &mut r.degradation,
            ParameterKey::CyclesPerDay => &mut r.cycles_per_day,
            ParameterKey::PpaVolume => &mut r.ppa_volume,
            ParameterKey::PpaPrice => &mut r.ppa_price,
            ParameterKey::PpaEscalation => &mut r.ppa_escalation,
            ParameterKey::AncillaryRevenue => &mut r.ancillary_revenue,
            ParameterKey::OtherRevenue => &mut r.other_revenue,
            ParameterKey::Capex => &mut r.capex,
            ParameterKey::InsuranceRate => &mut r.insurance_rate,
            ParameterKey::VarOmRate => &mut r.var_om_rate,
            ParameterKey::FixedOm => &mut r.fixed_om,
            ParameterKey::AdminCost => &mut r.admin_cost,
            ParameterKey::PreventiveMaintenance => &mut r.preventive_maintenance,
            ParameterKey::InflationRate => &mut r.inflation_rate,
            ParameterKey::DebtAmount => &mut r.debt_amount,
            ParameterKey::DebtRate => &mut r.debt_rate,
            ParameterKey::TaxRate => &mut r.tax_rate,
            ParameterKey::DiscountRate => &mut r.discount_rate,
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterKey {
    type Err = BessFinanceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        ParameterKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| BessFinanceError::InvalidInput {
                field: "parameter".into(),
                reason: format!("Unknown parameter '{s}'"),
            })
    }
}
