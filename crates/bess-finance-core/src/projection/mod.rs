pub mod energy;
pub mod opex;
pub mod revenue;

pub use energy::{project_energy, EnergyProjection};
pub use opex::{build_opex, OpexSchedule};
pub use revenue::{build_revenue, RevenueSchedule};
