pub mod builder;
pub mod record;

pub use builder::{build_params, pct_to_fraction, price_per_mwh, RawInputs};
pub use record::{ParameterKey, ParameterRecord};
