pub mod error;
pub mod model;
pub mod params;
pub mod projection;
pub mod statements;
pub mod time_value;
pub mod types;

#[cfg(feature = "sensitivity")]
pub mod scenarios;

pub use error::BessFinanceError;
pub use model::{model_storage_project, run_model, ModelResult};
pub use params::{build_params, ParameterKey, ParameterRecord, RawInputs};
pub use types::*;

/// Standard result type for all engine operations
pub type BessFinanceResult<T> = Result<T, BessFinanceError>;
