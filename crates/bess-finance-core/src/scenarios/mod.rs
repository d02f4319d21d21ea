pub mod sensitivity;
pub mod tornado;

pub use sensitivity::{
    build_sensitivity_report, run_degradation_sensitivity, run_efficiency_sensitivity,
    run_sensitivity, run_spread_sensitivity, SensitivityReport,
};
pub use tornado::{run_tornado, run_tornado_with, TornadoBar, TornadoOutput};

use crate::BessFinanceResult;

/// Evaluate `f` over every item, in parallel when the `parallel` feature is
/// on. Results keep input order; any failed evaluation fails the sweep.
pub(crate) fn evaluate_each<T, R, F>(items: &[T], f: F) -> BessFinanceResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&T) -> BessFinanceResult<R> + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        items.par_iter().map(f).collect()
    }
    #[cfg(not(feature = "parallel"))]
    {
        items.iter().map(f).collect()
    }
}
