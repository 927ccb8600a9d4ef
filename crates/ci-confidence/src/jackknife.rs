//! Leave-one-out metric values
//!
//! Used to estimate the BCa acceleration constant.

use crate::bootstrap::admit;
use ci_core::{with_resample_workspace, ExecutionEngine, Metric, MetricParams, PairedSample, Result};
use tracing::{debug, instrument};

/// Metric value with each row left out in turn
///
/// Leave-one-out samples on which the metric is undefined are skipped, so
/// the result may be shorter than the sample.
#[instrument(skip_all, fields(n = sample.len()))]
pub fn jackknife_values<E, M>(
    engine: &E,
    sample: &PairedSample<'_>,
    metric: &M,
    params: &MetricParams,
) -> Result<Vec<f64>>
where
    E: ExecutionEngine,
    M: Metric + ?Sized,
{
    let outcomes = engine.execute_batch(sample.len(), |skip| {
        admit(with_resample_workspace(|ws| {
            ws.leave_one_out(sample, skip);
            ws.view().evaluate(metric, params)
        }))
    });

    let mut values = Vec::with_capacity(sample.len());
    for outcome in outcomes {
        if let Some(v) = outcome? {
            values.push(v);
        }
    }
    debug!(n_valid = values.len(), "jackknife values");
    Ok(values)
}
