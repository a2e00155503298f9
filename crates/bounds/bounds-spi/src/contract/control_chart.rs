//! Closed-form control chart contract.

use crate::error::Result;
use crate::model::{BoundTable, ChartData, RatioSeries, Verdict};

/// A statistical control chart over a proportion metric.
///
/// Unlike an [`Oracle`](super::Oracle), a chart computes its limits directly,
/// so it reports bounds without any search.
pub trait ControlChart: Send + Sync {
    /// Learn the baseline proportion and classify the baseline series.
    fn fit(&mut self, series: &RatioSeries) -> Result<Vec<Verdict>>;

    /// Classify new data against the fitted baseline and keep it for [`ChartData::Predicted`].
    fn predict(&mut self, series: &RatioSeries) -> Result<Vec<Verdict>>;

    /// Limits and verdicts for the baseline or the most recently predicted data.
    fn bounds(&self, data: ChartData) -> Result<BoundTable>;
}
