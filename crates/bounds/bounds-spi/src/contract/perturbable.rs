//! Perturbation axis used by boundary search.

/// A series with one perturbable quantity per point.
///
/// The probe is the raw quantity the search moves (the value, or the numerator
/// of a ratio). `observe` maps a probe back to the unit the metric is reported in.
pub trait Perturbable: Clone + Send + Sync {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn timestamp(&self, index: usize) -> i64;

    /// Current probe at `index`.
    fn probe(&self, index: usize) -> f64;

    /// Overwrite the probe at `index`, leaving every other point untouched.
    fn set_probe(&mut self, index: usize, probe: f64);

    /// Probe that puts `index` on the series' baseline median.
    fn baseline_probe(&self, index: usize) -> f64;

    /// Reported value for `probe` at `index`.
    fn observe(&self, index: usize, probe: f64) -> f64;
}
