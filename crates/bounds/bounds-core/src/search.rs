//! Boundary search against a black-box oracle.
//!
//! For one point of one series, the search walks the point's probe outward in
//! steps of `delta` and re-queries the oracle after every step. The last probe
//! the oracle accepted as normal is the limit in that direction.
//!
//! All mutation happens on owned clones: one oracle snapshot per point and two
//! working copies of the series. The caller's oracle and series are only
//! borrowed immutably.

use bounds_api::SearchConfig;
use bounds_spi::{BoundsError, Direction, Oracle, Perturbable, Result, Verdict};
use tracing::debug;

/// The limit found in one direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Limit {
    /// Limit in the metric's reported unit.
    pub value: f64,
    /// Last probe the oracle classified as normal.
    pub probe: f64,
    /// Oracle queries spent in this direction.
    pub steps: usize,
}

/// Both limits for one point.
///
/// A direction whose walk hit the iteration cap, or ended without a finite
/// limit, has none; its error is kept in `failures`.
#[derive(Debug)]
pub struct PointBounds {
    pub index: usize,
    pub upper: Option<Limit>,
    pub lower: Option<Limit>,
    pub failures: Vec<BoundsError>,
}

impl PointBounds {
    pub fn is_complete(&self) -> bool {
        self.upper.is_some() && self.lower.is_some()
    }
}

/// Per-point boundary search.
#[derive(Debug, Clone, Copy)]
pub struct BoundarySearch {
    config: SearchConfig,
}

impl BoundarySearch {
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    /// Search both limits for `index`.
    ///
    /// Set `flagged` for any point the oracle did not call normal. The probe is first moved to the series' baseline
    /// median and the snapshot is refitted on that copy, so the walk starts
    /// from inside the normal region. Otherwise the walk starts from the
    /// observed value with the oracle's original fit.
    pub fn search<O, S>(&self, oracle: &O, series: &S, index: usize, flagged: bool) -> Result<PointBounds>
    where
        O: Oracle<S>,
        S: Perturbable,
    {
        if index >= series.len() {
            return Err(BoundsError::InvalidData(format!(
                "index {} out of range for series of length {}",
                index,
                series.len()
            )));
        }

        let mut snapshot = oracle.clone();
        let mut up = series.clone();
        if flagged {
            up.set_probe(index, series.baseline_probe(index));
            snapshot.fit(&up)?;
        }
        let mut down = up.clone();

        let mut failures = Vec::new();
        let upper = settle(self.walk(&snapshot, &mut up, index, Direction::Up), &mut failures)?;
        let lower = settle(self.walk(&snapshot, &mut down, index, Direction::Down), &mut failures)?;

        Ok(PointBounds {
            index,
            upper,
            lower,
            failures,
        })
    }

    /// Step the probe at `index` in `direction` until the oracle stops calling it normal.
    ///
    /// An `Undefined` verdict ends the walk the same way an `Anomalous` one
    /// does: the oracle gives no boundary information past that probe, so the
    /// last normal probe is the furthest verified point. A non-finite start
    /// probe or limit fails with `NoFiniteBound`.
    pub fn walk<O, S>(&self, oracle: &O, working: &mut S, index: usize, direction: Direction) -> Result<Limit>
    where
        O: Oracle<S>,
        S: Perturbable,
    {
        let step = self.config.delta * direction.sign();
        let mut last_normal = working.probe(index);
        if !last_normal.is_finite() {
            return Err(BoundsError::NoFiniteBound { index, direction });
        }

        for steps in 1..=self.config.max_iterations {
            let probe = last_normal + step;
            working.set_probe(index, probe);

            let verdicts = oracle.predict(working)?;
            let verdict = verdicts.get(index).copied().ok_or_else(|| {
                BoundsError::InvalidData(format!(
                    "oracle returned {} verdicts for {} points",
                    verdicts.len(),
                    working.len()
                ))
            })?;

            match verdict {
                Verdict::Normal => last_normal = probe,
                Verdict::Anomalous | Verdict::Undefined => {
                    debug!(index, %direction, steps, ?verdict, "boundary reached");
                    let value = working.observe(index, last_normal);
                    if !value.is_finite() {
                        return Err(BoundsError::NoFiniteBound { index, direction });
                    }
                    return Ok(Limit {
                        value,
                        probe: last_normal,
                        steps,
                    });
                }
            }
        }

        Err(BoundsError::BoundarySearchExhausted {
            index,
            direction,
            iterations: self.config.max_iterations,
        })
    }
}

/// Keep a missing limit local to the direction; propagate everything else.
fn settle(result: Result<Limit>, failures: &mut Vec<BoundsError>) -> Result<Option<Limit>> {
    match result {
        Ok(limit) => Ok(Some(limit)),
        Err(
            err @ (BoundsError::BoundarySearchExhausted { .. }
            | BoundsError::NoFiniteBound { .. }),
        ) => {
            failures.push(err);
            Ok(None)
        }
        Err(err) => Err(err),
    }
}
