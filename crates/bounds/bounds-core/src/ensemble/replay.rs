//! Replaying registered methods on new data.

use bounds_spi::{BoundsError, Metric};
use tracing::{info, warn};

use super::registry::{Registration, RegistrationId};

/// A method that could not be replayed.
#[derive(Debug)]
pub struct SkippedMethod {
    pub id: RegistrationId,
    pub method: &'static str,
    pub error: BoundsError,
}

/// Outcome of [`Ensemble::apply_to_new_data`](super::Ensemble::apply_to_new_data).
#[derive(Debug, Default)]
pub struct ReplayReport {
    pub replayed: Vec<RegistrationId>,
    pub skipped: Vec<SkippedMethod>,
}

impl ReplayReport {
    /// Whether every registration produced a table.
    pub fn is_complete(&self) -> bool {
        self.skipped.is_empty()
    }

    pub fn skipped_ids(&self) -> Vec<RegistrationId> {
        self.skipped.iter().map(|s| s.id).collect()
    }
}

/// Replay every registration on `metric`, isolating failures per method.
pub(crate) fn replay_all(registrations: &mut [Registration], metric: &Metric) -> ReplayReport {
    let mut report = ReplayReport::default();

    for registration in registrations.iter_mut() {
        let id = registration.id();
        let method = registration.method().name();
        match registration.method_mut().replay(metric) {
            Ok(table) => {
                registration.set_bounds(Some(table));
                report.replayed.push(id);
            }
            Err(error) => {
                warn!(%id, method, %error, "replay skipped method");
                registration.set_bounds(None);
                report.skipped.push(SkippedMethod { id, method, error });
            }
        }
    }

    info!(
        replayed = report.replayed.len(),
        skipped = report.skipped.len(),
        points = metric.len(),
        "replay complete"
    );
    report
}
