//! Per-point oracle verdicts.

use serde::{Deserialize, Serialize};

/// An oracle's classification of one point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Normal,
    Anomalous,
    /// The oracle produced no usable classification (NaN output).
    Undefined,
}

impl Verdict {
    pub fn is_anomalous(self) -> bool {
        matches!(self, Verdict::Anomalous)
    }

    pub fn is_normal(self) -> bool {
        matches!(self, Verdict::Normal)
    }

    /// `0` for normal, `1` for anomalous, NaN when undefined.
    pub fn as_numeric(self) -> f64 {
        match self {
            Verdict::Normal => 0.0,
            Verdict::Anomalous => 1.0,
            Verdict::Undefined => f64::NAN,
        }
    }
}

impl From<bool> for Verdict {
    fn from(anomalous: bool) -> Self {
        if anomalous {
            Verdict::Anomalous
        } else {
            Verdict::Normal
        }
    }
}
