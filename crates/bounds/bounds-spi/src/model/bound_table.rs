//! Per-method bound tables.

use serde::{Deserialize, Serialize};

use super::consensus::{ConsensusRecord, ConsensusTable};
use super::verdict::Verdict;

/// Limits and verdict for one timestamp.
///
/// A `None` limit means no finite bound was found: the search was exhausted
/// or the walk never produced a finite value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoundRecord {
    pub timestamp: i64,
    /// Observed value, or `numerator / denominator` for ratio metrics.
    pub value: f64,
    /// Upper control limit.
    pub upper: Option<f64>,
    /// Lower control limit.
    pub lower: Option<f64>,
    /// Verdict on the unmodified series.
    pub violation: Verdict,
}

impl BoundRecord {
    /// Whether the value lies inside `[lower, upper]`. `None` when a limit is missing.
    pub fn within_limits(&self) -> Option<bool> {
        match (self.lower, self.upper) {
            (Some(lower), Some(upper)) => Some(lower <= self.value && self.value <= upper),
            _ => None,
        }
    }
}

/// One bound record per timestamp, in series order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoundTable {
    records: Vec<BoundRecord>,
}

impl BoundTable {
    pub fn new(records: Vec<BoundRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BoundRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BoundRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&BoundRecord> {
        self.records.get(index)
    }

    pub fn timestamps(&self) -> Vec<i64> {
        self.records.iter().map(|r| r.timestamp).collect()
    }

    pub fn values(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.value).collect()
    }

    pub fn upper(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.upper).collect()
    }

    pub fn lower(&self) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.lower).collect()
    }

    pub fn violations(&self) -> Vec<Verdict> {
        self.records.iter().map(|r| r.violation).collect()
    }

    /// Indices whose verdict is anomalous.
    pub fn anomaly_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.violation.is_anomalous().then_some(i))
            .collect()
    }

    /// Indices with at least one missing limit.
    pub fn unresolved_indices(&self) -> Vec<usize> {
        self.records
            .iter()
            .enumerate()
            .filter_map(|(i, r)| (r.upper.is_none() || r.lower.is_none()).then_some(i))
            .collect()
    }

    /// Convert to a consensus table with numeric violations and a constant median column.
    pub fn with_median(&self, median: f64) -> ConsensusTable {
        ConsensusTable::new(
            self.records
                .iter()
                .map(|r| ConsensusRecord {
                    timestamp: r.timestamp,
                    value: r.value,
                    upper: r.upper,
                    lower: r.lower,
                    violation: r.violation.as_numeric(),
                    median,
                })
                .collect(),
        )
    }
}

impl<'a> IntoIterator for &'a BoundTable {
    type Item = &'a BoundRecord;
    type IntoIter = std::slice::Iter<'a, BoundRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(value: f64, upper: Option<f64>, lower: Option<f64>, violation: Verdict) -> BoundRecord {
        BoundRecord {
            timestamp: 0,
            value,
            upper,
            lower,
            violation,
        }
    }

    #[test]
    fn test_within_limits() {
        assert_eq!(record(5.0, Some(6.0), Some(4.0), Verdict::Normal).within_limits(), Some(true));
        assert_eq!(record(9.0, Some(6.0), Some(4.0), Verdict::Anomalous).within_limits(), Some(false));
        assert_eq!(record(5.0, None, Some(4.0), Verdict::Normal).within_limits(), None);
    }

    #[test]
    fn test_indices() {
        let table = BoundTable::new(vec![
            record(1.0, Some(2.0), Some(0.0), Verdict::Normal),
            record(9.0, None, Some(0.0), Verdict::Anomalous),
        ]);
        assert_eq!(table.anomaly_indices(), vec![1]);
        assert_eq!(table.unresolved_indices(), vec![1]);
    }

    #[test]
    fn test_with_median_appends_constant_column() {
        let table = BoundTable::new(vec![
            record(1.0, Some(2.0), Some(0.0), Verdict::Normal),
            record(9.0, Some(2.0), Some(0.0), Verdict::Anomalous),
        ]);
        let consensus = table.with_median(1.5);
        assert_eq!(consensus.violations(), vec![0.0, 1.0]);
        assert!(consensus.iter().all(|r| r.median == 1.5));
        assert_eq!(consensus.values(), table.values());
    }
}
