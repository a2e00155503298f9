//! Weighted consensus across bound tables.

use serde::{Deserialize, Serialize};

/// One consensus row: weighted sums of every registered table's columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsensusRecord {
    pub timestamp: i64,
    pub value: f64,
    /// Absent when any contributing table lacks this limit.
    pub upper: Option<f64>,
    pub lower: Option<f64>,
    /// Weighted violation score in `[0, 1]`; NaN when a contributor was undefined.
    pub violation: f64,
    /// Baseline median of the canonical metric.
    pub median: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ConsensusTable {
    records: Vec<ConsensusRecord>,
}

impl ConsensusTable {
    pub fn new(records: Vec<ConsensusRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[ConsensusRecord] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ConsensusRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
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

    pub fn violations(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.violation).collect()
    }

    pub fn medians(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.median).collect()
    }
}
