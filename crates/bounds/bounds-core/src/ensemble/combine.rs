//! Weighted consensus of bound tables.

use bounds_spi::{BoundRecord, BoundTable, BoundsError, ConsensusRecord, ConsensusTable, Result};

/// Largest accepted distance between the weight sum and 1.
pub const WEIGHT_TOLERANCE: f64 = 1e-9;

/// Combine tables into one consensus table.
///
/// A single table is returned as-is with the median column and any weights
/// are ignored. Otherwise each column is scaled by its table's weight and
/// summed per timestamp; weights default to `1 / n`.
pub fn combine_tables(
    tables: &[&BoundTable],
    weights: Option<&[f64]>,
    median: f64,
) -> Result<ConsensusTable> {
    let first = match tables {
        [] => return Err(BoundsError::EmptyEnsemble),
        [only] => return Ok(only.with_median(median)),
        [first, ..] => first,
    };

    let default_weights = vec![1.0 / tables.len() as f64; tables.len()];
    let w: &[f64] = match weights {
        Some(weights) => {
            validate_weights(weights, tables.len())?;
            weights
        }
        None => default_weights.as_slice(),
    };

    let timestamps = first.timestamps();
    for (table, other) in tables.iter().enumerate().skip(1) {
        let actual = other.timestamps();
        if actual != timestamps {
            let row = timestamps
                .iter()
                .zip(&actual)
                .position(|(a, b)| a != b)
                .unwrap_or_else(|| timestamps.len().min(actual.len()));
            return Err(BoundsError::MisalignedTables { table, row });
        }
    }

    let records = timestamps
        .iter()
        .enumerate()
        .map(|(i, &timestamp)| {
            let rows: Vec<(&BoundRecord, f64)> = tables
                .iter()
                .zip(w)
                .map(|(t, &wt)| (&t.records()[i], wt))
                .collect();
            ConsensusRecord {
                timestamp,
                value: rows.iter().map(|(r, wt)| r.value * wt).sum(),
                upper: rows.iter().map(|(r, wt)| r.upper.map(|u| u * wt)).sum(),
                lower: rows.iter().map(|(r, wt)| r.lower.map(|l| l * wt)).sum(),
                violation: rows.iter().map(|(r, wt)| r.violation.as_numeric() * wt).sum(),
                median,
            }
        })
        .collect();

    Ok(ConsensusTable::new(records))
}

/// One weight per table, all finite, summing to 1.
pub fn validate_weights(weights: &[f64], expected: usize) -> Result<()> {
    if weights.len() != expected {
        return Err(BoundsError::InvalidWeights {
            reason: format!("expected {} weights, got {}", expected, weights.len()),
        });
    }
    if weights.iter().any(|w| !w.is_finite()) {
        return Err(BoundsError::InvalidWeights {
            reason: "weights must be finite".to_string(),
        });
    }
    let total: f64 = weights.iter().sum();
    if (total - 1.0).abs() > WEIGHT_TOLERANCE {
        return Err(BoundsError::InvalidWeights {
            reason: format!("weights sum to {}, not 1", total),
        });
    }
    Ok(())
}
