//! Minimum-cluster detector for ratio metrics

use bounds_api::MinClusterConfig;
use bounds_spi::{BoundsError, Oracle, RatioSeries, Result, Verdict};
use serde::{Deserialize, Serialize};

use crate::stats::Scaler;

/// Minimum-cluster anomaly detector
///
/// Clusters the standardised `(numerator, denominator)` points with k-means
/// and treats the cluster with the fewest training members as anomalous.
/// Initial centroids are chosen by farthest-point traversal starting from the
/// first point, so fitting is deterministic.
///
/// @algorithm KMeans
/// @category ClusteringDetector
/// @complexity O(n * k * iterations)
/// @since 0.3.0
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MinClusterDetector {
    n_clusters: usize,
    max_iterations: usize,
    scaler: Option<Scaler>,
    centroids: Vec<[f64; 2]>,
    smallest: usize,
}

impl MinClusterDetector {
    pub fn new(n_clusters: usize) -> Result<Self> {
        Self::from_config(&MinClusterConfig::new(n_clusters))
    }

    pub fn from_config(config: &MinClusterConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            n_clusters: config.n_clusters,
            max_iterations: config.max_iterations,
            scaler: None,
            centroids: Vec::new(),
            smallest: 0,
        })
    }

    /// Fitted centroids in standardised space.
    pub fn centroids(&self) -> &[[f64; 2]] {
        &self.centroids
    }

    /// Index of the anomalous cluster.
    pub fn smallest_cluster(&self) -> usize {
        self.smallest
    }

    fn nearest(&self, point: [f64; 2]) -> usize {
        nearest(&self.centroids, point)
    }
}

impl Oracle<RatioSeries> for MinClusterDetector {
    fn fit(&mut self, series: &RatioSeries) -> Result<()> {
        let raw: Vec<[f64; 2]> = series
            .numerator()
            .iter()
            .zip(series.denominator())
            .map(|(&n, &d)| [n, d])
            .filter(|p| p[0].is_finite() && p[1].is_finite())
            .collect();

        if raw.len() < self.n_clusters {
            return Err(BoundsError::InsufficientData {
                required: self.n_clusters,
                actual: raw.len(),
            });
        }

        let scaler = Scaler::fit(&raw);
        let points: Vec<[f64; 2]> = raw.iter().map(|&p| scaler.transform(p)).collect();

        let mut centroids = farthest_point_init(&points, self.n_clusters);
        let mut labels = vec![0usize; points.len()];

        for iteration in 0..self.max_iterations {
            let mut changed = false;
            for (label, &point) in labels.iter_mut().zip(&points) {
                let assigned = nearest(&centroids, point);
                if assigned != *label {
                    *label = assigned;
                    changed = true;
                }
            }
            if !changed && iteration > 0 {
                break;
            }

            for (cluster, centroid) in centroids.iter_mut().enumerate() {
                let members: Vec<&[f64; 2]> = points
                    .iter()
                    .zip(&labels)
                    .filter(|(_, &l)| l == cluster)
                    .map(|(p, _)| p)
                    .collect();
                // An emptied cluster keeps its previous centroid.
                if !members.is_empty() {
                    let count = members.len() as f64;
                    *centroid = [
                        members.iter().map(|p| p[0]).sum::<f64>() / count,
                        members.iter().map(|p| p[1]).sum::<f64>() / count,
                    ];
                }
            }
        }

        let mut sizes = vec![0usize; centroids.len()];
        for &point in &points {
            sizes[nearest(&centroids, point)] += 1;
        }
        // Ties go to the lowest cluster index.
        let smallest = sizes
            .iter()
            .enumerate()
            .min_by_key(|(_, &size)| size)
            .map(|(i, _)| i)
            .unwrap_or(0);

        self.scaler = Some(scaler);
        self.centroids = centroids;
        self.smallest = smallest;
        Ok(())
    }

    fn predict(&self, series: &RatioSeries) -> Result<Vec<Verdict>> {
        let scaler = self.scaler.ok_or(BoundsError::NotFitted)?;
        if self.smallest >= self.centroids.len() {
            return Err(BoundsError::InvalidData(format!(
                "anomalous cluster {} out of range for {} centroids",
                self.smallest,
                self.centroids.len()
            )));
        }

        Ok(series
            .numerator()
            .iter()
            .zip(series.denominator())
            .map(|(&n, &d)| {
                if !(n.is_finite() && d.is_finite()) {
                    Verdict::Undefined
                } else {
                    Verdict::from(self.nearest(scaler.transform([n, d])) == self.smallest)
                }
            })
            .collect())
    }

    fn is_fitted(&self) -> bool {
        self.scaler.is_some()
    }
}

fn distance_sq(a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)
}

fn nearest(centroids: &[[f64; 2]], point: [f64; 2]) -> usize {
    centroids
        .iter()
        .enumerate()
        .min_by(|(_, a), (_, b)| distance_sq(**a, point).total_cmp(&distance_sq(**b, point)))
        .map(|(i, _)| i)
        .unwrap_or(0)
}

fn farthest_point_init(points: &[[f64; 2]], k: usize) -> Vec<[f64; 2]> {
    let mut centroids = vec![points[0]];
    while centroids.len() < k {
        let next = points
            .iter()
            .copied()
            .max_by(|a, b| {
                let da = distance_sq(*a, centroids[nearest(&centroids, *a)]);
                let db = distance_sq(*b, centroids[nearest(&centroids, *b)]);
                da.total_cmp(&db)
            })
            .unwrap_or(points[0]);
        centroids.push(next);
    }
    centroids
}
