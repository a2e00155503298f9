//! Numeric helpers shared by the detectors.

pub use bounds_spi::median;

/// Arithmetic mean of the non-NaN values. NaN for an empty input.
pub fn mean(data: &[f64]) -> f64 {
    let (sum, count) = data
        .iter()
        .filter(|x| !x.is_nan())
        .fold((0.0, 0usize), |(s, c), &x| (s + x, c + 1));
    if count == 0 {
        f64::NAN
    } else {
        sum / count as f64
    }
}

/// Population standard deviation of the non-NaN values.
pub fn std_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    let finite: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if finite.is_empty() {
        return f64::NAN;
    }
    (finite.iter().map(|x| (x - m).powi(2)).sum::<f64>() / finite.len() as f64).sqrt()
}

/// Empirical quantile with linear interpolation between order statistics.
///
/// NaN values are ignored; an empty input yields NaN.
pub fn quantile(data: &[f64], q: f64) -> f64 {
    let mut sorted: Vec<f64> = data.iter().copied().filter(|x| !x.is_nan()).collect();
    if sorted.is_empty() {
        return f64::NAN;
    }
    sorted.sort_by(|a, b| a.total_cmp(b));

    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    if lo == hi {
        sorted[lo]
    } else {
        sorted[lo] + (pos - lo as f64) * (sorted[hi] - sorted[lo])
    }
}

/// Normal range `[Q1 - c * IQR, Q3 + c * IQR]` of a sample.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct IqrBand {
    pub lower: f64,
    pub upper: f64,
}

impl IqrBand {
    pub fn fit(data: &[f64], c: f64) -> Self {
        let q1 = quantile(data, 0.25);
        let q3 = quantile(data, 0.75);
        let iqr = q3 - q1;
        Self {
            lower: q1 - c * iqr,
            upper: q3 + c * iqr,
        }
    }

    pub fn above(&self, x: f64) -> bool {
        x > self.upper
    }

    pub fn below(&self, x: f64) -> bool {
        x < self.lower
    }
}

/// Per-field standardisation of 2-D points, learned from a training sample.
///
/// A field with zero spread keeps a unit scale.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Scaler {
    pub mean: [f64; 2],
    pub scale: [f64; 2],
}

impl Scaler {
    pub fn fit(points: &[[f64; 2]]) -> Self {
        let mut mean = [0.0; 2];
        let mut scale = [1.0; 2];
        for field in 0..2 {
            let column: Vec<f64> = points.iter().map(|p| p[field]).collect();
            mean[field] = self::mean(&column);
            let sd = std_dev(&column);
            if sd > 0.0 && sd.is_finite() {
                scale[field] = sd;
            }
        }
        Self { mean, scale }
    }

    pub fn transform(&self, point: [f64; 2]) -> [f64; 2] {
        [
            (point[0] - self.mean[0]) / self.scale[0],
            (point[1] - self.mean[1]) / self.scale[1],
        ]
    }
}
