//! Fixed-width histogram binning over `[0, max]`.

use serde::Serialize;

/// Default bucket count.
pub const DEFAULT_BINS: usize = 30;

/// One histogram bucket.
///
/// Membership is `[x0, x1)`, except for the last bucket of a [`Histogram`]
/// which also holds `x1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bucket {
    /// Inclusive lower bound.
    pub x0: f64,
    /// Upper bound.
    pub x1: f64,
    /// Values that fell into this bucket.
    pub count: usize,
}

impl Bucket {
    /// `x1 - x0`.
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }
}

/// Contiguous ascending buckets spanning `[0, max]`.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Histogram {
    /// `(0, max)`, or `None` when nothing could be binned.
    pub domain: Option<(f64, f64)>,
    /// Buckets in ascending order.
    pub buckets: Vec<Bucket>,
    /// Values that were `NaN`, infinite or outside the domain.
    pub excluded: usize,
}

impl Histogram {
    /// Bins `values` into `bins` equal-width buckets over `[0, max(values)]`.
    ///
    /// Empty input (or input with no finite non-negative value) yields no
    /// buckets. `bins == 0` is treated as one bucket.
    pub fn compute(values: &[f64], bins: usize) -> Self {
        let bins = bins.max(1);

        let max = values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc: Option<f64>, v| Some(acc.map_or(v, |m| m.max(v))));

        let max = match max {
            Some(m) if m >= 0.0 => m,
            _ => {
                return Self {
                    domain: None,
                    buckets: Vec::new(),
                    excluded: values.len(),
                }
            }
        };

        // divide first: max * i overflows for values near f64::MAX
        let width = max / bins as f64;
        let mut buckets: Vec<Bucket> = (0..bins)
            .map(|i| Bucket {
                x0: width * i as f64,
                x1: if i + 1 == bins {
                    max
                } else {
                    width * (i + 1) as f64
                },
                count: 0,
            })
            .collect();

        let last = bins - 1;
        let mut excluded = 0;

        for &v in values {
            if !(v.is_finite() && (0.0..=max).contains(&v)) {
                excluded += 1;
                continue;
            }

            let mut idx = if width > 0.0 {
                ((v / width).floor() as usize).min(last)
            } else {
                last
            };
            // floor(v / width) can land one bucket off the computed bounds
            while idx > 0 && v < buckets[idx].x0 {
                idx -= 1;
            }
            while idx < last && v >= buckets[idx].x1 {
                idx += 1;
            }
            buckets[idx].count += 1;
        }

        Self {
            domain: Some((0.0, max)),
            buckets,
            excluded,
        }
    }

    /// Largest bucket count, 0 without buckets.
    pub fn max_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    /// Sum of bucket counts.
    pub fn total_count(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }

    /// Whether there are no buckets.
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
