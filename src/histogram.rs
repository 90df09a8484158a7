//! Component B: tolerance-clustering histogram for integer sequences.
//!
//! Grounded directly on `original_source/src/pulse_detect.c`'s
//! `histogram_sum`/`histogram_fuse_bins`/`histogram_sort_mean`/
//! `histogram_sort_count`/`histogram_delete_bin`. Bin order is not semantic
//! unless explicitly sorted (spec.md §3); a quadratic sort is acceptable at
//! `n <= MAX_HIST_BINS` (spec.md §4.3).

use crate::constants::MAX_HIST_BINS;

/// A single histogram bin: count, running sum, mean, min and max.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HistBin {
    pub count: u32,
    pub sum: i64,
    pub mean: i64,
    pub min: i64,
    pub max: i64,
}

impl HistBin {
    fn new(value: i64) -> Self {
        Self {
            count: 1,
            sum: value,
            mean: value,
            min: value,
            max: value,
        }
    }

    fn insert(&mut self, value: i64) {
        self.count += 1;
        self.sum += value;
        self.mean = self.sum / self.count as i64;
        self.min = self.min.min(value);
        self.max = self.max.max(value);
    }

    fn merge(&mut self, other: &HistBin) {
        self.count += other.count;
        self.sum += other.sum;
        self.mean = self.sum / self.count as i64;
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
    }
}

/// At most [`MAX_HIST_BINS`] bins, built by clustering values within a
/// relative tolerance of an existing bin's mean.
#[derive(Debug, Clone, Default)]
pub struct Histogram {
    bins: Vec<HistBin>,
}

fn within_tolerance(a: i64, b: i64, tolerance: f64) -> bool {
    let diff = (a - b).abs() as f64;
    diff < tolerance * (a.max(b) as f64)
}

impl Histogram {
    pub fn new() -> Self {
        Self { bins: Vec::new() }
    }

    pub fn bins(&self) -> &[HistBin] {
        &self.bins
    }

    pub fn bins_count(&self) -> usize {
        self.bins.len()
    }

    /// Insert each value of `data` into an existing bin whose mean is within
    /// `tolerance * max(value, mean)`, otherwise open a new bin if under the
    /// cap. Values beyond the cap with no matching bin are silently dropped,
    /// matching the original's `bin < MAX_HIST_BINS` guard.
    pub fn sum(&mut self, data: &[u32], tolerance: f64) {
        for &raw in data {
            let value = raw as i64;
            let mut matched = false;
            for bin in self.bins.iter_mut() {
                if within_tolerance(value, bin.mean, tolerance) {
                    bin.insert(value);
                    matched = true;
                    break;
                }
            }
            if !matched && self.bins.len() < MAX_HIST_BINS {
                self.bins.push(HistBin::new(value));
            }
        }
    }

    /// Pairwise-merge any two bins whose means fall within tolerance,
    /// repeating over the shrinking bin set. The outer scan index is held
    /// steady after a merge so the same position is re-examined against the
    /// bin that slid into it.
    pub fn fuse(&mut self, tolerance: f64) {
        if self.bins.len() < 2 {
            return;
        }
        let mut n = 0;
        while n < self.bins.len().saturating_sub(1) {
            let mut m = n + 1;
            while m < self.bins.len() {
                if within_tolerance(self.bins[n].mean, self.bins[m].mean, tolerance) {
                    let other = self.bins[m];
                    self.bins[n].merge(&other);
                    self.delete(m);
                    // Don't advance m: the bin that slid into index m needs
                    // re-examining against bin n.
                } else {
                    m += 1;
                }
            }
            n += 1;
        }
    }

    /// Ascending sort by mean. Stable ordering is not required.
    pub fn sort_mean(&mut self) {
        self.bins.sort_by_key(|b| b.mean);
    }

    /// Ascending sort by count. Stable ordering is not required.
    pub fn sort_count(&mut self) {
        self.bins.sort_by_key(|b| b.count);
    }

    /// Compact-left removal of bin `index`.
    pub fn delete(&mut self, index: usize) {
        if index >= self.bins.len() {
            return;
        }
        self.bins.remove(index);
    }
}
