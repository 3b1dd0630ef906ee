//! Histogram Binning
//!
//! Equal-width bins chosen with the "auto" rule: the narrower of the Sturges
//! and Freedman-Diaconis bin widths (Sturges alone when the IQR is zero).
//!
//! The bin count never exceeds the larger of the Sturges count and the sample
//! size. A nearly constant sample with one outlier has an IQR close to zero,
//! and the uncapped Freedman-Diaconis count can reach billions of bins.

use crate::error::{StatsError, check_samples, sorted_copy};
use crate::percentiles::percentile_of_sorted;
use serde::{Deserialize, Serialize};

/// Equal-width histogram of a sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Histogram {
    /// Bin edges, `counts.len() + 1` values ascending
    pub edges: Vec<f64>,
    /// Samples per bin; the last bin includes its right edge
    pub counts: Vec<usize>,
    /// Count normalised so the histogram integrates to 1
    pub density: Vec<f64>,
}

impl Histogram {
    /// Number of bins
    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    /// Width of every bin
    pub fn bin_width(&self) -> f64 {
        if self.edges.len() < 2 {
            0.0
        } else {
            self.edges[1] - self.edges[0]
        }
    }

    /// Midpoint of each bin
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| 0.5 * (w[0] + w[1])).collect()
    }
}

/// Number of bins picked by the "auto" rule, capped at `max(sturges, n)`
fn auto_bin_count(sorted: &[f64]) -> usize {
    let n = sorted.len() as f64;
    let range = sorted[sorted.len() - 1] - sorted[0];
    if range <= 0.0 {
        return 1;
    }

    let sturges_bins = (n.log2() + 1.0).ceil();
    let iqr = percentile_of_sorted(sorted, 75.0) - percentile_of_sorted(sorted, 25.0);
    let fd = 2.0 * iqr * n.powf(-1.0 / 3.0);
    // The narrower width wins, so the larger count
    let auto_bins = if fd > 0.0 {
        (range / fd).ceil().max(sturges_bins)
    } else {
        sturges_bins
    };

    // Clamp in f64; the cast happens only once the count is bounded
    let bins = auto_bins.min(sturges_bins.max(n));
    (bins as usize).max(1)
}

/// Build a histogram with automatically chosen bins
pub fn compute_histogram(samples: &[f64]) -> Result<Histogram, StatsError> {
    check_samples(samples)?;

    let sorted = sorted_copy(samples);
    let bins = auto_bin_count(&sorted);

    let (mut lo, mut hi) = (sorted[0], sorted[sorted.len() - 1]);
    if hi <= lo {
        lo -= 0.5;
        hi += 0.5;
    }
    let width = (hi - lo) / bins as f64;

    let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * width).collect();
    edges[bins] = hi;

    let mut counts = vec![0usize; bins];
    for &x in &sorted {
        let idx = (((x - lo) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }

    let total = sorted.len() as f64;
    let density = counts.iter().map(|&c| c as f64 / (total * width)).collect();

    Ok(Histogram {
        edges,
        counts,
        density,
    })
}
