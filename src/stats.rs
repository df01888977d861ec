//! Slice-level statistics for benchmark measurements.
//!
//! Everything here needs the full sample (sorting or pairing), so it sits
//! next to, not inside, the streaming [`DistributionStatistics`].
//!
//! # Algorithms
//!
//! - **Percentile**: the estimator JMH reports through Commons Math,
//!   position `p·(n+1)/100` with linear interpolation (Hyndman & Fan
//!   type 6). Reference: Hyndman & Fan (1996), *The American
//!   Statistician* 50(4).
//! - **Outliers**: Tukey fences at `Q1 − k·IQR` and `Q3 + k·IQR`.
//! - **Mean error**: half-width of the two-sided Student's t confidence
//!   interval of the mean.
//! - **Two-sample Kolmogorov–Smirnov**: supremum distance of the empirical
//!   CDFs. Exact p-value by lattice-path counting below
//!   [`KS_EXACT_PRODUCT_LIMIT`], asymptotic Kolmogorov tail above it.
//!   Reference: Hodges (1958), *Arkiv för Matematik* 3(5).

use serde::{Deserialize, Serialize};

use crate::moments::DistributionStatistics;
use crate::special::{kolmogorov_survival, t_distribution_quantile};

// ============================================================================
// Compensated Summation
// ============================================================================

/// Neumaier compensated summation.
///
/// Captures the low-order bits lost by each addition, whichever operand
/// is larger. Used where raw measurement vectors are concatenated and
/// summed again.
///
/// Reference: Neumaier (1974), *ZAMM* 54(1), pp. 39–51.
///
/// # Examples
/// ```
/// use benchmark_moments::stats::kahan_sum;
/// assert_eq!(kahan_sum(&[1e16, 1.0, -1e16]), 1.0);
/// ```
pub fn kahan_sum(data: &[f64]) -> f64 {
    let (sum, compensation) = data.iter().fold((0.0_f64, 0.0_f64), |(sum, c), &x| {
        let t = sum + x;
        let lost = if sum.abs() >= x.abs() {
            (sum - t) + x
        } else {
            (x - t) + sum
        };
        (t, c + lost)
    });
    sum + compensation
}

fn sorted_copy(data: &[f64]) -> Vec<f64> {
    let mut sorted = data.to_vec();
    sorted.sort_unstable_by(f64::total_cmp);
    sorted
}

// ============================================================================
// Percentiles
// ============================================================================

/// Computes the `p`-th percentile, `p ∈ (0, 100]`.
///
/// # Algorithm
/// With `pos = p·(n + 1)/100` over the sorted data: `pos < 1` gives the
/// minimum, `pos ≥ n` the maximum, otherwise the value interpolates
/// linearly between the `⌊pos⌋`-th and next order statistic (1-based).
///
/// # Returns
/// - `None` if `data` is empty or `p` is outside `(0, 100]`.
///
/// # Examples
/// ```
/// use benchmark_moments::stats::percentile;
/// let data = [3.0, 3.0, 3.0, 3.0, 4.0, 4.0, 4.0, 4.0];
/// assert_eq!(percentile(&data, 50.0), Some(3.5));
/// assert_eq!(percentile(&data, 25.0), Some(3.0));
/// ```
pub fn percentile(data: &[f64], p: f64) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    percentile_sorted(&sorted_copy(data), p)
}

/// [`percentile`] on data already sorted in non-decreasing order.
pub fn percentile_sorted(sorted: &[f64], p: f64) -> Option<f64> {
    let n = sorted.len();
    if n == 0 || !(p > 0.0 && p <= 100.0) {
        return None;
    }
    if n == 1 {
        return Some(sorted[0]);
    }

    let pos = p * (n + 1) as f64 / 100.0;
    if pos < 1.0 {
        return Some(sorted[0]);
    }
    if pos >= n as f64 {
        return Some(sorted[n - 1]);
    }
    let index = pos.floor() as usize;
    let fraction = pos - pos.floor();
    let lower = sorted[index - 1];
    let upper = sorted[index];
    Some(lower + fraction * (upper - lower))
}

// ============================================================================
// Quartiles and Outlier Fences
// ============================================================================

/// First quartile, median, and third quartile of a sample.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Quartiles {
    pub first: f64,
    pub median: f64,
    pub third: f64,
}

impl Quartiles {
    pub fn interquartile_range(&self) -> f64 {
        (self.third - self.first).abs()
    }

    /// Tukey fences `(Q1 − factor·IQR, Q3 + factor·IQR)`.
    pub fn fences(&self, factor: f64) -> (f64, f64) {
        let spread = self.interquartile_range() * factor;
        (self.first - spread, self.third + spread)
    }

    /// Returns the values inside the fences, bounds included, in input order.
    pub fn filter_outliers(&self, data: &[f64], factor: f64) -> Vec<f64> {
        let (low, high) = self.fences(factor);
        data.iter()
            .copied()
            .filter(|x| (low..=high).contains(x))
            .collect()
    }
}

/// Computes the quartiles of `data` with the [`percentile`] estimator.
///
/// # Returns
/// - `None` if `data` is empty.
pub fn quartiles(data: &[f64]) -> Option<Quartiles> {
    if data.is_empty() {
        return None;
    }
    let sorted = sorted_copy(data);
    Some(Quartiles {
        first: percentile_sorted(&sorted, 25.0)?,
        median: percentile_sorted(&sorted, 50.0)?,
        third: percentile_sorted(&sorted, 75.0)?,
    })
}

// ============================================================================
// Mean Error
// ============================================================================

/// Half-width of the two-sided `confidence` interval of the mean.
///
/// ```text
/// t_{1 − (1 − c)/2, n − 1} · s / √n
/// ```
///
/// # Returns
/// - `None` if fewer than three samples were aggregated or `confidence`
///   is outside `(0, 1)`.
pub fn mean_error_at(stats: &DistributionStatistics, confidence: f64) -> Option<f64> {
    if stats.count() <= 2 || !(confidence > 0.0 && confidence < 1.0) {
        return None;
    }
    let n = stats.count() as f64;
    let t = t_distribution_quantile(1.0 - (1.0 - confidence) / 2.0, n - 1.0);
    Some(t * stats.standard_deviation() / n.sqrt())
}

// ============================================================================
// Two-Sample Kolmogorov–Smirnov Test
// ============================================================================

/// Below this `n·m` the KS p-value is computed exactly.
pub const KS_EXACT_PRODUCT_LIMIT: usize = 10_000;

/// Outcome of a two-sample Kolmogorov–Smirnov test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KsTest {
    /// Supremum distance between the two empirical CDFs, in `[0, 1]`.
    pub statistic: f64,
    /// Probability of a distance at least this large if both samples
    /// come from the same distribution.
    pub p_value: f64,
}

/// Two-sample Kolmogorov–Smirnov test.
///
/// # Algorithm
/// Both samples are walked in merged order; ties are stepped over together
/// in both samples before the distance is measured, so repeated values do
/// not inflate `D`. The distance is tracked as the integer `|i·m − j·n|`
/// and divided by `n·m` once.
///
/// For `n·m < KS_EXACT_PRODUCT_LIMIT` the p-value is exact: the fraction
/// of the `C(n+m, n)` ways to split the pooled values whose distance
/// reaches the observed one, counted as monotone lattice paths that stay
/// inside the band (checked only at tie-block boundaries, which makes the
/// count exact under ties as well). Larger samples use the asymptotic
/// Kolmogorov distribution at `λ = √(nm/(n+m))·D`.
///
/// # Complexity
/// Time: O((n + m) log(n + m)) plus O(n·m) for the exact p-value,
/// Space: O(n + m)
///
/// # Returns
/// - `None` if either sample is empty or contains NaN.
///
/// # Examples
/// ```
/// use benchmark_moments::stats::ks_two_sample;
/// let same = ks_two_sample(&[1.0, 2.0, 3.0], &[3.0, 2.0, 1.0]).unwrap();
/// assert_eq!(same.statistic, 0.0);
/// assert_eq!(same.p_value, 1.0);
///
/// // 2 of the C(6, 3) = 20 splits are fully separated.
/// let apart = ks_two_sample(&[1.0, 2.0, 3.0], &[10.0, 11.0, 12.0]).unwrap();
/// assert_eq!(apart.statistic, 1.0);
/// assert!((apart.p_value - 0.1).abs() < 1e-12);
/// ```
pub fn ks_two_sample(x: &[f64], y: &[f64]) -> Option<KsTest> {
    if x.is_empty() || y.is_empty() || x.iter().chain(y).any(|v| v.is_nan()) {
        return None;
    }
    let (xs, ys) = (sorted_copy(x), sorted_copy(y));
    let (n, m) = (xs.len(), ys.len());

    // boundary[k]: a tie block ends after the k-th pooled value
    let mut boundary = vec![false; n + m + 1];
    let (mut i, mut j) = (0, 0);
    let mut gap = 0_usize;
    while i < n || j < m {
        let value = match (xs.get(i), ys.get(j)) {
            (Some(&a), Some(&b)) => a.min(b),
            (Some(&a), None) => a,
            (None, Some(&b)) => b,
            (None, None) => break,
        };
        while i < n && xs[i] <= value {
            i += 1;
        }
        while j < m && ys[j] <= value {
            j += 1;
        }
        gap = gap.max((i * m).abs_diff(j * n));
        boundary[i + j] = true;
    }

    let statistic = gap as f64 / (n * m) as f64;
    let p_value = if gap == 0 {
        1.0
    } else if n * m < KS_EXACT_PRODUCT_LIMIT {
        ks_exact_p_value(n, m, gap, &boundary)
    } else {
        let effective = ((n * m) as f64 / (n + m) as f64).sqrt();
        kolmogorov_survival(effective * statistic)
    };
    Some(KsTest { statistic, p_value })
}

/// `P(D ≥ gap / nm)` over all splits of the pooled values into `n` and `m`.
fn ks_exact_p_value(n: usize, m: usize, gap: usize, boundary: &[bool]) -> f64 {
    // inside[j]: paths from (0, 0) to (i, j) that never reached the gap
    let mut inside = vec![0.0_f64; m + 1];
    for i in 0..=n {
        for j in 0..=m {
            let reaching = if i == 0 && j == 0 {
                1.0
            } else {
                let from_x = if i > 0 { inside[j] } else { 0.0 };
                let from_y = if j > 0 { inside[j - 1] } else { 0.0 };
                from_x + from_y
            };
            let escaped = boundary[i + j] && (i * m).abs_diff(j * n) >= gap;
            inside[j] = if escaped { 0.0 } else { reaching };
        }
    }
    let total = (1..=n).fold(1.0_f64, |acc, k| acc * (m + k) as f64 / k as f64);
    (1.0 - inside[m] / total).clamp(0.0, 1.0)
}

// ============================================================================
// Tests
// ============================================================================
