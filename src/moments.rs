//! Mergeable distribution statistics.
//!
//! [`DistributionStatistics`] is an immutable aggregate of a sample stream:
//! count, sums, running mean, the central moment sums M₂, M₃, M₄, and the
//! statistics derived from them. It evolves in two ways only:
//!
//! - [`aggregate`](DistributionStatistics::aggregate) folds one sample in
//!   (Welford's update extended to higher moments);
//! - [`merge`](DistributionStatistics::merge) combines two aggregates built
//!   over disjoint samples (Chan's pairwise update, Pébay's M₃/M₄ terms).
//!
//! Both return a new value. Because `merge` is commutative and associative,
//! partitions may be folded independently and reduced in any order; see the
//! [`FromParallelIterator`] impl for the rayon path.
//!
//! # Degenerate statistics
//!
//! Statistics that are undefined are reported as `0.0`, never `NaN`:
//! variance when `count < 2`, skewness and kurtosis when `M₂ == 0`
//! (fewer than two samples or a constant sample set). The empty aggregate
//! reports `0.0` for all of them as well.
//!
//! References:
//! - Welford (1962), *Technometrics* 4(3), pp. 419–420.
//! - Chan, Golub & LeVeque (1979), "Updating Formulae and a Pairwise
//!   Algorithm for Computing Sample Variances".
//! - Pébay (2008), Sandia Report SAND2008-6212.
//! - Terriberry (2007), "Computing Higher-Order Moments Online".

use std::iter::Sum;

use rayon::iter::{FromParallelIterator, IntoParallelIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

/// Streaming, mergeable moments of a sample distribution.
///
/// # Examples
/// ```
/// use benchmark_moments::moments::DistributionStatistics;
///
/// let stats: DistributionStatistics = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0]
///     .into_iter()
///     .collect();
/// assert_eq!(stats.count(), 10);
/// assert!((stats.mean() - 4.5).abs() < 1e-12);
/// assert!((stats.variance() - 9.166666666666666).abs() < 1e-9);
/// assert!(stats.skewness().abs() < 1e-12);
/// assert!((stats.kurtosis() - 1.7757575757575757).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DistributionStatistics {
    count: u64,
    sum: f64,
    sum_of_squares: f64,
    mean: f64,
    variance: f64,
    skewness: f64,
    kurtosis: f64,
    #[serde(with = "lower_bound")]
    minimum: f64,
    #[serde(with = "upper_bound")]
    maximum: f64,
    m2: f64,
    m3: f64,
    m4: f64,
}

impl DistributionStatistics {
    /// Creates the empty aggregate, the identity element of [`merge`](Self::merge).
    pub const fn new() -> Self {
        Self {
            count: 0,
            sum: 0.0,
            sum_of_squares: 0.0,
            mean: 0.0,
            variance: 0.0,
            skewness: 0.0,
            kurtosis: 0.0,
            minimum: f64::INFINITY,
            maximum: f64::NEG_INFINITY,
            m2: 0.0,
            m3: 0.0,
            m4: 0.0,
        }
    }

    /// Creates an aggregate holding exactly one sample.
    pub fn from_sample(x: f64) -> Self {
        Self {
            count: 1,
            sum: x,
            sum_of_squares: x * x,
            mean: x,
            minimum: x,
            maximum: x,
            ..Self::new()
        }
    }

    /// Folds one sample into the aggregate and returns the result.
    ///
    /// M₄ is computed before M₃ before M₂, each from the *prior* lower
    /// moments. The first sample is seeded directly so that huge values
    /// never square into an intermediate overflow.
    ///
    /// NaN and infinite samples are not rejected; they propagate through
    /// the floating-point arithmetic.
    #[must_use]
    pub fn aggregate(self, x: f64) -> Self {
        if self.count == 0 {
            return Self::from_sample(x);
        }

        let count = self.count + 1;
        let n = count as f64;
        let delta = x - self.mean;
        let delta_n = delta / n;
        let delta_n2 = delta_n * delta_n;
        let term = delta * delta_n * self.count as f64;

        let m4 = self.m4 + term * delta_n2 * (n * n - 3.0 * n + 3.0) + 6.0 * delta_n2 * self.m2
            - 4.0 * delta_n * self.m3;
        let m3 = self.m3 + term * delta_n * (n - 2.0) - 3.0 * delta_n * self.m2;
        let m2 = self.m2 + term;

        Self::from_moments(
            count,
            self.sum + x,
            self.sum_of_squares + x * x,
            self.mean + delta_n,
            self.minimum.min(x),
            self.maximum.max(x),
            [m2, m3, m4],
        )
    }

    /// Combines two aggregates computed over disjoint sample sets.
    ///
    /// The result matches folding the concatenated samples through
    /// [`aggregate`](Self::aggregate), up to rounding, and does not depend
    /// on argument order. Merging with an empty aggregate returns the other
    /// side unchanged.
    #[must_use]
    pub fn merge(&self, other: &Self) -> Self {
        if other.count == 0 {
            return *self;
        }
        if self.count == 0 {
            return *other;
        }

        let na = self.count as f64;
        let nb = other.count as f64;
        let count = self.count + other.count;
        let n = count as f64;
        let delta = other.mean - self.mean;
        let delta2 = delta * delta;
        let delta3 = delta2 * delta;
        let delta4 = delta2 * delta2;

        let m2 = self.m2 + other.m2 + delta2 * na * nb / n;

        let m3 = self.m3
            + other.m3
            + delta3 * na * nb * (na - nb) / (n * n)
            + 3.0 * delta * (na * other.m2 - nb * self.m2) / n;

        let m4 = self.m4
            + other.m4
            + delta4 * na * nb * (na * na - na * nb + nb * nb) / (n * n * n)
            + 6.0 * delta2 * (na * na * other.m2 + nb * nb * self.m2) / (n * n)
            + 4.0 * delta * (na * other.m3 - nb * self.m3) / n;

        Self::from_moments(
            count,
            self.sum + other.sum,
            self.sum_of_squares + other.sum_of_squares,
            self.mean + delta * (nb / n),
            self.minimum.min(other.minimum),
            self.maximum.max(other.maximum),
            [m2, m3, m4],
        )
    }

    /// Derives variance, skewness, and kurtosis from the moment sums.
    ///
    /// Shared by `aggregate` and `merge` so both apply the zero policy for
    /// undefined statistics identically.
    fn from_moments(
        count: u64,
        sum: f64,
        sum_of_squares: f64,
        mean: f64,
        minimum: f64,
        maximum: f64,
        [m2, m3, m4]: [f64; 3],
    ) -> Self {
        let n = count as f64;
        let variance = if count < 2 { 0.0 } else { m2 / (n - 1.0) };
        let (skewness, kurtosis) = if m2 == 0.0 {
            (0.0, 0.0)
        } else {
            (n.sqrt() * m3 / m2.powf(1.5), n * m4 / (m2 * m2))
        };

        Self {
            count,
            sum,
            sum_of_squares,
            mean,
            variance,
            skewness,
            kurtosis,
            minimum,
            maximum,
            m2,
            m3,
            m4,
        }
    }

    /// Returns `true` if no samples have been folded in.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    pub fn count(&self) -> u64 {
        self.count
    }

    pub fn sum(&self) -> f64 {
        self.sum
    }

    pub fn sum_of_squares(&self) -> f64 {
        self.sum_of_squares
    }

    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Sample variance (n − 1 denominator); `0.0` below two samples.
    pub fn variance(&self) -> f64 {
        self.variance
    }

    pub fn standard_deviation(&self) -> f64 {
        self.variance.sqrt()
    }

    /// Biased sample skewness `g₁ = √n · M₃ / M₂^(3/2)`.
    pub fn skewness(&self) -> f64 {
        self.skewness
    }

    /// Raw kurtosis `n · M₄ / M₂²` (a normal distribution gives about 3).
    pub fn kurtosis(&self) -> f64 {
        self.kurtosis
    }

    /// Smallest sample seen; `+∞` when empty.
    pub fn minimum(&self) -> f64 {
        self.minimum
    }

    /// Largest sample seen; `−∞` when empty.
    pub fn maximum(&self) -> f64 {
        self.maximum
    }

    /// Sum of squared deviations from the mean (M₂).
    pub fn m2(&self) -> f64 {
        self.m2
    }

    /// Sum of cubed deviations from the mean (M₃).
    pub fn m3(&self) -> f64 {
        self.m3
    }

    /// Sum of fourth-power deviations from the mean (M₄).
    pub fn m4(&self) -> f64 {
        self.m4
    }
}

impl Default for DistributionStatistics {
    fn default() -> Self {
        Self::new()
    }
}

impl FromIterator<f64> for DistributionStatistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        iter.into_iter().fold(Self::new(), Self::aggregate)
    }
}

impl<'a> FromIterator<&'a f64> for DistributionStatistics {
    fn from_iter<I: IntoIterator<Item = &'a f64>>(iter: I) -> Self {
        iter.into_iter().copied().collect()
    }
}

/// Folds each rayon split sequentially, then reduces the partial
/// aggregates with [`merge`](DistributionStatistics::merge).
impl FromParallelIterator<f64> for DistributionStatistics {
    fn from_par_iter<I>(par_iter: I) -> Self
    where
        I: IntoParallelIterator<Item = f64>,
    {
        par_iter
            .into_par_iter()
            .fold(Self::new, Self::aggregate)
            .reduce(Self::new, |a, b| a.merge(&b))
    }
}

impl Sum for DistributionStatistics {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::new(), |acc, part| acc.merge(&part))
    }
}

impl<'a> Sum<&'a DistributionStatistics> for DistributionStatistics {
    fn sum<I: Iterator<Item = &'a DistributionStatistics>>(iter: I) -> Self {
        iter.fold(Self::new(), |acc, part| acc.merge(part))
    }
}

// JSON has no infinities. The empty aggregate's bounds (`+∞` minimum,
// `−∞` maximum) are written as `null` and read back as that sentinel; any
// other non-finite bound is written by name ("Infinity", "-Infinity",
// "NaN") so it never collapses onto the sentinel.

mod lower_bound {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize_bound(*value, f64::INFINITY, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        super::deserialize_bound(f64::INFINITY, deserializer)
    }
}

mod upper_bound {
    use serde::{Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        super::serialize_bound(*value, f64::NEG_INFINITY, serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        super::deserialize_bound(f64::NEG_INFINITY, deserializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum BoundRepr {
    Number(f64),
    Named(String),
}

fn serialize_bound<S: serde::Serializer>(
    value: f64,
    empty: f64,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    if value == empty {
        serializer.serialize_none()
    } else if value.is_nan() {
        serializer.serialize_some("NaN")
    } else if value == f64::INFINITY {
        serializer.serialize_some("Infinity")
    } else if value == f64::NEG_INFINITY {
        serializer.serialize_some("-Infinity")
    } else {
        serializer.serialize_some(&value)
    }
}

fn deserialize_bound<'de, D: serde::Deserializer<'de>>(
    empty: f64,
    deserializer: D,
) -> Result<f64, D::Error> {
    match Option::<BoundRepr>::deserialize(deserializer)? {
        None => Ok(empty),
        Some(BoundRepr::Number(value)) => Ok(value),
        Some(BoundRepr::Named(name)) => match name.as_str() {
            "Infinity" => Ok(f64::INFINITY),
            "-Infinity" => Ok(f64::NEG_INFINITY),
            "NaN" => Ok(f64::NAN),
            other => Err(serde::de::Error::custom(format!(
                "expected a number, null, \"Infinity\", \"-Infinity\" or \"NaN\", got {other:?}"
            ))),
        },
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::SmallRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    const EPSILON: f64 = 1e-6;

    const HEAVY_TAIL: [f64; 20] = [
        -1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 7.0, 9.0, 9.0,
        9.0, 100.0,
    ];
    const SYMMETRIC: [f64; 16] = [
        -1.0, 0.0, 1.0, 1.0, 1.0, 2.0, 2.0, 3.0, 3.0, 4.0, 4.0, 5.0, 5.0, 5.0, 6.0, 7.0,
    ];
    const UNIFORM: [f64; 10] = [0.0, 1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0];
    const LEFT_SKEWED: [f64; 10] = [70.0, 68.0, 12.0, 59.0, 16.0, 66.0, 47.0, 52.0, 64.0, 74.0];

    /// (samples, mean, variance, skewness, kurtosis)
    fn known_values() -> Vec<(&'static [f64], f64, f64, f64, f64)> {
        vec![
            (&HEAVY_TAIL[..], 8.75, 470.1973684, 4.0008104, 17.3822174128),
            (&SYMMETRIC[..], 3.0, 5.2, 0.0, 2.0355029585),
            (&UNIFORM[..], 4.5, 9.16666667, 0.0, 1.77575757576),
            (&LEFT_SKEWED[..], 52.8, 485.288889, -1.050393, 2.619318657),
        ]
    }

    fn fold(data: &[f64]) -> DistributionStatistics {
        data.iter().collect()
    }

    fn assert_close(actual: f64, expected: f64, what: &str) {
        let tol = EPSILON * expected.abs().max(1.0);
        assert!(
            (actual - expected).abs() < tol,
            "{what}: expected {expected}, got {actual}"
        );
    }

    fn assert_equivalent(actual: &DistributionStatistics, expected: &DistributionStatistics) {
        assert_eq!(actual.count(), expected.count());
        assert_close(actual.sum(), expected.sum(), "sum");
        assert_close(actual.mean(), expected.mean(), "mean");
        assert_close(actual.variance(), expected.variance(), "variance");
        assert_close(actual.skewness(), expected.skewness(), "skewness");
        assert_close(actual.kurtosis(), expected.kurtosis(), "kurtosis");
        assert_eq!(actual.minimum(), expected.minimum());
        assert_eq!(actual.maximum(), expected.maximum());
    }

    // --- identity ---

    #[test]
    fn test_empty_is_identity() {
        let empty = DistributionStatistics::new();
        assert!(empty.is_empty());
        assert_eq!(empty.count(), 0);
        assert_eq!(empty.mean(), 0.0);
        assert_eq!(empty.variance(), 0.0);
        assert_eq!(empty.skewness(), 0.0);
        assert_eq!(empty.kurtosis(), 0.0);
        assert_eq!(empty.minimum(), f64::INFINITY);
        assert_eq!(empty.maximum(), f64::NEG_INFINITY);
        assert_eq!(empty, DistributionStatistics::default());
    }

    #[test]
    fn test_merge_empty_with_empty() {
        let empty = DistributionStatistics::new();
        assert_eq!(empty.merge(&empty), empty);
    }

    #[test]
    fn test_merge_with_empty_returns_other_side() {
        let stats = fold(&LEFT_SKEWED);
        let empty = DistributionStatistics::new();
        assert_eq!(stats.merge(&empty), stats);
        assert_eq!(empty.merge(&stats), stats);
    }

    // --- single sample ---

    #[test]
    fn test_single_sample() {
        let stats = DistributionStatistics::new().aggregate(42.5);
        assert_eq!(stats.count(), 1);
        assert_eq!(stats.sum(), 42.5);
        assert_eq!(stats.mean(), 42.5);
        assert_eq!(stats.minimum(), 42.5);
        assert_eq!(stats.maximum(), 42.5);
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.skewness(), 0.0);
        assert_eq!(stats.kurtosis(), 0.0);
        assert_eq!((stats.m2(), stats.m3(), stats.m4()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_single_sample_matches_from_sample() {
        for x in [-3.25, 0.0, 1e-300, 7.0, 1e166] {
            assert_eq!(
                DistributionStatistics::new().aggregate(x),
                DistributionStatistics::from_sample(x)
            );
        }
    }

    #[test]
    fn test_huge_first_sample_does_not_overflow() {
        let stats = DistributionStatistics::new().aggregate(1e200);
        assert_eq!(stats.m2(), 0.0);
        assert!(stats.variance().is_finite());
    }

    // --- degenerate policy ---

    #[test]
    fn test_constant_samples_report_zero() {
        let stats = fold(&[5.0; 8]);
        assert_eq!(stats.variance(), 0.0);
        assert_eq!(stats.skewness(), 0.0);
        assert_eq!(stats.kurtosis(), 0.0);
        assert_eq!(stats.standard_deviation(), 0.0);
    }

    #[test]
    fn test_constant_samples_merged_report_zero() {
        let a = fold(&[2.0, 2.0, 2.0]);
        let b = fold(&[2.0, 2.0]);
        let merged = a.merge(&b);
        assert_eq!(merged.count(), 5);
        assert_eq!(merged.variance(), 0.0);
        assert_eq!(merged.skewness(), 0.0);
        assert_eq!(merged.kurtosis(), 0.0);
    }

    #[test]
    fn test_merged_singletons_match_sequential() {
        let merged = DistributionStatistics::from_sample(1.0)
            .merge(&DistributionStatistics::from_sample(3.0));
        assert_equivalent(&merged, &fold(&[1.0, 3.0]));
        assert_close(merged.variance(), 2.0, "variance");
    }

    #[test]
    fn test_nan_sample_propagates() {
        let stats = fold(&[1.0, f64::NAN, 3.0]);
        assert_eq!(stats.count(), 3);
        assert!(stats.mean().is_nan());
    }

    // --- known values ---

    #[test]
    fn test_known_values_sequential() {
        for (data, mean, variance, skewness, kurtosis) in known_values() {
            let stats = fold(data);
            assert_close(stats.mean(), mean, "mean");
            assert_close(stats.variance(), variance, "variance");
            assert_close(stats.skewness(), skewness, "skewness");
            assert_close(stats.kurtosis(), kurtosis, "kurtosis");
            assert_close(stats.standard_deviation(), variance.sqrt(), "std dev");
        }
    }

    #[test]
    fn test_known_values_parallel() {
        for (data, mean, variance, skewness, kurtosis) in known_values() {
            let stats: DistributionStatistics = data.to_vec().into_par_iter().collect();
            assert_eq!(stats.count(), data.len() as u64);
            assert_close(stats.mean(), mean, "mean");
            assert_close(stats.variance(), variance, "variance");
            assert_close(stats.skewness(), skewness, "skewness");
            assert_close(stats.kurtosis(), kurtosis, "kurtosis");
        }
    }

    #[test]
    fn test_known_values_every_split_point() {
        for (data, ..) in known_values() {
            let sequential = fold(data);
            for k in 0..=data.len() {
                let merged = fold(&data[..k]).merge(&fold(&data[k..]));
                assert_equivalent(&merged, &sequential);
            }
        }
    }

    #[test]
    fn test_known_values_pairwise_tree() {
        for (data, mean, variance, skewness, kurtosis) in known_values() {
            let mut level: Vec<DistributionStatistics> =
                data.iter().map(|&x| DistributionStatistics::from_sample(x)).collect();
            while level.len() > 1 {
                level = level
                    .chunks(2)
                    .map(|pair| pair.iter().sum())
                    .collect();
            }
            let stats = level[0];
            assert_close(stats.mean(), mean, "mean");
            assert_close(stats.variance(), variance, "variance");
            assert_close(stats.skewness(), skewness, "skewness");
            assert_close(stats.kurtosis(), kurtosis, "kurtosis");
        }
    }

    #[test]
    fn test_sum_tracks_mean() {
        let stats = fold(&HEAVY_TAIL);
        assert_close(stats.sum(), stats.mean() * stats.count() as f64, "sum");
        assert_close(
            stats.sum_of_squares(),
            HEAVY_TAIL.iter().map(|x| x * x).sum(),
            "sum of squares",
        );
    }

    // --- min / max ---

    #[test]
    fn test_min_max_any_order() {
        let mut rng = SmallRng::seed_from_u64(7);
        let mut data = LEFT_SKEWED.to_vec();
        for _ in 0..20 {
            data.shuffle(&mut rng);
            let k = rng.random_range(0..=data.len());
            let stats = fold(&data[k..]).merge(&fold(&data[..k]));
            assert_eq!(stats.minimum(), 12.0);
            assert_eq!(stats.maximum(), 74.0);
        }
    }

    // --- numerical stability ---

    #[test]
    fn test_variance_large_offset() {
        // The Σx² form cancels catastrophically here.
        let data: Vec<f64> = (1..=5).map(|i| 1e9 + i as f64).collect();
        let stats = fold(&data);
        assert!(
            (stats.variance() - 2.5).abs() < 1e-5,
            "variance of offset data should be ~2.5, got {}",
            stats.variance()
        );
    }

    // --- serialization ---

    #[test]
    fn test_json_round_trip() {
        let stats = fold(&HEAVY_TAIL);
        let json = serde_json::to_string(&stats).unwrap();
        let back: DistributionStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, stats);
    }

    #[test]
    fn test_json_round_trip_empty() {
        let json = serde_json::to_string(&DistributionStatistics::new()).unwrap();
        assert!(json.contains("\"minimum\":null"), "{json}");
        assert!(json.contains("\"maximum\":null"), "{json}");
        let back: DistributionStatistics = serde_json::from_str(&json).unwrap();
        assert_eq!(back, DistributionStatistics::new());
    }

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Bounds {
        #[serde(with = "super::lower_bound")]
        low: f64,
        #[serde(with = "super::upper_bound")]
        high: f64,
    }

    #[test]
    fn test_json_bounds_only_sentinel_is_null() {
        let empty = Bounds {
            low: f64::INFINITY,
            high: f64::NEG_INFINITY,
        };
        assert_eq!(serde_json::to_string(&empty).unwrap(), r#"{"low":null,"high":null}"#);

        let flipped = Bounds {
            low: f64::NEG_INFINITY,
            high: f64::INFINITY,
        };
        let json = serde_json::to_string(&flipped).unwrap();
        assert_eq!(json, r#"{"low":"-Infinity","high":"Infinity"}"#);
        assert_eq!(serde_json::from_str::<Bounds>(&json).unwrap(), flipped);

        let back: Bounds = serde_json::from_str(r#"{"low":null,"high":null}"#).unwrap();
        assert_eq!(back, empty);
    }

    #[test]
    fn test_json_bounds_nan_by_name() {
        let json = serde_json::to_string(&Bounds {
            low: f64::NAN,
            high: 3.5,
        })
        .unwrap();
        assert_eq!(json, r#"{"low":"NaN","high":3.5}"#);
        let back: Bounds = serde_json::from_str(&json).unwrap();
        assert!(back.low.is_nan());
        assert_eq!(back.high, 3.5);
    }

    #[test]
    fn test_json_rejects_unknown_bound_name() {
        let mut value = serde_json::to_value(fold(&UNIFORM)).unwrap();
        value["maximum"] = serde_json::Value::from("huge");
        assert!(serde_json::from_value::<DistributionStatistics>(value).is_err());
    }

    #[test]
    fn test_json_field_names() {
        let value = serde_json::to_value(fold(&UNIFORM)).unwrap();
        for field in [
            "count", "sum", "sumOfSquares", "mean", "variance", "skewness", "kurtosis",
            "minimum", "maximum", "m2", "m3", "m4",
        ] {
            assert!(value.get(field).is_some(), "missing field {field}");
        }
        assert!(value.get("standardDeviation").is_none());
    }

    #[test]
    fn test_deserialized_aggregate_resumes() {
        let first = fold(&HEAVY_TAIL[..11]);
        let json = serde_json::to_string(&first).unwrap();
        let restored: DistributionStatistics = serde_json::from_str(&json).unwrap();

        let resumed = HEAVY_TAIL[11..].iter().fold(restored, |s, &x| s.aggregate(x));
        assert_equivalent(&resumed, &fold(&HEAVY_TAIL));

        let merged = restored.merge(&fold(&HEAVY_TAIL[11..]));
        assert_equivalent(&merged, &fold(&HEAVY_TAIL));
    }
}
