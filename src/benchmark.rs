//! Benchmark results built on top of the moments engine.
//!
//! A [`BenchmarkTestResult`] holds the raw per-iteration scores of one
//! benchmark together with their [`DistributionStatistics`], quartiles, and
//! mean error. Results of repeated runs merge by key, and a run can be
//! compared against a baseline run of the same benchmark with a two-sample
//! Kolmogorov–Smirnov test on the outlier-filtered scores.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::ComparisonConfig;
use crate::error::{Error, Result};
use crate::moments::DistributionStatistics;
use crate::stats::{ks_two_sample, mean_error_at, quartiles, Quartiles};

// ============================================================================
// Identity
// ============================================================================

/// Identifies one benchmark method in one mode.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkId {
    pub package_name: String,
    pub class_name: String,
    pub method_name: String,
    pub mode: String,
}

impl BenchmarkId {
    pub fn new(
        package_name: impl Into<String>,
        class_name: impl Into<String>,
        method_name: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        Self {
            package_name: package_name.into(),
            class_name: class_name.into(),
            method_name: method_name.into(),
            mode: mode.into(),
        }
    }

    /// Splits a fully qualified `package.Class.method` name.
    ///
    /// Benchmark parameters are appended to the method name, sorted by
    /// name, as `method[ a=1, b=2 ]`, so parameterized variants get
    /// distinct keys.
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use benchmark_moments::benchmark::BenchmarkId;
    ///
    /// let params = BTreeMap::from([("size".to_string(), "10".to_string())]);
    /// let id = BenchmarkId::parse("org.acme.SortBench.quick", &params, "avgt");
    /// assert_eq!(id.package_name, "org.acme");
    /// assert_eq!(id.class_name, "SortBench");
    /// assert_eq!(id.method_name, "quick[ size=10 ]");
    /// assert_eq!(id.key(), "org.acme.SortBench.quick[ size=10 ] - avgt");
    /// ```
    pub fn parse(benchmark: &str, params: &BTreeMap<String, String>, mode: &str) -> Self {
        let mut parts = benchmark.rsplitn(3, '.');
        let method = parts.next().unwrap_or_default();
        let class_name = parts.next().unwrap_or_default();
        let package_name = parts.next().unwrap_or_default();

        let method_name = if params.is_empty() {
            method.to_string()
        } else {
            let joined = params
                .iter()
                .map(|(name, value)| format!("{name}={value}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("{method}[ {joined} ]")
        };

        Self::new(package_name, class_name, method_name, mode)
    }

    /// `package.Class.method - mode`, the merge and comparison key.
    pub fn key(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for BenchmarkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{} - {}",
            self.package_name, self.class_name, self.method_name, self.mode
        )
    }
}

/// How a benchmark was run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSettings {
    pub threads: u32,
    pub repetitions: u32,
    pub warmup_iterations: u32,
    pub measurement_iterations: u32,
    pub warmup_time_ms: u64,
    pub measurement_time_ms: u64,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            threads: 1,
            repetitions: 1,
            warmup_iterations: 0,
            measurement_iterations: 0,
            warmup_time_ms: 0,
            measurement_time_ms: 0,
        }
    }
}

// ============================================================================
// Single benchmark
// ============================================================================

/// Outcome of comparing a run with its baseline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BaselineComparison {
    /// Kolmogorov–Smirnov distance between the filtered score sets.
    pub ks_statistic: f64,
    pub p_value: f64,
    pub statistics: DistributionStatistics,
    pub quartiles: Quartiles,
    pub measurements: Vec<f64>,
}

/// Scores of one benchmark and the statistics derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkTestResult {
    #[serde(flatten)]
    id: BenchmarkId,
    settings: RunSettings,
    score_units: String,
    statistics: DistributionStatistics,
    quartiles: Quartiles,
    mean_error: Option<f64>,
    raw_measurements: Vec<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    baseline: Option<BaselineComparison>,
}

impl BenchmarkTestResult {
    /// Summarizes the raw per-iteration scores of one benchmark.
    ///
    /// An empty score list yields the empty aggregate and zero quartiles.
    pub fn new(
        id: BenchmarkId,
        settings: RunSettings,
        score_units: impl Into<String>,
        raw_measurements: Vec<f64>,
        config: &ComparisonConfig,
    ) -> Self {
        let statistics: DistributionStatistics = raw_measurements.iter().collect();
        Self::with_statistics(
            id,
            settings,
            score_units.into(),
            raw_measurements,
            statistics,
            config,
        )
    }

    fn with_statistics(
        id: BenchmarkId,
        settings: RunSettings,
        score_units: String,
        raw_measurements: Vec<f64>,
        statistics: DistributionStatistics,
        config: &ComparisonConfig,
    ) -> Self {
        Self {
            id,
            settings,
            score_units,
            quartiles: quartiles(&raw_measurements).unwrap_or_default(),
            mean_error: mean_error_at(&statistics, config.mean_error_confidence),
            statistics,
            raw_measurements,
            baseline: None,
        }
    }

    pub fn id(&self) -> &BenchmarkId {
        &self.id
    }

    pub fn key(&self) -> String {
        self.id.key()
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    pub fn score_units(&self) -> &str {
        &self.score_units
    }

    pub fn statistics(&self) -> &DistributionStatistics {
        &self.statistics
    }

    pub fn quartiles(&self) -> &Quartiles {
        &self.quartiles
    }

    /// Half-width of the mean's confidence interval; `None` below three scores.
    pub fn mean_error(&self) -> Option<f64> {
        self.mean_error
    }

    pub fn raw_measurements(&self) -> &[f64] {
        &self.raw_measurements
    }

    pub fn baseline(&self) -> Option<&BaselineComparison> {
        self.baseline.as_ref()
    }

    pub fn p_value(&self) -> Option<f64> {
        self.baseline.as_ref().map(|b| b.p_value)
    }

    /// `true` if a baseline comparison was made.
    pub fn has_baseline_comparison(&self) -> bool {
        self.baseline.is_some()
    }

    /// `true` if the scores differ from the baseline's at `min_allowed_p_value`.
    pub fn is_regression(&self, min_allowed_p_value: f64) -> bool {
        self.p_value().is_some_and(|p| p < min_allowed_p_value)
    }

    /// Raw scores inside the Tukey fences at `factor` × IQR.
    pub fn without_outliers(&self, factor: f64) -> Vec<f64> {
        self.quartiles.filter_outliers(&self.raw_measurements, factor)
    }

    /// Combines two runs of the same benchmark.
    ///
    /// Scores are concatenated, repetitions summed, and the moments merged
    /// without re-folding. Other settings and the units come from `self`;
    /// any baseline comparison is dropped.
    ///
    /// # Errors
    /// [`Error::MismatchedBenchmark`] if the keys differ.
    pub fn merge(&self, other: &Self, config: &ComparisonConfig) -> Result<Self> {
        if self.id != other.id {
            return Err(Error::mismatched(self.key(), other.key()));
        }
        debug!(
            key = %self.id,
            left = self.raw_measurements.len(),
            right = other.raw_measurements.len(),
            "merging benchmark runs"
        );

        let mut raw =
            Vec::with_capacity(self.raw_measurements.len() + other.raw_measurements.len());
        raw.extend_from_slice(&self.raw_measurements);
        raw.extend_from_slice(&other.raw_measurements);

        let settings = RunSettings {
            repetitions: self.settings.repetitions + other.settings.repetitions,
            ..self.settings
        };

        Ok(Self::with_statistics(
            self.id.clone(),
            settings,
            self.score_units.clone(),
            raw,
            self.statistics.merge(&other.statistics),
            config,
        ))
    }

    /// Attaches a comparison with `baseline`.
    ///
    /// Without a baseline, or with one that has no scores, the result is
    /// returned without a comparison.
    ///
    /// # Errors
    /// [`Error::MismatchedBenchmark`] if the baseline is a different benchmark.
    pub fn compare_with_baseline(
        &self,
        baseline: Option<&Self>,
        config: &ComparisonConfig,
    ) -> Result<Self> {
        let mut compared = Self {
            baseline: None,
            ..self.clone()
        };
        let Some(baseline) = baseline else {
            return Ok(compared);
        };
        if baseline.id != self.id {
            warn!(key = %self.id, baseline = %baseline.id, "baseline belongs to another benchmark");
            return Err(Error::mismatched(self.key(), baseline.key()));
        }

        let ours = self.without_outliers(config.outlier_fence);
        let theirs = baseline.without_outliers(config.outlier_fence);
        let Some(ks) = ks_two_sample(&ours, &theirs) else {
            debug!(key = %self.id, "no scores to compare with baseline");
            return Ok(compared);
        };
        debug!(key = %self.id, d = ks.statistic, p = ks.p_value, "compared with baseline");

        compared.baseline = Some(BaselineComparison {
            ks_statistic: ks.statistic,
            p_value: ks.p_value,
            statistics: baseline.statistics,
            quartiles: baseline.quartiles,
            measurements: baseline.raw_measurements.clone(),
        });
        Ok(compared)
    }
}

/// Unions two key → result maps, merging results present in both.
///
/// # Errors
/// [`Error::MismatchedBenchmark`] if a shared map key holds results of
/// different benchmarks.
pub fn merge_result_maps(
    mut left: BTreeMap<String, BenchmarkTestResult>,
    right: BTreeMap<String, BenchmarkTestResult>,
    config: &ComparisonConfig,
) -> Result<BTreeMap<String, BenchmarkTestResult>> {
    for (key, result) in right {
        let merged = match left.remove(&key) {
            Some(existing) => existing.merge(&result, config)?,
            None => result,
        };
        left.insert(key, merged);
    }
    Ok(left)
}

// ============================================================================
// Result set
// ============================================================================

/// All benchmark results of one build, ordered by [`BenchmarkId`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResults {
    results: Vec<BenchmarkTestResult>,
    min_allowed_p_value: f64,
}

impl BenchmarkResults {
    pub fn from_results(
        mut results: Vec<BenchmarkTestResult>,
        config: &ComparisonConfig,
    ) -> Self {
        results.sort_by(|a, b| a.id.cmp(&b.id));
        Self {
            results,
            min_allowed_p_value: config.min_allowed_p_value,
        }
    }

    /// Collects individual runs, merging repeated runs of a benchmark.
    pub fn from_runs(
        runs: impl IntoIterator<Item = BenchmarkTestResult>,
        config: &ComparisonConfig,
    ) -> Result<Self> {
        let merged = runs.into_iter().try_fold(BTreeMap::new(), |map, run| {
            merge_result_maps(map, BTreeMap::from([(run.key(), run)]), config)
        })?;
        Ok(Self::from_results(merged.into_values().collect(), config))
    }

    pub fn results(&self) -> &[BenchmarkTestResult] {
        &self.results
    }

    pub fn get(&self, key: &str) -> Option<&BenchmarkTestResult> {
        self.results.iter().find(|r| r.key() == key)
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    pub fn min_allowed_p_value(&self) -> f64 {
        self.min_allowed_p_value
    }

    /// `true` if any result carries a baseline comparison.
    pub fn has_p_value_results(&self) -> bool {
        self.results.iter().any(BenchmarkTestResult::has_baseline_comparison)
    }

    /// Results whose scores differ significantly from their baseline.
    pub fn regressions(&self) -> impl Iterator<Item = &BenchmarkTestResult> + '_ {
        self.results
            .iter()
            .filter(move |r| r.is_regression(self.min_allowed_p_value))
    }

    /// Compares every result with the baseline result of the same key.
    ///
    /// Benchmarks missing from the baseline keep no comparison.
    pub fn compare_with_baseline(
        &self,
        baseline: &BenchmarkResults,
        config: &ComparisonConfig,
    ) -> Result<Self> {
        let by_key: HashMap<String, &BenchmarkTestResult> =
            baseline.results.iter().map(|r| (r.key(), r)).collect();

        let results = self
            .results
            .par_iter()
            .map(|r| r.compare_with_baseline(by_key.get(&r.key()).copied(), config))
            .collect::<Result<Vec<_>>>()?;

        let compared = Self::from_results(results, config);
        info!(
            benchmarks = compared.len(),
            regressions = compared.regressions().count(),
            "compared results with baseline"
        );
        Ok(compared)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?).map_err(|e| Error::io(path, e))?;
        info!(path = %path.display(), benchmarks = self.len(), "wrote benchmark results");
        Ok(())
    }

    pub fn read_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        let results = Self::from_json(&json)?;
        debug!(path = %path.display(), benchmarks = results.len(), "read benchmark results");
        Ok(results)
    }
}

// ============================================================================
// Tests
// ============================================================================
