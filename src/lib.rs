//! # benchmark-moments
//!
//! Distribution statistics for benchmark measurements.
//!
//! The core is [`DistributionStatistics`], a single-pass, mergeable
//! aggregate of count, mean, variance, skewness, and kurtosis. Partial
//! aggregates built on separate threads or separate runs combine exactly
//! as if every sample had been folded into one.
//!
//! ## Modules
//!
//! - [`moments`] — The streaming/mergeable moments engine
//! - [`stats`] — Percentiles, quartiles, outlier fences, mean error, KS test
//! - [`special`] — Student's t and Kolmogorov distribution functions
//! - [`benchmark`] — Per-benchmark results, run merging, baseline comparison
//! - [`config`] — Comparison thresholds
//! - [`error`] — Crate error type
//!
//! ## Design Philosophy
//!
//! - **Numerical stability first**: central moments updated in place
//!   (Welford, Pébay) rather than from raw power sums
//! - **No `NaN` in results**: undefined statistics report `0.0` or `None`
//! - **Property-based testing**: merge invariants verified via proptest

pub mod benchmark;
pub mod config;
pub mod error;
pub mod moments;
pub mod special;
pub mod stats;

pub use benchmark::{BenchmarkId, BenchmarkResults, BenchmarkTestResult};
pub use config::ComparisonConfig;
pub use error::{Error, Result};
pub use moments::DistributionStatistics;
