//! Settings for summarizing and comparing benchmark runs.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Thresholds applied when results are built and compared to a baseline.
///
/// Missing fields fall back to [`ComparisonConfig::default`]:
///
/// ```
/// use benchmark_moments::config::ComparisonConfig;
///
/// let config = ComparisonConfig::from_json(r#"{ "minAllowedPValue": 0.01 }"#).unwrap();
/// assert_eq!(config.min_allowed_p_value, 0.01);
/// assert_eq!(config.outlier_fence, 1.5);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ComparisonConfig {
    /// A baseline comparison with a p-value below this is a regression.
    pub min_allowed_p_value: f64,
    /// Tukey fence multiplier applied to the interquartile range before
    /// the distribution test.
    pub outlier_fence: f64,
    /// Confidence level of the reported mean error.
    pub mean_error_confidence: f64,
}

impl Default for ComparisonConfig {
    fn default() -> Self {
        Self {
            min_allowed_p_value: 0.05,
            outlier_fence: 1.5,
            mean_error_confidence: 0.999,
        }
    }
}

impl ComparisonConfig {
    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every threshold is inside its meaningful range.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_allowed_p_value) {
            return Err(Error::InvalidConfig(format!(
                "minAllowedPValue must be in [0, 1], got {}",
                self.min_allowed_p_value
            )));
        }
        if !(self.outlier_fence.is_finite() && self.outlier_fence >= 0.0) {
            return Err(Error::InvalidConfig(format!(
                "outlierFence must be finite and non-negative, got {}",
                self.outlier_fence
            )));
        }
        if !(self.mean_error_confidence > 0.0 && self.mean_error_confidence < 1.0) {
            return Err(Error::InvalidConfig(format!(
                "meanErrorConfidence must be in (0, 1), got {}",
                self.mean_error_confidence
            )));
        }
        Ok(())
    }
}
