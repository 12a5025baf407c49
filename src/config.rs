//! Thresholds used by the insight rules and chart helpers.
//!
//! Settings are plain JSON; any field left out keeps its default:
//!
//! ```json
//! { "correlation_threshold": 0.8, "cardinality_ceiling": 12 }
//! ```

use crate::error::{AnalysisError, Result, ResultExt as _};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_CARDINALITY_CEILING: usize = 10;
pub const DEFAULT_CORRELATION_THRESHOLD: f64 = 0.7;
pub const DEFAULT_MODERATE_CORRELATION_THRESHOLD: f64 = 0.5;
pub const DEFAULT_VARIABILITY_THRESHOLD: f64 = 0.5;
pub const DEFAULT_HISTOGRAM_BINS: usize = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InsightConfig {
    /// Largest distinct-value count still summarised as a category.
    pub cardinality_ceiling: usize,
    /// |r| above this is a strong correlation.
    pub correlation_threshold: f64,
    /// |r| above this (and not strong) is a moderate correlation.
    pub moderate_correlation_threshold: f64,
    /// Coefficient of variation above this is flagged as high variability.
    pub variability_threshold: f64,
    pub histogram_bins: usize,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            cardinality_ceiling: DEFAULT_CARDINALITY_CEILING,
            correlation_threshold: DEFAULT_CORRELATION_THRESHOLD,
            moderate_correlation_threshold: DEFAULT_MODERATE_CORRELATION_THRESHOLD,
            variability_threshold: DEFAULT_VARIABILITY_THRESHOLD,
            histogram_bins: DEFAULT_HISTOGRAM_BINS,
        }
    }
}

impl InsightConfig {
    pub fn validate(&self) -> Result<()> {
        if self.cardinality_ceiling < 2 {
            return Err(AnalysisError::Config(format!(
                "cardinality_ceiling must be at least 2, got {}",
                self.cardinality_ceiling
            )));
        }
        for (name, value) in [
            ("correlation_threshold", self.correlation_threshold),
            (
                "moderate_correlation_threshold",
                self.moderate_correlation_threshold,
            ),
            ("variability_threshold", self.variability_threshold),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(AnalysisError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if self.moderate_correlation_threshold > self.correlation_threshold {
            return Err(AnalysisError::Config(
                "moderate_correlation_threshold exceeds correlation_threshold".to_owned(),
            ));
        }
        if self.histogram_bins == 0 {
            return Err(AnalysisError::Config(
                "histogram_bins must be at least 1".to_owned(),
            ));
        }
        Ok(())
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }
}

pub fn load_config(path: &Path) -> Result<InsightConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config = InsightConfig::from_json(&content)?;
    log::info!("Loaded settings from {}", path.display());
    Ok(config)
}

pub fn save_config(config: &InsightConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let content = serde_json::to_string_pretty(config)?;
    std::fs::write(path, content)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() -> anyhow::Result<()> {
        let config = InsightConfig::from_json(r#"{ "correlation_threshold": 0.8 }"#)?;
        assert!((config.correlation_threshold - 0.8).abs() < f64::EPSILON);
        assert_eq!(config.cardinality_ceiling, DEFAULT_CARDINALITY_CEILING);
        assert_eq!(config.histogram_bins, DEFAULT_HISTOGRAM_BINS);
        Ok(())
    }

    #[test]
    fn test_rejects_inverted_thresholds() {
        let result = InsightConfig::from_json(
            r#"{ "correlation_threshold": 0.4, "moderate_correlation_threshold": 0.6 }"#,
        );
        assert!(
            matches!(result, Err(AnalysisError::Config(_))),
            "moderate above strong must be rejected"
        );
    }

    #[test]
    fn test_rejects_tiny_ceiling() {
        let config = InsightConfig {
            cardinality_ceiling: 1,
            ..InsightConfig::default()
        };
        assert!(config.validate().is_err(), "ceiling below 2 is invalid");
    }

    #[test]
    fn test_save_then_load() -> anyhow::Result<()> {
        let path = std::env::temp_dir().join(format!("datalens_config_{}.json", std::process::id()));
        let config = InsightConfig {
            variability_threshold: 0.9,
            ..InsightConfig::default()
        };
        save_config(&config, &path)?;
        let loaded = load_config(&path)?;
        std::fs::remove_file(&path)?;
        assert_eq!(loaded, config);
        Ok(())
    }
}
