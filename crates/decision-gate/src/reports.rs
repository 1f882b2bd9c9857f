//! The three caller-supplied input reports the gate evaluates.
//!
//! Optional fields default permissively; only structurally required fields
//! (the diversity score) fail deserialization when absent, with an error
//! naming the field.

use crate::error::GateError;
use serde::{Deserialize, Serialize};

/// Results of the strategy-validation stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Whether the known validation-framework defect has been fixed.
    #[serde(default)]
    pub validation_fixed: bool,
    /// Execution success rate in percent, when reported directly.
    #[serde(default)]
    pub execution_success_rate: Option<f64>,
    /// Nested execution statistics, the alternative source of the rate.
    #[serde(default)]
    pub execution: Option<ExecutionStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionStats {
    #[serde(default)]
    pub success_rate: Option<f64>,
    #[serde(default)]
    pub successful: Option<u64>,
    #[serde(default)]
    pub total: Option<u64>,
}

impl ValidationReport {
    pub fn from_json_str(raw: &str) -> Result<Self, GateError> {
        serde_json::from_str(raw).map_err(|source| GateError::InvalidReport {
            report: "validation",
            source,
        })
    }

    /// The effective execution success rate, in percent.
    ///
    /// A directly reported nonzero rate wins; otherwise the rate is computed
    /// from the successful/total pair; with no evidence at all the rate
    /// defaults to 100%. Absence of evidence of failure is treated as
    /// success: a permissive default, preserved for compatibility with
    /// existing gating outcomes.
    pub fn effective_execution_rate(&self) -> f64 {
        let direct = self
            .execution_success_rate
            .or_else(|| self.execution.as_ref().and_then(|e| e.success_rate));
        if let Some(rate) = direct {
            if rate > 0.0 {
                return rate;
            }
        }

        if let Some(stats) = &self.execution {
            if let (Some(successful), Some(total)) = (stats.successful, stats.total) {
                if total > 0 {
                    return successful as f64 / total as f64 * 100.0;
                }
            }
        }

        100.0
    }
}

/// Output of the duplicate-detection stage.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DuplicateReport {
    #[serde(default)]
    pub total_strategies: u64,
    /// Groups of strategy indices judged to be duplicates of each other.
    #[serde(default)]
    pub duplicate_groups: Vec<Vec<usize>>,
}

impl DuplicateReport {
    pub fn from_json_str(raw: &str) -> Result<Self, GateError> {
        serde_json::from_str(raw).map_err(|source| GateError::InvalidReport {
            report: "duplicate",
            source,
        })
    }

    /// Strategies remaining after collapsing each duplicate group to one
    /// representative. A group of size one contributes no duplicates. The
    /// result is floored at zero.
    pub fn unique_strategies(&self) -> u64 {
        let duplicates: u64 = self
            .duplicate_groups
            .iter()
            .map(|g| g.len().saturating_sub(1) as u64)
            .sum();
        self.total_strategies.saturating_sub(duplicates)
    }
}

/// Output of the population-diversity analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiversityReport {
    /// Overall diversity score, 0-100. Structurally required.
    pub diversity_score: f64,
    /// Mean pairwise correlation, 0-1.
    #[serde(default)]
    pub avg_correlation: f64,
    /// Factor-exposure diversity, 0-1.
    #[serde(default)]
    pub factor_diversity: f64,
    /// Risk-profile diversity, 0-1.
    #[serde(default)]
    pub risk_diversity: f64,
    #[serde(default)]
    pub total_strategies: u64,
}

impl DiversityReport {
    pub fn from_json_str(raw: &str) -> Result<Self, GateError> {
        serde_json::from_str(raw).map_err(|source| GateError::InvalidReport {
            report: "diversity",
            source,
        })
    }
}
