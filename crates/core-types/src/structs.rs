use crate::enums::{IssueSeverity, TemplateId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// One row of the usage ledger: a single template invocation and its outcome.
///
/// Records are append-only. Iteration values need not be unique or ordered;
/// the ledger simply accumulates what happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UsageRecord {
    pub iteration: u64,
    pub timestamp: DateTime<Utc>,
    pub template_name: TemplateId,
    /// Realized Sharpe ratio of the generated strategy. May be negative.
    pub sharpe_ratio: f64,
    pub validation_passed: bool,
    /// Whether this invocation came from the forced-exploration path.
    pub exploration_mode: bool,
    /// Whether a champion's parameters were transferred into this invocation.
    pub champion_based: bool,
    /// The recommender's confidence in the choice, in [0, 1].
    pub match_score: f64,
}

/// The decision engine's output: which template to use next, and why.
///
/// Created fresh per call and never mutated afterwards. The outcome of acting
/// on a recommendation is persisted separately as a [`UsageRecord`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateRecommendation {
    pub template_name: TemplateId,
    /// Free-text explanation citing the thresholds and data behind the choice.
    pub rationale: String,
    /// Confidence in [0, 1]. Exploration picks carry a deliberately low score.
    pub match_score: f64,
    /// Suggested parameter values. May be empty when the performance path
    /// leaves parameter choice to the template's own grid defaults.
    pub suggested_params: BTreeMap<String, Value>,
    /// Identifier of the champion whose parameters were transferred, if any.
    pub champion_reference: Option<String>,
    /// True exactly when the forced-exploration path produced this choice.
    pub exploration_mode: bool,
}

/// The current performance metrics a caller supplies to the recommender.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PerformanceSnapshot {
    #[serde(default)]
    pub sharpe_ratio: f64,
    /// Maximum drawdown as a fraction of peak equity. Sign is ignored; only
    /// the magnitude is interpreted.
    #[serde(default)]
    pub max_drawdown: f64,
}

/// A previously discovered, high-performing strategy configuration retained
/// for reference and parameter transfer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Champion {
    pub genome_id: String,
    pub template_name: TemplateId,
    pub sharpe_ratio: f64,
    /// Numeric parameters of the champion configuration.
    pub parameters: BTreeMap<String, f64>,
}

/// Validation feedback for a previously generated strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationFeedback {
    /// Status string reported by the validator (e.g. "failed", "passed").
    pub status: String,
    pub issues: Vec<ValidationIssue>,
}

impl ValidationFeedback {
    /// Issues of the given severity.
    pub fn issues_with_severity(&self, severity: IssueSeverity) -> impl Iterator<Item = &ValidationIssue> {
        self.issues.iter().filter(move |i| i.severity == severity)
    }
}

/// A single issue reported by the validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub severity: IssueSeverity,
    pub message: String,
}

impl ValidationIssue {
    pub fn new(severity: IssueSeverity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
        }
    }
}
