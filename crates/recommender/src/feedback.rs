//! Classification of validation feedback and parameter clamping.

use core_types::{IssueSeverity, ValidationFeedback};
use serde_json::Value;
use std::collections::BTreeMap;
use templates::number_value;

/// Known-safe numeric ranges for the parameters the validator most often
/// flags as out of range.
pub const SAFE_RANGES: [(&str, f64, f64); 3] = [
    ("stock_count", 5.0, 50.0),
    ("stop_loss_pct", 0.05, 0.25),
    ("ma_window", 5.0, 200.0),
];

const PARAMETER_KEYWORDS: [&str; 6] = [
    "parameter",
    "range",
    "bound",
    "stock_count",
    "stop_loss",
    "ma_window",
];
const ARCHITECTURE_KEYWORDS: [&str; 3] = ["complex", "architecture", "nested"];
const DATA_KEYWORDS: [&str; 3] = ["data", "field", "column"];

/// The recommender-relevant reading of one batch of validation feedback.
///
/// Categories are not exclusive: a single issue can land in several, and the
/// categories compound when the recommendation is rewritten.
#[derive(Debug, Default, Clone)]
pub struct FeedbackAnalysis {
    pub parameter_range_issues: Vec<String>,
    pub architecture_issues: Vec<String>,
    pub data_access_issues: Vec<String>,
    /// True when at least one architecture issue is critical.
    pub critical_architecture: bool,
}

impl FeedbackAnalysis {
    pub fn has_parameter_issues(&self) -> bool {
        !self.parameter_range_issues.is_empty()
    }

    pub fn has_data_issues(&self) -> bool {
        !self.data_access_issues.is_empty()
    }
}

fn matches_any(message: &str, keywords: &[&str]) -> bool {
    let lower = message.to_lowercase();
    keywords.iter().any(|k| lower.contains(k))
}

/// Classifies every issue by keyword pattern and severity.
pub fn analyze(feedback: &ValidationFeedback) -> FeedbackAnalysis {
    let mut analysis = FeedbackAnalysis::default();
    for issue in &feedback.issues {
        if matches_any(&issue.message, &PARAMETER_KEYWORDS) {
            analysis.parameter_range_issues.push(issue.message.clone());
        }
        if matches_any(&issue.message, &ARCHITECTURE_KEYWORDS) {
            analysis.architecture_issues.push(issue.message.clone());
            if issue.severity == IssueSeverity::Critical {
                analysis.critical_architecture = true;
            }
        }
        if matches_any(&issue.message, &DATA_KEYWORDS) {
            analysis.data_access_issues.push(issue.message.clone());
        }
    }
    analysis
}

/// Clamps the known-risky parameters of `current` into their safe ranges.
///
/// Returns the clamped entries (only parameters named in [`SAFE_RANGES`] and
/// present in `current`) and a note per adjustment.
pub fn clamp_parameters(
    current: &BTreeMap<String, Value>,
) -> (BTreeMap<String, Value>, Vec<String>) {
    let mut clamped = BTreeMap::new();
    let mut notes = Vec::new();

    for (name, low, high) in SAFE_RANGES {
        let Some(value) = current.get(name).and_then(Value::as_f64) else {
            continue;
        };
        let safe = value.clamp(low, high);
        clamped.insert(name.to_string(), number_value(safe));
        if safe != value {
            notes.push(format!(
                "Clamped {} from {} to {} (safe range {} to {}).",
                name, value, safe, low, high
            ));
        }
    }

    (clamped, notes)
}
