//! Standalone rationale-sentence generators.
//!
//! Each function is pure: it takes the relevant inputs and returns one
//! multi-line text block. The full document renderer composes these, but
//! callers that want a single fragment can use them independently.

use crate::tiers::performance_tier;
use core_types::{Champion, IssueSeverity, RiskProfile, TemplateId, ValidationFeedback};

/// Explains a performance-based selection in terms of the tier thresholds
/// the current Sharpe ratio crossed.
pub fn performance_fragment(sharpe: f64, max_drawdown: f64) -> String {
    let tier = performance_tier(sharpe);
    let mut out = format!(
        "Current Sharpe of {:.2} places the strategy in the {} tier (threshold {:.1}).",
        sharpe, tier.label, tier.min_sharpe
    );
    let dd = max_drawdown.abs();
    if dd > 0.0 {
        out.push_str(&format!(
            "\nMax drawdown magnitude is {:.1}%; drawdowns above 15% steer selection toward defensively filtered templates.",
            dd * 100.0
        ));
    }
    out
}

/// Explains a forced-exploration pick and the widened parameter search.
pub fn exploration_fragment(template: TemplateId, recently_used: &[TemplateId]) -> String {
    let recent = if recently_used.is_empty() {
        "none".to_string()
    } else {
        recently_used
            .iter()
            .map(|t| t.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    };
    format!(
        "Scheduled exploration: trying '{}' to keep template diversity.\n\
         Recently used templates excluded from the draw: {}.\n\
         Suggested parameters are the grid defaults; exploration widens each search range by +/-30% around them.",
        template, recent
    )
}

/// Explains a champion-based parameter transfer.
pub fn champion_fragment(champion: &Champion) -> String {
    format!(
        "Parameters seeded from champion {} (template '{}', Sharpe {:.2}); {} parameter(s) transferred.",
        champion.genome_id,
        champion.template_name,
        champion.sharpe_ratio,
        champion.parameters.len()
    )
}

/// Summarizes validation feedback by severity.
pub fn validation_feedback_fragment(feedback: &ValidationFeedback) -> String {
    let critical = feedback
        .issues_with_severity(IssueSeverity::Critical)
        .count();
    let moderate = feedback
        .issues_with_severity(IssueSeverity::Moderate)
        .count();
    let mut out = format!(
        "Validator status '{}': {} critical and {} moderate issue(s) informed this recommendation.",
        feedback.status, critical, moderate
    );
    for issue in &feedback.issues {
        out.push_str(&format!("\n  - [{:?}] {}", issue.severity, issue.message));
    }
    out
}

/// Explains a risk-profile override.
pub fn risk_profile_fragment(profile: RiskProfile, template: TemplateId) -> String {
    let goal = match profile {
        RiskProfile::Concentrated => "maximum alpha capture from a concentrated book",
        RiskProfile::Stable => "drawdown control and stability",
        RiskProfile::Fast => "fast, low-cost iteration",
    };
    format!(
        "Risk profile '{}' overrides metric-based selection: '{}' targets {}.",
        profile, template, goal
    )
}
