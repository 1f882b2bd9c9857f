use crate::criteria::{Comparison, CriterionWeight, DecisionCriterion};
use crate::report::DecisionReport;
use crate::reports::{DiversityReport, DuplicateReport, ValidationReport};
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use uuid::Uuid;

// Gate thresholds. These define the meaning of the gate and are therefore
// constants, not configuration.
pub const MIN_UNIQUE_STRATEGIES: f64 = 3.0;
pub const GO_MIN_DIVERSITY: f64 = 60.0;
pub const CONDITIONAL_MIN_DIVERSITY: f64 = 40.0;
pub const MAX_AVG_CORRELATION: f64 = 0.8;
pub const MIN_FACTOR_DIVERSITY: f64 = 0.5;
pub const MIN_RISK_DIVERSITY: f64 = 0.3;
pub const MIN_EXECUTION_RATE: f64 = 100.0;

/// The three-valued progression gate outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Decision {
    #[serde(rename = "GO")]
    Go,
    #[serde(rename = "CONDITIONAL_GO")]
    ConditionalGo,
    #[serde(rename = "NO-GO")]
    NoGo,
}

impl Decision {
    /// The plain enumerant string used on the wire and in CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Go => "GO",
            Decision::ConditionalGo => "CONDITIONAL_GO",
            Decision::NoGo => "NO-GO",
        }
    }

    /// Process exit code for CLI consumers. 1 is left to generic errors.
    pub fn exit_code(&self) -> i32 {
        match self {
            Decision::Go => 0,
            Decision::ConditionalGo => 2,
            Decision::NoGo => 3,
        }
    }

    /// The fixed risk level of each decision tier.
    pub fn risk_level(&self) -> RiskLevel {
        match self {
            Decision::Go => RiskLevel::Low,
            // Fixed MEDIUM regardless of which non-critical criteria failed;
            // downstream consumers depend on this exact mapping.
            Decision::ConditionalGo => RiskLevel::Medium,
            Decision::NoGo => RiskLevel::High,
        }
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        };
        f.write_str(s)
    }
}

/// The metrics extracted from the three input reports.
#[derive(Debug, Clone, Serialize)]
pub struct GateMetrics {
    pub total_strategies: u64,
    pub unique_strategies: u64,
    pub diversity_score: f64,
    pub avg_correlation: f64,
    pub factor_diversity: f64,
    pub risk_diversity: f64,
    pub validation_fixed: bool,
    pub execution_success_rate: f64,
}

/// Stateless evaluator of the progression gate.
///
/// Every call computes a fresh [`DecisionReport`] from the three input
/// reports; nothing is retained between calls.
#[derive(Debug, Default)]
pub struct DecisionGate;

impl DecisionGate {
    pub fn new() -> Self {
        Self
    }

    /// Evaluates the gate and produces the full decision report.
    pub fn evaluate(
        &self,
        validation: &ValidationReport,
        duplicates: &DuplicateReport,
        diversity: &DiversityReport,
    ) -> DecisionReport {
        let metrics = extract_metrics(validation, duplicates, diversity);

        let go_criteria = evaluate_go_criteria(&metrics);
        let (decision, criteria) = if go_criteria.iter().all(|c| c.passed) {
            (Decision::Go, go_criteria)
        } else {
            let conditional = evaluate_conditional_criteria(&metrics);
            let criticals_pass = conditional
                .iter()
                .filter(|c| c.weight == CriterionWeight::Critical)
                .all(|c| c.passed);
            let decision = if criticals_pass {
                Decision::ConditionalGo
            } else {
                Decision::NoGo
            };
            (decision, conditional)
        };

        let (criteria_met, criteria_failed): (Vec<_>, Vec<_>) =
            criteria.into_iter().partition(|c| c.passed);

        let warnings = build_warnings(&criteria_failed);
        let recommendations = build_recommendations(decision, &criteria_failed);
        let summary = build_summary(decision, &criteria_failed);

        tracing::debug!(
            decision = %decision,
            failed = criteria_failed.len(),
            "gate evaluated"
        );

        DecisionReport {
            report_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            decision,
            risk_level: decision.risk_level(),
            metrics,
            criteria_met,
            criteria_failed,
            warnings,
            recommendations,
            summary,
        }
    }
}

fn extract_metrics(
    validation: &ValidationReport,
    duplicates: &DuplicateReport,
    diversity: &DiversityReport,
) -> GateMetrics {
    let total_strategies = if duplicates.total_strategies > 0 {
        duplicates.total_strategies
    } else {
        diversity.total_strategies
    };

    GateMetrics {
        total_strategies,
        unique_strategies: duplicates.unique_strategies(),
        diversity_score: diversity.diversity_score,
        avg_correlation: diversity.avg_correlation,
        factor_diversity: diversity.factor_diversity,
        risk_diversity: diversity.risk_diversity,
        validation_fixed: validation.validation_fixed,
        execution_success_rate: validation.effective_execution_rate(),
    }
}

/// The seven advancement criteria. GO requires all of them to pass.
fn evaluate_go_criteria(m: &GateMetrics) -> Vec<DecisionCriterion> {
    vec![
        DecisionCriterion::evaluate(
            "unique_strategies",
            m.unique_strategies as f64,
            Comparison::GreaterEq,
            MIN_UNIQUE_STRATEGIES,
            CriterionWeight::Critical,
        ),
        DecisionCriterion::evaluate(
            "diversity_score",
            m.diversity_score,
            Comparison::GreaterEq,
            GO_MIN_DIVERSITY,
            CriterionWeight::High,
        ),
        DecisionCriterion::evaluate(
            "avg_correlation",
            m.avg_correlation,
            Comparison::Less,
            MAX_AVG_CORRELATION,
            CriterionWeight::Medium,
        ),
        DecisionCriterion::evaluate(
            "factor_diversity",
            m.factor_diversity,
            Comparison::GreaterEq,
            MIN_FACTOR_DIVERSITY,
            CriterionWeight::High,
        ),
        DecisionCriterion::evaluate(
            "risk_diversity",
            m.risk_diversity,
            Comparison::GreaterEq,
            MIN_RISK_DIVERSITY,
            CriterionWeight::Medium,
        ),
        DecisionCriterion::evaluate(
            "validation_fixed",
            if m.validation_fixed { 1.0 } else { 0.0 },
            Comparison::Equal,
            1.0,
            CriterionWeight::Critical,
        ),
        DecisionCriterion::evaluate(
            "execution_success_rate",
            m.execution_success_rate,
            Comparison::GreaterEq,
            MIN_EXECUTION_RATE,
            CriterionWeight::High,
        ),
    ]
}

/// The conditional tier: a relaxed diversity bar, stricter weights on the
/// hard requirements, plus two informational checks that are recorded but do
/// not affect the outcome. CONDITIONAL_GO requires every CRITICAL check here
/// to pass.
fn evaluate_conditional_criteria(m: &GateMetrics) -> Vec<DecisionCriterion> {
    vec![
        DecisionCriterion::evaluate(
            "unique_strategies",
            m.unique_strategies as f64,
            Comparison::GreaterEq,
            MIN_UNIQUE_STRATEGIES,
            CriterionWeight::Critical,
        ),
        DecisionCriterion::evaluate(
            "diversity_score",
            m.diversity_score,
            Comparison::GreaterEq,
            CONDITIONAL_MIN_DIVERSITY,
            CriterionWeight::High,
        ),
        DecisionCriterion::evaluate(
            "avg_correlation",
            m.avg_correlation,
            Comparison::Less,
            MAX_AVG_CORRELATION,
            CriterionWeight::Critical,
        ),
        DecisionCriterion::evaluate(
            "validation_fixed",
            if m.validation_fixed { 1.0 } else { 0.0 },
            Comparison::Equal,
            1.0,
            CriterionWeight::Critical,
        ),
        DecisionCriterion::evaluate(
            "execution_success_rate",
            m.execution_success_rate,
            Comparison::GreaterEq,
            MIN_EXECUTION_RATE,
            CriterionWeight::Critical,
        ),
        // Informational only in this tier.
        DecisionCriterion::evaluate(
            "factor_diversity",
            m.factor_diversity,
            Comparison::GreaterEq,
            MIN_FACTOR_DIVERSITY,
            CriterionWeight::Medium,
        ),
        DecisionCriterion::evaluate(
            "risk_diversity",
            m.risk_diversity,
            Comparison::GreaterEq,
            MIN_RISK_DIVERSITY,
            CriterionWeight::Low,
        ),
    ]
}

fn build_warnings(failed: &[DecisionCriterion]) -> Vec<String> {
    failed
        .iter()
        .map(|c| {
            format!(
                "Criterion '{}' failed: {} = {:.2}, required {} {:.2} ({})",
                c.name,
                c.name,
                c.actual,
                c.comparison.symbol(),
                c.threshold,
                c.weight
            )
        })
        .collect()
}

fn recommendation_for(criterion: &str) -> Option<&'static str> {
    match criterion {
        "unique_strategies" => Some(
            "Increase the generated population size and strengthen duplicate rejection before the next batch.",
        ),
        "diversity_score" => Some(
            "Tune template-diversity weighting in generation to raise the overall diversity score.",
        ),
        "avg_correlation" => Some(
            "Reduce inter-strategy correlation by widening factor and universe variation.",
        ),
        "factor_diversity" => Some("Broaden the factor mix across generated strategies."),
        "risk_diversity" => Some(
            "Vary risk handling (stops, position caps, hedges) across the population.",
        ),
        "validation_fixed" => Some(
            "Fix the known validation-framework defect before re-running the batch.",
        ),
        "execution_success_rate" => Some(
            "Investigate failing strategy executions and re-run until the batch executes cleanly.",
        ),
        _ => None,
    }
}

fn build_recommendations(decision: Decision, failed: &[DecisionCriterion]) -> Vec<String> {
    match decision {
        Decision::Go => vec![
            "Maintain the current generation configuration for the next phase.".to_string(),
            "Re-run the gate after the next batch to confirm the population holds its diversity."
                .to_string(),
        ],
        Decision::ConditionalGo => {
            let mut recs = vec![
                "Proceed, but monitor the failed dimensions each iteration.".to_string(),
                "Set alert thresholds slightly above the conditional minimums to catch regressions early."
                    .to_string(),
            ];
            for c in failed {
                if let Some(advice) = recommendation_for(&c.name) {
                    recs.push(advice.to_string());
                }
            }
            recs
        }
        Decision::NoGo => {
            // Worst-failing dimensions first: criticals, then by weight.
            let mut ordered: Vec<&DecisionCriterion> = failed.iter().collect();
            ordered.sort_by_key(|c| c.weight);
            ordered
                .iter()
                .filter_map(|c| recommendation_for(&c.name))
                .map(str::to_string)
                .collect()
        }
    }
}

fn build_summary(decision: Decision, failed: &[DecisionCriterion]) -> String {
    match decision {
        Decision::Go => {
            "GO: all advancement criteria pass; the strategy population is ready for the next research phase."
                .to_string()
        }
        Decision::ConditionalGo => format!(
            "CONDITIONAL GO: minimal criteria pass with {} non-blocking failure(s); proceed with close monitoring.",
            failed.len()
        ),
        Decision::NoGo => {
            let blocking = failed
                .iter()
                .find(|c| c.weight == CriterionWeight::Critical)
                .map(|c| c.name.as_str())
                .unwrap_or("multiple criteria");
            format!(
                "NO-GO: blocked primarily by '{}'; address the failed criteria before advancing.",
                blocking
            )
        }
    }
}
