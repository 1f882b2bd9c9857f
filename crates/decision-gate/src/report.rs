use crate::criteria::DecisionCriterion;
use crate::gate::{
    Decision, GateMetrics, RiskLevel, CONDITIONAL_MIN_DIVERSITY, GO_MIN_DIVERSITY,
};
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

/// The aggregate output of one gate evaluation.
///
/// Computed fresh per call and never mutated after construction. Every
/// evaluated criterion appears in exactly one of `criteria_met` /
/// `criteria_failed`.
#[derive(Debug, Clone, Serialize)]
pub struct DecisionReport {
    pub report_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub decision: Decision,
    pub risk_level: RiskLevel,
    pub metrics: GateMetrics,
    pub criteria_met: Vec<DecisionCriterion>,
    pub criteria_failed: Vec<DecisionCriterion>,
    pub warnings: Vec<String>,
    pub recommendations: Vec<String>,
    pub summary: String,
}

impl DecisionReport {
    /// Renders the full structured report document.
    pub fn to_document(&self) -> String {
        let mut doc = String::new();
        let rule = "=".repeat(64);

        doc.push_str(&rule);
        doc.push_str("\n STRATEGY BATCH DECISION REPORT\n");
        doc.push_str(&rule);
        doc.push('\n');
        doc.push_str(&format!("Decision:  {}\n", self.decision));
        doc.push_str(&format!("Risk:      {}\n", self.risk_level));
        doc.push_str(&format!(
            "Generated: {}\n",
            self.generated_at.to_rfc3339()
        ));
        doc.push_str(&format!("Report ID: {}\n", self.report_id));

        doc.push_str("\n--- Executive Summary ---\n");
        doc.push_str(&self.summary);
        doc.push('\n');

        doc.push_str("\n--- Criteria ---\n");
        let mut all: Vec<&DecisionCriterion> =
            self.criteria_met.iter().chain(&self.criteria_failed).collect();
        all.sort_by_key(|c| c.weight);
        for c in all {
            doc.push_str(&format!(
                "  [{}] {:<8} {:<24} actual {:>8.2}  required {} {:.2}\n",
                if c.passed { "PASS" } else { "FAIL" },
                c.weight,
                c.name,
                c.actual,
                c.comparison.symbol(),
                c.threshold
            ));
        }

        doc.push_str("\n--- Decision Matrix ---\n");
        doc.push_str(&format!(
            "GO requires all seven advancement criteria to pass (diversity score >= {GO_MIN_DIVERSITY}).\n\
             CONDITIONAL GO requires every CRITICAL conditional criterion to pass\n\
             (relaxed diversity score >= {CONDITIONAL_MIN_DIVERSITY}); NO-GO otherwise.\n\
             Absent execution evidence defaults to a 100% success rate (permissive by design).\n\
             Risk is fixed per tier: GO=LOW, CONDITIONAL GO=MEDIUM, NO-GO=HIGH.\n"
        ));

        doc.push_str("\n--- Detailed Metrics ---\n");
        let m = &self.metrics;
        doc.push_str(&format!(
            "Strategies:  {} total, {} unique\n",
            m.total_strategies, m.unique_strategies
        ));
        doc.push_str(&format!(
            "Diversity:   score {:.1}, avg correlation {:.2}, factor {:.2}, risk {:.2}\n",
            m.diversity_score, m.avg_correlation, m.factor_diversity, m.risk_diversity
        ));
        doc.push_str(&format!(
            "Validation:  framework fixed = {}, execution success {:.1}%\n",
            m.validation_fixed, m.execution_success_rate
        ));

        doc.push_str("\n--- Warnings ---\n");
        if self.warnings.is_empty() {
            doc.push_str("  (none)\n");
        } else {
            for w in &self.warnings {
                doc.push_str(&format!("  - {}\n", w));
            }
        }

        doc.push_str("\n--- Recommendations ---\n");
        for r in &self.recommendations {
            doc.push_str(&format!("  - {}\n", r));
        }

        doc.push_str("\n--- Risk Assessment ---\n");
        doc.push_str(self.risk_narrative());

        doc.push_str("\n--- Next Steps ---\n");
        doc.push_str(&self.next_steps());

        doc
    }

    fn risk_narrative(&self) -> &'static str {
        match self.decision {
            Decision::Go => {
                "Low risk: the population clears every advancement bar. Residual risk is\n\
                 limited to regime shifts the diversity metrics cannot anticipate.\n"
            }
            Decision::ConditionalGo => {
                "Medium risk: the population clears only the minimal bars. Failures in the\n\
                 non-blocking dimensions reduce headroom; a small regression in any\n\
                 monitored metric should pause advancement.\n"
            }
            Decision::NoGo => {
                "High risk: at least one blocking criterion failed. Advancing now would\n\
                 carry forward a population that is too small, too correlated, or not\n\
                 demonstrably executable.\n"
            }
        }
    }

    fn next_steps(&self) -> String {
        let steps: [&str; 3] = match self.decision {
            Decision::Go => [
                "Promote the batch to the next research phase.",
                "Archive this report alongside the batch artifacts.",
                "Keep the current generation configuration unchanged.",
            ],
            Decision::ConditionalGo => [
                "Promote the batch, flagging it for enhanced monitoring.",
                "Wire the failed dimensions into per-iteration alerts.",
                "Re-evaluate the gate after the next batch.",
            ],
            Decision::NoGo => [
                "Apply the recommendations above, worst failure first.",
                "Regenerate or repair the strategy batch.",
                "Re-run the gate; do not advance until it clears.",
            ],
        };
        steps
            .iter()
            .enumerate()
            .map(|(i, s)| format!("  {}. {}\n", i + 1, s))
            .collect()
    }
}
