//! # Meridian Rationale Generator
//!
//! Renders human-readable explanations for template recommendations: why a
//! template was chosen, what the empirical record says about it, which
//! parameters are suggested, and what to expect from the architecture.
//!
//! The generator holds no state of its own. Empirical numbers come through
//! the store's [`StatisticsProvider`] trait; when no provider is wired in or
//! the provider fails, the document states the absence of data explicitly
//! instead of omitting the section.

pub mod fragments;
pub mod tiers;

pub use fragments::{
    champion_fragment, exploration_fragment, performance_fragment, risk_profile_fragment,
    validation_feedback_fragment,
};
pub use tiers::{performance_tier, PerformanceTier};

use core_types::{Champion, PerformanceSnapshot, TemplateRecommendation};
use templates::TemplateRegistry;
use usage_store::StatisticsProvider;

/// Parameter keys that carry provenance metadata rather than strategy
/// parameters. They are kept on the recommendation for traceability but
/// excluded from the rendered parameter list.
const PROVENANCE_KEYS: [&str; 2] = ["source_champion", "champion_sharpe"];

/// Renders the multi-section rationale document for a recommendation.
pub struct RationaleGenerator<'a> {
    registry: &'a TemplateRegistry,
    statistics: Option<&'a dyn StatisticsProvider>,
}

impl<'a> RationaleGenerator<'a> {
    pub fn new(registry: &'a TemplateRegistry) -> Self {
        Self {
            registry,
            statistics: None,
        }
    }

    /// Attaches a statistics provider for the empirical-record line.
    pub fn with_statistics(mut self, provider: &'a dyn StatisticsProvider) -> Self {
        self.statistics = Some(provider);
        self
    }

    /// Renders the full rationale document. Never fails: missing or failing
    /// statistics degrade to an explicit no-data notice.
    pub fn render(
        &self,
        recommendation: &TemplateRecommendation,
        current_metrics: Option<&PerformanceSnapshot>,
        champion_details: Option<&Champion>,
    ) -> String {
        let mut doc = String::new();

        doc.push_str("=== Template Recommendation ===\n");
        doc.push_str(&format!("Template:   {}\n", recommendation.template_name));
        doc.push_str(&format!(
            "Confidence: {:.2}\n",
            recommendation.match_score
        ));

        self.render_selection_rationale(&mut doc, recommendation, current_metrics);
        self.render_suggested_parameters(&mut doc, recommendation);
        self.render_champion_reference(&mut doc, recommendation, champion_details);
        self.render_exploration(&mut doc, recommendation);
        self.render_expected_characteristics(&mut doc, recommendation);

        doc
    }

    fn render_selection_rationale(
        &self,
        doc: &mut String,
        recommendation: &TemplateRecommendation,
        current_metrics: Option<&PerformanceSnapshot>,
    ) {
        doc.push_str("\n--- Selection Rationale ---\n");
        doc.push_str(&recommendation.rationale);
        doc.push('\n');

        doc.push_str(&self.historical_record_line(recommendation));
        doc.push('\n');

        if let Some(metrics) = current_metrics {
            doc.push_str(&performance_fragment(
                metrics.sharpe_ratio,
                metrics.max_drawdown,
            ));
            doc.push('\n');
        }
    }

    /// The empirical line: either real numbers, or an explicit statement
    /// that no history exists. This fact is never silently omitted.
    fn historical_record_line(&self, recommendation: &TemplateRecommendation) -> String {
        const NO_DATA: &str = "No historical usage data exists for this template yet.";

        let Some(provider) = self.statistics else {
            return NO_DATA.to_string();
        };
        match provider.statistics_for(recommendation.template_name) {
            Ok(stats) if stats.has_data => format!(
                "Historical record: {} use(s), {:.1}% success rate, avg Sharpe {:.2}.",
                stats.total_usage,
                stats.success_rate * 100.0,
                stats.avg_sharpe
            ),
            Ok(_) => NO_DATA.to_string(),
            Err(e) => {
                tracing::warn!(error = %e, "statistics provider failed; rendering without history");
                NO_DATA.to_string()
            }
        }
    }

    fn render_suggested_parameters(&self, doc: &mut String, recommendation: &TemplateRecommendation) {
        doc.push_str("\n--- Suggested Parameters ---\n");
        let mut rendered_any = false;
        for (name, value) in &recommendation.suggested_params {
            if PROVENANCE_KEYS.contains(&name.as_str()) {
                continue;
            }
            doc.push_str(&format!("  {} = {}\n", name, value));
            rendered_any = true;
        }
        if !rendered_any {
            doc.push_str("  Grid defaults apply; no parameter overrides suggested.\n");
        }
    }

    fn render_champion_reference(
        &self,
        doc: &mut String,
        recommendation: &TemplateRecommendation,
        champion_details: Option<&Champion>,
    ) {
        let Some(reference) = &recommendation.champion_reference else {
            return;
        };
        doc.push_str("\n--- Champion Reference ---\n");
        match champion_details {
            Some(champion) => {
                doc.push_str(&champion_fragment(champion));
                doc.push('\n');
            }
            None => {
                doc.push_str(&format!(
                    "Parameters seeded from champion {}.\n",
                    reference
                ));
            }
        }
    }

    fn render_exploration(&self, doc: &mut String, recommendation: &TemplateRecommendation) {
        if !recommendation.exploration_mode {
            return;
        }
        doc.push_str("\n--- Exploration Mode ---\n");
        doc.push_str(
            "This is a scheduled exploration pick, made to keep template diversity;\n\
             confidence is intentionally lower than a performance-based choice.\n",
        );
    }

    fn render_expected_characteristics(
        &self,
        doc: &mut String,
        recommendation: &TemplateRecommendation,
    ) {
        let spec = self.registry.spec(recommendation.template_name);
        doc.push_str("\n--- Expected Characteristics ---\n");
        doc.push_str(&format!("Architecture: {}\n", spec.architecture));
        doc.push_str(&format!(
            "Expected Sharpe range: {:.1} to {:.1}\n",
            spec.expected_sharpe.0, spec.expected_sharpe.1
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::TemplateId;
    use std::collections::BTreeMap;
    use usage_store::{StoreError, TemplateStatistics};

    struct FixedStats(TemplateStatistics);

    impl StatisticsProvider for FixedStats {
        fn statistics_for(&self, _: TemplateId) -> Result<TemplateStatistics, StoreError> {
            Ok(self.0.clone())
        }
    }

    struct FailingStats;

    impl StatisticsProvider for FailingStats {
        fn statistics_for(&self, _: TemplateId) -> Result<TemplateStatistics, StoreError> {
            Err(StoreError::ProviderUnavailable("store offline".into()))
        }
    }

    fn recommendation() -> TemplateRecommendation {
        TemplateRecommendation {
            template_name: TemplateId::MomentumRanker,
            rationale: "Sharpe 2.10 crossed the 2.0 champion threshold.".into(),
            match_score: 0.9,
            suggested_params: BTreeMap::new(),
            champion_reference: None,
            exploration_mode: false,
        }
    }

    #[test]
    fn missing_history_is_stated_explicitly() {
        let registry = TemplateRegistry::new();
        let provider = FixedStats(TemplateStatistics::empty(TemplateId::MomentumRanker));
        let generator = RationaleGenerator::new(&registry).with_statistics(&provider);

        let doc = generator.render(&recommendation(), None, None);
        assert!(doc.contains("No historical usage data"));
    }

    #[test]
    fn failing_provider_degrades_to_no_data_line() {
        let registry = TemplateRegistry::new();
        let provider = FailingStats;
        let generator = RationaleGenerator::new(&registry).with_statistics(&provider);

        let doc = generator.render(&recommendation(), None, None);
        assert!(doc.contains("No historical usage data"));
    }

    #[test]
    fn empirical_record_is_rendered_when_history_exists() {
        let registry = TemplateRegistry::new();
        let provider = FixedStats(TemplateStatistics {
            total_usage: 8,
            success_rate: 0.625,
            avg_sharpe: 1.42,
            has_data: true,
            reliable: true,
            ..TemplateStatistics::empty(TemplateId::MomentumRanker)
        });
        let generator = RationaleGenerator::new(&registry).with_statistics(&provider);

        let doc = generator.render(&recommendation(), None, None);
        assert!(doc.contains("8 use(s)"));
        assert!(doc.contains("62.5% success rate"));
    }

    #[test]
    fn provenance_keys_are_excluded_from_parameters() {
        let registry = TemplateRegistry::new();
        let generator = RationaleGenerator::new(&registry);

        let mut rec = recommendation();
        rec.suggested_params
            .insert("stock_count".into(), serde_json::Value::from(20));
        rec.suggested_params
            .insert("source_champion".into(), serde_json::Value::from("g-42"));
        rec.suggested_params
            .insert("champion_sharpe".into(), serde_json::Value::from(2.2));

        let doc = generator.render(&rec, None, None);
        assert!(doc.contains("stock_count = 20"));
        assert!(!doc.contains("source_champion"));
        assert!(!doc.contains("champion_sharpe"));
    }

    #[test]
    fn conditional_sections_appear_only_when_relevant() {
        let registry = TemplateRegistry::new();
        let generator = RationaleGenerator::new(&registry);

        let plain = generator.render(&recommendation(), None, None);
        assert!(!plain.contains("Exploration Mode"));
        assert!(!plain.contains("Champion Reference"));

        let mut explored = recommendation();
        explored.exploration_mode = true;
        explored.champion_reference = Some("genome-7".into());
        let doc = generator.render(&explored, None, None);
        assert!(doc.contains("Exploration Mode"));
        assert!(doc.contains("Champion Reference"));
    }
}
