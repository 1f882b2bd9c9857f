//! # Meridian Template Recommender
//!
//! The central decision procedure of the feedback loop: given the current
//! performance metrics, the iteration number, optional validation feedback
//! and an optional champion repository, it chooses the template (and
//! suggested parameters) for the next research iteration.
//!
//! Selection runs as an ordered pipeline where each step may rewrite the
//! recommendation produced by the previous one: forced-exploration check,
//! performance-band selection, champion parameter enrichment, and
//! validation-feedback incorporation. Collaborator failures never escape
//! [`TemplateRecommender::recommend`]; they are logged and the pipeline
//! continues with the best data available.

pub mod champions;
pub mod error;
pub mod exploration;
pub mod feedback;

pub use champions::{ChampionSource, JsonChampionFile};
pub use error::ChampionSourceError;

use core_types::{
    PerformanceSnapshot, RiskProfile, TemplateId, TemplateRecommendation, ValidationFeedback,
};
use serde_json::Value;
use std::collections::{BTreeMap, VecDeque};
use templates::{number_value, TemplateRegistry};

/// Every Nth iteration is routed through forced exploration.
pub const EXPLORATION_INTERVAL: u64 = 5;

/// Size cap of the rolling recently-used-template window.
pub const RECENT_WINDOW: usize = 10;

/// Minimum Sharpe a champion must carry to be eligible for parameter transfer.
pub const CHAMPION_MIN_SHARPE: f64 = 1.5;

/// Confidence bump applied when champion parameters are transferred.
const CHAMPION_SCORE_BONUS: f64 = 0.05;

/// Confidence assigned to exploration picks, deliberately below every
/// performance-based score so downstream consumers can tell the modes apart.
const EXPLORATION_SCORE: f64 = 0.4;

/// Confidence after an architecture-complexity downgrade.
const DOWNGRADE_SCORE: f64 = 0.5;

/// Drawdown magnitude at which the solid tier switches from the
/// stability-oriented template to the defensively filtered one.
const HIGH_DRAWDOWN: f64 = 0.15;

/// The decision engine. Holds the template registry, the rolling history of
/// recently recommended templates, and an optional champion repository.
pub struct TemplateRecommender {
    registry: TemplateRegistry,
    champion_source: Option<Box<dyn ChampionSource>>,
    recent_templates: VecDeque<TemplateId>,
}

impl TemplateRecommender {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self {
            registry,
            champion_source: None,
            recent_templates: VecDeque::new(),
        }
    }

    /// Wires in a champion repository for parameter transfer.
    pub fn with_champion_source(mut self, source: Box<dyn ChampionSource>) -> Self {
        self.champion_source = Some(source);
        self
    }

    /// The rolling window of recently recommended templates, oldest first.
    pub fn recent_templates(&self) -> impl Iterator<Item = TemplateId> + '_ {
        self.recent_templates.iter().copied()
    }

    /// Produces the recommendation for `iteration`.
    ///
    /// This method never fails: champion-source and template-grid failures
    /// are logged and the pipeline falls back to the information it already
    /// has.
    pub fn recommend(
        &mut self,
        current_metrics: Option<&PerformanceSnapshot>,
        iteration: u64,
        validation_feedback: Option<&ValidationFeedback>,
        current_params: Option<&BTreeMap<String, Value>>,
        risk_profile: Option<RiskProfile>,
    ) -> TemplateRecommendation {
        let exploring = iteration % EXPLORATION_INTERVAL == 0;

        let mut recommendation = if exploring {
            self.explore(iteration)
        } else {
            self.select_by_performance(current_metrics, risk_profile)
        };

        if !exploring {
            self.enrich_from_champions(&mut recommendation);
        }

        if let Some(feedback) = validation_feedback {
            self.incorporate_feedback(&mut recommendation, feedback, current_params);
        }

        self.note_usage(recommendation.template_name);
        tracing::debug!(
            iteration,
            template = %recommendation.template_name,
            match_score = recommendation.match_score,
            exploration = recommendation.exploration_mode,
            "recommendation produced"
        );
        recommendation
    }

    /// Step 2: the forced-exploration path.
    fn explore(&self, iteration: u64) -> TemplateRecommendation {
        let template =
            exploration::select_exploration_template(&self.registry, &self.recent_templates);

        let suggested_params = match self.registry.default_parameters(template) {
            Ok(params) => params,
            Err(e) => {
                tracing::warn!(error = %e, template = %template, "grid defaults unavailable; exploring without suggested parameters");
                BTreeMap::new()
            }
        };

        let excluded: Vec<String> = self
            .recent_templates
            .iter()
            .rev()
            .take(exploration::EXPLORATION_EXCLUDE_LAST)
            .map(|t| t.to_string())
            .collect();
        let rationale = format!(
            "Iteration {} is a scheduled exploration slot (every {}th iteration).\n\
             Trying '{}', the least-used template outside the recent window [{}].\n\
             Suggested parameters are the grid defaults; exploration widens each search range by +/-30% around them.",
            iteration,
            EXPLORATION_INTERVAL,
            template,
            excluded.join(", ")
        );

        TemplateRecommendation {
            template_name: template,
            rationale,
            match_score: EXPLORATION_SCORE,
            suggested_params,
            champion_reference: None,
            exploration_mode: true,
        }
    }

    /// Step 3: performance-based selection through ordered Sharpe bands.
    fn select_by_performance(
        &self,
        current_metrics: Option<&PerformanceSnapshot>,
        risk_profile: Option<RiskProfile>,
    ) -> TemplateRecommendation {
        if let Some(profile) = risk_profile {
            let template = match profile {
                RiskProfile::Concentrated => TemplateId::ConcentratedMomentum,
                RiskProfile::Stable => TemplateId::LowVolRotation,
                RiskProfile::Fast => TemplateId::FastMeanReversion,
            };
            return base_recommendation(
                template,
                format!(
                    "Risk profile '{}' overrides metric-based selection in favor of '{}'.",
                    profile, template
                ),
                0.85,
            );
        }

        let Some(metrics) = current_metrics else {
            return base_recommendation(
                TemplateId::MomentumRanker,
                "No current metrics available; defaulting to the most historically reliable template."
                    .to_string(),
                0.5,
            );
        };

        let sharpe = metrics.sharpe_ratio;
        let drawdown = metrics.max_drawdown.abs();

        if sharpe >= 2.0 {
            base_recommendation(
                TemplateId::MomentumRanker,
                format!(
                    "Sharpe {:.2} is at or above the 2.0 champion threshold; staying with the most robust template to consolidate the result.",
                    sharpe
                ),
                0.9,
            )
        } else if sharpe >= 1.5 {
            base_recommendation(
                TemplateId::ConcentratedMomentum,
                format!(
                    "Sharpe {:.2} sits in the contender band [1.5, 2.0); concentrating the book to push for champion-level performance.",
                    sharpe
                ),
                0.8,
            )
        } else if sharpe >= 1.0 {
            if drawdown < HIGH_DRAWDOWN {
                base_recommendation(
                    TemplateId::LowVolRotation,
                    format!(
                        "Sharpe {:.2} is solid [1.0, 1.5) with contained drawdown ({:.1}% < 15%); favoring the stability-oriented template.",
                        sharpe,
                        drawdown * 100.0
                    ),
                    0.75,
                )
            } else {
                base_recommendation(
                    TemplateId::DefensiveTrend,
                    format!(
                        "Sharpe {:.2} is solid [1.0, 1.5) but drawdown is elevated ({:.1}% >= 15%); favoring the defensively filtered template.",
                        sharpe,
                        drawdown * 100.0
                    ),
                    0.7,
                )
            }
        } else if sharpe >= 0.5 {
            base_recommendation(
                TemplateId::MomentumRanker,
                format!(
                    "Sharpe {:.2} is in the archive band [0.5, 1.0); restarting from the default improvement template.",
                    sharpe
                ),
                0.6,
            )
        } else {
            base_recommendation(
                TemplateId::FastMeanReversion,
                format!(
                    "Sharpe {:.2} is below the 0.5 poor threshold; switching to the template built for fast, low-cost iteration.",
                    sharpe
                ),
                0.55,
            )
        }
    }

    /// Step 4: champion parameter transfer for the chosen template.
    fn enrich_from_champions(&self, recommendation: &mut TemplateRecommendation) {
        let Some(source) = &self.champion_source else {
            return;
        };

        let champions = match source.champions(CHAMPION_MIN_SHARPE) {
            Ok(champions) => champions,
            Err(e) => {
                tracing::warn!(error = %e, "champion source failed; continuing without enrichment");
                return;
            }
        };

        // Only champions of the recommended template are eligible; parameters
        // do not transfer across templates.
        let best = champions
            .into_iter()
            .filter(|c| c.template_name == recommendation.template_name)
            .max_by(|a, b| a.sharpe_ratio.total_cmp(&b.sharpe_ratio));
        let Some(champion) = best else {
            return;
        };

        for (name, value) in &champion.parameters {
            recommendation
                .suggested_params
                .insert(name.clone(), number_value(*value));
        }
        recommendation.suggested_params.insert(
            "source_champion".to_string(),
            Value::from(champion.genome_id.clone()),
        );
        recommendation.suggested_params.insert(
            "champion_sharpe".to_string(),
            Value::from(champion.sharpe_ratio),
        );

        recommendation.rationale.push_str(&format!(
            "\nParameters seeded from champion {} (Sharpe {:.2}).",
            champion.genome_id, champion.sharpe_ratio
        ));
        recommendation.match_score = (recommendation.match_score + CHAMPION_SCORE_BONUS).min(1.0);
        recommendation.champion_reference = Some(champion.genome_id);
    }

    /// Step 5: rewrite the recommendation according to validation feedback.
    /// Categories compound; clamping does not suppress a downgrade.
    fn incorporate_feedback(
        &self,
        recommendation: &mut TemplateRecommendation,
        validation_feedback: &ValidationFeedback,
        current_params: Option<&BTreeMap<String, Value>>,
    ) {
        let analysis = feedback::analyze(validation_feedback);

        if analysis.has_parameter_issues() {
            if let Some(current) = current_params {
                let (clamped, notes) = feedback::clamp_parameters(current);
                recommendation.suggested_params.extend(clamped);
                for note in notes {
                    recommendation.rationale.push('\n');
                    recommendation.rationale.push_str(&note);
                }
            }
        }

        if analysis.critical_architecture
            && self.registry.spec(recommendation.template_name).is_complex()
        {
            let previous = recommendation.template_name;
            recommendation.template_name = TemplateId::MomentumRanker;
            recommendation.match_score = DOWNGRADE_SCORE;
            recommendation.rationale.push_str(&format!(
                "\nCritical architecture issues reported against the structurally complex '{}'; downgrading to the simpler '{}'.",
                previous, recommendation.template_name
            ));
        }

        if analysis.has_data_issues() {
            recommendation.rationale.push_str(
                "\nData-access issues reported; prefer common, known-good data fields (close, volume, market_cap).",
            );
        }
    }

    /// Step 6: append the final choice to the rolling history.
    fn note_usage(&mut self, template: TemplateId) {
        self.recent_templates.push_back(template);
        while self.recent_templates.len() > RECENT_WINDOW {
            self.recent_templates.pop_front();
        }
    }
}

fn base_recommendation(
    template: TemplateId,
    rationale: String,
    match_score: f64,
) -> TemplateRecommendation {
    TemplateRecommendation {
        template_name: template,
        rationale,
        match_score,
        suggested_params: BTreeMap::new(),
        champion_reference: None,
        exploration_mode: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::{Champion, IssueSeverity, ValidationIssue};

    fn metrics(sharpe: f64, drawdown: f64) -> PerformanceSnapshot {
        PerformanceSnapshot {
            sharpe_ratio: sharpe,
            max_drawdown: drawdown,
        }
    }

    fn recommender() -> TemplateRecommender {
        TemplateRecommender::new(TemplateRegistry::new())
    }

    struct FixedChampions(Vec<Champion>);

    impl ChampionSource for FixedChampions {
        fn champions(&self, min_sharpe: f64) -> Result<Vec<Champion>, ChampionSourceError> {
            Ok(self
                .0
                .iter()
                .filter(|c| c.sharpe_ratio >= min_sharpe)
                .cloned()
                .collect())
        }
    }

    struct BrokenChampions;

    impl ChampionSource for BrokenChampions {
        fn champions(&self, _: f64) -> Result<Vec<Champion>, ChampionSourceError> {
            Err(ChampionSourceError::Io {
                path: "/nowhere/champions.json".into(),
                source: std::io::Error::other("backend down"),
            })
        }
    }

    #[test]
    fn exploration_fires_exactly_on_multiples_of_five() {
        let mut rec = recommender();
        let m = metrics(1.8, 0.1);
        for iteration in 20..=25 {
            let result = rec.recommend(Some(&m), iteration, None, None, None);
            let expected = iteration % 5 == 0;
            assert_eq!(
                result.exploration_mode, expected,
                "iteration {iteration} exploration flag"
            );
        }
    }

    #[test]
    fn exploration_avoids_recent_repeats() {
        let mut rec = recommender();
        rec.recent_templates = VecDeque::from(vec![
            TemplateId::MomentumRanker,
            TemplateId::MomentumRanker,
            TemplateId::ConcentratedMomentum,
        ]);

        let result = rec.recommend(None, 10, None, None, None);
        assert!(result.exploration_mode);
        assert_ne!(result.template_name, TemplateId::MomentumRanker);
        assert_ne!(result.template_name, TemplateId::ConcentratedMomentum);
    }

    #[test]
    fn exploration_confidence_is_below_performance_confidence() {
        let mut rec = recommender();
        let explored = rec.recommend(Some(&metrics(2.5, 0.05)), 5, None, None, None);
        let exploited = rec.recommend(Some(&metrics(2.5, 0.05)), 6, None, None, None);
        assert!(explored.match_score < exploited.match_score);
        assert!(!explored.suggested_params.is_empty(), "grid defaults expected");
    }

    #[test]
    fn performance_bands_map_to_the_documented_templates() {
        let mut rec = recommender();
        let cases = [
            (2.3, 0.10, TemplateId::MomentumRanker),
            (1.7, 0.10, TemplateId::ConcentratedMomentum),
            (1.2, 0.10, TemplateId::LowVolRotation),
            (1.2, 0.25, TemplateId::DefensiveTrend),
            (0.7, 0.10, TemplateId::MomentumRanker),
            (0.2, 0.10, TemplateId::FastMeanReversion),
        ];
        // Iteration numbers chosen to stay off the exploration schedule.
        let iterations = [1u64, 2, 3, 4, 6, 7];
        for (i, (sharpe, drawdown, expected)) in cases.into_iter().enumerate() {
            let result =
                rec.recommend(Some(&metrics(sharpe, drawdown)), iterations[i], None, None, None);
            assert_eq!(result.template_name, expected, "sharpe {sharpe}");
            assert!(!result.exploration_mode);
        }
    }

    #[test]
    fn missing_metrics_fall_back_to_the_reliable_default() {
        let mut rec = recommender();
        let result = rec.recommend(None, 1, None, None, None);
        assert_eq!(result.template_name, TemplateId::MomentumRanker);
        assert_eq!(result.match_score, 0.5);
        assert!(result.rationale.contains("No current metrics"));
    }

    #[test]
    fn risk_profile_overrides_metrics() {
        let mut rec = recommender();
        let result = rec.recommend(
            Some(&metrics(2.5, 0.05)),
            1,
            None,
            None,
            Some(RiskProfile::Fast),
        );
        assert_eq!(result.template_name, TemplateId::FastMeanReversion);
    }

    #[test]
    fn champion_parameters_are_transferred_with_score_bonus() {
        let champion = Champion {
            genome_id: "genome-42".into(),
            template_name: TemplateId::ConcentratedMomentum,
            sharpe_ratio: 2.2,
            parameters: BTreeMap::from([
                ("stock_count".to_string(), 10.0),
                ("stop_loss_pct".to_string(), 0.12),
            ]),
        };
        let mut rec = TemplateRecommender::new(TemplateRegistry::new())
            .with_champion_source(Box::new(FixedChampions(vec![champion])));

        // Sharpe 1.7 selects ConcentratedMomentum at 0.8 confidence.
        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, None, None, None);
        assert_eq!(result.champion_reference.as_deref(), Some("genome-42"));
        assert!((result.match_score - 0.85).abs() < 1e-12);
        assert_eq!(result.suggested_params["stock_count"], Value::from(10));
        assert_eq!(
            result.suggested_params["source_champion"],
            Value::from("genome-42")
        );
    }

    #[test]
    fn champions_of_other_templates_are_not_borrowed() {
        let champion = Champion {
            genome_id: "genome-9".into(),
            template_name: TemplateId::LowVolRotation,
            sharpe_ratio: 2.4,
            parameters: BTreeMap::from([("vol_window".to_string(), 42.0)]),
        };
        let mut rec = TemplateRecommender::new(TemplateRegistry::new())
            .with_champion_source(Box::new(FixedChampions(vec![champion])));

        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, None, None, None);
        assert_eq!(result.template_name, TemplateId::ConcentratedMomentum);
        assert!(result.champion_reference.is_none());
        assert!(result.suggested_params.is_empty());
    }

    #[test]
    fn failing_champion_source_degrades_gracefully() {
        let mut rec = TemplateRecommender::new(TemplateRegistry::new())
            .with_champion_source(Box::new(BrokenChampions));

        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, None, None, None);
        assert_eq!(result.template_name, TemplateId::ConcentratedMomentum);
        assert!(result.champion_reference.is_none());
    }

    #[test]
    fn exploration_skips_champion_enrichment() {
        let champion = Champion {
            genome_id: "genome-1".into(),
            template_name: TemplateId::MomentumRanker,
            sharpe_ratio: 2.9,
            parameters: BTreeMap::new(),
        };
        let mut rec = TemplateRecommender::new(TemplateRegistry::new())
            .with_champion_source(Box::new(FixedChampions(vec![champion])));

        let result = rec.recommend(Some(&metrics(2.5, 0.05)), 10, None, None, None);
        assert!(result.exploration_mode);
        assert!(result.champion_reference.is_none());
    }

    #[test]
    fn parameter_issues_clamp_current_params() {
        let mut rec = recommender();
        let feedback = ValidationFeedback {
            status: "failed".into(),
            issues: vec![ValidationIssue::new(
                IssueSeverity::Moderate,
                "stock_count parameter outside allowed range",
            )],
        };
        let current = BTreeMap::from([
            ("stock_count".to_string(), Value::from(120)),
            ("stop_loss_pct".to_string(), Value::from(0.5)),
        ]);

        let result = rec.recommend(
            Some(&metrics(1.7, 0.1)),
            1,
            Some(&feedback),
            Some(&current),
            None,
        );
        assert_eq!(result.suggested_params["stock_count"], Value::from(50));
        assert_eq!(result.suggested_params["stop_loss_pct"], Value::from(0.25));
    }

    #[test]
    fn critical_architecture_issue_downgrades_complex_templates() {
        let mut rec = recommender();
        let feedback = ValidationFeedback {
            status: "failed".into(),
            issues: vec![ValidationIssue::new(
                IssueSeverity::Critical,
                "generated architecture is too complex to validate",
            )],
        };

        // Sharpe 1.7 initially selects the complex ConcentratedMomentum.
        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, Some(&feedback), None, None);
        assert_eq!(result.template_name, TemplateId::MomentumRanker);
        assert_eq!(result.match_score, 0.5);
        assert!(result.rationale.contains("downgrading"));
    }

    #[test]
    fn moderate_architecture_issue_does_not_downgrade() {
        let mut rec = recommender();
        let feedback = ValidationFeedback {
            status: "failed".into(),
            issues: vec![ValidationIssue::new(
                IssueSeverity::Moderate,
                "architecture somewhat complex",
            )],
        };
        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, Some(&feedback), None, None);
        assert_eq!(result.template_name, TemplateId::ConcentratedMomentum);
    }

    #[test]
    fn feedback_categories_compound_in_one_call() {
        let mut rec = recommender();
        let feedback = ValidationFeedback {
            status: "failed".into(),
            issues: vec![
                ValidationIssue::new(
                    IssueSeverity::Critical,
                    "architecture is too deeply nested",
                ),
                ValidationIssue::new(
                    IssueSeverity::Moderate,
                    "stop_loss parameter outside allowed range",
                ),
            ],
        };
        let current = BTreeMap::from([("stop_loss_pct".to_string(), Value::from(0.9))]);

        let result = rec.recommend(
            Some(&metrics(1.7, 0.1)),
            1,
            Some(&feedback),
            Some(&current),
            None,
        );
        // Both the clamp and the downgrade applied.
        assert_eq!(result.template_name, TemplateId::MomentumRanker);
        assert_eq!(result.suggested_params["stop_loss_pct"], Value::from(0.25));
    }

    #[test]
    fn data_access_issues_only_append_advice() {
        let mut rec = recommender();
        let feedback = ValidationFeedback {
            status: "failed".into(),
            issues: vec![ValidationIssue::new(
                IssueSeverity::Moderate,
                "unknown data field 'pe_forward'",
            )],
        };
        let result = rec.recommend(Some(&metrics(1.7, 0.1)), 1, Some(&feedback), None, None);
        assert_eq!(result.template_name, TemplateId::ConcentratedMomentum);
        assert!(result.rationale.contains("known-good data fields"));
    }

    #[test]
    fn rolling_history_is_bounded() {
        let mut rec = recommender();
        for iteration in 1..=30 {
            rec.recommend(Some(&metrics(1.2, 0.1)), iteration, None, None, None);
        }
        assert_eq!(rec.recent_templates().count(), RECENT_WINDOW);
    }
}
