//! # Meridian Feedback Loop
//!
//! Thin orchestration over the recommendation stack: once per research
//! iteration it asks the recommender for a template, renders the rationale
//! document against current usage statistics, and later records the realized
//! outcome back into the usage store. It also maintains a bounded iteration
//! history from which the recent performance trend is computed.

pub mod error;

pub use error::FeedbackError;

use core_types::{PerformanceSnapshot, TemplateRecommendation, ValidationFeedback};
use rationale::RationaleGenerator;
use recommender::TemplateRecommender;
use serde::Serialize;
use std::collections::VecDeque;
use templates::TemplateRegistry;
use usage_store::UsageStore;

/// Upper bound on retained iteration history; the oldest entries are trimmed.
pub const HISTORY_CAP: usize = 50;

/// Entries compared on each side when computing the trend.
const TREND_WINDOW: usize = 5;

/// Sharpe-difference tolerance inside which the trend counts as flat.
const TREND_TOLERANCE: f64 = 0.1;

/// Direction of recent performance, from the bounded iteration history.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Improving,
    Flat,
    Declining,
    /// Fewer than two full trend windows of history exist.
    InsufficientData,
}

/// What one loop iteration hands back to the caller.
#[derive(Debug, Clone)]
pub struct IterationOutcome {
    pub recommendation: TemplateRecommendation,
    /// The rendered rationale document for the recommendation.
    pub rationale: String,
    pub trend: TrendDirection,
}

/// The per-iteration orchestrator tying recommender, store and rationale
/// together.
pub struct FeedbackLoop {
    registry: TemplateRegistry,
    recommender: TemplateRecommender,
    store: UsageStore,
    history: VecDeque<(u64, f64)>,
}

impl FeedbackLoop {
    pub fn new(
        registry: TemplateRegistry,
        recommender: TemplateRecommender,
        store: UsageStore,
    ) -> Self {
        Self {
            registry,
            recommender,
            store,
            history: VecDeque::new(),
        }
    }

    /// Runs one iteration: recommend a template and render its rationale.
    ///
    /// The realized outcome is reported separately through
    /// [`FeedbackLoop::record_outcome`] once the strategy has been generated
    /// and evaluated.
    pub fn run_iteration(
        &mut self,
        iteration: u64,
        metrics: Option<&PerformanceSnapshot>,
        validation_feedback: Option<&ValidationFeedback>,
    ) -> IterationOutcome {
        let recommendation =
            self.recommender
                .recommend(metrics, iteration, validation_feedback, None, None);

        let generator = RationaleGenerator::new(&self.registry).with_statistics(&self.store);
        let rationale = generator.render(&recommendation, metrics, None);

        IterationOutcome {
            recommendation,
            rationale,
            trend: self.trend(),
        }
    }

    /// Records the realized outcome of acting on a recommendation: persists
    /// the usage record and appends to the bounded iteration history.
    pub fn record_outcome(
        &mut self,
        iteration: u64,
        recommendation: &TemplateRecommendation,
        sharpe_ratio: f64,
        validation_passed: bool,
    ) -> Result<(), FeedbackError> {
        self.store.record_usage(
            iteration,
            recommendation.template_name,
            sharpe_ratio,
            validation_passed,
            recommendation.exploration_mode,
            recommendation.champion_reference.is_some(),
            recommendation.match_score,
        )?;

        self.history.push_back((iteration, sharpe_ratio));
        while self.history.len() > HISTORY_CAP {
            self.history.pop_front();
        }

        tracing::debug!(
            iteration,
            template = %recommendation.template_name,
            sharpe = sharpe_ratio,
            "iteration outcome recorded"
        );
        Ok(())
    }

    /// The recent performance trend: mean Sharpe of the latest window
    /// against the window before it.
    pub fn trend(&self) -> TrendDirection {
        if self.history.len() < 2 * TREND_WINDOW {
            return TrendDirection::InsufficientData;
        }

        let sharpes: Vec<f64> = self.history.iter().map(|(_, s)| *s).collect();
        let latest = &sharpes[sharpes.len() - TREND_WINDOW..];
        let previous = &sharpes[sharpes.len() - 2 * TREND_WINDOW..sharpes.len() - TREND_WINDOW];

        let mean = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
        let delta = mean(latest) - mean(previous);

        if delta > TREND_TOLERANCE {
            TrendDirection::Improving
        } else if delta < -TREND_TOLERANCE {
            TrendDirection::Declining
        } else {
            TrendDirection::Flat
        }
    }

    pub fn store(&self) -> &UsageStore {
        &self.store
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}
