use crate::error::StoreError;
use chrono::{DateTime, Utc};
use core_types::{TemplateId, UsageRecord};
use serde::Serialize;
use uuid::Uuid;

/// Aggregate statistics for one template, derived on demand from the ledger.
///
/// A template with zero records reports the no-data sentinel (`has_data =
/// false`, all rates zero) instead of dividing by zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateStatistics {
    pub template: TemplateId,
    pub total_usage: usize,
    /// Fraction of records that passed validation and met the Sharpe bar.
    pub success_rate: f64,
    pub avg_sharpe: f64,
    pub best_sharpe: f64,
    pub worst_sharpe: f64,
    pub validation_pass_rate: f64,
    pub exploration_usage: usize,
    pub champion_usage: usize,
    /// True once the template has enough records for its statistics to be
    /// trusted by selection logic.
    pub reliable: bool,
    pub has_data: bool,
}

impl TemplateStatistics {
    /// The no-data sentinel for a template that has never been used.
    pub fn empty(template: TemplateId) -> Self {
        Self {
            template,
            total_usage: 0,
            success_rate: 0.0,
            avg_sharpe: 0.0,
            best_sharpe: 0.0,
            worst_sharpe: 0.0,
            validation_pass_rate: 0.0,
            exploration_usage: 0,
            champion_usage: 0,
            reliable: false,
            has_data: false,
        }
    }
}

/// The answer to a success-rate query against a specific Sharpe bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuccessRateReport {
    pub total_usage: usize,
    pub successful_strategies: usize,
    pub success_rate: f64,
    pub avg_sharpe: f64,
    /// Average Sharpe over successful records only; 0.0 when none qualify.
    pub avg_sharpe_successful: f64,
}

/// A point-in-time export of the whole store: per-template statistics, the
/// current best template, and the most recent records.
#[derive(Debug, Clone, Serialize)]
pub struct UsageSnapshot {
    pub snapshot_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub statistics: Vec<TemplateStatistics>,
    pub best_template: Option<TemplateId>,
    pub recent: Vec<UsageRecord>,
}

/// Read access to empirical template statistics.
///
/// The rationale generator consumes this rather than a concrete store so it
/// can degrade gracefully when no statistics source is wired in, or when the
/// source fails.
pub trait StatisticsProvider {
    fn statistics_for(&self, template: TemplateId) -> Result<TemplateStatistics, StoreError>;
}
