use crate::error::StoreError;
use crate::stats::{StatisticsProvider, SuccessRateReport, TemplateStatistics, UsageSnapshot};
use chrono::Utc;
use core_types::{TemplateId, UsageRecord};
use std::cmp::Reverse;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use uuid::Uuid;

/// A template needs at least this many records before its statistics are
/// considered reliable enough to drive selection.
pub const MIN_RELIABLE_RECORDS: usize = 3;

/// Durable, append-only ledger of template usage outcomes.
///
/// Every mutation is persisted immediately through a write-to-temp-then-
/// atomic-rename protocol, so readers always observe either the old complete
/// ledger or the new complete ledger, never a partial write. The protocol
/// protects each individual write; it does not serialize multiple
/// independent writer processes sharing one path. Callers needing that must
/// enforce single-writer discipline externally.
pub struct UsageStore {
    path: PathBuf,
    success_threshold: f64,
    records: Vec<UsageRecord>,
}

impl UsageStore {
    /// Opens the ledger at `path`, loading any existing records.
    ///
    /// A corrupt or unreadable ledger is logged and treated as empty:
    /// history loss is recoverable, crashing the research loop is not.
    pub fn open(path: impl Into<PathBuf>, success_threshold: f64) -> Self {
        let path = path.into();
        let records = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<Vec<UsageRecord>>(&raw) {
                Ok(records) => records,
                Err(e) => {
                    tracing::warn!(
                        path = %path.display(),
                        error = %e,
                        "usage ledger is corrupt; starting with an empty ledger"
                    );
                    Vec::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "usage ledger could not be read; starting with an empty ledger"
                );
                Vec::new()
            }
        };

        Self {
            path,
            success_threshold,
            records,
        }
    }

    /// Appends one usage outcome and persists the ledger.
    ///
    /// On a persistence failure the in-memory append is rolled back and the
    /// error is returned, so memory and disk never silently diverge and the
    /// caller knows the record was not durably saved.
    #[allow(clippy::too_many_arguments)]
    pub fn record_usage(
        &mut self,
        iteration: u64,
        template_name: TemplateId,
        sharpe_ratio: f64,
        validation_passed: bool,
        exploration_mode: bool,
        champion_based: bool,
        match_score: f64,
    ) -> Result<(), StoreError> {
        self.records.push(UsageRecord {
            iteration,
            timestamp: Utc::now(),
            template_name,
            sharpe_ratio,
            validation_passed,
            exploration_mode,
            champion_based,
            match_score,
        });

        if let Err(e) = self.save() {
            self.records.pop();
            return Err(e);
        }
        Ok(())
    }

    /// Serializes the full ledger to a sibling temporary file, then atomically
    /// renames it over the target path.
    fn save(&self) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(&dir).map_err(|source| StoreError::Io {
            path: dir.clone(),
            source,
        })?;
        serde_json::to_writer_pretty(&mut tmp, &self.records)?;
        tmp.flush().map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io {
            path: self.path.clone(),
            source: e.error,
        })?;
        Ok(())
    }

    /// All records, in append order.
    pub fn records(&self) -> &[UsageRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Derived statistics for one template. Never fails: a template with no
    /// records reports the no-data sentinel.
    pub fn statistics_for(&self, template: TemplateId) -> TemplateStatistics {
        let rows: Vec<&UsageRecord> = self
            .records
            .iter()
            .filter(|r| r.template_name == template)
            .collect();

        if rows.is_empty() {
            return TemplateStatistics::empty(template);
        }

        let total = rows.len();
        let successes = rows
            .iter()
            .filter(|r| r.validation_passed && r.sharpe_ratio >= self.success_threshold)
            .count();
        let passed = rows.iter().filter(|r| r.validation_passed).count();
        let sharpe_sum: f64 = rows.iter().map(|r| r.sharpe_ratio).sum();
        let best = rows
            .iter()
            .map(|r| r.sharpe_ratio)
            .fold(f64::NEG_INFINITY, f64::max);
        let worst = rows
            .iter()
            .map(|r| r.sharpe_ratio)
            .fold(f64::INFINITY, f64::min);

        TemplateStatistics {
            template,
            total_usage: total,
            success_rate: successes as f64 / total as f64,
            avg_sharpe: sharpe_sum / total as f64,
            best_sharpe: best,
            worst_sharpe: worst,
            validation_pass_rate: passed as f64 / total as f64,
            exploration_usage: rows.iter().filter(|r| r.exploration_mode).count(),
            champion_usage: rows.iter().filter(|r| r.champion_based).count(),
            reliable: total >= MIN_RELIABLE_RECORDS,
            has_data: true,
        }
    }

    /// Success rate for a template against an explicit Sharpe bar.
    ///
    /// A record is successful when validation passed and its Sharpe ratio is
    /// at least `min_sharpe`. An empty input reports a rate of 0.0.
    pub fn success_rate_for(&self, template: TemplateId, min_sharpe: f64) -> SuccessRateReport {
        let rows: Vec<&UsageRecord> = self
            .records
            .iter()
            .filter(|r| r.template_name == template)
            .collect();

        let total = rows.len();
        let successful: Vec<&&UsageRecord> = rows
            .iter()
            .filter(|r| r.validation_passed && r.sharpe_ratio >= min_sharpe)
            .collect();

        let avg = |xs: &[f64]| {
            if xs.is_empty() {
                0.0
            } else {
                xs.iter().sum::<f64>() / xs.len() as f64
            }
        };
        let all_sharpes: Vec<f64> = rows.iter().map(|r| r.sharpe_ratio).collect();
        let good_sharpes: Vec<f64> = successful.iter().map(|r| r.sharpe_ratio).collect();

        SuccessRateReport {
            total_usage: total,
            successful_strategies: successful.len(),
            success_rate: if total == 0 {
                0.0
            } else {
                successful.len() as f64 / total as f64
            },
            avg_sharpe: avg(&all_sharpes),
            avg_sharpe_successful: avg(&good_sharpes),
        }
    }

    /// The best template by (success_rate, avg_sharpe), considering only
    /// templates with reliable statistics. Ties keep the earlier template in
    /// declaration order. None when no template is reliable yet.
    pub fn best_template(&self) -> Option<TemplateId> {
        let mut best: Option<(TemplateId, f64, f64)> = None;
        for id in TemplateId::ALL {
            let stats = self.statistics_for(id);
            if !stats.reliable {
                continue;
            }
            let beats = match best {
                None => true,
                Some((_, sr, avg)) => {
                    stats.success_rate > sr || (stats.success_rate == sr && stats.avg_sharpe > avg)
                }
            };
            if beats {
                best = Some((id, stats.success_rate, stats.avg_sharpe));
            }
        }
        best.map(|(id, _, _)| id)
    }

    /// The most recent records, highest iteration first, optionally filtered
    /// to one template, truncated to `last_n`. Records sharing an iteration
    /// keep their append order.
    pub fn recent(&self, template: Option<TemplateId>, last_n: usize) -> Vec<UsageRecord> {
        let mut rows: Vec<UsageRecord> = self
            .records
            .iter()
            .filter(|r| template.is_none_or(|t| r.template_name == t))
            .cloned()
            .collect();
        rows.sort_by_key(|r| Reverse(r.iteration));
        rows.truncate(last_n);
        rows
    }

    /// A structured point-in-time report over the whole ledger.
    pub fn export_snapshot(&self, recent_n: usize) -> UsageSnapshot {
        UsageSnapshot {
            snapshot_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            statistics: TemplateId::ALL
                .into_iter()
                .map(|id| self.statistics_for(id))
                .filter(|s| s.has_data)
                .collect(),
            best_template: self.best_template(),
            recent: self.recent(None, recent_n),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatisticsProvider for UsageStore {
    fn statistics_for(&self, template: TemplateId) -> Result<TemplateStatistics, StoreError> {
        Ok(UsageStore::statistics_for(self, template))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn record(
        store: &mut UsageStore,
        iteration: u64,
        template: TemplateId,
        sharpe: f64,
        passed: bool,
    ) {
        store
            .record_usage(iteration, template, sharpe, passed, false, false, 0.7)
            .expect("record_usage should persist");
    }

    #[test]
    fn ledger_is_append_only_and_durable_across_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");

        let mut store = UsageStore::open(&path, 1.0);
        record(&mut store, 1, TemplateId::MomentumRanker, 1.2, true);
        record(&mut store, 2, TemplateId::LowVolRotation, 0.4, false);
        record(&mut store, 3, TemplateId::MomentumRanker, 1.9, true);

        let reopened = UsageStore::open(&path, 1.0);
        assert_eq!(reopened.len(), 3);
        assert_eq!(reopened.records(), store.records());
    }

    #[test]
    fn interrupted_write_leaves_previous_ledger_intact() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");

        let mut store = UsageStore::open(&path, 1.0);
        record(&mut store, 1, TemplateId::DefensiveTrend, 1.1, true);

        // Simulate a crash mid-write: a temp file is created in the same
        // directory with partial content, but the rename never happens.
        let orphan = dir.path().join(".tmp-partial");
        fs::write(&orphan, "[{\"iteration\": 9, \"template_na").unwrap();

        let reopened = UsageStore::open(&path, 1.0);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.records()[0].iteration, 1);
    }

    #[test]
    fn corrupt_ledger_resets_to_empty_instead_of_crashing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("usage.json");
        fs::write(&path, "{not json at all").unwrap();

        let store = UsageStore::open(&path, 1.0);
        assert!(store.is_empty());
    }

    #[test]
    fn persistence_failure_rolls_back_the_append() {
        let dir = TempDir::new().unwrap();
        // The ledger path is a directory, so the rename must fail.
        let path = dir.path().join("occupied");
        fs::create_dir_all(&path).unwrap();

        let mut store = UsageStore::open(&path, 1.0);
        let result = store.record_usage(1, TemplateId::MomentumRanker, 1.0, true, false, false, 0.5);
        assert!(result.is_err());
        assert!(store.is_empty());
    }

    #[test]
    fn unused_template_reports_no_data_sentinel() {
        let dir = TempDir::new().unwrap();
        let store = UsageStore::open(dir.path().join("usage.json"), 1.0);

        let stats = store.statistics_for(TemplateId::FastMeanReversion);
        assert_eq!(stats.total_usage, 0);
        assert_eq!(stats.success_rate, 0.0);
        assert!(!stats.has_data);
        assert!(!stats.reliable);
    }

    #[test]
    fn success_rate_counts_only_passing_records_above_the_bar() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        record(&mut store, 1, TemplateId::MomentumRanker, 1.8, true);
        record(&mut store, 2, TemplateId::MomentumRanker, 2.1, true);
        record(&mut store, 3, TemplateId::MomentumRanker, 0.9, false);
        record(&mut store, 4, TemplateId::MomentumRanker, 1.6, true);

        let report = store.success_rate_for(TemplateId::MomentumRanker, 1.5);
        assert_eq!(report.total_usage, 4);
        assert_eq!(report.successful_strategies, 3);
        assert_eq!(report.success_rate, 0.75);
        let expected_good = (1.8 + 2.1 + 1.6) / 3.0;
        assert!((report.avg_sharpe_successful - expected_good).abs() < 1e-12);
    }

    #[test]
    fn statistics_are_idempotent_between_mutations() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        record(&mut store, 1, TemplateId::LowVolRotation, 1.3, true);
        record(&mut store, 2, TemplateId::LowVolRotation, 0.7, true);

        let first = store.statistics_for(TemplateId::LowVolRotation);
        let second = store.statistics_for(TemplateId::LowVolRotation);
        assert_eq!(first, second);
    }

    #[test]
    fn best_template_requires_reliable_statistics() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        // Two records are below the reliability threshold.
        record(&mut store, 1, TemplateId::ConcentratedMomentum, 2.5, true);
        record(&mut store, 2, TemplateId::ConcentratedMomentum, 2.4, true);
        assert_eq!(store.best_template(), None);

        record(&mut store, 3, TemplateId::ConcentratedMomentum, 2.3, true);
        assert_eq!(
            store.best_template(),
            Some(TemplateId::ConcentratedMomentum)
        );
    }

    #[test]
    fn best_template_breaks_ties_by_avg_sharpe() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        for i in 0..3 {
            record(&mut store, i, TemplateId::MomentumRanker, 1.2, true);
            record(&mut store, i, TemplateId::DefensiveTrend, 1.6, true);
        }
        // Both have a 100% success rate; DefensiveTrend wins on avg Sharpe.
        assert_eq!(store.best_template(), Some(TemplateId::DefensiveTrend));
    }

    #[test]
    fn recent_orders_by_iteration_and_truncates() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        record(&mut store, 5, TemplateId::MomentumRanker, 1.0, true);
        record(&mut store, 9, TemplateId::LowVolRotation, 1.1, true);
        record(&mut store, 7, TemplateId::MomentumRanker, 0.8, true);

        let recent = store.recent(None, 2);
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].iteration, 9);
        assert_eq!(recent[1].iteration, 7);

        let filtered = store.recent(Some(TemplateId::MomentumRanker), 10);
        assert_eq!(filtered.len(), 2);
        assert_eq!(filtered[0].iteration, 7);
    }

    #[test]
    fn snapshot_includes_only_templates_with_data() {
        let dir = TempDir::new().unwrap();
        let mut store = UsageStore::open(dir.path().join("usage.json"), 1.0);
        record(&mut store, 1, TemplateId::FastMeanReversion, 0.6, true);

        let snapshot = store.export_snapshot(10);
        assert_eq!(snapshot.statistics.len(), 1);
        assert_eq!(snapshot.statistics[0].template, TemplateId::FastMeanReversion);
        assert_eq!(snapshot.recent.len(), 1);
    }
}
