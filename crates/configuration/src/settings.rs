use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub feedback: Feedback,
}

/// Filesystem locations for persisted state.
#[derive(Debug, Clone, Deserialize)]
pub struct Storage {
    /// Path of the JSON usage ledger.
    #[serde(default = "default_ledger_path")]
    pub ledger_path: PathBuf,
    /// Optional path of a JSON champion file used for parameter transfer.
    #[serde(default)]
    pub champions_path: Option<PathBuf>,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            ledger_path: default_ledger_path(),
            champions_path: None,
        }
    }
}

/// Tunables for the feedback-learning loop and statistics.
#[derive(Debug, Clone, Deserialize)]
pub struct Feedback {
    /// A ledger record counts as a success when validation passed and its
    /// Sharpe ratio meets this bar.
    #[serde(default = "default_success_threshold")]
    pub success_threshold: f64,
    /// How many of the most recent records an exported snapshot includes.
    #[serde(default = "default_snapshot_recent")]
    pub snapshot_recent: usize,
}

impl Default for Feedback {
    fn default() -> Self {
        Self {
            success_threshold: default_success_threshold(),
            snapshot_recent: default_snapshot_recent(),
        }
    }
}

fn default_ledger_path() -> PathBuf {
    PathBuf::from("data/template_usage.json")
}

fn default_success_threshold() -> f64 {
    1.0
}

fn default_snapshot_recent() -> usize {
    10
}
