use std::path::PathBuf;
use thiserror::Error;

/// Failures a champion source can report.
///
/// The recommender never propagates these: a failing source is logged and
/// the recommendation proceeds without champion enrichment. The explicit
/// error type exists so that fallback is a visible decision at the call
/// site, not a blanket catch.
#[derive(Error, Debug)]
pub enum ChampionSourceError {
    #[error("Failed to read champion file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Champion file '{path}' is malformed: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
