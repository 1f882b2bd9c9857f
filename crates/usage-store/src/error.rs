use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Failed to persist usage ledger to '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize usage ledger: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("Statistics provider unavailable: {0}")]
    ProviderUnavailable(String),
}
