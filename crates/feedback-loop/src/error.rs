use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedbackError {
    #[error("Failed to record iteration outcome: {0}")]
    Store(#[from] usage_store::StoreError),
}
