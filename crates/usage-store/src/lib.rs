//! # Meridian Usage Store
//!
//! Durable, append-only ledger of template usage outcomes, plus the derived
//! statistics the recommendation engine learns from.
//!
//! The ledger is a human-readable JSON array on disk. Every mutation is
//! persisted immediately through an atomic temp-file-and-rename protocol
//! (see [`UsageStore`]), so a crash mid-write can never corrupt or truncate
//! existing history.

pub mod error;
pub mod stats;
pub mod store;

// Re-export the core types to provide a clean, public-facing API.
pub use error::StoreError;
pub use stats::{StatisticsProvider, SuccessRateReport, TemplateStatistics, UsageSnapshot};
pub use store::{UsageStore, MIN_RELIABLE_RECORDS};
