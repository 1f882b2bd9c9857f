//! # Meridian Decision Gate
//!
//! Deterministic, side-effect-free GO / CONDITIONAL_GO / NO-GO evaluation
//! for a batch of generated strategies, from three independent input
//! reports: validation results, duplicate detection, and population
//! diversity.
//!
//! Two tiers of weighted criteria are evaluated: the full advancement set
//! (GO requires all seven), and a relaxed conditional set where only the
//! CRITICAL checks are blocking. The risk level is fixed per decision tier.

pub mod criteria;
pub mod error;
pub mod gate;
pub mod report;
pub mod reports;

// Re-export the key components to create a clean, public-facing API.
pub use criteria::{Comparison, CriterionWeight, DecisionCriterion};
pub use error::GateError;
pub use gate::{Decision, DecisionGate, GateMetrics, RiskLevel};
pub use report::DecisionReport;
pub use reports::{DiversityReport, DuplicateReport, ExecutionStats, ValidationReport};
