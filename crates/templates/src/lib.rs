//! # Meridian Template Library
//!
//! This crate defines the fixed universe of strategy templates the research
//! pipeline can draw from: their architecture metadata, structural
//! complexity, expected performance ranges, and default parameter grids.
//!
//! ## Architectural Principles
//!
//! - **Pure data crate:** no I/O, no state. It depends only on `core-types`.
//! - **Explicit registry:** the [`TemplateRegistry`] is constructed once at
//!   application start and injected into consumers. Nothing in this crate is
//!   reachable through a module-global.
//! - **Extensibility:** adding a template means adding a `TemplateId`
//!   variant, a row in the metadata table, and a grid entry; exhaustive
//!   matches make the compiler point at anything missed.

pub mod error;
pub mod grids;
pub mod registry;
pub mod spec;

// Re-export the key components to create a clean, public-facing API.
pub use error::TemplateError;
pub use registry::{number_value, TemplateRegistry};
pub use spec::{Complexity, TemplateSpec};

// Re-export TemplateId from core_types.
pub use core_types::TemplateId;
