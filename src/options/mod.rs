//! Options layer: settings file schema + validated in-memory form.
//!
//! Kept apart from trace parsing and rendering.

pub mod analysis;

pub use analysis::{AnalysisOptions, ValidatedOptions};
