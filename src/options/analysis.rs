//! Caller-supplied analysis settings (partition sizes and exclusions).
//!
//! JSON shape (both fields optional):
//! {
//!   "partitions": [3, 3],   // runs per partition, in order
//!   "exclusions": [1]       // run numbers to drop, counted from #1
//! }
//!
//! Command-line values replace the corresponding file values.

use crate::Result;
use crate::diagnostics;

use anyhow::{Context, bail};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisOptions {
    #[serde(default)]
    pub partitions: Vec<usize>,

    #[serde(default)]
    pub exclusions: Vec<u32>,
}

/// Checked settings consumed by the analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidatedOptions {
    pub partition_sizes: Vec<usize>,
    pub exclusions: BTreeSet<u32>,
}

impl AnalysisOptions {
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).with_context(|| {
            diagnostics::error_message(format!("read options file {}", path.display()))
        })?;
        serde_json::from_str(&text).with_context(|| {
            diagnostics::error_message(format!("parse options file {}", path.display()))
        })
    }

    /// Replace file values with non-empty command-line values.
    pub fn override_with(mut self, partitions: Vec<usize>, exclusions: Vec<u32>) -> Self {
        if !partitions.is_empty() {
            self.partitions = partitions;
        }
        if !exclusions.is_empty() {
            self.exclusions = exclusions;
        }
        self
    }

    /// Reject zero-sized partitions and run number 0; fold duplicate
    /// exclusions.
    pub fn validate_and_build(&self) -> Result<ValidatedOptions> {
        if let Some(pos) = self.partitions.iter().position(|&p| p == 0) {
            bail!(
                "{}",
                diagnostics::error_message(format!(
                    "partition #{} has size 0; sizes must be positive",
                    pos + 1
                ))
            );
        }
        if self.exclusions.contains(&0) {
            bail!(
                "{}",
                diagnostics::error_message("run numbers start at #1; cannot exclude run #0")
            );
        }

        let exclusions: BTreeSet<u32> = self.exclusions.iter().copied().collect();
        if exclusions.len() != self.exclusions.len() {
            diagnostics::note("duplicate exclusions were merged");
        }

        Ok(ValidatedOptions {
            partition_sizes: self.partitions.clone(),
            exclusions,
        })
    }
}
