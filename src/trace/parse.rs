use crate::Result;
use crate::diagnostics;
use crate::trace::line::{Line, classify_lines};

use anyhow::{Context, bail};
use std::fs;
use std::path::Path;

/// Load a perf trace and classify every line.
///
/// The returned vector has one entry per input line, so indices are the
/// 0-based line numbers of the file.
pub fn read_trace_file(path: impl AsRef<Path>) -> Result<Vec<Line>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path).with_context(|| {
        diagnostics::error_message(format!("read trace file {}", path.display()))
    })?;

    if text.is_empty() {
        bail!(
            "{}",
            diagnostics::error_message(format!("trace file is empty: {}", path.display()))
        );
    }

    let lines = classify_lines(&text);
    let recognized = lines.iter().filter(|l| l.is_recognized()).count();
    tracing::debug!(
        total = lines.len(),
        recognized,
        "classified {}",
        path.display()
    );

    Ok(lines)
}
