use crate::diagnostics;
use crate::model::segment::{RunWarning, Segment, segment};
use crate::trace::Line;

use std::collections::BTreeSet;

/// A run with its position in the full run enumeration (1-based).
#[derive(Debug, Clone, PartialEq)]
pub struct Run {
    pub sequence: u32,
    pub segment: Segment,
}

/// Outcome of segmenting a whole trace.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSet {
    /// Complete, non-excluded runs in sequence order.
    pub included: Vec<Run>,
    /// Sequence numbers of runs that never saw a benchmark marker.
    pub incomplete: Vec<u32>,
    /// Sequence numbers dropped because the caller excluded them.
    pub excluded: Vec<u32>,
    /// Number of runs the segmenter produced, incomplete ones included.
    pub total: u32,
}

/// Text announcing an incomplete run, shared by the log and the report.
pub fn incomplete_run_message(sequence: u32) -> String {
    format!(
        "detected and omitted incomplete run #{} (after run #{})",
        sequence,
        sequence - 1
    )
}

/// Text of a run warning, shared by the log and the report.
pub fn run_warning_message(sequence: u32, warning: &RunWarning) -> String {
    format!("run #{}: {}", sequence, warning)
}

/// Segment `lines` into runs, number them, and sort them into included,
/// incomplete and excluded.
///
/// Exclusions refer to the full enumeration, so dropping a run never
/// renumbers the ones after it.
pub fn collect_runs(lines: &[Line], exclusions: &BTreeSet<u32>) -> RunSet {
    let mut set = RunSet::default();
    let mut offset = 0;

    loop {
        let (next, seg) = segment(lines, offset);
        set.total += 1;
        let sequence = set.total;

        if !seg.is_complete() {
            diagnostics::note(incomplete_run_message(sequence));
            set.incomplete.push(sequence);
        } else if exclusions.contains(&sequence) {
            tracing::debug!(sequence, "run excluded");
            set.excluded.push(sequence);
        } else {
            for warning in &seg.warnings {
                diagnostics::warn(run_warning_message(sequence, warning));
            }
            set.included.push(Run {
                sequence,
                segment: seg,
            });
        }

        match next {
            Some(n) => offset = n,
            None => break,
        }
    }

    for wanted in exclusions.iter().filter(|&&n| n > set.total) {
        diagnostics::warn(format!(
            "exclusion #{} is beyond the last run (#{})",
            wanted, set.total
        ));
    }

    set
}
