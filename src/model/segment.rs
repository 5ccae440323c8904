//! Run segmentation: one benchmark run is the stretch of samples whose
//! timestamps never go backwards.

use crate::stats::page_walk_latency;
use crate::trace::{CounterTotals, Line, Sample};

use serde::Serialize;
use std::fmt;

/// Non-fatal anomalies found while accumulating a run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunWarning {
    /// Two benchmark markers with different values; the later one is kept.
    /// `line` is the 1-based line of the later marker.
    RuntimeMismatch {
        line: usize,
        previous: f64,
        current: f64,
    },
    /// No completed walks, so latency was reported as 0.0.
    NoCompletedWalks,
}

impl fmt::Display for RunWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunWarning::RuntimeMismatch {
                line,
                previous,
                current,
            } => write!(
                f,
                "runtime differs within one run at line {}: {} then {}",
                line, previous, current
            ),
            RunWarning::NoCompletedWalks => {
                f.write_str("no completed page walks, latency reported as 0.000")
            }
        }
    }
}

/// Everything accumulated for one run, before it is numbered.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    /// 0-based index of the first line scanned for this run.
    pub start_line: usize,
    /// 0-based index of the last sample accepted into this run.
    pub end_line: usize,
    /// Timestamp of the last accepted sample.
    pub duration: f64,
    /// Benchmark-reported runtime; `None` until a marker is seen.
    pub runtime: Option<f64>,
    pub latency: f64,
    /// `None` when no accepted sample carried a CPU speed.
    pub avg_speed_ghz: Option<f64>,
    pub totals: CounterTotals,
    pub warnings: Vec<RunWarning>,
}

impl Segment {
    /// A run is complete once a non-zero benchmark runtime was observed.
    pub fn is_complete(&self) -> bool {
        matches!(self.runtime, Some(r) if r != 0.0)
    }
}

/// Accumulate one run starting at line `start`.
///
/// Returns the index where the next run begins (the first sample whose
/// timestamp is lower than the latest accepted one) or `None` when the input
/// ran out, together with the finished run. The reset line is left for the
/// next call.
pub fn segment(lines: &[Line], start: usize) -> (Option<usize>, Segment) {
    let mut acc = Accumulator::new(start);

    for (idx, line) in lines.iter().enumerate().skip(start) {
        match line {
            Line::Sample(sample) => {
                if acc.end_time.is_some_and(|end| sample.timestamp < end) {
                    return (Some(idx), acc.finish());
                }
                acc.accept(idx, sample);
            }
            Line::Benchmark(marker) => acc.set_runtime(idx, marker.total_runtime),
            Line::Unrecognized => {}
        }
    }

    (None, acc.finish())
}

struct Accumulator {
    start_line: usize,
    end_line: usize,
    end_time: Option<f64>,
    runtime: Option<f64>,
    speed_sum: f64,
    speed_count: usize,
    totals: CounterTotals,
    warnings: Vec<RunWarning>,
}

impl Accumulator {
    fn new(start_line: usize) -> Self {
        Self {
            start_line,
            end_line: start_line,
            end_time: None,
            runtime: None,
            speed_sum: 0.0,
            speed_count: 0,
            totals: CounterTotals::new(),
            warnings: Vec::new(),
        }
    }

    fn accept(&mut self, idx: usize, sample: &Sample) {
        self.end_time = Some(sample.timestamp);
        self.end_line = idx;
        self.totals.add(sample.counter, sample.count);
        if sample.speed_ghz != 0.0 {
            self.speed_sum += sample.speed_ghz;
            self.speed_count += 1;
        }
    }

    fn set_runtime(&mut self, idx: usize, runtime: f64) {
        if let Some(previous) = self.runtime {
            if previous != runtime {
                self.warnings.push(RunWarning::RuntimeMismatch {
                    line: idx + 1,
                    previous,
                    current: runtime,
                });
            }
        }
        self.runtime = Some(runtime);
    }

    fn finish(mut self) -> Segment {
        let latency = page_walk_latency(&self.totals);
        if self.totals.completed() == 0 {
            self.warnings.push(RunWarning::NoCompletedWalks);
        }
        let avg_speed_ghz =
            (self.speed_count > 0).then(|| self.speed_sum / self.speed_count as f64);

        Segment {
            start_line: self.start_line,
            end_line: self.end_line,
            duration: self.end_time.unwrap_or(0.0),
            runtime: self.runtime,
            latency,
            avg_speed_ghz,
            totals: self.totals,
            warnings: self.warnings,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Counter;
    use crate::trace::line::classify_lines;
    use pretty_assertions::assert_eq;

    const TWO_RUNS: &str = "\
# started on Thu Jan  1 00:00:00 2024
1.0 4 dtlb_load_misses.walk_pending
1.0 2 dtlb_load_misses.walk_completed
1.0 1,000 cycles:ukhHG # 2.0 GHz
2.0 6 itlb_misses.walk_pending
2.0 2 itlb_misses.walk_completed
2.0 1,000 cycles:ukhHG # 3.0 GHz
Took: 2.5
1.0 9 dtlb_store_misses.walk_pending
1.0 3 dtlb_store_misses.walk_completed
Took: 1.5
";

    #[test]
    fn splits_on_timestamp_reset() {
        let lines = classify_lines(TWO_RUNS);

        let (next, first) = segment(&lines, 0);
        assert_eq!(next, Some(8));
        assert_eq!(first.start_line, 0);
        assert_eq!(first.end_line, 6);
        assert_eq!(first.duration, 2.0);
        assert_eq!(first.runtime, Some(2.5));
        assert_eq!(first.latency, 10.0 / 4.0);
        assert_eq!(first.avg_speed_ghz, Some(2.5));
        assert_eq!(first.totals[Counter::Cycles], 2_000);
        assert!(first.is_complete());
        assert!(first.warnings.is_empty());

        let (next, second) = segment(&lines, 8);
        assert_eq!(next, None);
        assert_eq!(second.start_line, 8);
        assert_eq!(second.end_line, 9);
        assert_eq!(second.runtime, Some(1.5));
        assert_eq!(second.latency, 3.0);
        assert_eq!(second.avg_speed_ghz, None);
        assert_eq!(second.totals[Counter::DtlbLoadWalkPending], 0);
    }

    #[test]
    fn equal_timestamps_stay_in_the_same_run() {
        let lines = classify_lines(
            "5.0 1 itlb_misses.walk_completed\n5.0 1 itlb_misses.walk_completed\n",
        );
        let (next, run) = segment(&lines, 0);
        assert_eq!(next, None);
        assert_eq!(run.totals[Counter::ItlbWalkCompleted], 2);
        assert_eq!(run.end_line, 1);
    }

    #[test]
    fn last_line_is_scanned() {
        let lines = classify_lines("1.0 1 itlb_misses.walk_completed\nTook: 3.0");
        let (_, run) = segment(&lines, 0);
        assert_eq!(run.runtime, Some(3.0));
    }

    #[test]
    fn missing_marker_leaves_run_incomplete() {
        let lines = classify_lines("1.0 1 itlb_misses.walk_completed\n");
        let (next, run) = segment(&lines, 0);
        assert_eq!(next, None);
        assert_eq!(run.runtime, None);
        assert!(!run.is_complete());
    }

    #[test]
    fn conflicting_markers_warn_and_keep_the_last() {
        let lines = classify_lines(
            "1.0 1 itlb_misses.walk_completed\nTook: 1.0\nTook: 1.0\nTook: 2.0\n",
        );
        let (_, run) = segment(&lines, 0);
        assert_eq!(run.runtime, Some(2.0));
        assert_eq!(
            run.warnings,
            vec![RunWarning::RuntimeMismatch {
                line: 4,
                previous: 1.0,
                current: 2.0
            }]
        );
        assert_eq!(
            run.warnings[0].to_string(),
            "runtime differs within one run at line 4: 1 then 2"
        );
    }

    #[test]
    fn zero_completed_walks_is_flagged() {
        let lines = classify_lines("1.0 7 itlb_misses.walk_pending\nTook: 1.0\n");
        let (_, run) = segment(&lines, 0);
        assert_eq!(run.latency, 0.0);
        assert_eq!(run.warnings, vec![RunWarning::NoCompletedWalks]);
    }

    #[test]
    fn empty_input_yields_one_empty_run() {
        let (next, run) = segment(&[], 0);
        assert_eq!(next, None);
        assert_eq!(run.start_line, 0);
        assert_eq!(run.end_line, 0);
        assert_eq!(run.duration, 0.0);
        assert!(!run.is_complete());
    }
}
