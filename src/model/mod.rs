//! Analysis model: segment the classified trace into runs, aggregate them,
//! and shape the result into serializable report views.

pub mod driver;
pub mod partition;
pub mod segment;

pub use driver::{RunSet, collect_runs};
pub use partition::{Aggregate, Averages, Fallback, RelativeSet, aggregate};
pub use segment::RunWarning;

use crate::options::ValidatedOptions;
use crate::stats::{relative, relative_opt};
use crate::trace::Line;

use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CounterView {
    pub name: String,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunView {
    pub sequence: u32,
    /// Timestamp of the last sample in the run.
    pub duration: f64,
    /// 1-based, inclusive.
    pub first_line: usize,
    pub last_line: usize,
    pub runtime: f64,
    pub latency: f64,
    pub speed_ghz: Option<f64>,

    /// This run compared against every included run.
    pub relative: RelativeSet,

    /// Raw totals in fixed counter order.
    pub counters: Vec<CounterView>,
    pub warnings: Vec<RunWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunTotalsView {
    pub total: u32,
    pub included: usize,
    pub incomplete: Vec<u32>,
    pub excluded: Vec<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportData {
    pub runs: Vec<RunView>,
    pub aggregate: Aggregate,
    pub totals: RunTotalsView,
}

/// Run the whole analysis over a classified trace.
///
/// Never fails: every anomaly is carried in the returned views and logged.
pub fn build_report_data(lines: &[Line], options: &ValidatedOptions) -> ReportData {
    let RunSet {
        included,
        incomplete,
        excluded,
        total,
    } = collect_runs(lines, &options.exclusions);

    let runtimes: Vec<f64> = included
        .iter()
        .map(|r| r.segment.runtime.unwrap_or(0.0))
        .collect();
    let latencies: Vec<f64> = included.iter().map(|r| r.segment.latency).collect();
    let speeds: Vec<Option<f64>> = included.iter().map(|r| r.segment.avg_speed_ghz).collect();

    let runs = included
        .iter()
        .zip(runtimes.iter().zip(&latencies))
        .map(|(run, (&runtime, &latency))| {
            let seg = &run.segment;
            RunView {
                sequence: run.sequence,
                duration: seg.duration,
                first_line: seg.start_line + 1,
                last_line: seg.end_line + 1,
                runtime,
                latency,
                speed_ghz: seg.avg_speed_ghz,
                relative: RelativeSet {
                    runtime: relative(runtime, &runtimes),
                    latency: relative(latency, &latencies),
                    speed_ghz: relative_opt(seg.avg_speed_ghz, &speeds),
                },
                counters: seg
                    .totals
                    .iter()
                    .map(|(counter, total)| CounterView {
                        name: counter.name().to_string(),
                        total,
                    })
                    .collect(),
                warnings: seg.warnings.clone(),
            }
        })
        .collect();

    let summary = aggregate(&included, &options.partition_sizes);

    ReportData {
        runs,
        aggregate: summary,
        totals: RunTotalsView {
            total,
            included: included.len(),
            incomplete,
            excluded,
        },
    }
}
