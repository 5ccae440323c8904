use crate::Result;
use crate::model::driver::{incomplete_run_message, run_warning_message};
use crate::model::{Aggregate, Averages, ReportData, RunView};

use std::fmt::Write;

/// Render the console report.
///
/// Per included run: runtime, page walk latency and CPU speed with their
/// relative vectors, then raw counter totals. Then either one block per
/// partition or the global averages.
pub fn render_text_report(data: &ReportData) -> Result<String> {
    let mut out = String::new();

    for &seq in &data.totals.incomplete {
        writeln!(out, "Note: {}", incomplete_run_message(seq))?;
    }
    if !data.totals.excluded.is_empty() {
        writeln!(out, "Note: excluded runs {:?}", data.totals.excluded)?;
    }

    for run in &data.runs {
        render_run(&mut out, run)?;
    }

    writeln!(out)?;
    match &data.aggregate {
        Aggregate::Global { averages, fallback } => {
            if fallback.is_forced() {
                writeln!(out, "Warning: {}", fallback)?;
            }
            render_averages(&mut out, averages)?;
        }
        Aggregate::Partitioned { partitions } => {
            for p in partitions {
                writeln!(out, "Partition #{}, runs: {:?}", p.index, p.members)?;
                writeln!(out, "Average runtime: {}", fmt_opt(p.averages.runtime))?;
                writeln!(out, "Relative average runtime: {:?}", p.relative.runtime)?;
                writeln!(
                    out,
                    "Average page walk latency: {}",
                    fmt_opt(p.averages.latency)
                )?;
                writeln!(out, "Relative page walk latency: {:?}", p.relative.latency)?;
                writeln!(
                    out,
                    "Average CPU speed: {} GHz",
                    fmt_opt(p.averages.speed_ghz)
                )?;
                writeln!(out, "Relative CPU speed: {:?}", p.relative.speed_ghz)?;
                writeln!(out)?;
            }
        }
    }

    writeln!(out, "Note: all relative data are \"others compared to current\"")?;
    Ok(out)
}

fn render_run(out: &mut String, run: &RunView) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "Run #{}, duration: {}, lines: {} -> {}",
        run.sequence, run.duration, run.first_line, run.last_line
    )?;
    writeln!(out, "Runtime: {:.3}", run.runtime)?;
    writeln!(out, "Relative runtime: {:?}", run.relative.runtime)?;
    writeln!(out, "Page walk latency: {:.3}", run.latency)?;
    writeln!(out, "Relative latency: {:?}", run.relative.latency)?;
    writeln!(out, "Reference CPU speed: {} GHz", fmt_opt(run.speed_ghz))?;
    writeln!(out, "Relative CPU speed: {:?}", run.relative.speed_ghz)?;
    for c in &run.counters {
        writeln!(out, "{}: {}", c.name, c.total)?;
    }
    for w in &run.warnings {
        writeln!(out, "Warning: {}", run_warning_message(run.sequence, w))?;
    }
    Ok(())
}

fn render_averages(out: &mut String, averages: &Averages) -> Result<()> {
    writeln!(out, "Average runtime: {}", fmt_opt(averages.runtime))?;
    writeln!(
        out,
        "Average page walk latency: {}",
        fmt_opt(averages.latency)
    )?;
    writeln!(
        out,
        "Average CPU speed: {} GHz",
        fmt_opt(averages.speed_ghz)
    )?;
    writeln!(out)?;
    Ok(())
}

fn fmt_opt(v: Option<f64>) -> String {
    v.map(|v| format!("{:.3}", v))
        .unwrap_or_else(|| "n/a".to_string())
}
