//! Classification of single perf output lines.
//!
//! Two shapes are recognized (whitespace-separated, extra tokens ignored):
//!
//! ```text
//!      1.000219813        1,234,567      dtlb_load_misses.walk_pending
//!      1.000219813    2,398,874,441      cycles:ukhHG    #    2.398 GHz
//! Took: 12.345
//! ```
//!
//! Everything else is `Line::Unrecognized`.

use crate::trace::counter::Counter;

/// Literal that opens a benchmark result line.
pub const BENCHMARK_TOKEN: &str = "Took:";

/// Token that follows the CPU speed on frequency lines.
pub const FREQUENCY_UNIT: &str = "GHz";

/// One counter reading.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub timestamp: f64,
    pub count: u64,
    pub counter: Counter,
    /// 0.0 when the line carries no `GHz` annotation.
    pub speed_ghz: f64,
}

/// Wall-clock duration reported by the benchmark for the current run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BenchmarkMarker {
    pub total_runtime: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Line {
    Sample(Sample),
    Benchmark(BenchmarkMarker),
    Unrecognized,
}

impl Line {
    pub fn is_recognized(&self) -> bool {
        !matches!(self, Line::Unrecognized)
    }
}

/// Classify one raw line. Never fails: malformed input is `Unrecognized`.
pub fn classify_line(line: &str) -> Line {
    classify(line).unwrap_or(Line::Unrecognized)
}

/// Classify every line of a trace, keeping line positions.
pub fn classify_lines(text: &str) -> Vec<Line> {
    text.lines().map(classify_line).collect()
}

fn classify(line: &str) -> Option<Line> {
    let tokens: Vec<&str> = line.split_whitespace().collect();

    if tokens.first() == Some(&BENCHMARK_TOKEN) {
        let total_runtime = parse_float(tokens.get(1)?)?;
        return Some(Line::Benchmark(BenchmarkMarker { total_runtime }));
    }

    let speed_ghz = match tokens.iter().position(|t| *t == FREQUENCY_UNIT) {
        Some(0) => return None,
        Some(i) => parse_float(tokens[i - 1])?,
        None => 0.0,
    };

    let [timestamp, count, name, ..] = tokens.as_slice() else {
        return None;
    };
    let timestamp = parse_float(timestamp)?;
    let count = count.replace(',', "").parse::<u64>().ok()?;
    let counter = Counter::from_name(name)?;

    Some(Line::Sample(Sample {
        timestamp,
        count,
        counter,
        speed_ghz,
    }))
}

// NaN would poison every ordering comparison downstream.
fn parse_float(token: &str) -> Option<f64> {
    token.parse::<f64>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn page_walk_sample_with_thousands_separators() {
        let line = "     1.000219813        1,234,567      dtlb_load_misses.walk_pending\n";
        assert_eq!(
            classify_line(line),
            Line::Sample(Sample {
                timestamp: 1.000219813,
                count: 1_234_567,
                counter: Counter::DtlbLoadWalkPending,
                speed_ghz: 0.0,
            })
        );
    }

    #[test]
    fn frequency_sample_picks_up_speed() {
        let line = "     2.001     2,398,874,441      cycles:ukhHG    #    2.398 GHz";
        assert_eq!(
            classify_line(line),
            Line::Sample(Sample {
                timestamp: 2.001,
                count: 2_398_874_441,
                counter: Counter::Cycles,
                speed_ghz: 2.398,
            })
        );
    }

    #[test]
    fn extra_trailing_tokens_are_ignored() {
        let line = "3.5 10 itlb_misses.walk_completed # 12.3 % of all walks (50.00%)";
        match classify_line(line) {
            Line::Sample(s) => {
                assert_eq!(s.counter, Counter::ItlbWalkCompleted);
                assert_eq!(s.count, 10);
            }
            other => panic!("expected sample, got {:?}", other),
        }
    }

    #[test]
    fn benchmark_marker() {
        assert_eq!(
            classify_line("Took: 12.5\n"),
            Line::Benchmark(BenchmarkMarker {
                total_runtime: 12.5
            })
        );
    }

    #[test]
    fn benchmark_marker_with_bad_payload_is_unrecognized() {
        assert_eq!(classify_line("Took: forever"), Line::Unrecognized);
        assert_eq!(classify_line("Took:"), Line::Unrecognized);
    }

    #[test]
    fn unknown_counter_is_unrecognized() {
        assert_eq!(
            classify_line("1.0 100 dtlb_load_misses.miss_causes_a_walk"),
            Line::Unrecognized
        );
        assert_eq!(
            classify_line("1.0 100 DTLB_LOAD_MISSES.WALK_PENDING"),
            Line::Unrecognized
        );
    }

    #[test]
    fn malformed_lines_are_unrecognized() {
        for line in [
            "",
            "   ",
            "# started on Mon Jan  1 00:00:00 2024",
            "#           time             counts unit events",
            "1.0 <not counted> itlb_misses.walk_pending",
            "1.0 100",
            "abc 100 itlb_misses.walk_pending",
            "nan 100 itlb_misses.walk_pending",
            "1.0 -5 itlb_misses.walk_pending",
            "1.0 100 cycles:ukhHG # fast GHz",
            "GHz 1.0 100 cycles:ukhHG",
        ] {
            assert_eq!(classify_line(line), Line::Unrecognized, "line {:?}", line);
        }
    }

    #[test]
    fn classify_lines_keeps_positions() {
        let text = "header\n1.0 5 itlb_misses.walk_active\nTook: 1.0\n";
        let lines = classify_lines(text);
        assert_eq!(lines.len(), 3);
        assert!(!lines[0].is_recognized());
        assert!(matches!(lines[1], Line::Sample(_)));
        assert!(matches!(lines[2], Line::Benchmark(_)));
    }
}
