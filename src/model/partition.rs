//! Grouping of included runs into caller-sized, contiguous partitions.

use crate::diagnostics;
use crate::model::driver::Run;
use crate::stats::{mean, relative_opt};

use serde::Serialize;
use std::fmt;

/// Mean runtime, latency and CPU speed over a group of runs.
///
/// Any mean over zero contributing values is `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Averages {
    pub runtime: Option<f64>,
    pub latency: Option<f64>,
    pub speed_ghz: Option<f64>,
}

impl Averages {
    pub fn of(runs: &[Run]) -> Self {
        Self {
            runtime: mean(runs.iter().filter_map(|r| r.segment.runtime)),
            latency: mean(runs.iter().map(|r| r.segment.latency)),
            speed_ghz: mean(runs.iter().filter_map(|r| r.segment.avg_speed_ghz)),
        }
    }
}

/// Relative deviation vectors, one entry per compared group, as percentages.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RelativeSet {
    pub runtime: Vec<String>,
    pub latency: Vec<String>,
    pub speed_ghz: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Partition {
    /// 1-based.
    pub index: usize,
    /// Sequence numbers of the member runs, in order.
    pub members: Vec<u32>,
    pub averages: Averages,
    /// This partition's averages compared against every partition's.
    pub relative: RelativeSet,
}

/// Why partitions were not produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Fallback {
    /// No partition sizes were given.
    Unrequested,
    /// The sizes add up to more runs than were included.
    /// `requested` saturates at `usize::MAX`.
    Infeasible { requested: usize, available: usize },
}

impl Fallback {
    /// True when partitions were asked for but could not be applied.
    pub fn is_forced(&self) -> bool {
        matches!(self, Fallback::Infeasible { .. })
    }
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Fallback::Unrequested => f.write_str("no partitions requested"),
            Fallback::Infeasible {
                requested,
                available,
            } => write!(
                f,
                "partitions are not applied: they need {} runs but only {} are available",
                requested, available
            ),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregate {
    Partitioned { partitions: Vec<Partition> },
    Global { averages: Averages, fallback: Fallback },
}

/// Carve `runs` (sequence order) into partitions of the given sizes.
///
/// Runs past the sum of `sizes` are left unassigned. When `sizes` is empty or
/// asks for more runs than exist, a single average over every run is
/// returned instead.
pub fn aggregate(runs: &[Run], sizes: &[usize]) -> Aggregate {
    // Saturating: a sum past usize::MAX can never fit, and every prefix of a
    // feasible list stays within `runs`, so `split_at` below cannot panic.
    let requested = sizes.iter().fold(0usize, |acc, &s| acc.saturating_add(s));

    if sizes.is_empty() || requested > runs.len() {
        let fallback = if sizes.is_empty() {
            Fallback::Unrequested
        } else {
            let fallback = Fallback::Infeasible {
                requested,
                available: runs.len(),
            };
            diagnostics::warn(fallback.to_string());
            fallback
        };
        return Aggregate::Global {
            averages: Averages::of(runs),
            fallback,
        };
    }

    let mut groups: Vec<(Vec<u32>, Averages)> = Vec::with_capacity(sizes.len());
    let mut rest = runs;
    for &size in sizes {
        let (members, tail) = rest.split_at(size);
        groups.push((
            members.iter().map(|r| r.sequence).collect(),
            Averages::of(members),
        ));
        rest = tail;
    }

    let runtimes: Vec<Option<f64>> = groups.iter().map(|(_, a)| a.runtime).collect();
    let latencies: Vec<Option<f64>> = groups.iter().map(|(_, a)| a.latency).collect();
    let speeds: Vec<Option<f64>> = groups.iter().map(|(_, a)| a.speed_ghz).collect();

    let partitions = groups
        .into_iter()
        .enumerate()
        .map(|(i, (members, averages))| Partition {
            index: i + 1,
            members,
            relative: RelativeSet {
                runtime: relative_opt(averages.runtime, &runtimes),
                latency: relative_opt(averages.latency, &latencies),
                speed_ghz: relative_opt(averages.speed_ghz, &speeds),
            },
            averages,
        })
        .collect();

    Aggregate::Partitioned { partitions }
}
