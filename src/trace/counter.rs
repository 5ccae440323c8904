//! The closed set of perf events the analyzer recognizes.

use serde::Serialize;
use std::ops::{Index, IndexMut};

/// A recognized perf event name.
///
/// The nine page-walk events come in three families (load, store, instruction)
/// times three kinds (completed, pending, active). `Cycles` is the frequency
/// event whose lines carry the `GHz` annotation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Counter {
    DtlbLoadWalkCompleted,
    DtlbLoadWalkPending,
    DtlbLoadWalkActive,
    DtlbStoreWalkCompleted,
    DtlbStoreWalkPending,
    DtlbStoreWalkActive,
    ItlbWalkCompleted,
    ItlbWalkPending,
    ItlbWalkActive,
    Cycles,
}

/// What a page-walk event measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkKind {
    Completed,
    Pending,
    Active,
}

impl Counter {
    pub const COUNT: usize = 10;

    /// All counters in report order.
    pub const ALL: [Counter; Counter::COUNT] = [
        Counter::DtlbLoadWalkCompleted,
        Counter::DtlbLoadWalkPending,
        Counter::DtlbLoadWalkActive,
        Counter::DtlbStoreWalkCompleted,
        Counter::DtlbStoreWalkPending,
        Counter::DtlbStoreWalkActive,
        Counter::ItlbWalkCompleted,
        Counter::ItlbWalkPending,
        Counter::ItlbWalkActive,
        Counter::Cycles,
    ];

    /// Event name exactly as perf prints it.
    pub fn name(self) -> &'static str {
        match self {
            Counter::DtlbLoadWalkCompleted => "dtlb_load_misses.walk_completed",
            Counter::DtlbLoadWalkPending => "dtlb_load_misses.walk_pending",
            Counter::DtlbLoadWalkActive => "dtlb_load_misses.walk_active",
            Counter::DtlbStoreWalkCompleted => "dtlb_store_misses.walk_completed",
            Counter::DtlbStoreWalkPending => "dtlb_store_misses.walk_pending",
            Counter::DtlbStoreWalkActive => "dtlb_store_misses.walk_active",
            Counter::ItlbWalkCompleted => "itlb_misses.walk_completed",
            Counter::ItlbWalkPending => "itlb_misses.walk_pending",
            Counter::ItlbWalkActive => "itlb_misses.walk_active",
            Counter::Cycles => "cycles:ukhHG",
        }
    }

    /// Case-sensitive exact lookup.
    pub fn from_name(name: &str) -> Option<Counter> {
        Counter::ALL.into_iter().find(|c| c.name() == name)
    }

    /// Page-walk kind, or `None` for the frequency event.
    pub fn walk_kind(self) -> Option<WalkKind> {
        match self {
            Counter::DtlbLoadWalkCompleted
            | Counter::DtlbStoreWalkCompleted
            | Counter::ItlbWalkCompleted => Some(WalkKind::Completed),
            Counter::DtlbLoadWalkPending
            | Counter::DtlbStoreWalkPending
            | Counter::ItlbWalkPending => Some(WalkKind::Pending),
            Counter::DtlbLoadWalkActive
            | Counter::DtlbStoreWalkActive
            | Counter::ItlbWalkActive => Some(WalkKind::Active),
            Counter::Cycles => None,
        }
    }

    fn slot(self) -> usize {
        self as usize
    }
}

/// Per-run event totals, one slot per [`Counter`], zero when unseen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CounterTotals([u64; Counter::COUNT]);

impl CounterTotals {
    pub fn new() -> Self {
        Self::default()
    }

    /// Saturating add; perf counts never come close to overflowing in practice.
    pub fn add(&mut self, counter: Counter, count: u64) {
        let slot = &mut self[counter];
        *slot = slot.saturating_add(count);
    }

    /// Sum across the three families for one walk kind.
    pub fn sum_kind(&self, kind: WalkKind) -> u64 {
        Counter::ALL
            .into_iter()
            .filter(|c| c.walk_kind() == Some(kind))
            .map(|c| self[c])
            .sum()
    }

    pub fn pending(&self) -> u64 {
        self.sum_kind(WalkKind::Pending)
    }

    pub fn completed(&self) -> u64 {
        self.sum_kind(WalkKind::Completed)
    }

    /// `(counter, total)` pairs in report order.
    pub fn iter(&self) -> impl Iterator<Item = (Counter, u64)> + '_ {
        Counter::ALL.into_iter().map(|c| (c, self[c]))
    }
}

impl Index<Counter> for CounterTotals {
    type Output = u64;

    fn index(&self, counter: Counter) -> &u64 {
        &self.0[counter.slot()]
    }
}

impl IndexMut<Counter> for CounterTotals {
    fn index_mut(&mut self, counter: Counter) -> &mut u64 {
        &mut self.0[counter.slot()]
    }
}
