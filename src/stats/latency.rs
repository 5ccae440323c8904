use crate::trace::CounterTotals;

/// Average page walk latency: pending cycles per completed walk, summed over
/// the load, store and instruction families.
///
/// The `walk_active` totals are reported but take no part here. With no
/// completed walks the ratio is meaningless and 0.0 is returned; the
/// segmenter records that as `RunWarning::NoCompletedWalks` so the warning
/// can name the run.
pub fn page_walk_latency(totals: &CounterTotals) -> f64 {
    let pending = totals.pending();
    let completed = totals.completed();
    if completed == 0 {
        return 0.0;
    }
    pending as f64 / completed as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trace::Counter;
    use pretty_assertions::assert_eq;

    #[test]
    fn pending_over_completed() {
        let mut totals = CounterTotals::new();
        for c in [
            Counter::DtlbLoadWalkPending,
            Counter::DtlbStoreWalkPending,
            Counter::ItlbWalkPending,
        ] {
            totals.add(c, 3);
        }
        for c in [
            Counter::DtlbLoadWalkCompleted,
            Counter::DtlbStoreWalkCompleted,
            Counter::ItlbWalkCompleted,
        ] {
            totals.add(c, 1);
        }
        totals.add(Counter::DtlbLoadWalkActive, 50);
        assert_eq!(page_walk_latency(&totals), 3.0);
    }

    #[test]
    fn zero_completed_is_zero() {
        let mut totals = CounterTotals::new();
        totals.add(Counter::ItlbWalkPending, 42);
        assert_eq!(page_walk_latency(&totals), 0.0);
    }
}
