//! Derived statistics: page walk latency, relative deviations, means.

pub mod latency;
pub mod relative;

pub use latency::page_walk_latency;
pub use relative::{relative, relative_opt};

/// Arithmetic mean, `None` for an empty input.
pub fn mean(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .fold((0.0f64, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}
