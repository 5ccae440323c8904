//! "How much bigger or smaller is each entry than the current one."

use std::fmt;

/// Relative deviation `(other - current) / current` of one entry.
///
/// Displays as a percentage with three decimals (`12.500%`), or `n/a` when
/// either side has no value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Relative(pub Option<f64>);

impl fmt::Display for Relative {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(ratio) => write!(f, "{:.3}%", ratio * 100.0),
            None => f.write_str("n/a"),
        }
    }
}

/// Deviation of every entry of `all` from `current`, rendered as percentages.
///
/// `current == 0` is not special-cased: the IEEE result (`inf%`, `NaN%`) is
/// rendered as is.
pub fn relative(current: f64, all: &[f64]) -> Vec<String> {
    all.iter()
        .map(|&v| Relative(Some(deviation(current, v))).to_string())
        .collect()
}

/// Like [`relative`] for values that may be absent (e.g. CPU speed).
pub fn relative_opt(current: Option<f64>, all: &[Option<f64>]) -> Vec<String> {
    all.iter()
        .map(|v| {
            let ratio = match (current, v) {
                (Some(current), Some(v)) => Some(deviation(current, *v)),
                _ => None,
            };
            Relative(ratio).to_string()
        })
        .collect()
}

fn deviation(current: f64, other: f64) -> f64 {
    let d = (other - current) / current;
    // -0.0 (negative `current`) would print as "-0.000%".
    if d == 0.0 { 0.0 } else { d }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn self_comparison_is_zero() {
        for x in [1.0, 0.25, 1234.5678, -3.0] {
            assert_eq!(relative(x, &[x]), vec!["0.000%".to_string()]);
        }
    }

    #[test]
    fn others_compared_to_current() {
        assert_eq!(
            relative(2.0, &[2.0, 2.5, 1.0]),
            vec!["0.000%", "25.000%", "-50.000%"]
        );
    }

    #[test]
    fn zero_current_does_not_panic() {
        assert_eq!(relative(0.0, &[0.0, 1.0]), vec!["NaN%", "inf%"]);
    }

    #[test]
    fn absent_values_render_as_na() {
        assert_eq!(
            relative_opt(Some(2.0), &[Some(3.0), None]),
            vec!["50.000%", "n/a"]
        );
        assert_eq!(relative_opt(None, &[Some(3.0)]), vec!["n/a"]);
    }
}
