//! Perf trace input: the recognized events and the line classifier.

pub mod counter;
pub mod line;
pub mod parse;

pub use counter::{Counter, CounterTotals};
pub use line::{Line, Sample};
pub use parse::read_trace_file;
