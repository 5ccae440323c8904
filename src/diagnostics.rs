//! One spelling for every message the tool prints outside the report.
//!
//! Warnings and notes go through `tracing` so `RUST_LOG` can silence or
//! expand them; error text is returned as a string for `bail!`/`context`.

/// Format the text of a fatal error.
pub fn error_message(msg: impl AsRef<str>) -> String {
    format!("pw-profile: {}", msg.as_ref())
}

/// Emit a non-fatal warning about the data being analyzed.
pub fn warn(msg: impl AsRef<str>) {
    tracing::warn!("{}", msg.as_ref());
}

/// Emit an informational notice (e.g. a run that was skipped).
pub fn note(msg: impl AsRef<str>) {
    tracing::info!("{}", msg.as_ref());
}
