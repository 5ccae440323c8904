//! Cleanup of kernel logs printed through `pr_*` macros.
//!
//! Strips the dmesg timestamp prefix (`[  12.345678] `) and the trailing
//! source location (` (at mm/memory.c:123)`) so traces can be diffed.

use crate::Result;
use crate::diagnostics;

use anyhow::{Context, bail};
use regex::Regex;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, Default)]
pub struct CleanOptions {
    pub keep_square_brackets: bool,
    pub keep_brackets: bool,
}

/// Clean every line of `text`, keeping line terminators.
pub fn clean_lines(text: &str, opts: CleanOptions) -> Result<String> {
    if opts.keep_square_brackets && opts.keep_brackets {
        bail!(
            "{}",
            diagnostics::error_message("keeping everything does not make any sense")
        );
    }

    // Prefix: everything through the first ']' plus one following space.
    let prefix_re = Regex::new(r"^\[[^\]]*\] ?")?;
    // Suffix: the last parenthesised group when it starts with "(at ".
    let suffix_re = Regex::new(r" ?\(at [^(]*\)$")?;

    let mut out = String::with_capacity(text.len());
    for raw in text.split_inclusive('\n') {
        let (line, eol) = split_eol(raw);
        let mut line = line;
        if !opts.keep_square_brackets {
            if let Some(m) = prefix_re.find(line) {
                line = &line[m.end()..];
            }
        }
        if !opts.keep_brackets {
            if let Some(m) = suffix_re.find(line) {
                line = &line[..m.start()];
            }
        }
        out.push_str(line);
        out.push_str(eol);
    }
    Ok(out)
}

/// Clean `input` into `output`.
pub fn clean_file(input: &Path, output: &Path, opts: CleanOptions) -> Result<()> {
    let text = fs::read_to_string(input).with_context(|| {
        diagnostics::error_message(format!("read log file {}", input.display()))
    })?;
    if text.is_empty() {
        bail!(
            "{}",
            diagnostics::error_message(format!("log file is empty: {}", input.display()))
        );
    }

    let cleaned = clean_lines(&text, opts)?;
    fs::write(output, cleaned).with_context(|| {
        diagnostics::error_message(format!("write output file {}", output.display()))
    })?;
    Ok(())
}

fn split_eol(raw: &str) -> (&str, &str) {
    let body = raw.trim_end_matches(['\n', '\r']);
    (body, &raw[body.len()..])
}
