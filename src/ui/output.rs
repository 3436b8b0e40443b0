//! ui::output
//!
//! Terminal diagnostics.
//!
//! A hook's stdout and stderr are relayed to the pushing client, so output is
//! limited to a single line on failure.

use std::fmt::Display;
use std::io::Write;

/// Write `error: <message>` to `out`.
pub fn write_error(out: &mut impl Write, message: impl Display) -> std::io::Result<()> {
    writeln!(out, "error: {}", message)
}

/// Print an error message to stderr (always shown).
pub fn error(message: impl Display) {
    let _ = write_error(&mut std::io::stderr().lock(), message);
}
