//! cli::input
//!
//! Reading hook input from stdin.

use std::io::BufRead;

use crate::engine::change::RawTransition;
use crate::engine::DispatchError;

/// Parse `OLDREV NEWREV REFNAME` lines.
///
/// Each line must hold exactly three whitespace separated items.
///
/// # Example
///
/// ```
/// use refmail::cli::input::read_transitions;
///
/// let input = "0000000000000000000000000000000000000000 abc123 refs/heads/master\n";
/// let updates = read_transitions(input.as_bytes()).unwrap();
/// assert_eq!(updates[0].refname, "refs/heads/master");
/// ```
pub fn read_transitions(reader: impl BufRead) -> Result<Vec<RawTransition>, DispatchError> {
    let mut transitions = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| DispatchError::Usage(format!("failed to read input: {e}")))?;
        let items: Vec<&str> = line.split_whitespace().collect();
        match items.as_slice() {
            [old, new, refname] => transitions.push(RawTransition::new(*old, *new, *refname)),
            _ => {
                return Err(DispatchError::Usage(format!(
                    "input line {} has unexpected number of items",
                    index + 1
                )))
            }
        }
    }
    Ok(transitions)
}
