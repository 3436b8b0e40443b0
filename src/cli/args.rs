//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Invocation
//!
//! As a `post-receive` hook refmail takes no positional arguments and reads
//! `OLDREV NEWREV REFNAME` lines from stdin. For testing a hook by hand the
//! same triple can be given on the command line.
//!
//! # Flags
//!
//! - `--git-dir <path>`: Repository to report on
//! - `--dry-run`: Print messages instead of sending them
//! - `--debug`: Enable debug logging

use clap::Parser;
use std::path::PathBuf;

use crate::engine::change::RawTransition;
use crate::engine::DispatchError;

/// Usage line for a wrong positional argument count.
pub const USAGE: &str = "Usage: refmail OLDREV NEWREV REFNAME";

/// refmail - mail notifications for pushed Git references
#[derive(Parser, Debug)]
#[command(name = "refmail")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Repository to report on (default: $GIT_DIR, then the current directory)
    #[arg(long, value_name = "PATH")]
    pub git_dir: Option<PathBuf>,

    /// Print formatted messages to stdout instead of sending them
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,

    /// A single update to report instead of reading stdin
    #[arg(value_name = "OLDREV NEWREV REFNAME", allow_hyphen_values = true)]
    pub update: Vec<String>,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// The update given on the command line, if any.
    ///
    /// # Errors
    ///
    /// Any positional count other than zero or three is a usage error.
    pub fn single_update(&self) -> Result<Option<RawTransition>, DispatchError> {
        match self.update.as_slice() {
            [] => Ok(None),
            [old, new, refname] => Ok(Some(RawTransition::new(
                old.as_str(),
                new.as_str(),
                refname.as_str(),
            ))),
            _ => Err(DispatchError::Usage(USAGE.to_string())),
        }
    }
}
