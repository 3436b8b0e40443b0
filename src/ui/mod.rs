//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Diagnostic formatting for the pushing client

pub mod output;
