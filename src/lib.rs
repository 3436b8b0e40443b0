//! refmail - mail notifications for pushed Git references
//!
//! refmail runs as a `post-receive` hook. For every reference a push touched
//! it sends a summary message, plus one message per commit that no other
//! reference in the same push already reported.
//!
//! # Architecture
//!
//! The codebase follows a layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args and stdin, wires collaborators)
//! - [`engine`] - Classify, attribute, render and dispatch a batch of updates
//! - [`render`] - Subjects, headers and bodies of outgoing messages
//! - [`mail`] - Composition and delivery through lettre
//! - [`core`] - Domain types, configuration and pusher identity
//! - [`git`] - Single interface for all Git queries
//! - [`ui`] - Diagnostic output
//!
//! # Correctness Invariants
//!
//! 1. Each commit is detailed at most once per push
//! 2. Every update in a batch is classified before anything is sent
//! 3. Messages go out in input order
//! 4. The repository is only read, never written

pub mod cli;
pub mod core;
pub mod engine;
pub mod git;
pub mod mail;
pub mod render;
pub mod ui;
