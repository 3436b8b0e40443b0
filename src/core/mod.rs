//! core
//!
//! Core domain types and process-level settings for refmail.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, RefName, RefNamespace
//! - [`config`] - Configuration schema and loading
//! - [`identity`] - The pushing user's login and display name
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing

pub mod config;
pub mod identity;
pub mod types;
