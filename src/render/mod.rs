//! render
//!
//! Message text for classified, prepared changes.
//!
//! # Modules
//!
//! - [`message`] - `RenderedMessage` and its builder
//! - [`text`] - Shared plain-text helpers (subjects, commit lists, shortlog)
//! - [`html`] - HTML alternative for per-commit patches
//! - `renderer` - Subjects and bodies per change kind
//!
//! # Design
//!
//! Rendering is driven entirely by typed data (`Change`, `Prepared`). The
//! only repository access is for commit one-liners and per-commit diffs.

pub mod html;
pub mod message;
mod renderer;
pub mod text;

pub use message::{MessageBuilder, RenderedMessage};
pub use renderer::{RenderSettings, Renderer};
