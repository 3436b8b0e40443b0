//! engine
//!
//! Turns a batch of reference updates into notifications.
//!
//! # Architecture
//!
//! The engine is the only part of refmail with real policy. The dispatcher
//! runs every batch through the same pipeline:
//!
//! 1. **Resolve**: canonicalize old/new revisions; the null id means absent
//! 2. **Classify**: decide the [`change::ChangeKind`] of every update
//! 3. **Prepare**: attribute branch commits or parse tag objects, one change
//!    at a time, consulting the [`batch::BatchContext`]
//! 4. **Emit**: render and send the main message (if the cover policy asks
//!    for one) and the per-commit messages
//!
//! # Invariants
//!
//! - Every change is in the batch context before the first prepare
//! - A change is marked processed only after all its messages are sent
//! - A commit is described in detail at most once per batch
//! - The engine never mutates the repository
//!
//! # Example
//!
//! ```
//! use refmail::engine::change::RawTransition;
//! use refmail::engine::classify::Classifier;
//! use refmail::engine::dispatcher::Dispatcher;
//! use refmail::git::mock::MockRepo;
//! use refmail::mail::mock::RecordingMailer;
//! use refmail::mail::{Envelope, Sender};
//! use refmail::render::{RenderSettings, Renderer};
//!
//! let mut repo = MockRepo::new();
//! let c1 = repo.commit("Initial import", &[]);
//! let c2 = repo.commit("Fix the build", &[&c1]);
//! repo.set_branch("refs/heads/master", &c2);
//!
//! let mailer = RecordingMailer::new();
//! let settings = RenderSettings {
//!     project: "gtk".to_string(),
//!     help_url: "http://live.gnome.org/Git/Help".to_string(),
//!     html: false,
//! };
//! let dispatcher = Dispatcher::new(
//!     &repo,
//!     Classifier::default(),
//!     Renderer::new(&repo, settings),
//!     &mailer,
//!     Envelope::new(
//!         Sender::new(Some("John Doe".to_string()), "jdoe", "src.gnome.org"),
//!         vec!["commits@example.org".to_string()],
//!     ),
//! );
//!
//! dispatcher
//!     .run(&[RawTransition::new(c1.as_str(), c2.as_str(), "refs/heads/master")])
//!     .unwrap();
//! assert_eq!(mailer.subjects(), vec!["[gtk] Fix the build".to_string()]);
//! ```

pub mod attribution;
pub mod batch;
pub mod change;
pub mod classify;
pub mod cover;
pub mod dispatcher;
pub mod prepare;
pub mod tag;

pub use dispatcher::{DispatchError, Dispatcher, RunSummary};
