//! engine::dispatcher
//!
//! Drive one batch of reference updates from raw input to sent mail.
//!
//! # Lifecycle
//!
//! ```text
//! RESOLVE(all) -> CLASSIFY(all) -> for each change: PREPARE -> EMIT -> mark processed
//! ```
//!
//! Every change is classified and recorded in the [`BatchContext`] before
//! the first one is prepared, and each change finishes emitting before the
//! next is prepared. Any failure aborts the rest of the batch; messages
//! already sent stay sent.

use thiserror::Error;

use super::batch::BatchContext;
use super::change::{Change, RawTransition, ReferenceTransition};
use super::classify::Classifier;
use super::cover;
use super::prepare::prepare;
use crate::core::config::ConfigError;
use crate::core::types::RefName;
use crate::git::{GitError, RepoQuery};
use crate::mail::{Envelope, MailError, Mailer, OutgoingMail};
use crate::render::{RenderedMessage, Renderer};

/// Errors that stop a run.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Bad invocation or malformed input.
    #[error("{0}")]
    Usage(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Mail(#[from] MailError),
}

/// What a run did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Changes processed
    pub changes: usize,
    /// Messages sent
    pub messages: usize,
}

/// Canonicalize one raw transition.
pub fn resolve_transition(
    repo: &dyn RepoQuery,
    raw: &RawTransition,
) -> Result<ReferenceTransition, DispatchError> {
    let refname = RefName::new(raw.refname.as_str())
        .map_err(|e| DispatchError::Usage(e.to_string()))?;
    let old = repo.resolve_rev(&raw.old)?;
    let new = repo.resolve_rev(&raw.new)?;
    Ok(ReferenceTransition::new(refname, old, new))
}

/// Runs batches against one repository, renderer and mailer.
pub struct Dispatcher<'a> {
    repo: &'a dyn RepoQuery,
    classifier: Classifier,
    renderer: Renderer<'a>,
    mailer: &'a dyn Mailer,
    envelope: Envelope,
}

impl<'a> Dispatcher<'a> {
    pub fn new(
        repo: &'a dyn RepoQuery,
        classifier: Classifier,
        renderer: Renderer<'a>,
        mailer: &'a dyn Mailer,
        envelope: Envelope,
    ) -> Self {
        Self {
            repo,
            classifier,
            renderer,
            mailer,
            envelope,
        }
    }

    /// Classify every transition without preparing or sending anything.
    pub fn classify_all(&self, raw: &[RawTransition]) -> Result<Vec<Change>, DispatchError> {
        let mut changes = Vec::with_capacity(raw.len());
        for transition in raw {
            let transition = resolve_transition(self.repo, transition)?;
            let kind = match transition.target() {
                Some(target) => Some(self.repo.object_kind(target)?),
                None => None,
            };
            let change = self.classifier.classify(&transition, kind);
            tracing::debug!(
                refname = %change.refname,
                kind = ?change.kind,
                anomaly = change.anomaly.as_deref(),
                "classified"
            );
            changes.push(change);
        }
        Ok(changes)
    }

    /// Process a whole batch in input order.
    pub fn run(&self, raw: &[RawTransition]) -> Result<RunSummary, DispatchError> {
        let changes = self.classify_all(raw)?;
        let mut batch = BatchContext::new(&changes);
        let mut summary = RunSummary::default();

        for change in &changes {
            let prepared = prepare(self.repo, change, &batch)?;

            if cover::needs_main_notification(change, prepared.attribution()) {
                let message = self.renderer.main_message(change, &prepared)?;
                self.send(&message)?;
                summary.messages += 1;
            }
            for message in self.renderer.commit_messages(change, &prepared)? {
                self.send(&message)?;
                summary.messages += 1;
            }

            batch.mark_processed(&change.refname);
            summary.changes += 1;
        }

        Ok(summary)
    }

    fn send(&self, message: &RenderedMessage) -> Result<(), MailError> {
        tracing::debug!(
            transport = self.mailer.name(),
            subject = %message.subject,
            "sending"
        );
        self.mailer.send(OutgoingMail {
            envelope: &self.envelope,
            message,
        })
    }
}
