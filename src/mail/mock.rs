//! mail::mock
//!
//! Recording mailer for deterministic testing.
//!
//! # Example
//!
//! ```
//! use refmail::mail::mock::RecordingMailer;
//! use refmail::mail::{Envelope, Mailer, OutgoingMail, Sender};
//! use refmail::render::MessageBuilder;
//!
//! let mailer = RecordingMailer::new();
//! let envelope = Envelope::new(Sender::new(None, "a", "example.org"), vec!["b@example.org".to_string()]);
//! let message = MessageBuilder::new("[proj] hi").build();
//! mailer.send(OutgoingMail { envelope: &envelope, message: &message }).unwrap();
//!
//! assert_eq!(mailer.subjects(), vec!["[proj] hi".to_string()]);
//! ```

use std::sync::{Arc, Mutex};

use super::traits::{Envelope, MailError, Mailer, OutgoingMail};
use crate::render::RenderedMessage;

/// Mailer that keeps every message in memory.
///
/// Clones share the same record.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    inner: Arc<Mutex<RecordingInner>>,
}

#[derive(Debug, Default)]
struct RecordingInner {
    sent: Vec<(Envelope, RenderedMessage)>,
    /// Fail the send with this index (0-based).
    fail_at: Option<usize>,
    attempts: usize,
}

impl RecordingMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the `index`-th send attempt fail with a delivery error.
    pub fn fail_at(self, index: usize) -> Self {
        self.inner.lock().unwrap().fail_at = Some(index);
        self
    }

    /// Every delivered message, in order.
    pub fn sent(&self) -> Vec<RenderedMessage> {
        let inner = self.inner.lock().unwrap();
        inner.sent.iter().map(|(_, m)| m.clone()).collect()
    }

    /// Envelopes of every delivered message.
    pub fn envelopes(&self) -> Vec<Envelope> {
        let inner = self.inner.lock().unwrap();
        inner.sent.iter().map(|(e, _)| e.clone()).collect()
    }

    pub fn subjects(&self) -> Vec<String> {
        self.sent().into_iter().map(|m| m.subject).collect()
    }

    pub fn count(&self) -> usize {
        self.inner.lock().unwrap().sent.len()
    }
}

impl Mailer for RecordingMailer {
    fn name(&self) -> &'static str {
        "recording"
    }

    fn send(&self, mail: OutgoingMail<'_>) -> Result<(), MailError> {
        let mut inner = self.inner.lock().unwrap();
        let attempt = inner.attempts;
        inner.attempts += 1;
        if inner.fail_at == Some(attempt) {
            return Err(MailError::Delivery {
                transport: "recording",
                message: format!("configured failure at message {attempt}"),
            });
        }
        inner
            .sent
            .push((mail.envelope.clone(), mail.message.clone()));
        Ok(())
    }
}
