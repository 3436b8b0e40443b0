//! mail::traits
//!
//! Mailer trait definition for delivering rendered notifications.
//!
//! # Design
//!
//! The `Mailer` trait is synchronous: a hook delivers one message at a time
//! and must not start the next change until the previous one is out. A
//! delivery failure is returned to the dispatcher, which aborts the batch.

use thiserror::Error;

use crate::render::RenderedMessage;

/// Errors from mail composition and delivery.
#[derive(Debug, Error)]
pub enum MailError {
    /// An address could not be parsed.
    #[error("invalid address '{address}': {message}")]
    InvalidAddress {
        /// The offending address
        address: String,
        /// Parser message
        message: String,
    },

    /// A header name or the message structure was rejected.
    #[error("failed to build message: {0}")]
    Build(String),

    /// The transport refused or failed to deliver the message.
    #[error("{transport} delivery failed: {message}")]
    Delivery {
        /// Transport name
        transport: &'static str,
        /// Error from the transport
        message: String,
    },

    /// Writing a dry-run message failed.
    #[error("failed to write message: {0}")]
    Io(#[from] std::io::Error),
}

/// The From mailbox, kept in parts so display names never need parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sender {
    /// Display name, sent encoded or quoted as needed
    pub name: Option<String>,
    /// Local part of the address
    pub user: String,
    /// Domain of the address
    pub domain: String,
}

impl Sender {
    pub fn new(name: Option<String>, user: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            name,
            user: user.into(),
            domain: domain.into(),
        }
    }

    /// `user@domain`
    pub fn address(&self) -> String {
        format!("{}@{}", self.user, self.domain)
    }
}

/// Sender and primary recipients, shared by every message of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Envelope {
    pub from: Sender,
    /// To recipients
    pub to: Vec<String>,
}

impl Envelope {
    pub fn new(from: Sender, to: Vec<String>) -> Self {
        Self { from, to }
    }
}

/// A rendered message ready for a transport.
#[derive(Debug, Clone, Copy)]
pub struct OutgoingMail<'a> {
    pub envelope: &'a Envelope,
    pub message: &'a RenderedMessage,
}

/// Something that can deliver notifications.
pub trait Mailer {
    /// Transport name, for logs.
    fn name(&self) -> &'static str;

    /// Deliver one message.
    fn send(&self, mail: OutgoingMail<'_>) -> Result<(), MailError>;
}
