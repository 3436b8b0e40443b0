//! mail::factory
//!
//! Mailer selection and creation.
//!
//! # Design
//!
//! The CLI calls [`create_mailer`] instead of naming a transport, so the
//! transport choice lives in configuration alone.

use super::traits::Mailer;
use super::transport::{SendmailMailer, SmtpMailer, StdoutMailer};
use crate::core::config::TransportConfig;

/// Build the mailer for a transport, or a stdout printer for dry runs.
pub fn create_mailer(transport: &TransportConfig, dry_run: bool) -> Box<dyn Mailer> {
    if dry_run {
        return Box::new(StdoutMailer::stdout());
    }
    match transport {
        TransportConfig::Sendmail { command } => Box::new(SendmailMailer::new(command.as_deref())),
        TransportConfig::Smtp {
            host,
            port,
            credentials,
        } => Box::new(SmtpMailer::new(host, *port, credentials.clone())),
    }
}
