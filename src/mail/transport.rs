//! mail::transport
//!
//! Real delivery through lettre, plus the dry-run printer.

use std::io::Write;
use std::sync::Mutex;

use lettre::transport::smtp::authentication::Credentials;
use lettre::{SendmailTransport, SmtpTransport, Transport};

use super::compose::compose;
use super::traits::{MailError, Mailer, OutgoingMail};

/// Pipes messages to a sendmail-compatible binary.
pub struct SendmailMailer {
    transport: SendmailTransport,
}

impl SendmailMailer {
    /// `command` overrides the binary lettre would otherwise run.
    pub fn new(command: Option<&str>) -> Self {
        let transport = match command {
            Some(cmd) => SendmailTransport::new_with_command(cmd),
            None => SendmailTransport::new(),
        };
        Self { transport }
    }
}

impl Mailer for SendmailMailer {
    fn name(&self) -> &'static str {
        "sendmail"
    }

    fn send(&self, mail: OutgoingMail<'_>) -> Result<(), MailError> {
        let message = compose(mail)?;
        self.transport
            .send(&message)
            .map_err(|e| MailError::Delivery {
                transport: self.name(),
                message: e.to_string(),
            })
    }
}

/// Sends over plain SMTP to a relay.
pub struct SmtpMailer {
    transport: SmtpTransport,
}

impl SmtpMailer {
    pub fn new(host: &str, port: u16, credentials: Option<(String, String)>) -> Self {
        let mut builder = SmtpTransport::builder_dangerous(host).port(port);
        if let Some((username, password)) = credentials {
            builder = builder.credentials(Credentials::new(username, password));
        }
        Self {
            transport: builder.build(),
        }
    }
}

impl Mailer for SmtpMailer {
    fn name(&self) -> &'static str {
        "smtp"
    }

    fn send(&self, mail: OutgoingMail<'_>) -> Result<(), MailError> {
        let message = compose(mail)?;
        self.transport
            .send(&message)
            .map(|_| ())
            .map_err(|e| MailError::Delivery {
                transport: self.name(),
                message: e.to_string(),
            })
    }
}

/// Writes each formatted message to a writer instead of sending it.
pub struct StdoutMailer<W: Write> {
    out: Mutex<W>,
}

impl StdoutMailer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> StdoutMailer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: Mutex::new(out),
        }
    }

    /// Recover the writer.
    pub fn into_inner(self) -> W {
        match self.out.into_inner() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

impl<W: Write> Mailer for StdoutMailer<W> {
    fn name(&self) -> &'static str {
        "stdout"
    }

    fn send(&self, mail: OutgoingMail<'_>) -> Result<(), MailError> {
        let message = compose(mail)?;
        let mut out = match self.out.lock() {
            Ok(out) => out,
            Err(poisoned) => poisoned.into_inner(),
        };
        out.write_all(&message.formatted())?;
        out.write_all(b"\n")?;
        out.flush()?;
        Ok(())
    }
}
