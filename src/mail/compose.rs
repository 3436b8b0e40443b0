//! mail::compose
//!
//! Build a MIME message from an [`OutgoingMail`].

use lettre::message::header::{HeaderName, HeaderValue};
use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::{Address, Message};

use super::traits::{MailError, OutgoingMail, Sender};

fn mailbox(address: &str) -> Result<Mailbox, MailError> {
    address
        .trim()
        .parse::<Mailbox>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            message: e.to_string(),
        })
}

fn sender_mailbox(sender: &Sender) -> Result<Mailbox, MailError> {
    let address = Address::new(&sender.user, &sender.domain).map_err(|e| {
        MailError::InvalidAddress {
            address: sender.address(),
            message: e.to_string(),
        }
    })?;
    Ok(Mailbox::new(sender.name.clone(), address))
}

/// Compose the wire form of a message.
///
/// Plain text only, or `multipart/alternative` when the message carries an
/// HTML body.
pub fn compose(mail: OutgoingMail<'_>) -> Result<Message, MailError> {
    let message = mail.message;
    let mut builder = Message::builder()
        .from(sender_mailbox(&mail.envelope.from)?)
        .subject(message.subject.as_str());

    for to in &mail.envelope.to {
        builder = builder.to(mailbox(to)?);
    }
    for cc in &message.cc {
        builder = builder.cc(mailbox(cc)?);
    }
    for (name, value) in &message.headers {
        let name = HeaderName::new_from_ascii(name.clone())
            .map_err(|e| MailError::Build(format!("header '{name}': {e}")))?;
        builder = builder.raw_header(HeaderValue::new(name, value.clone()));
    }

    let built = match &message.html_body {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            message.plain_body.clone(),
            html.clone(),
        )),
        None => builder.singlepart(SinglePart::plain(message.plain_body.clone())),
    };
    built.map_err(|e| MailError::Build(e.to_string()))
}
