//! mail
//!
//! Delivery of rendered notifications.
//!
//! # Architecture
//!
//! The `Mailer` trait is the seam between the dispatcher and the outside
//! world. The CLI uses the [`create_mailer`] factory rather than importing
//! a transport directly.
//!
//! # Modules
//!
//! - `traits`: `Mailer`, `Envelope`, `OutgoingMail` and `MailError`
//! - [`compose`]: MIME composition via lettre
//! - `transport`: sendmail, SMTP and dry-run mailers
//! - [`mock`]: Recording implementation for deterministic testing
//! - `factory`: Transport selection

pub mod compose;
mod factory;
pub mod mock;
mod traits;
mod transport;

pub use factory::create_mailer;
pub use traits::*;
pub use transport::{SendmailMailer, SmtpMailer, StdoutMailer};
