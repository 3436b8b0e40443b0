//! core::config::schema
//!
//! Configuration schema types.
//!
//! The same schema is used for the global file and the per-repository
//! file; see [`super::Config`] for how they combine.
//!
//! # Validation
//!
//! Config values are validated after parsing. An unknown transport name or
//! an SMTP table without a host is an error.

use serde::Deserialize;

use super::ConfigError;

/// Transports understood by `mail.transport`.
pub const TRANSPORTS: [&str; 2] = ["sendmail", "smtp"];

/// One configuration file.
///
/// # Example
///
/// ```toml
/// [mail]
/// recipients = "commits-list@example.org"
/// sender_domain = "git.example.org"
/// transport = "smtp"
///
/// [smtp]
/// host = "localhost"
/// port = 25
/// ```
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Message content and delivery settings
    pub mail: Option<MailConfig>,

    /// SMTP relay settings
    pub smtp: Option<SmtpConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(mail) = &self.mail {
            mail.validate()?;
        }
        if let Some(smtp) = &self.smtp {
            smtp.validate()?;
        }
        Ok(())
    }
}

/// The `[mail]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct MailConfig {
    /// Comma-separated recipient list
    pub recipients: Option<String>,

    /// Short project name used in subjects
    pub project: Option<String>,

    /// Domain appended to the pusher's login for the From address
    pub sender_domain: Option<String>,

    /// Attach an HTML rendering of per-commit diffs
    pub html: Option<bool>,

    /// "sendmail" or "smtp"
    pub transport: Option<String>,

    /// Path of the sendmail-compatible binary
    pub sendmail_command: Option<String>,

    /// Extra recipients for release branch creation
    pub release_cc: Option<Vec<String>>,

    /// Base URL of the help pages linked from warnings
    pub help_url: Option<String>,
}

impl MailConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(transport) = &self.transport {
            if !TRANSPORTS.contains(&transport.as_str()) {
                return Err(ConfigError::InvalidValue(format!(
                    "invalid transport '{}', must be one of: {}",
                    transport,
                    TRANSPORTS.join(", ")
                )));
            }
        }

        if let Some(project) = &self.project {
            if project.trim().is_empty() {
                return Err(ConfigError::InvalidValue(
                    "mail.project cannot be empty".into(),
                ));
            }
        }

        if let Some(cc) = &self.release_cc {
            if let Some(bad) = cc.iter().find(|addr| !addr.contains('@')) {
                return Err(ConfigError::InvalidValue(format!(
                    "mail.release_cc entry '{bad}' is not an address"
                )));
            }
        }

        Ok(())
    }
}

/// The `[smtp]` table.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct SmtpConfig {
    /// Relay host
    pub host: Option<String>,

    /// Relay port (default 25)
    pub port: Option<u16>,

    /// Login for SMTP AUTH
    pub username: Option<String>,

    /// Password for SMTP AUTH
    pub password: Option<String>,
}

impl SmtpConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.port == Some(0) {
            return Err(ConfigError::InvalidValue("smtp.port cannot be 0".into()));
        }
        if self.username.is_some() != self.password.is_some() {
            return Err(ConfigError::InvalidValue(
                "smtp.username and smtp.password must be set together".into(),
            ));
        }
        Ok(())
    }
}
