//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! refmail has two configuration files plus one Git config key:
//! - **Global**: settings shared by every repository on the server
//! - **Repo**: `<git-dir>/refmail.toml`, per-repository overrides
//! - **`hooks.mailinglist`**: the traditional hook setting for recipients
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Global config file
//! 3. Repo config file
//! 4. `hooks.mailinglist` from Git config (recipients only)
//!
//! # Global Config Locations
//!
//! Searched in order:
//! 1. `$REFMAIL_CONFIG` if set
//! 2. `$XDG_CONFIG_HOME/refmail/config.toml`
//! 3. `~/.refmail/config.toml`
//!
//! # Example
//!
//! ```no_run
//! use refmail::core::config::Config;
//! use std::path::Path;
//!
//! let config = Config::load(Path::new("/srv/git/gtk.git"))
//!     .unwrap()
//!     .with_hook_recipients(Some("commits-list@example.org".to_string()));
//!
//! println!("Mailing {}", config.recipients().unwrap().join(", "));
//! ```

pub mod schema;

pub use schema::{ConfigFile, MailConfig, SmtpConfig};

use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default domain for the pusher's From address.
pub const DEFAULT_SENDER_DOMAIN: &str = "src.gnome.org";

/// Default base URL for help pages linked from warnings.
pub const DEFAULT_HELP_URL: &str = "http://live.gnome.org/Git/Help";

/// Default extra recipients when a release branch is created.
pub const DEFAULT_RELEASE_CC: [&str; 3] = [
    "release-team@gnome.org",
    "gnome-doc-list@gnome.org",
    "gnome-i18n@gnome.org",
];

/// Default SMTP port.
pub const DEFAULT_SMTP_PORT: u16 = 25;

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("hooks.mailinglist is not set")]
    MissingRecipients,
}

/// How outgoing mail leaves the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportConfig {
    /// Pipe to a sendmail-compatible binary
    Sendmail {
        /// Binary to run; `None` uses lettre's default
        command: Option<String>,
    },
    /// Talk SMTP to a relay
    Smtp {
        host: String,
        port: u16,
        /// Username and password for SMTP AUTH
        credentials: Option<(String, String)>,
    },
}

/// Merged configuration from all sources.
///
/// Accessor methods apply precedence rules automatically.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Global configuration
    pub global: ConfigFile,
    /// Repository configuration (if present)
    pub repo: Option<ConfigFile>,
    /// Recipients from `hooks.mailinglist`
    hook_recipients: Option<String>,
    /// Path to the global config file (if loaded)
    global_path: Option<PathBuf>,
    /// Path to the repo config file (if loaded)
    repo_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration for the repository at `git_dir`.
    ///
    /// # Errors
    ///
    /// Returns an error if config files exist but cannot be read, parsed,
    /// or validated. Missing files are not an error.
    pub fn load(git_dir: &Path) -> Result<Self, ConfigError> {
        Self::load_with_global(Self::find_global().as_deref(), git_dir)
    }

    /// Load configuration with an explicit global file location.
    pub fn load_with_global(global: Option<&Path>, git_dir: &Path) -> Result<Self, ConfigError> {
        let (global_file, global_path) = match global {
            Some(path) if path.exists() => (Self::read_config(path)?, Some(path.to_path_buf())),
            _ => (ConfigFile::default(), None),
        };

        let repo_candidate = Self::repo_config_path(git_dir);
        let (repo, repo_path) = if repo_candidate.exists() {
            (Some(Self::read_config(&repo_candidate)?), Some(repo_candidate))
        } else {
            (None, None)
        };

        global_file.validate()?;
        if let Some(ref r) = repo {
            r.validate()?;
        }

        Ok(Config {
            global: global_file,
            repo,
            hook_recipients: None,
            global_path,
            repo_path,
        })
    }

    /// Apply the `hooks.mailinglist` Git config value.
    pub fn with_hook_recipients(mut self, recipients: Option<String>) -> Self {
        self.hook_recipients = recipients.filter(|r| !r.trim().is_empty());
        self
    }

    /// Locate the global config file, if any exists.
    fn find_global() -> Option<PathBuf> {
        if let Ok(path) = std::env::var("REFMAIL_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("refmail/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        dirs::home_dir()
            .map(|home| home.join(".refmail/config.toml"))
            .filter(|path| path.exists())
    }

    /// Get the canonical path for repo config.
    pub fn repo_config_path(git_dir: &Path) -> PathBuf {
        git_dir.join("refmail.toml")
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    // =========================================================================
    // Accessor methods with precedence
    // =========================================================================

    /// First value found in the repo file, then the global file.
    fn mail_field<T>(&self, field: impl Fn(&MailConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.mail.as_ref())
            .and_then(&field)
            .or_else(|| self.global.mail.as_ref().and_then(&field))
    }

    fn smtp_field<T>(&self, field: impl Fn(&SmtpConfig) -> Option<T>) -> Option<T> {
        self.repo
            .as_ref()
            .and_then(|r| r.smtp.as_ref())
            .and_then(&field)
            .or_else(|| self.global.smtp.as_ref().and_then(&field))
    }

    /// Get the recipient list.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingRecipients` if no source names anyone.
    pub fn recipients(&self) -> Result<Vec<String>, ConfigError> {
        let raw = self
            .hook_recipients
            .clone()
            .or_else(|| self.mail_field(|m| m.recipients.clone()))
            .ok_or(ConfigError::MissingRecipients)?;

        let list: Vec<String> = raw
            .split(',')
            .map(str::trim)
            .filter(|r| !r.is_empty())
            .map(String::from)
            .collect();

        if list.is_empty() {
            return Err(ConfigError::MissingRecipients);
        }
        Ok(list)
    }

    /// Get the project short name, falling back to `derived`.
    pub fn project(&self, derived: &str) -> String {
        self.mail_field(|m| m.project.clone())
            .unwrap_or_else(|| derived.to_string())
    }

    /// Get the sender domain.
    ///
    /// Defaults to [`DEFAULT_SENDER_DOMAIN`].
    pub fn sender_domain(&self) -> String {
        self.mail_field(|m| m.sender_domain.clone())
            .unwrap_or_else(|| DEFAULT_SENDER_DOMAIN.to_string())
    }

    /// Check if HTML alternatives are attached to per-commit mail.
    ///
    /// Defaults to `false`.
    pub fn html(&self) -> bool {
        self.mail_field(|m| m.html).unwrap_or(false)
    }

    /// Get the release branch Cc list.
    pub fn release_cc(&self) -> Vec<String> {
        self.mail_field(|m| m.release_cc.clone())
            .unwrap_or_else(|| DEFAULT_RELEASE_CC.iter().map(|s| s.to_string()).collect())
    }

    /// Get the help URL base.
    pub fn help_url(&self) -> String {
        self.mail_field(|m| m.help_url.clone())
            .unwrap_or_else(|| DEFAULT_HELP_URL.to_string())
    }

    /// Get the configured transport.
    ///
    /// Defaults to sendmail.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if SMTP is selected without a host.
    pub fn transport(&self) -> Result<TransportConfig, ConfigError> {
        let kind = self
            .mail_field(|m| m.transport.clone())
            .unwrap_or_else(|| "sendmail".to_string());

        if kind != "smtp" {
            return Ok(TransportConfig::Sendmail {
                command: self.mail_field(|m| m.sendmail_command.clone()),
            });
        }

        let host = self
            .smtp_field(|s| s.host.clone())
            .ok_or_else(|| ConfigError::InvalidValue("smtp transport requires smtp.host".into()))?;
        let port = self.smtp_field(|s| s.port).unwrap_or(DEFAULT_SMTP_PORT);
        let credentials = self
            .smtp_field(|s| s.username.clone())
            .zip(self.smtp_field(|s| s.password.clone()));

        Ok(TransportConfig::Smtp {
            host,
            port,
            credentials,
        })
    }

    /// Get the path to the loaded global config file.
    pub fn global_config_loaded_from(&self) -> Option<&Path> {
        self.global_path.as_deref()
    }

    /// Get the path to the loaded repo config file.
    pub fn repo_config_loaded_from(&self) -> Option<&Path> {
        self.repo_path.as_deref()
    }
}
