//! core::identity
//!
//! Who is pushing.
//!
//! The hook runs as the pushing user's account on the server, so the
//! From address is built from the login name and the passwd GECOS field.

use std::sync::LazyLock;

use nix::unistd::{Uid, User};
use regex::Regex;

static GECOS_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^,<]+)").expect("static regex compiles"));

/// The account responsible for the push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pusher {
    /// Login name, used as the local part of the From address
    pub login: String,
    /// Human readable name from GECOS, if any
    pub full_name: Option<String>,
}

impl Pusher {
    /// Build a pusher from explicit values.
    pub fn new(login: impl Into<String>, full_name: Option<String>) -> Self {
        Self {
            login: login.into(),
            full_name,
        }
    }

    /// Look up the current process owner.
    ///
    /// `$USER` wins for the login (that is what the shell on the server set
    /// up); the passwd entry supplies the display name. A failed lookup
    /// degrades to no display name.
    pub fn current() -> Self {
        let entry = match User::from_uid(Uid::current()) {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(error = %e, "passwd lookup failed");
                None
            }
        };

        let login = std::env::var("USER")
            .ok()
            .filter(|u| !u.is_empty())
            .or_else(|| entry.as_ref().map(|e| e.name.clone()))
            .unwrap_or_else(|| "unknown".to_string());

        let full_name = entry
            .as_ref()
            .and_then(|e| e.gecos.to_str().ok().and_then(parse_gecos));

        Self { login, full_name }
    }

    /// The pusher's mail address at `domain`.
    pub fn address(&self, domain: &str) -> String {
        format!("{}@{}", self.login, domain)
    }
}

/// Extract a display name from a GECOS field.
///
/// GNOME accounts typically carry `John Doe <john@example.com>`; classic
/// passwd entries use comma separated fields. The name is the first segment
/// before either delimiter, trimmed.
///
/// # Example
///
/// ```
/// use refmail::core::identity::parse_gecos;
///
/// assert_eq!(parse_gecos("John Doe,,,"), Some("John Doe".to_string()));
/// assert_eq!(parse_gecos("Jane Roe <jane@example.com>"), Some("Jane Roe".to_string()));
/// assert_eq!(parse_gecos(",,,"), None);
/// ```
pub fn parse_gecos(gecos: &str) -> Option<String> {
    let name = GECOS_NAME.captures(gecos)?.get(1)?.as_str().trim();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
