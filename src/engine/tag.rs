//! engine::tag
//!
//! Parsing of annotated tag objects.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;

static TAGGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^tagger\s+([^>]*>)\s*(.*)").expect("static regex compiles"));

const PGP_SIGNATURE_START: &str = "-----BEGIN PGP SIGNATURE-----";

/// Tagger used when the payload has no parsable tagger line.
pub const UNKNOWN_TAGGER: &str = "unknown <unknown@example.com>";

/// Date used when the payload has no parsable tagger line.
pub const UNKNOWN_DATE: &str = "at an unknown time";

/// What an annotated tag says about itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagInfo {
    /// `Name <email>`
    pub tagger: String,
    /// Rendered date, or the raw text after the tagger if it is not a Git
    /// timestamp
    pub date: String,
    /// Message lines, each indented four spaces
    pub message: String,
    /// A PGP signature block followed the message
    pub signed: bool,
}

impl TagInfo {
    /// "signed tag" or "unsigned tag".
    pub fn tag_type(&self) -> &'static str {
        if self.signed {
            "signed tag"
        } else {
            "unsigned tag"
        }
    }
}

/// Parse the raw payload of a tag object.
///
/// Never fails: a payload without a tagger line yields [`UNKNOWN_TAGGER`]
/// and [`UNKNOWN_DATE`] so the problem shows up in the mail.
///
/// # Example
///
/// ```
/// use refmail::engine::tag::parse_tag_payload;
///
/// let payload = "object 0123\ntype commit\ntag v1.0\n\
///                tagger Jane Roe <jane@example.com> 1234567890 +0000\n\
///                \nRelease 1.0\n";
/// let info = parse_tag_payload(payload);
/// assert_eq!(info.tagger, "Jane Roe <jane@example.com>");
/// assert_eq!(info.date, "Fri Feb 13 23:31:30 2009 +0000");
/// assert_eq!(info.message, "    Release 1.0");
/// assert_eq!(info.tag_type(), "unsigned tag");
/// ```
pub fn parse_tag_payload(payload: &str) -> TagInfo {
    let mut tagger = UNKNOWN_TAGGER.to_string();
    let mut date = UNKNOWN_DATE.to_string();
    let mut signed = false;
    let mut in_message = false;
    let mut message_lines = Vec::new();

    for line in payload.lines() {
        if in_message {
            if line.starts_with(PGP_SIGNATURE_START) {
                signed = true;
                break;
            }
            message_lines.push(line);
        } else if line.trim().is_empty() {
            in_message = true;
        } else if let Some(caps) = TAGGER.captures(line) {
            tagger = caps[1].to_string();
            date = format_git_date(&caps[2]).unwrap_or_else(|| caps[2].to_string());
        }
    }

    let message = message_lines
        .iter()
        .map(|line| format!("    {line}"))
        .collect::<Vec<_>>()
        .join("\n");

    TagInfo {
        tagger,
        date,
        message,
        signed,
    }
}

/// Render a `<seconds> <+hhmm>` timestamp the way `git log` does by default.
pub fn format_git_date(raw: &str) -> Option<String> {
    let mut parts = raw.split_whitespace();
    let seconds: i64 = parts.next()?.parse().ok()?;
    let offset = parse_offset(parts.next()?)?;
    if parts.next().is_some() {
        return None;
    }
    let time = DateTime::from_timestamp(seconds, 0)?.with_timezone(&offset);
    Some(format_date(&time))
}

/// Git's default date layout, e.g. `Fri Feb 13 23:31:30 2009 +0000`.
pub fn format_date(time: &DateTime<FixedOffset>) -> String {
    time.format("%a %b %-d %H:%M:%S %Y %z").to_string()
}

fn parse_offset(tz: &str) -> Option<FixedOffset> {
    if tz.len() != 5 || !tz.is_ascii() {
        return None;
    }
    let sign = match &tz[..1] {
        "+" => 1,
        "-" => -1,
        _ => return None,
    };
    let hours: i32 = tz[1..3].parse().ok()?;
    let minutes: i32 = tz[3..5].parse().ok()?;
    FixedOffset::east_opt(sign * (hours * 3600 + minutes * 60))
}
