//! render::text
//!
//! Small plain-text formatting helpers shared by every message kind.

use std::collections::{BTreeMap, HashSet};

use crate::core::types::Oid;
use crate::engine::tag::format_date;
use crate::git::{CommitDiff, CommitInfo};

/// Longest commit subject embedded in a mail subject, in characters.
pub const SUBJECT_MAX_CHARS: usize = 100;

/// Footnote for commits listed without their own message.
pub const ALREADY_SENT_NOTE: &str =
    "(*) This commit already existed in another branch; no separate mail sent";

/// Append `text` and a newline to `out`.
pub(crate) fn push_line(out: &mut String, text: impl AsRef<str>) {
    out.push_str(text.as_ref());
    out.push('\n');
}

/// Cut a commit subject to [`SUBJECT_MAX_CHARS`] characters.
///
/// # Example
///
/// ```
/// use refmail::render::text::truncate_subject;
///
/// assert_eq!(truncate_subject("short"), "short");
/// assert_eq!(truncate_subject(&"x".repeat(150)).len(), 100);
/// ```
pub fn truncate_subject(subject: &str) -> &str {
    match subject.char_indices().nth(SUBJECT_MAX_CHARS) {
        Some((cut, _)) => &subject[..cut],
        None => subject,
    }
}

/// `<short id>... <subject>`
pub fn commit_oneline(commit: &CommitInfo) -> String {
    format!("{}... {}", commit.oid.short(7), truncate_subject(&commit.summary))
}

/// One `  <oneline>` row per commit.
///
/// With `detailed` set, commits outside it get a ` (*)` marker and the list
/// ends with [`ALREADY_SENT_NOTE`].
pub fn commit_summary(commits: &[CommitInfo], detailed: Option<&HashSet<Oid>>) -> String {
    let mut out = String::new();
    let mut marked = false;
    for commit in commits {
        let marker = match detailed {
            Some(set) if !set.contains(&commit.oid) => {
                marked = true;
                " (*)"
            }
            _ => "",
        };
        push_line(&mut out, format!("  {}{}", commit_oneline(commit), marker));
    }
    if marked {
        push_line(&mut out, "");
        push_line(&mut out, ALREADY_SENT_NOTE);
    }
    out
}

/// Commits grouped by author name, like `git shortlog`.
pub fn shortlog(commits: &[CommitInfo]) -> String {
    let mut by_author: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
    for commit in commits {
        by_author
            .entry(commit.author_name.as_str())
            .or_default()
            .push(commit.summary.as_str());
    }

    let mut out = String::new();
    for (author, subjects) in by_author {
        push_line(&mut out, format!("{} ({}):", author, subjects.len()));
        for subject in subjects {
            push_line(&mut out, format!("      {subject}"));
        }
        push_line(&mut out, "");
    }
    out
}

/// The `git show --stat` part of a commit message: header, indented
/// message, and diff stat.
pub fn commit_header(commit: &CommitInfo, diff: &CommitDiff) -> String {
    let mut out = String::new();
    push_line(&mut out, format!("commit {}", commit.oid));
    if commit.is_merge() {
        let parents: Vec<&str> = commit.parents.iter().map(|p| p.short(7)).collect();
        push_line(&mut out, format!("Merge: {}", parents.join(" ")));
    }
    push_line(&mut out, format!("Author: {} <{}>", commit.author_name, commit.author_email));
    push_line(&mut out, format!("Date:   {}", format_date(&commit.author_time)));
    push_line(&mut out, "");
    for line in commit.message.trim_end().lines() {
        if line.is_empty() {
            push_line(&mut out, "");
        } else {
            push_line(&mut out, format!("    {line}"));
        }
    }
    push_line(&mut out, "");
    out.push_str(&diff.stat);
    out
}

/// Full plain body of a per-commit message.
pub fn commit_body(commit: &CommitInfo, diff: &CommitDiff) -> String {
    let mut out = commit_header(commit, diff);
    out.push_str("---\n");
    out.push_str(&diff.patch);
    out
}
