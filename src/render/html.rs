//! render::html
//!
//! HTML alternative for per-commit messages.

use super::text::push_line;

/// Escape text for inclusion in HTML.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn line_class(line: &str) -> Option<&'static str> {
    if line.starts_with("+++") || line.starts_with("---") || line.starts_with("diff ") {
        Some("file")
    } else if line.starts_with("@@") {
        Some("hunk")
    } else if line.starts_with('+') {
        Some("add")
    } else if line.starts_with('-') {
        Some("del")
    } else {
        None
    }
}

/// Render a commit's plain header and patch as a standalone HTML document.
///
/// Patch lines are wrapped in spans classed `file`, `hunk`, `add` or `del`.
pub fn commit_html(header: &str, patch: &str) -> String {
    let mut out = String::new();
    out.push_str("<html>\n<head>\n<style>\n");
    out.push_str(".file { font-weight: bold; }\n");
    out.push_str(".hunk { color: #990099; }\n");
    out.push_str(".add { color: #007700; }\n");
    out.push_str(".del { color: #aa0000; }\n");
    out.push_str("</style>\n</head>\n<body>\n<pre>");
    out.push_str(&escape(header));
    out.push_str("---\n");
    for line in patch.lines() {
        match line_class(line) {
            Some(class) => {
                push_line(&mut out, format!("<span class=\"{class}\">{}</span>", escape(line)));
            }
            None => {
                push_line(&mut out, escape(line));
            }
        }
    }
    out.push_str("</pre>\n</body>\n</html>\n");
    out
}
