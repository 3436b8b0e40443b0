//! render::message
//!
//! The finished, transport-independent form of one notification.

/// Header naming the updated ref.
pub const HEADER_REFNAME: &str = "X-Git-Refname";
/// Header carrying the ref's (or commit parent's) previous position.
pub const HEADER_OLDREV: &str = "X-Git-Oldrev";
/// Header carrying the ref's (or commit's) new position.
pub const HEADER_NEWREV: &str = "X-Git-Newrev";
/// Header carrying the project short name.
pub const HEADER_KEYWORDS: &str = "Keywords";

/// A rendered notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    /// Full subject, including the `[project...]` prefix
    pub subject: String,
    /// Custom headers, in emission order
    pub headers: Vec<(String, String)>,
    pub cc: Vec<String>,
    pub plain_body: String,
    pub html_body: Option<String>,
}

impl RenderedMessage {
    /// Value of the first header named `name` (case-insensitive).
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

/// Builder for [`RenderedMessage`].
///
/// # Example
///
/// ```
/// use refmail::render::MessageBuilder;
///
/// let message = MessageBuilder::new("[gtk] Fix the build")
///     .header("X-Git-Refname", "refs/heads/master")
///     .body("Summary of changes:\n")
///     .build();
///
/// assert_eq!(message.header("x-git-refname"), Some("refs/heads/master"));
/// assert!(message.html_body.is_none());
/// ```
#[derive(Debug, Clone)]
pub struct MessageBuilder {
    message: RenderedMessage,
}

impl MessageBuilder {
    pub fn new(subject: impl Into<String>) -> Self {
        Self {
            message: RenderedMessage {
                subject: subject.into(),
                headers: Vec::new(),
                cc: Vec::new(),
                plain_body: String::new(),
                html_body: None,
            },
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.message.headers.push((name.into(), value.into()));
        self
    }

    pub fn cc<I, S>(mut self, addresses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.message.cc.extend(addresses.into_iter().map(Into::into));
        self
    }

    pub fn body(mut self, body: impl Into<String>) -> Self {
        self.message.plain_body = body.into();
        self
    }

    pub fn html(mut self, html: Option<String>) -> Self {
        self.message.html_body = html;
        self
    }

    pub fn build(self) -> RenderedMessage {
        self.message
    }
}
