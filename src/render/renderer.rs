//! render::renderer
//!
//! Turn prepared changes into [`RenderedMessage`]s.

use super::html;
use super::message::{
    MessageBuilder, RenderedMessage, HEADER_KEYWORDS, HEADER_NEWREV, HEADER_OLDREV,
    HEADER_REFNAME,
};
use super::text::{
    commit_body, commit_header, commit_oneline, commit_summary, push_line, shortlog,
    truncate_subject,
};
use crate::core::types::Oid;
use crate::engine::attribution::AttributionResult;
use crate::engine::change::{Change, ChangeKind};
use crate::engine::prepare::{Prepared, TagDetails};
use crate::git::{GitError, RepoQuery};

/// Project-wide rendering settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Short project name used in `[project]` subject prefixes
    pub project: String,
    /// Base URL for the help pages linked from warnings
    pub help_url: String,
    /// Attach an HTML alternative to per-commit messages
    pub html: bool,
}

/// Renders main and per-commit messages.
pub struct Renderer<'a> {
    repo: &'a dyn RepoQuery,
    settings: RenderSettings,
}

impl<'a> Renderer<'a> {
    pub fn new(repo: &'a dyn RepoQuery, settings: RenderSettings) -> Self {
        Self { repo, settings }
    }

    pub fn settings(&self) -> &RenderSettings {
        &self.settings
    }

    /// The summary message for a change.
    ///
    /// Whether it should be sent at all is decided by
    /// [`crate::engine::cover::needs_main_notification`].
    pub fn main_message(
        &self,
        change: &Change,
        prepared: &Prepared,
    ) -> Result<RenderedMessage, GitError> {
        let empty = AttributionResult::default();
        let attribution = prepared.attribution().unwrap_or(&empty);

        let (extra, subject) = self.main_subject(change, attribution);
        let subject = match extra {
            Some(extra) => format!("[{}/{}] {}", self.settings.project, extra, subject),
            None => format!("[{}] {}", self.settings.project, subject),
        };
        let body = self.main_body(change, prepared, attribution)?;

        Ok(MessageBuilder::new(subject)
            .header(HEADER_KEYWORDS, self.settings.project.as_str())
            .header(HEADER_REFNAME, change.refname.as_str())
            .header(HEADER_OLDREV, rev_or_null(change.old.as_ref()))
            .header(HEADER_NEWREV, rev_or_null(change.new.as_ref()))
            .cc(change.cc.iter().cloned())
            .body(body)
            .build())
    }

    /// One message per detailed commit of a branch change, in `added` order.
    ///
    /// Non-branch changes produce none.
    pub fn commit_messages(
        &self,
        change: &Change,
        prepared: &Prepared,
    ) -> Result<Vec<RenderedMessage>, GitError> {
        let Some(attribution) = prepared.attribution() else {
            return Ok(Vec::new());
        };

        let branch = if change.short_refname == "master" {
            String::new()
        } else {
            format!("/{}", change.short_refname)
        };
        let total = attribution.added.len();

        let mut messages = Vec::new();
        for (index, commit) in attribution.detailed_commits() {
            let count = if total > 1 && attribution.needs_cover {
                format!(": {index}/{total}")
            } else {
                String::new()
            };
            let subject = format!(
                "[{}{}{}] {}",
                self.settings.project,
                branch,
                count,
                truncate_subject(&commit.summary)
            );

            let mut builder = MessageBuilder::new(subject)
                .header(HEADER_KEYWORDS, self.settings.project.as_str())
                .header(HEADER_REFNAME, change.refname.as_str());
            if !attribution.needs_cover {
                // each commit stands in for its own ref update
                builder = builder
                    .header(HEADER_OLDREV, rev_or_null(commit.parents.first()))
                    .header(HEADER_NEWREV, commit.oid.as_str());
            }

            let diff = self.repo.commit_diff(&commit.oid)?;
            let html_body = self
                .settings
                .html
                .then(|| html::commit_html(&commit_header(commit, &diff), &diff.patch));
            messages.push(builder.body(commit_body(commit, &diff)).html(html_body).build());
        }
        Ok(messages)
    }

    /// Subject (without the project prefix) and optional `/extra` for the
    /// project prefix.
    fn main_subject(&self, change: &Change, a: &AttributionResult) -> (Option<String>, String) {
        let short = &change.short_refname;
        let count = if a.added.len() > 1 {
            format!("({} commits) ", a.added.len())
        } else {
            String::new()
        };

        match change.kind {
            ChangeKind::BranchCreate => (None, format!("{count}Created branch {short}")),
            ChangeKind::BranchUpdate if !a.removed.is_empty() => (
                None,
                format!("{count}Non-fast-forward update to branch {short}"),
            ),
            ChangeKind::BranchUpdate => {
                let extra = (short != "master").then(|| short.clone());
                let subject = match a.added.last() {
                    Some(last) if a.added.len() > 1 => {
                        format!("{count}...{}", truncate_subject(&last.summary))
                    }
                    Some(last) => truncate_subject(&last.summary).to_string(),
                    None => format!("Updated branch {short}"),
                };
                (extra, subject)
            }
            ChangeKind::BranchDelete => (None, format!("Deleted branch {short}")),
            ChangeKind::AnnotatedTagCreate | ChangeKind::LightweightTagCreate => {
                (None, format!("Created tag {short}"))
            }
            ChangeKind::AnnotatedTagUpdate | ChangeKind::LightweightTagUpdate => {
                (None, format!("Updated tag {short}"))
            }
            ChangeKind::AnnotatedTagDelete | ChangeKind::LightweightTagDelete => {
                (None, format!("Deleted tag {short}"))
            }
            ChangeKind::InvalidRefDelete => {
                (None, format!("Deleted invalid ref {}", change.refname))
            }
            ChangeKind::MiscCreate => (None, format!("Unexpected: Created {}", change.refname)),
            ChangeKind::MiscUpdate => (None, format!("Unexpected: Updated {}", change.refname)),
            ChangeKind::MiscDelete => (None, format!("Unexpected: Deleted {}", change.refname)),
        }
    }

    fn main_body(
        &self,
        change: &Change,
        prepared: &Prepared,
        a: &AttributionResult,
    ) -> Result<String, GitError> {
        let short = &change.short_refname;
        let refname = &change.refname;
        let mut out = String::new();

        match change.kind {
            ChangeKind::BranchCreate => {
                if a.added.is_empty() {
                    push_line(&mut out, format!("The branch '{short}' was created pointing to:"));
                    push_line(&mut out, "");
                    push_line(&mut out, format!(" {}", self.oneline(change.new.as_ref())?));
                } else {
                    push_line(&mut out, format!("The branch '{short}' was created."));
                    push_line(&mut out, "");
                    push_line(&mut out, "Summary of new commits:");
                    push_line(&mut out, "");
                    out.push_str(&commit_summary(&a.added, Some(&a.detailed)));
                }
            }
            ChangeKind::BranchUpdate if a.removed.is_empty() => {
                push_line(&mut out, "Summary of changes:");
                push_line(&mut out, "");
                out.push_str(&commit_summary(&a.added, Some(&a.detailed)));
            }
            ChangeKind::BranchUpdate => {
                push_line(
                    &mut out,
                    format!(
                        "The branch '{short}' was changed in a way that was not a fast-forward update."
                    ),
                );
                push_line(
                    &mut out,
                    "NOTE: This may cause problems for people pulling from the branch. For more information,",
                );
                push_line(&mut out, "please see:");
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.help_page("NonFastForward")));
                push_line(&mut out, "");
                push_line(&mut out, "Commits removed from the branch:");
                push_line(&mut out, "");
                out.push_str(&commit_summary(&a.removed, None));
                push_line(&mut out, "");
                push_line(&mut out, "Commits added to the branch:");
                push_line(&mut out, "");
                out.push_str(&commit_summary(&a.added, Some(&a.detailed)));
            }
            ChangeKind::BranchDelete => {
                push_line(&mut out, format!("The branch '{short}' was deleted."));
            }
            ChangeKind::AnnotatedTagCreate => {
                let details = tag_details(prepared, change)?;
                push_line(
                    &mut out,
                    format!("The {} '{short}' was created.", details.info.tag_type()),
                );
                push_line(&mut out, "");
                self.tag_info(&mut out, details);
            }
            ChangeKind::AnnotatedTagUpdate => {
                let details = tag_details(prepared, change)?;
                push_line(
                    &mut out,
                    format!("The tag '{short}' was replaced with a new tag. It previously"),
                );
                push_line(&mut out, "pointed to:");
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(details.old_commit.as_ref())?));
                push_line(&mut out, "");
                self.tag_update_note(&mut out);
                push_line(&mut out, "");
                push_line(&mut out, "New tag information:");
                push_line(&mut out, "");
                self.tag_info(&mut out, details);
            }
            ChangeKind::AnnotatedTagDelete => {
                let details = tag_details(prepared, change)?;
                push_line(
                    &mut out,
                    format!(
                        "The {} '{short}' was deleted. It previously pointed to:",
                        details.info.tag_type()
                    ),
                );
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(details.old_commit.as_ref())?));
            }
            ChangeKind::LightweightTagCreate => {
                push_line(
                    &mut out,
                    format!("The lightweight tag '{short}' was created pointing to:"),
                );
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(change.new.as_ref())?));
            }
            ChangeKind::LightweightTagUpdate => {
                push_line(
                    &mut out,
                    format!("The lightweight tag '{short}' was updated to point to:"),
                );
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(change.new.as_ref())?));
                push_line(&mut out, "");
                push_line(&mut out, "It previously pointed to:");
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(change.old.as_ref())?));
                push_line(&mut out, "");
                self.tag_update_note(&mut out);
            }
            ChangeKind::LightweightTagDelete => {
                push_line(
                    &mut out,
                    format!("The lightweight tag '{short}' was deleted. It previously pointed to:"),
                );
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", self.oneline(change.old.as_ref())?));
            }
            ChangeKind::InvalidRefDelete => {
                push_line(
                    &mut out,
                    format!("The ref '{refname}' was deleted. It previously pointed nowhere."),
                );
            }
            ChangeKind::MiscCreate => {
                push_line(&mut out, format!("The ref '{refname}' was created pointing to:"));
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", rev_or_null(change.new.as_ref())));
                unexpected_because(&mut out, change);
            }
            ChangeKind::MiscUpdate => {
                push_line(&mut out, format!("The ref '{refname}' was updated from:"));
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", rev_or_null(change.old.as_ref())));
                push_line(&mut out, "");
                push_line(&mut out, "To:");
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", rev_or_null(change.new.as_ref())));
                unexpected_because(&mut out, change);
            }
            ChangeKind::MiscDelete => {
                push_line(
                    &mut out,
                    format!("The ref '{refname}' was deleted. It previously pointed to:"),
                );
                push_line(&mut out, "");
                push_line(&mut out, format!(" {}", rev_or_null(change.old.as_ref())));
                unexpected_because(&mut out, change);
            }
        }
        Ok(out)
    }

    fn tag_info(&self, out: &mut String, details: &TagDetails) {
        push_line(out, format!("Tagger: {}", details.info.tagger));
        push_line(out, format!("Date: {}", details.info.date));
        push_line(out, "");
        push_line(out, &details.info.message);
        push_line(out, "");
        match &details.previous_tag {
            Some(last) => {
                push_line(out, format!("Changes since the last tag '{last}':"));
            }
            None => {
                push_line(out, "Changes:");
            }
        }
        push_line(out, "");
        out.push_str(&shortlog(&details.shortlog));
    }

    fn tag_update_note(&self, out: &mut String) {
        push_line(out, "NOTE: People pulling from the repository will not get the new tag.");
        push_line(out, "For more information, please see:");
        push_line(out, "");
        push_line(out, format!(" {}", self.help_page("TagUpdates")));
    }

    fn help_page(&self, page: &str) -> String {
        format!("{}/{}", self.settings.help_url.trim_end_matches('/'), page)
    }

    fn oneline(&self, oid: Option<&Oid>) -> Result<String, GitError> {
        match oid {
            Some(oid) => Ok(commit_oneline(&self.repo.commit_info(oid)?)),
            None => Ok(Oid::NULL.to_string()),
        }
    }
}

fn tag_details<'p>(prepared: &'p Prepared, change: &Change) -> Result<&'p TagDetails, GitError> {
    match prepared {
        Prepared::AnnotatedTag(details) => Ok(details),
        _ => Err(GitError::Internal {
            message: format!("{} was rendered without its tag details", change.refname),
        }),
    }
}

fn unexpected_because(out: &mut String, change: &Change) {
    push_line(out, "");
    push_line(out, "This is unexpected because:");
    push_line(out, "");
    push_line(out, format!(" {}", change.anomaly.as_deref().unwrap_or_default()));
}

fn rev_or_null(oid: Option<&Oid>) -> String {
    oid.map(|o| o.to_string())
        .unwrap_or_else(|| Oid::NULL.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::RefName;
    use crate::engine::batch::BatchContext;
    use crate::engine::change::ReferenceTransition;
    use crate::engine::classify::Classifier;
    use crate::engine::prepare::prepare;
    use crate::git::mock::MockRepo;

    fn settings() -> RenderSettings {
        RenderSettings {
            project: "gtk".to_string(),
            help_url: "http://help.example.org/Git/Help".to_string(),
            html: false,
        }
    }

    /// Classify and prepare one transition against `repo`.
    fn staged(repo: &MockRepo, refname: &str, old: Option<&Oid>, new: Option<&Oid>) -> (Change, Prepared) {
        let t = ReferenceTransition::new(RefName::new(refname).unwrap(), old.cloned(), new.cloned());
        let kind = t.target().map(|oid| repo.object_kind(oid).unwrap());
        let change = Classifier::default().classify(&t, kind);
        let prepared = prepare(repo, &change, &BatchContext::new([&change])).unwrap();
        (change, prepared)
    }

    mod branches {
        use super::*;

        #[test]
        fn fast_forward_commit_message() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("Fix crash in GtkEntry", &[&c1]);
            repo.set_branch("refs/heads/master", &c2);

            let (change, prepared) = staged(&repo, "refs/heads/master", Some(&c1), Some(&c2));
            let renderer = Renderer::new(&repo, settings());
            let messages = renderer.commit_messages(&change, &prepared).unwrap();

            assert_eq!(messages.len(), 1);
            let m = &messages[0];
            assert_eq!(m.subject, "[gtk] Fix crash in GtkEntry");
            assert_eq!(m.header(HEADER_OLDREV), Some(c1.as_str()));
            assert_eq!(m.header(HEADER_NEWREV), Some(c2.as_str()));
            assert_eq!(m.header(HEADER_REFNAME), Some("refs/heads/master"));
            assert!(m.plain_body.contains("\n---\ndiff --git a/NEWS b/NEWS"));
            assert!(m.cc.is_empty());
            assert!(m.html_body.is_none());
        }

        #[test]
        fn covered_series_is_numbered_and_drops_revs() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("two", &[&c1]);
            let c3 = repo.commit("three", &[&c2]);
            repo.set_branch("refs/heads/topic", &c3);
            repo.set_branch("refs/heads/master", &c1);

            let (change, prepared) = staged(&repo, "refs/heads/topic", None, Some(&c3));
            let renderer = Renderer::new(&repo, settings());

            let main = renderer.main_message(&change, &prepared).unwrap();
            assert_eq!(main.subject, "[gtk] (2 commits) Created branch topic");
            assert!(main.plain_body.starts_with("The branch 'topic' was created.\n\nSummary of new commits:\n\n"));
            assert_eq!(main.header(HEADER_OLDREV), Some(Oid::NULL));

            let subjects: Vec<_> = renderer
                .commit_messages(&change, &prepared)
                .unwrap()
                .into_iter()
                .map(|m| {
                    assert!(m.header(HEADER_OLDREV).is_none());
                    m.subject
                })
                .collect();
            assert_eq!(subjects, vec!["[gtk/topic: 1/2] two", "[gtk/topic: 2/2] three"]);
        }

        #[test]
        fn fast_forward_cover_names_branch_and_last_subject() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let side = repo.commit("side", &[&c1]);
            let merge = repo.commit("Merge branch 'side'", &[&c1, &side]);
            repo.set_branch("refs/heads/stable", &merge);

            let (change, prepared) = staged(&repo, "refs/heads/stable", Some(&c1), Some(&merge));
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk/stable] (2 commits) ...Merge branch 'side'");
            assert!(main.plain_body.starts_with("Summary of changes:\n\n"));
        }

        #[test]
        fn rewind_body_lists_removed_without_markers() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("two", &[&c1]);
            repo.set_branch("refs/heads/master", &c1);

            let (change, prepared) = staged(&repo, "refs/heads/master", Some(&c2), Some(&c1));
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();

            assert_eq!(main.subject, "[gtk] Non-fast-forward update to branch master");
            assert!(main
                .plain_body
                .contains(" http://help.example.org/Git/Help/NonFastForward\n"));
            assert!(main.plain_body.contains(&format!(
                "Commits removed from the branch:\n\n  {}... two\n",
                c2.short(7)
            )));
            assert!(!main.plain_body.contains("(*)"));
        }

        #[test]
        fn creation_without_new_commits_points_at_tip() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            repo.set_branch("refs/heads/master", &c1);
            repo.set_branch("refs/heads/copy", &c1);

            let (change, prepared) = staged(&repo, "refs/heads/copy", None, Some(&c1));
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk] Created branch copy");
            assert_eq!(
                main.plain_body,
                format!("The branch 'copy' was created pointing to:\n\n {}... one\n", c1.short(7))
            );
        }

        #[test]
        fn html_alternative_when_enabled() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("two", &[&c1]);
            repo.set_branch("refs/heads/master", &c2);

            let (change, prepared) = staged(&repo, "refs/heads/master", Some(&c1), Some(&c2));
            let renderer = Renderer::new(
                &repo,
                RenderSettings {
                    html: true,
                    ..settings()
                },
            );
            let messages = renderer.commit_messages(&change, &prepared).unwrap();
            let html = messages[0].html_body.as_deref().unwrap();
            assert!(html.contains("<span class=\"add\">+two</span>"));
        }

        #[test]
        fn long_subjects_are_truncated() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let long = "y".repeat(140);
            let c2 = repo.commit(&long, &[&c1]);
            repo.set_branch("refs/heads/master", &c2);

            let (change, prepared) = staged(&repo, "refs/heads/master", Some(&c1), Some(&c2));
            let messages = Renderer::new(&repo, settings())
                .commit_messages(&change, &prepared)
                .unwrap();
            assert_eq!(messages[0].subject, format!("[gtk] {}", "y".repeat(100)));
        }
    }

    mod tags {
        use super::*;

        const PAYLOAD: &str = "object x\ntype commit\ntag v1.0\n\
                               tagger Jane Roe <jane@example.com> 1234567890 +0000\n\nRelease 1.0\n";

        #[test]
        fn annotated_creation() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let t = repo.tag_object(&c1, PAYLOAD);
            repo.set_ref("refs/tags/v1.0", &t);

            let (change, prepared) = staged(&repo, "refs/tags/v1.0", None, Some(&t));
            let renderer = Renderer::new(&repo, settings());
            let main = renderer.main_message(&change, &prepared).unwrap();

            assert_eq!(main.subject, "[gtk] Created tag v1.0");
            assert_eq!(
                main.plain_body,
                "The unsigned tag 'v1.0' was created.\n\n\
                 Tagger: Jane Roe <jane@example.com>\n\
                 Date: Fri Feb 13 23:31:30 2009 +0000\n\n    Release 1.0\n\n\
                 Changes:\n\nTest User (1):\n      one\n\n"
            );
            assert!(renderer.commit_messages(&change, &prepared).unwrap().is_empty());
        }

        #[test]
        fn annotated_update_warns() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("two", &[&c1]);
            let old = repo.tag_object(&c1, PAYLOAD);
            let new = repo.tag_object(&c2, PAYLOAD);

            let (change, prepared) = staged(&repo, "refs/tags/v1.0", Some(&old), Some(&new));
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk] Updated tag v1.0");
            assert!(main.plain_body.contains(&format!("pointed to:\n\n {}... one\n", c1.short(7))));
            assert!(main.plain_body.contains(" http://help.example.org/Git/Help/TagUpdates\n"));
            assert!(main.plain_body.contains("New tag information:\n\nTagger: Jane Roe"));
        }

        #[test]
        fn lightweight_deletion() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);

            let (change, prepared) = staged(&repo, "refs/tags/snap", Some(&c1), None);
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk] Deleted tag snap");
            assert_eq!(
                main.plain_body,
                format!(
                    "The lightweight tag 'snap' was deleted. It previously pointed to:\n\n {}... one\n",
                    c1.short(7)
                )
            );
            assert_eq!(main.header(HEADER_NEWREV), Some(Oid::NULL));
        }
    }

    mod misc {
        use super::*;

        #[test]
        fn update_reads_old_then_new() {
            let mut repo = MockRepo::new();
            let c1 = repo.commit("one", &[]);
            let c2 = repo.commit("two", &[&c1]);

            let (change, prepared) = staged(&repo, "refs/remotes/origin/foo", Some(&c1), Some(&c2));
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk] Unexpected: Updated refs/remotes/origin/foo");
            assert_eq!(
                main.plain_body,
                format!(
                    "The ref 'refs/remotes/origin/foo' was updated from:\n\n {c1}\n\nTo:\n\n {c2}\n\n\
                     This is unexpected because:\n\n \
                     'refs/remotes/origin/foo' is a tracking branch and doesn't belong on the server\n"
                )
            );
        }

        #[test]
        fn invalid_ref_deletion() {
            let repo = MockRepo::new();
            let (change, prepared) = staged(&repo, "refs/heads/ghost", None, None);
            let main = Renderer::new(&repo, settings())
                .main_message(&change, &prepared)
                .unwrap();
            assert_eq!(main.subject, "[gtk] Deleted invalid ref refs/heads/ghost");
            assert_eq!(
                main.plain_body,
                "The ref 'refs/heads/ghost' was deleted. It previously pointed nowhere.\n"
            );
        }
    }
}
