//! End-to-end batches against real repositories.
//!
//! Each test builds the repository state a `post-receive` hook would see
//! (refs already moved) and feeds the dispatcher the matching update lines.

mod common;

use common::TestRepo;
use refmail::core::types::Oid;
use refmail::engine::change::RawTransition;
use refmail::engine::classify::Classifier;
use refmail::engine::{DispatchError, Dispatcher, RunSummary};
use refmail::git::Git;
use refmail::mail::mock::RecordingMailer;
use refmail::mail::{Envelope, Sender};
use refmail::render::{RenderSettings, RenderedMessage, Renderer};

fn settings() -> RenderSettings {
    RenderSettings {
        project: "proj".to_string(),
        help_url: "http://help.example.org".to_string(),
        html: false,
    }
}

fn dispatch(
    git: &Git,
    mailer: &RecordingMailer,
    updates: &[RawTransition],
) -> Result<RunSummary, DispatchError> {
    let dispatcher = Dispatcher::new(
        git,
        Classifier::new(["release-team@example.org".to_string()]),
        Renderer::new(git, settings()),
        mailer,
        Envelope::new(
            Sender::new(Some("Test User".to_string()), "tester", "src.example.org"),
            vec!["commits@example.org".to_string()],
        ),
    );
    dispatcher.run(updates)
}

fn update(old: &Oid, new: &Oid, refname: &str) -> RawTransition {
    RawTransition::new(old.as_str(), new.as_str(), refname)
}

fn create(new: &Oid, refname: &str) -> RawTransition {
    RawTransition::new(Oid::NULL, new.as_str(), refname)
}

fn subjects(sent: &[RenderedMessage]) -> Vec<&str> {
    sent.iter().map(|m| m.subject.as_str()).collect()
}

mod branches {
    use super::*;

    #[test]
    fn root_commit_branch_creation() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let mailer = RecordingMailer::new();

        let summary = dispatch(&repo.git(), &mailer, &[create(&c1, "refs/heads/master")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(summary, RunSummary { changes: 1, messages: 2 });
        assert_eq!(
            subjects(&sent),
            vec!["[proj] Created branch master", "[proj] Initial commit"]
        );
        assert!(sent[0].plain_body.contains("Summary of new commits:"));
        assert!(sent[0]
            .plain_body
            .contains(&format!("  {}... Initial commit\n", c1.short(7))));
        assert!(!sent[0].plain_body.contains("(*)"));
        assert_eq!(sent[0].header("X-Git-Oldrev"), Some(Oid::NULL));
    }

    #[test]
    fn fast_forward_by_one_commit() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let c2 = repo.commit_file("a", "a\n", "Add a");
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[update(&c1, &c2, "refs/heads/master")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(subjects(&sent), vec!["[proj] Add a"]);
        let commit = &sent[0];
        assert_eq!(commit.header("X-Git-Oldrev"), Some(c1.as_str()));
        assert_eq!(commit.header("X-Git-Newrev"), Some(c2.as_str()));
        assert!(commit.plain_body.contains("+a"));
        assert!(commit.cc.is_empty());
    }

    #[test]
    fn rewind_reports_removed_commit() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let c2 = repo.commit_file("a", "a\n", "Add a");
        repo.git_cmd(&["reset", "-q", "--hard", c1.as_str()]);
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[update(&c2, &c1, "refs/heads/master")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(
            subjects(&sent),
            vec!["[proj] Non-fast-forward update to branch master"]
        );
        let body = &sent[0].plain_body;
        assert!(body.contains("http://help.example.org/NonFastForward"));
        assert!(body.contains(&format!("Commits removed from the branch:\n\n  {}... Add a", c2.short(7))));
    }

    #[test]
    fn topic_branch_with_two_commits_gets_numbered_messages() {
        let repo = TestRepo::new();
        repo.git_cmd(&["checkout", "-q", "-b", "topic"]);
        repo.commit_file("a", "a\n", "first on topic");
        let tip = repo.commit_file("b", "b\n", "second on topic");
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&tip, "refs/heads/topic")]).unwrap();

        assert_eq!(
            mailer.subjects(),
            vec![
                "[proj] (2 commits) Created branch topic",
                "[proj/topic: 1/2] first on topic",
                "[proj/topic: 2/2] second on topic",
            ]
        );
    }

    #[test]
    fn branch_already_on_master_is_not_detailed_again() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        repo.git_cmd(&["branch", "copy"]);
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&c1, "refs/heads/copy")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(subjects(&sent), vec!["[proj] Created branch copy"]);
        assert!(sent[0].plain_body.contains("was created pointing to:"));
    }

    #[test]
    fn commit_pushed_to_two_branches_is_detailed_once() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let c2 = repo.commit_file("fix", "fix\n", "Shared fix");
        repo.git_cmd(&["branch", "stable"]);
        let mailer = RecordingMailer::new();

        dispatch(
            &repo.git(),
            &mailer,
            &[
                update(&c1, &c2, "refs/heads/master"),
                create(&c2, "refs/heads/stable"),
            ],
        )
        .unwrap();

        let sent = mailer.sent();
        assert_eq!(
            subjects(&sent),
            vec!["[proj] Shared fix", "[proj] Created branch stable"]
        );
        assert!(!sent[1].plain_body.contains("(*)"));
    }

    #[test]
    fn release_branch_creation_copies_release_team() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        repo.git_cmd(&["branch", "gnome-3-2"]);
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&c1, "refs/heads/gnome-3-2")]).unwrap();

        assert_eq!(mailer.sent()[0].cc, vec!["release-team@example.org".to_string()]);
    }

    #[test]
    fn branch_deletion() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let mailer = RecordingMailer::new();

        dispatch(
            &repo.git(),
            &mailer,
            &[RawTransition::new(c1.as_str(), Oid::NULL, "refs/heads/gone")],
        )
        .unwrap();

        let sent = mailer.sent();
        assert_eq!(subjects(&sent), vec!["[proj] Deleted branch gone"]);
        assert_eq!(sent[0].plain_body, "The branch 'gone' was deleted.\n");
    }
}

mod tags {
    use super::*;

    #[test]
    fn unsigned_annotated_tag_creation() {
        let repo = TestRepo::new();
        repo.commit_file("a", "a\n", "Add a");
        repo.git_cmd(&["tag", "-a", "v1.0", "-m", "Release 1.0"]);
        let tag = repo.rev("refs/tags/v1.0");
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&tag, "refs/tags/v1.0")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(subjects(&sent), vec!["[proj] Created tag v1.0"]);
        let body = &sent[0].plain_body;
        assert!(body.starts_with("The unsigned tag 'v1.0' was created.\n"));
        assert!(body.contains("Tagger: Test User <test@example.com>"));
        assert!(body.contains("    Release 1.0"));
        assert!(body.contains("Changes:\n\nTest User (2):\n"));
    }

    #[test]
    fn second_tag_lists_changes_since_previous() {
        let repo = TestRepo::new();
        repo.git_cmd(&["tag", "-a", "v1", "-m", "one"]);
        repo.commit_file("a", "a\n", "Add a");
        repo.git_cmd(&["tag", "-a", "v2", "-m", "two"]);
        let v2 = repo.rev("refs/tags/v2");
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&v2, "refs/tags/v2")]).unwrap();

        let body = &mailer.sent()[0].plain_body;
        assert!(body.contains("Changes since the last tag 'v1':"));
        assert!(body.contains("Test User (1):\n      Add a\n"));
        assert!(!body.contains("Initial commit"));
    }

    #[test]
    fn lightweight_tag_creation() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        repo.git_cmd(&["tag", "snapshot"]);
        let mailer = RecordingMailer::new();

        dispatch(&repo.git(), &mailer, &[create(&c1, "refs/tags/snapshot")]).unwrap();

        let sent = mailer.sent();
        assert_eq!(subjects(&sent), vec!["[proj] Created tag snapshot"]);
        assert!(sent[0]
            .plain_body
            .contains(&format!(" {}... Initial commit", c1.short(7))));
    }
}

mod misc {
    use super::*;

    #[test]
    fn remote_tracking_ref_is_unexpected() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let mailer = RecordingMailer::new();

        dispatch(
            &repo.git(),
            &mailer,
            &[create(&c1, "refs/remotes/origin/foo")],
        )
        .unwrap();

        let sent = mailer.sent();
        assert_eq!(
            subjects(&sent),
            vec!["[proj] Unexpected: Created refs/remotes/origin/foo"]
        );
        assert!(sent[0].plain_body.contains("doesn't belong on the server"));
    }

    #[test]
    fn mixed_batch_keeps_input_order() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let c2 = repo.commit_file("a", "a\n", "Add a");
        repo.git_cmd(&["tag", "light"]);
        let mailer = RecordingMailer::new();

        let summary = dispatch(
            &repo.git(),
            &mailer,
            &[
                create(&c2, "refs/tags/light"),
                update(&c1, &c2, "refs/heads/master"),
                create(&c2, "refs/notes/commits"),
            ],
        )
        .unwrap();

        assert_eq!(summary.changes, 3);
        assert_eq!(
            mailer.subjects(),
            vec![
                "[proj] Created tag light",
                "[proj] Add a",
                "[proj] Unexpected: Created refs/notes/commits",
            ]
        );
    }

    #[test]
    fn delivery_failure_stops_the_batch() {
        let repo = TestRepo::new();
        let c1 = repo.rev("HEAD");
        let c2 = repo.commit_file("a", "a\n", "Add a");
        let mailer = RecordingMailer::new().fail_at(1);

        let result = dispatch(
            &repo.git(),
            &mailer,
            &[
                create(&c1, "refs/tags/first"),
                create(&c1, "refs/tags/second"),
                update(&c1, &c2, "refs/heads/master"),
            ],
        );

        assert!(matches!(result, Err(DispatchError::Mail(_))));
        assert_eq!(mailer.subjects(), vec!["[proj] Created tag first"]);
    }
}
