//! Shared fixtures for integration tests.
//!
//! Repositories are real, built in a temp directory with the `git` CLI.

#![allow(dead_code)]

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use refmail::core::types::Oid;
use refmail::git::Git;

/// A throwaway repository with a fixed identity and `master` as HEAD.
pub struct TestRepo {
    dir: TempDir,
    /// Commit timestamp for the next commit; advanced per commit so that
    /// time-ordered walks are deterministic.
    clock: Cell<i64>,
}

impl TestRepo {
    /// Create an empty repository (no commits).
    pub fn empty() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/master"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);
        run_git(dir.path(), &["config", "tag.gpgsign", "false"]);
        Self {
            dir,
            clock: Cell::new(1_700_000_000),
        }
    }

    /// Create a repository with one root commit on master.
    pub fn new() -> Self {
        let repo = Self::empty();
        repo.commit_file("README", "# Test Repo\n", "Initial commit");
        repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn git_dir(&self) -> PathBuf {
        self.dir.path().join(".git")
    }

    pub fn git(&self) -> Git {
        Git::open(self.path()).expect("failed to open test repo")
    }

    /// Write a file, commit it, and return the new HEAD.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        std::fs::write(self.path().join(path), content).unwrap();
        self.git_cmd(&["add", path]);
        self.commit(message);
        self.rev("HEAD")
    }

    /// Record the index as a commit with the next timestamp.
    pub fn commit(&self, message: &str) {
        let when = self.clock.get();
        self.clock.set(when + 60);
        let date = format!("@{when} +0000");
        let output = git_command(self.path())
            .args(["commit", "-q", "--allow-empty", "-m", message])
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .output()
            .expect("failed to run git commit");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
    }

    /// Remove a file, commit, and return the new HEAD.
    pub fn remove_file(&self, path: &str, message: &str) -> Oid {
        self.git_cmd(&["rm", "-q", path]);
        self.commit(message);
        self.rev("HEAD")
    }

    pub fn git_cmd(&self, args: &[&str]) {
        run_git(self.path(), args);
    }

    /// Full id of a revision, as the git CLI sees it.
    pub fn rev(&self, rev: &str) -> Oid {
        let output = git_command(self.path())
            .args(["rev-parse", rev])
            .output()
            .expect("git rev-parse failed");
        assert!(output.status.success(), "rev-parse {rev} failed");
        Oid::new(String::from_utf8(output.stdout).unwrap().trim()).unwrap()
    }
}

fn git_command(dir: &Path) -> Command {
    let mut cmd = Command::new("git");
    cmd.current_dir(dir).env("GIT_CONFIG_NOSYSTEM", "1");
    cmd
}

/// Run a git command in the given directory, panicking on failure.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = git_command(dir)
        .args(args)
        .output()
        .expect("failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}
