//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all Git operations in
//! refmail. Every repository read flows through [`Git`], which returns
//! structured results and normalizes errors into typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: Not inside a Git repository
//! - [`GitError::RevNotFound`]: A revision or ref does not resolve
//! - [`GitError::ObjectNotFound`]: An object id is not in the object database
//! - [`GitError::Internal`]: Anything else libgit2 reports
//!
//! # Example
//!
//! ```ignore
//! use refmail::git::Git;
//! use std::path::Path;
//!
//! let git = Git::open(Path::new("/srv/git/gtk.git"))?;
//! let oid = git.resolve_rev("refs/heads/master")?;
//! ```

use std::path::{Path, PathBuf};

use chrono::{DateTime, FixedOffset, Offset, Utc};
use thiserror::Error;

use crate::core::types::{Oid, RefName, TypeError};

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// Not inside a Git repository.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// A revision expression or ref did not resolve.
    #[error("unknown revision: {rev}")]
    RevNotFound {
        /// The revision that was not found
        rev: String,
    },

    /// Object not found in repository.
    #[error("object not found: {oid}")]
    ObjectNotFound {
        /// The OID that was not found
        oid: String,
    },

    /// Object exists but is not of the expected kind.
    #[error("{oid} is not a {expected}")]
    WrongObjectKind {
        /// The offending object
        oid: String,
        /// The kind the caller asked for
        expected: &'static str,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Invalid ref name format.
    #[error("invalid ref name: {message}")]
    InvalidRefName {
        /// Description of the problem
        message: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with richer context.
    fn from_git2(err: git2::Error, context: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RevNotFound {
                rev: context.to_string(),
            },
            git2::ErrorCode::InvalidSpec | git2::ErrorCode::Ambiguous => GitError::InvalidOid {
                oid: context.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", context, err.message()),
            },
        }
    }

    fn internal(err: git2::Error) -> Self {
        GitError::Internal {
            message: err.message().to_string(),
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidRefName(msg) => GitError::InvalidRefName { message: msg },
        }
    }
}

/// The kind of object a ref points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Commit,
    Tag,
    Tree,
    Blob,
    Other,
}

impl ObjectKind {
    /// The name `git cat-file -t` would print.
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectKind::Commit => "commit",
            ObjectKind::Tag => "tag",
            ObjectKind::Tree => "tree",
            ObjectKind::Blob => "blob",
            ObjectKind::Other => "unknown",
        }
    }
}

impl std::fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Option<git2::ObjectType>> for ObjectKind {
    fn from(kind: Option<git2::ObjectType>) -> Self {
        match kind {
            Some(git2::ObjectType::Commit) => ObjectKind::Commit,
            Some(git2::ObjectType::Tag) => ObjectKind::Tag,
            Some(git2::ObjectType::Tree) => ObjectKind::Tree,
            Some(git2::ObjectType::Blob) => ObjectKind::Blob,
            _ => ObjectKind::Other,
        }
    }
}

/// Information about a commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitInfo {
    /// The commit OID
    pub oid: Oid,
    /// First line of the commit message
    pub summary: String,
    /// Full commit message
    pub message: String,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Author timestamp, in the author's own offset
    pub author_time: DateTime<FixedOffset>,
    /// Parent commits, first parent first
    pub parents: Vec<Oid>,
}

impl CommitInfo {
    /// A commit with more than one parent.
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Diff of a commit against its first parent, pre-rendered as text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitDiff {
    /// `--stat` style summary of every changed file
    pub stat: String,
    /// Unified patch, restricted to [`Git::PATCH_STATUSES`]
    pub patch: String,
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. No other module
/// imports `git2`. Bare repositories are the normal case here, since the
/// hook runs on the server side.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    /// Delta statuses whose content goes into a per-commit patch.
    ///
    /// Deletions are only reported in the stat, never in the patch body.
    pub const PATCH_STATUSES: [git2::Delta; 6] = [
        git2::Delta::Added,
        git2::Delta::Copied,
        git2::Delta::Modified,
        git2::Delta::Renamed,
        git2::Delta::Typechange,
        git2::Delta::Conflicted,
    ];

    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Open the repository containing `path`.
    ///
    /// `path` may be a bare repository, a `.git` directory, or any
    /// directory inside a working tree.
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn open(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Open the repository the way Git hooks expect: honor `$GIT_DIR`,
    /// otherwise discover from the current directory.
    pub fn open_from_env() -> Result<Self, GitError> {
        let repo = git2::Repository::open_from_env().map_err(|_| GitError::NotARepo {
            path: std::env::var_os("GIT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
        })?;
        Ok(Self { repo })
    }

    /// Get direct access to the .git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Short project name derived from the repository location.
    ///
    /// `/srv/git/gtk+.git` gives `gtk+`; a working tree at `/src/glib`
    /// (with its `.git` inside) gives `glib`.
    pub fn project_name(&self) -> String {
        let dir = match self.repo.workdir() {
            Some(work) => work,
            None => self.repo.path(),
        };
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        match name.strip_suffix(".git") {
            Some(stripped) if !stripped.is_empty() => stripped.to_string(),
            _ => name,
        }
    }

    /// Read a string from the repository's Git configuration.
    ///
    /// Returns `None` when the key is unset.
    pub fn config_string(&self, key: &str) -> Result<Option<String>, GitError> {
        let config = self.repo.config().map_err(GitError::internal)?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(GitError::from_git2(e, key)),
        }
    }

    // =========================================================================
    // Revision Resolution
    // =========================================================================

    /// Canonicalize a revision expression to a full object id.
    ///
    /// The all-zero sentinel maps to `None` without touching the repository.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevNotFound`] if the expression does not resolve
    pub fn resolve_rev(&self, rev: &str) -> Result<Option<Oid>, GitError> {
        if Oid::is_null_rev(rev) {
            return Ok(None);
        }
        let object = self
            .repo
            .revparse_single(rev)
            .map_err(|e| GitError::from_git2(e, rev))?;
        Ok(Some(Oid::new(object.id().to_string())?))
    }

    /// Report the kind of object `oid` names.
    pub fn object_kind(&self, oid: &Oid) -> Result<ObjectKind, GitError> {
        let object = self
            .repo
            .find_object(to_git2(oid)?, None)
            .map_err(|e| object_error(e, oid))?;
        Ok(ObjectKind::from(object.kind()))
    }

    /// Peel a tag (or commit) to the commit it ultimately names.
    pub fn peel_to_commit(&self, oid: &Oid) -> Result<Oid, GitError> {
        let object = self
            .repo
            .find_object(to_git2(oid)?, None)
            .map_err(|e| object_error(e, oid))?;
        let commit = object.peel_to_commit().map_err(|_| GitError::WrongObjectKind {
            oid: oid.to_string(),
            expected: "commit",
        })?;
        Ok(Oid::new(commit.id().to_string())?)
    }

    // =========================================================================
    // Ref Enumeration
    // =========================================================================

    /// List every local branch with its current tip.
    ///
    /// Symbolic branch refs are followed; refs that do not end at an object
    /// are skipped.
    pub fn branch_refs(&self) -> Result<Vec<(RefName, Oid)>, GitError> {
        let refs = self
            .repo
            .references_glob("refs/heads/*")
            .map_err(GitError::internal)?;

        let mut entries = Vec::new();
        for reference in refs {
            let reference = reference.map_err(GitError::internal)?;

            let name = match reference.name() {
                Some(n) => n.to_string(),
                None => continue, // Skip refs with non-UTF8 names
            };
            let ref_name = match RefName::new(name) {
                Ok(r) => r,
                Err(_) => continue,
            };

            let resolved = match reference.resolve() {
                Ok(r) => r,
                Err(_) => continue,
            };
            let target = match resolved.target() {
                Some(oid) => oid,
                None => continue,
            };

            entries.push((ref_name, Oid::new(target.to_string())?));
        }

        entries.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(entries)
    }

    // =========================================================================
    // Ancestry Queries
    // =========================================================================

    /// Commits reachable from `include` but from none of `exclude`.
    ///
    /// Newest first, by commit time, like `git rev-list`.
    pub fn rev_list(&self, include: &Oid, exclude: &[Oid]) -> Result<Vec<Oid>, GitError> {
        let mut revwalk = self.repo.revwalk().map_err(GitError::internal)?;
        revwalk
            .set_sorting(git2::Sort::TIME)
            .map_err(GitError::internal)?;

        revwalk
            .push(to_git2(include)?)
            .map_err(|e| object_error(e, include))?;
        for hidden in exclude {
            revwalk
                .hide(to_git2(hidden)?)
                .map_err(|e| object_error(e, hidden))?;
        }

        let mut commits = Vec::new();
        for oid in revwalk {
            let oid = oid.map_err(GitError::internal)?;
            commits.push(Oid::new(oid.to_string())?);
        }
        Ok(commits)
    }

    /// First parent of a commit, or `None` for a root commit.
    pub fn first_parent(&self, oid: &Oid) -> Result<Option<Oid>, GitError> {
        let commit = self.find_commit(oid)?;
        let parent = commit.parent_ids().next();
        match parent {
            Some(p) => Ok(Some(Oid::new(p.to_string())?)),
            None => Ok(None),
        }
    }

    /// Nearest annotated tag reachable from the first parent of the commit
    /// `oid` peels to.
    ///
    /// Returns the tag name and the commit it points at, or `None` when
    /// there is no parent or no such tag.
    pub fn previous_tag(&self, oid: &Oid) -> Result<Option<(String, Oid)>, GitError> {
        let commit = self.peel_to_commit(oid)?;
        let parent = match self.first_parent(&commit)? {
            Some(p) => p,
            None => return Ok(None),
        };

        let parent_commit = self.find_commit(&parent)?;
        let describe = match parent_commit
            .as_object()
            .describe(&git2::DescribeOptions::new())
        {
            Ok(d) => d,
            Err(e) => {
                tracing::debug!(commit = %parent, error = %e.message(), "no previous tag");
                return Ok(None);
            }
        };
        let mut format = git2::DescribeFormatOptions::new();
        format.abbreviated_size(0);
        let name = describe
            .format(Some(&format))
            .map_err(GitError::internal)?;

        let tagged = self
            .repo
            .revparse_single(&format!("refs/tags/{name}"))
            .and_then(|object| object.peel_to_commit())
            .map_err(|e| GitError::from_git2(e, &name))?;

        Ok(Some((name, Oid::new(tagged.id().to_string())?)))
    }

    // =========================================================================
    // Object Contents
    // =========================================================================

    /// Get information about a commit.
    ///
    /// # Errors
    ///
    /// - [`GitError::ObjectNotFound`] if the commit doesn't exist
    pub fn commit_info(&self, oid: &Oid) -> Result<CommitInfo, GitError> {
        let commit = self.find_commit(oid)?;

        let author = commit.author();
        let when = author.when();
        let offset =
            FixedOffset::east_opt(when.offset_minutes() * 60).unwrap_or_else(|| Utc.fix());
        let author_time = DateTime::from_timestamp(when.seconds(), 0)
            .unwrap_or(DateTime::UNIX_EPOCH)
            .with_timezone(&offset);

        let mut parents = Vec::new();
        for parent in commit.parent_ids() {
            parents.push(Oid::new(parent.to_string())?);
        }

        Ok(CommitInfo {
            oid: oid.clone(),
            summary: commit.summary().unwrap_or("").to_string(),
            message: commit.message().unwrap_or("").to_string(),
            author_name: author.name().unwrap_or("").to_string(),
            author_email: author.email().unwrap_or("").to_string(),
            author_time,
            parents,
        })
    }

    /// Raw payload of a tag object, as `git cat-file -p` shows it.
    pub fn tag_payload(&self, oid: &Oid) -> Result<String, GitError> {
        let odb = self.repo.odb().map_err(GitError::internal)?;
        let object = odb.read(to_git2(oid)?).map_err(|e| object_error(e, oid))?;
        if object.kind() != git2::ObjectType::Tag {
            return Err(GitError::WrongObjectKind {
                oid: oid.to_string(),
                expected: "tag",
            });
        }
        Ok(String::from_utf8_lossy(object.data()).into_owned())
    }

    /// Stat and filtered patch of a commit against its first parent.
    ///
    /// Root commits are diffed against the empty tree. Renames are detected.
    pub fn commit_diff(&self, oid: &Oid) -> Result<CommitDiff, GitError> {
        let commit = self.find_commit(oid)?;
        let tree = commit.tree().map_err(GitError::internal)?;
        let parent_tree = match commit.parents().next() {
            Some(parent) => Some(parent.tree().map_err(GitError::internal)?),
            None => None,
        };

        let mut diff = self
            .repo
            .diff_tree_to_tree(parent_tree.as_ref(), Some(&tree), None)
            .map_err(GitError::internal)?;
        diff.find_similar(Some(git2::DiffFindOptions::new().renames(true)))
            .map_err(GitError::internal)?;

        let stats = diff.stats().map_err(GitError::internal)?;
        let stat = stats
            .to_buf(git2::DiffStatsFormat::FULL, 72)
            .map_err(GitError::internal)?
            .as_str()
            .unwrap_or("")
            .to_string();

        let mut patch = String::new();
        diff.print(git2::DiffFormat::Patch, |delta, _hunk, line| {
            if !Self::PATCH_STATUSES.contains(&delta.status()) {
                return true;
            }
            if matches!(line.origin(), '+' | '-' | ' ') {
                patch.push(line.origin());
            }
            patch.push_str(&String::from_utf8_lossy(line.content()));
            true
        })
        .map_err(GitError::internal)?;

        Ok(CommitDiff { stat, patch })
    }

    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        self.repo.find_commit(to_git2(oid)?).map_err(|e| match e.code() {
            git2::ErrorCode::NotFound => GitError::ObjectNotFound {
                oid: oid.to_string(),
            },
            _ => GitError::WrongObjectKind {
                oid: oid.to_string(),
                expected: "commit",
            },
        })
    }
}

fn to_git2(oid: &Oid) -> Result<git2::Oid, GitError> {
    git2::Oid::from_str(oid.as_str()).map_err(|_| GitError::InvalidOid {
        oid: oid.to_string(),
    })
}

fn object_error(err: git2::Error, oid: &Oid) -> GitError {
    match err.code() {
        git2::ErrorCode::NotFound => GitError::ObjectNotFound {
            oid: oid.to_string(),
        },
        _ => GitError::Internal {
            message: format!("{}: {}", oid, err.message()),
        },
    }
}
