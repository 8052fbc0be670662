//! Version-control abstraction layer
//!
//! The release run talks to git only through the [VersionControl] trait so
//! that every step can be exercised against [mock::MockRepository]. The real
//! implementation, [repository::Git2Repository], reads repository state with
//! `git2` and shells out to `git` for the operations that need the
//! operator's credentials or signing program (fetch, commit, tag, push).

pub mod mock;
pub mod repository;

pub use mock::MockRepository;
pub use repository::Git2Repository;

use crate::domain::{CommitSignature, RepositoryState};
use crate::error::Result;
use crate::process::ToolFailure;
use std::path::Path;

/// Git operations needed by a release run
pub trait VersionControl {
    /// Read a configuration value (e.g. `gpg.format`); `None` when unset.
    fn config_value(&self, key: &str) -> Result<Option<String>>;

    /// Fetch refs from `remote` without touching the working copy.
    fn fetch(&self, remote: &str) -> Result<()>;

    /// Current branch, freshness against `remote` and cleanliness.
    fn repository_state(&self, remote: &str) -> Result<RepositoryState>;

    /// Stage `paths` and create a signed commit with `message`.
    fn commit_signed(&self, message: &str, paths: &[&Path]) -> Result<()>;

    /// Create an annotated, signed tag at HEAD.
    fn tag_signed(&self, tag: &str, message: &str) -> Result<()>;

    /// HEAD's hash and signature status.
    fn head_signature(&self) -> Result<CommitSignature>;

    /// Push the current branch and the tags that point into it.
    fn push_with_tags(&self, remote: &str) -> std::result::Result<(), ToolFailure>;

    /// All tag names in the repository.
    fn list_tags(&self) -> Result<Vec<String>>;

    /// Subjects of the commits in `from_tag..to_tag^`, newest first.
    fn commit_subjects(&self, from_tag: &str, to_tag: &str) -> Result<Vec<String>>;

    /// URL configured for `remote`, if any.
    fn remote_url(&self, remote: &str) -> Result<Option<String>>;
}
