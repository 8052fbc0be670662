use crate::domain::{CommitSignature, RepositoryState};
use crate::error::{PublishError, Result};
use crate::process::{self, ToolFailure};
use git2::{Oid, Repository as Git2Repo, Sort, StatusOptions};
use std::path::{Path, PathBuf};

/// git2-backed repository with the `git` CLI for writes and network access
pub struct Git2Repository {
    repo: Git2Repo,
    /// Where `git` commands run; paths handed to them are relative to it
    cwd: PathBuf,
}

impl Git2Repository {
    /// Open or discover a git repository
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let cwd = path.as_ref().to_path_buf();
        let repo = Git2Repo::discover(&cwd)?;
        if repo.is_bare() {
            return Err(PublishError::remote("Cannot release from a bare repository"));
        }

        Ok(Git2Repository { repo, cwd })
    }

    fn git(&self, args: &[&str]) -> std::result::Result<String, ToolFailure> {
        process::capture("git", args, Some(&self.cwd))
    }

    fn tag_commit(&self, tag: &str) -> Result<git2::Commit<'_>> {
        let object = self
            .repo
            .revparse_single(&format!("refs/tags/{}", tag))
            .map_err(|e| PublishError::remote(format!("Cannot find tag '{}': {}", tag, e)))?;
        Ok(object.peel_to_commit()?)
    }

    fn is_clean(&self) -> Result<bool> {
        let mut options = StatusOptions::new();
        options
            .include_untracked(true)
            .recurse_untracked_dirs(true)
            .include_ignored(false)
            .exclude_submodules(true);
        let statuses = self.repo.statuses(Some(&mut options))?;
        Ok(statuses.is_empty())
    }

    fn remote_head(&self, remote: &str, branch: &str) -> Option<Oid> {
        self.repo
            .find_reference(&format!("refs/remotes/{}/{}", remote, branch))
            .ok()
            .and_then(|reference| reference.target())
    }
}

impl super::VersionControl for Git2Repository {
    fn config_value(&self, key: &str) -> Result<Option<String>> {
        let config = self.repo.config()?.snapshot()?;
        match config.get_string(key) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.git(&["fetch", remote])
            .map_err(|e| PublishError::remote(format!("Fetch failed: {}", e)))?;
        Ok(())
    }

    fn repository_state(&self, remote: &str) -> Result<RepositoryState> {
        let head = self.repo.head()?;
        let branch = if head.is_branch() {
            head.shorthand().unwrap_or("HEAD").to_string()
        } else {
            "HEAD".to_string()
        };

        let is_up_to_date = match (head.target(), self.remote_head(remote, &branch)) {
            (Some(local), Some(upstream)) => local == upstream,
            _ => false,
        };

        Ok(RepositoryState::new(branch, is_up_to_date, self.is_clean()?))
    }

    fn commit_signed(&self, message: &str, paths: &[&Path]) -> Result<()> {
        let mut add: Vec<&str> = vec!["add", "--"];
        let path_strs: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        add.extend(path_strs.iter().map(String::as_str));
        self.git(&add)
            .map_err(|e| PublishError::remote(format!("Cannot stage release files: {}", e)))?;

        self.git(&["commit", "-S", "-m", message])
            .map_err(|e| PublishError::remote(format!("Cannot create release commit: {}", e)))?;
        Ok(())
    }

    fn tag_signed(&self, tag: &str, message: &str) -> Result<()> {
        self.git(&["tag", "-s", "-a", tag, "-m", message])
            .map_err(|e| PublishError::remote(format!("Cannot create tag '{}': {}", tag, e)))?;
        Ok(())
    }

    fn head_signature(&self) -> Result<CommitSignature> {
        let output = self
            .git(&["log", "-1", "--format=%H %G?"])
            .map_err(|e| PublishError::remote(format!("Cannot read commit signature: {}", e)))?;
        CommitSignature::parse(&output)
    }

    fn push_with_tags(&self, remote: &str) -> std::result::Result<(), ToolFailure> {
        process::stream("git", &["push", "--follow-tags", remote], Some(&self.cwd))
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        let tags = self.repo.tag_names(None)?;
        Ok(tags.iter().flatten().map(|s| s.to_string()).collect())
    }

    fn commit_subjects(&self, from_tag: &str, to_tag: &str) -> Result<Vec<String>> {
        let from = self.tag_commit(from_tag)?;
        let to = self.tag_commit(to_tag)?;

        // The range ends at the parent of the tagged (version bump) commit.
        let end = match to.parent_id(0) {
            Ok(parent) => parent,
            Err(_) => return Ok(Vec::new()),
        };

        let mut revwalk = self.repo.revwalk()?;
        revwalk.set_sorting(Sort::TOPOLOGICAL | Sort::TIME)?;
        revwalk.push(end)?;
        revwalk.hide(from.id())?;

        let mut subjects = Vec::new();
        for oid in revwalk {
            let commit = self.repo.find_commit(oid?)?;
            subjects.push(commit.summary().unwrap_or("(empty message)").to_string());
        }
        Ok(subjects)
    }

    fn remote_url(&self, remote: &str) -> Result<Option<String>> {
        match self.repo.find_remote(remote) {
            Ok(found) => Ok(found.url().map(str::to_string)),
            Err(e) if e.code() == git2::ErrorCode::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
