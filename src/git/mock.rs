use crate::domain::{CommitSignature, RepositoryState, SignatureStatus};
use crate::error::{PublishError, Result};
use crate::git::VersionControl;
use crate::process::ToolFailure;
use std::cell::RefCell;
use std::collections::HashMap;
use std::path::Path;
use std::rc::Rc;

const HEAD_HASH: &str = "4b825dc642cb6eb9a060e54bf8d69288fbee4904";

struct MockState {
    config: HashMap<String, String>,
    state: RepositoryState,
    tags: Vec<String>,
    subjects: HashMap<(String, String), Vec<String>>,
    signature: SignatureStatus,
    remote_url: Option<String>,
    fetch_error: Option<String>,
    push_failure: Option<ToolFailure>,
    calls: Vec<String>,
}

/// Mock repository for testing without actual git operations.
///
/// Clones share state, so a test can hand one clone to the release run and
/// inspect the recorded calls through another.
#[derive(Clone)]
pub struct MockRepository {
    inner: Rc<RefCell<MockState>>,
}

impl MockRepository {
    /// A clean, up-to-date `master` checkout with nothing configured
    pub fn new() -> Self {
        MockRepository {
            inner: Rc::new(RefCell::new(MockState {
                config: HashMap::new(),
                state: RepositoryState::new("master", true, true),
                tags: Vec::new(),
                subjects: HashMap::new(),
                signature: SignatureStatus::Good,
                remote_url: None,
                fetch_error: None,
                push_failure: None,
                calls: Vec::new(),
            })),
        }
    }

    pub fn with_config(self, key: &str, value: &str) -> Self {
        self.inner
            .borrow_mut()
            .config
            .insert(key.to_string(), value.to_string());
        self
    }

    /// Configure ssh commit signing with the key at `key_path`.
    pub fn with_signing(self, key_path: &str) -> Self {
        self.with_config("gpg.format", "ssh")
            .with_config("user.signingkey", key_path)
            .with_config("commit.gpgsign", "true")
    }

    pub fn with_state(self, state: RepositoryState) -> Self {
        self.inner.borrow_mut().state = state;
        self
    }

    pub fn with_tags(self, tags: &[&str]) -> Self {
        self.inner
            .borrow_mut()
            .tags
            .extend(tags.iter().map(|t| t.to_string()));
        self
    }

    pub fn with_subjects(self, from_tag: &str, to_tag: &str, subjects: &[&str]) -> Self {
        self.inner.borrow_mut().subjects.insert(
            (from_tag.to_string(), to_tag.to_string()),
            subjects.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn with_signature(self, status: SignatureStatus) -> Self {
        self.inner.borrow_mut().signature = status;
        self
    }

    pub fn with_remote_url(self, url: &str) -> Self {
        self.inner.borrow_mut().remote_url = Some(url.to_string());
        self
    }

    pub fn failing_fetch(self, reason: &str) -> Self {
        self.inner.borrow_mut().fetch_error = Some(reason.to_string());
        self
    }

    pub fn failing_push(self, code: i32) -> Self {
        self.inner.borrow_mut().push_failure = Some(ToolFailure::new(
            "git push --follow-tags origin",
            Some(code),
            "rejected",
        ));
        self
    }

    /// Every mutating or network call, in order (e.g. "fetch origin").
    pub fn calls(&self) -> Vec<String> {
        self.inner.borrow().calls.clone()
    }

    pub fn tags(&self) -> Vec<String> {
        self.inner.borrow().tags.clone()
    }

    pub fn head_hash() -> &'static str {
        HEAD_HASH
    }

    fn record(&self, call: String) {
        self.inner.borrow_mut().calls.push(call);
    }
}

impl Default for MockRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl VersionControl for MockRepository {
    fn config_value(&self, key: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().config.get(key).cloned())
    }

    fn fetch(&self, remote: &str) -> Result<()> {
        self.record(format!("fetch {}", remote));
        match self.inner.borrow().fetch_error.clone() {
            Some(reason) => Err(PublishError::remote(reason)),
            None => Ok(()),
        }
    }

    fn repository_state(&self, _remote: &str) -> Result<RepositoryState> {
        Ok(self.inner.borrow().state.clone())
    }

    fn commit_signed(&self, message: &str, paths: &[&Path]) -> Result<()> {
        let files: Vec<String> = paths.iter().map(|p| p.display().to_string()).collect();
        self.record(format!("commit {} [{}]", message, files.join(", ")));
        Ok(())
    }

    fn tag_signed(&self, tag: &str, _message: &str) -> Result<()> {
        self.record(format!("tag {}", tag));
        self.inner.borrow_mut().tags.push(tag.to_string());
        Ok(())
    }

    fn head_signature(&self) -> Result<CommitSignature> {
        Ok(CommitSignature {
            commit: HEAD_HASH.to_string(),
            status: self.inner.borrow().signature,
        })
    }

    fn push_with_tags(&self, remote: &str) -> std::result::Result<(), ToolFailure> {
        self.record(format!("push {}", remote));
        match self.inner.borrow().push_failure.clone() {
            Some(failure) => Err(failure),
            None => Ok(()),
        }
    }

    fn list_tags(&self) -> Result<Vec<String>> {
        Ok(self.inner.borrow().tags.clone())
    }

    fn commit_subjects(&self, from_tag: &str, to_tag: &str) -> Result<Vec<String>> {
        Ok(self
            .inner
            .borrow()
            .subjects
            .get(&(from_tag.to_string(), to_tag.to_string()))
            .cloned()
            .unwrap_or_default())
    }

    fn remote_url(&self, _remote: &str) -> Result<Option<String>> {
        Ok(self.inner.borrow().remote_url.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_repository_default_state() {
        let repo = MockRepository::default();
        let state = repo.repository_state("origin").unwrap();
        assert_eq!(state, RepositoryState::new("master", true, true));
        assert!(repo.list_tags().unwrap().is_empty());
    }

    #[test]
    fn test_mock_repository_signing_config() {
        let repo = MockRepository::new().with_signing("/keys/id_ed25519.pub");
        assert_eq!(repo.config_value("gpg.format").unwrap().as_deref(), Some("ssh"));
        assert_eq!(repo.config_value("commit.gpgsign").unwrap().as_deref(), Some("true"));
        assert_eq!(repo.config_value("user.name").unwrap(), None);
    }

    #[test]
    fn test_mock_repository_clones_share_state() {
        let repo = MockRepository::new().with_tags(&["v1.0.0"]);
        let handle = repo.clone();

        repo.tag_signed("v1.0.1", "v1.0.1").unwrap();
        repo.push_with_tags("origin").unwrap();

        assert_eq!(handle.tags(), vec!["v1.0.0".to_string(), "v1.0.1".to_string()]);
        assert_eq!(handle.calls(), vec!["tag v1.0.1", "push origin"]);
    }

    #[test]
    fn test_mock_repository_failing_push() {
        let repo = MockRepository::new().failing_push(128);
        assert_eq!(repo.push_with_tags("origin").unwrap_err().code, Some(128));
    }
}
