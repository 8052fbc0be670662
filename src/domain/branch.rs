use thiserror::Error;

/// Working copy facts read once per run, after fetching the remote
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryState {
    pub branch: String,
    pub is_up_to_date_with_remote: bool,
    pub is_clean: bool,
}

/// The first reason a repository may not be released from
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryStateViolation {
    #[error("Must be on the {expected} branch to publish (currently on '{actual}')")]
    WrongBranch { expected: String, actual: String },

    #[error("Must be up to date with {remote}/{branch} to publish")]
    StaleBranch { remote: String, branch: String },

    #[error("Cannot publish with a dirty working tree")]
    DirtyTree,
}

impl RepositoryState {
    pub fn new(branch: impl Into<String>, is_up_to_date_with_remote: bool, is_clean: bool) -> Self {
        RepositoryState {
            branch: branch.into(),
            is_up_to_date_with_remote,
            is_clean,
        }
    }

    /// Check branch, freshness and cleanliness, in that order.
    pub fn verify(
        &self,
        release_branch: &str,
        remote: &str,
    ) -> std::result::Result<(), RepositoryStateViolation> {
        if self.branch != release_branch {
            return Err(RepositoryStateViolation::WrongBranch {
                expected: release_branch.to_string(),
                actual: self.branch.clone(),
            });
        }
        if !self.is_up_to_date_with_remote {
            return Err(RepositoryStateViolation::StaleBranch {
                remote: remote.to_string(),
                branch: release_branch.to_string(),
            });
        }
        if !self.is_clean {
            return Err(RepositoryStateViolation::DirtyTree);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_ready() {
        let state = RepositoryState::new("master", true, true);
        assert!(state.verify("master", "origin").is_ok());
    }

    #[test]
    fn test_wrong_branch_reported_first() {
        let state = RepositoryState::new("develop", false, false);
        let err = state.verify("master", "origin").unwrap_err();
        assert_eq!(
            err,
            RepositoryStateViolation::WrongBranch {
                expected: "master".into(),
                actual: "develop".into()
            }
        );
        assert!(err.to_string().contains("master"));
    }

    #[test]
    fn test_stale_branch() {
        let state = RepositoryState::new("master", false, true);
        let err = state.verify("master", "origin").unwrap_err();
        assert_eq!(err.to_string(), "Must be up to date with origin/master to publish");
    }

    #[test]
    fn test_dirty_tree() {
        let state = RepositoryState::new("main", true, false);
        assert_eq!(
            state.verify("main", "origin").unwrap_err(),
            RepositoryStateViolation::DirtyTree
        );
    }
}
