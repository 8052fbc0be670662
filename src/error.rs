use thiserror::Error;

use crate::domain::{RepositoryStateViolation, SignatureStatus};
use crate::prerequisites::PrerequisiteCheck;
use crate::process::ToolFailure;

/// Unified error type for pkg-publish operations
#[derive(Error, Debug)]
pub enum PublishError {
    #[error("{0}")]
    Usage(String),

    #[error("{remediation}")]
    Prerequisite {
        check: PrerequisiteCheck,
        remediation: String,
    },

    #[error("{0}")]
    RepositoryState(#[from] RepositoryStateViolation),

    #[error("Installing dependencies from the lockfile failed (does it match package.json?): {0}")]
    DependencyIntegrity(ToolFailure),

    #[error("Build failed: {0}")]
    Build(ToolFailure),

    #[error("Tests failed: {0}")]
    Test(ToolFailure),

    #[error("Commit {commit} is not signed ({status})")]
    Signature {
        commit: String,
        status: SignatureStatus,
    },

    #[error("Push failed: {0}")]
    Push(ToolFailure),

    #[error("Publish failed: {0}")]
    Publish(ToolFailure),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Version error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Remote operation failed: {0}")]
    Remote(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for Results in pkg-publish
pub type Result<T> = std::result::Result<T, PublishError>;

impl PublishError {
    pub fn usage(msg: impl Into<String>) -> Self {
        PublishError::Usage(msg.into())
    }

    pub fn config(msg: impl Into<String>) -> Self {
        PublishError::Config(msg.into())
    }

    pub fn version(msg: impl Into<String>) -> Self {
        PublishError::Version(msg.into())
    }

    pub fn manifest(msg: impl Into<String>) -> Self {
        PublishError::Manifest(msg.into())
    }

    pub fn remote(msg: impl Into<String>) -> Self {
        PublishError::Remote(msg.into())
    }

    /// Process exit status for this failure.
    ///
    /// Wrapped tool failures keep the tool's own code; everything else is 1.
    pub fn exit_code(&self) -> i32 {
        match self {
            PublishError::DependencyIntegrity(failure)
            | PublishError::Build(failure)
            | PublishError::Test(failure)
            | PublishError::Push(failure)
            | PublishError::Publish(failure) => failure.exit_code(),
            _ => 1,
        }
    }
}
