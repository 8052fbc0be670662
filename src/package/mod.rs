//! Package manager abstraction: registry identity, install, build, test, publish.
//!
//! Each step is an opaque pass/fail signal; failures carry the wrapped tool's
//! exit code as a [ToolFailure] and the release run decides what kind of
//! error it is.

pub mod cli;
pub mod mock;

pub use cli::CliPackageManager;
pub use mock::{MockPackageManager, PackageStep};

use crate::process::ToolFailure;

/// Options for the final registry publish
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishOptions {
    /// Registry access level, always "public" for this package
    pub access: String,
    /// Distribution channel; `None` publishes to the default channel
    pub dist_tag: Option<String>,
}

impl PublishOptions {
    pub fn public(dist_tag: Option<String>) -> Self {
        PublishOptions {
            access: "public".to_string(),
            dist_tag,
        }
    }
}

/// The package tooling a release run drives.
///
/// The real implementation shells out to yarn and npm; tests use
/// [MockPackageManager].
pub trait PackageManager {
    /// The logged-in user on `registry`, or `None` when not authenticated.
    fn whoami(&self, registry: &str) -> Option<String>;

    /// Install exactly what the lockfile pins; fails when it disagrees with the manifest.
    fn install_frozen(&self) -> Result<(), ToolFailure>;

    /// Run the package's build script.
    ///
    /// # Returns
    /// * `Ok(())` - The build succeeded
    /// * `Err(ToolFailure)` - The build command failed; carries its exit code and stderr
    fn build(&self) -> Result<(), ToolFailure>;

    /// Run the package's test script.
    ///
    /// # Returns
    /// * `Ok(())` - All tests passed
    /// * `Err(ToolFailure)` - The test command failed; carries its exit code and stderr
    fn test(&self) -> Result<(), ToolFailure>;

    /// Publish non-interactively.
    ///
    /// # Arguments
    /// * `options` - Access level and optional distribution tag
    fn publish(&self, options: &PublishOptions) -> Result<(), ToolFailure>;
}
