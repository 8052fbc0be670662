//! Release hosting (e.g. GitHub releases): draft creation for a pushed tag.

pub mod gh;
pub mod mock;

pub use gh::GhCli;
pub use mock::MockReleaseHost;

use crate::domain::ReleaseNotes;
use crate::process::ToolFailure;

/// Where release drafts are created once a tag is pushed.
///
/// Drafting is advisory: callers turn every failure into a manual reminder.
pub trait ReleaseHost {
    /// Name of the CLI used to talk to the host, for messages.
    fn program(&self) -> &str;

    /// Whether the hosting CLI can be invoked at all.
    fn is_available(&self) -> bool;

    /// Create a draft release for `notes.tag`.
    ///
    /// # Arguments
    /// * `notes` - Tag, title and body of the draft
    ///
    /// # Returns
    /// * `Ok(String)` - The draft's URL
    /// * `Err(ToolFailure)` - The hosting CLI rejected the draft
    fn create_draft(&self, notes: &ReleaseNotes) -> Result<String, ToolFailure>;
}
