use std::fmt;

/// Advisory conditions that degrade a run without failing it.
/// These are reported to the operator and the run continues.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvisoryWarning {
    /// The release-hosting CLI is not on PATH; the release must be drafted by hand
    ReleaseCliMissing { program: String },
    /// Release notes need exactly two release tags
    TagCountMismatch { found: usize },
    /// The hosting CLI was present but creating the draft failed
    ReleaseDraftFailed { tag: String, reason: String },
}

impl fmt::Display for AdvisoryWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdvisoryWarning::ReleaseCliMissing { program } => {
                write!(
                    f,
                    "'{}' is not installed; the hosted release will have to be created manually",
                    program
                )
            }
            AdvisoryWarning::TagCountMismatch { found } => {
                write!(
                    f,
                    "Expected exactly two release tags to build release notes from, found {}",
                    found
                )
            }
            AdvisoryWarning::ReleaseDraftFailed { tag, reason } => {
                write!(f, "Could not draft release for '{}': {}", tag, reason)
            }
        }
    }
}
