//! Domain logic - pure release rules independent of the wrapped tools

pub mod branch;
pub mod notes;
pub mod prerelease;
pub mod release;
pub mod signature;
pub mod tag;
pub mod version;

pub use branch::{RepositoryState, RepositoryStateViolation};
pub use notes::{release_page_url, ReleaseNotes};
pub use prerelease::PreRelease;
pub use release::ReleaseRequest;
pub use signature::{CommitSignature, SignatureStatus};
pub use tag::{release_pair, release_tags, ReleasePair, TagPattern};
pub use version::{parse_version, BumpPlan, ReleaseType};
