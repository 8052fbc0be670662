use crate::domain::version::ReleaseType;
use crate::error::{PublishError, Result};

/// What the operator asked for on one run.
///
/// Built once from the positional argument and the environment-derived
/// prerelease flag; immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReleaseRequest {
    release_type: Option<ReleaseType>,
    is_prerelease: bool,
}

impl ReleaseRequest {
    /// A release type is mandatory unless this is a prerelease run.
    pub fn new(release_type: Option<ReleaseType>, is_prerelease: bool) -> Result<Self> {
        if release_type.is_none() && !is_prerelease {
            return Err(PublishError::usage(
                "A release type (patch, minor or major) is required",
            ));
        }
        Ok(ReleaseRequest {
            release_type,
            is_prerelease,
        })
    }

    /// Build from the raw positional argument.
    pub fn from_input(release_type: Option<&str>, is_prerelease: bool) -> Result<Self> {
        let release_type = release_type.map(str::parse::<ReleaseType>).transpose()?;
        Self::new(release_type, is_prerelease)
    }

    pub fn release_type(&self) -> Option<ReleaseType> {
        self.release_type
    }

    pub fn is_prerelease(&self) -> bool {
        self.is_prerelease
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_requires_type() {
        let err = ReleaseRequest::from_input(None, false).unwrap_err();
        assert!(matches!(err, PublishError::Usage(_)));
    }

    #[test]
    fn test_prerelease_allows_missing_type() {
        let request = ReleaseRequest::from_input(None, true).unwrap();
        assert!(request.is_prerelease());
        assert_eq!(request.release_type(), None);
    }

    #[test]
    fn test_unknown_type_rejected_in_both_modes() {
        assert!(ReleaseRequest::from_input(Some("huge"), false).is_err());
        assert!(ReleaseRequest::from_input(Some("huge"), true).is_err());
    }

    #[test]
    fn test_known_type() {
        let request = ReleaseRequest::from_input(Some("minor"), false).unwrap();
        assert_eq!(request.release_type(), Some(ReleaseType::Minor));
        assert!(!request.is_prerelease());
    }
}
