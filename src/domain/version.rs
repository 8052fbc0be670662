use crate::domain::prerelease::PreRelease;
use crate::domain::release::ReleaseRequest;
use crate::error::{PublishError, Result};
use semver::{BuildMetadata, Version};
use std::fmt;
use std::str::FromStr;

/// Semantic version component named on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseType {
    Major,
    Minor,
    Patch,
}

impl ReleaseType {
    /// Increment this component of `version`, zeroing the lower ones.
    ///
    /// The result never carries a prerelease or build suffix.
    ///
    /// # Returns
    /// * `Ok(Version)` - The bumped version
    /// * `Err(PublishError::Version)` - The component is already `u64::MAX`
    pub fn bump(&self, version: &Version) -> Result<Version> {
        let overflow = || {
            PublishError::version(format!(
                "Cannot bump {} of {}: component overflows",
                self, version
            ))
        };
        let (major, minor, patch) = match self {
            ReleaseType::Major => (version.major.checked_add(1).ok_or_else(overflow)?, 0, 0),
            ReleaseType::Minor => (
                version.major,
                version.minor.checked_add(1).ok_or_else(overflow)?,
                0,
            ),
            ReleaseType::Patch => (
                version.major,
                version.minor,
                version.patch.checked_add(1).ok_or_else(overflow)?,
            ),
        };
        Ok(Version::new(major, minor, patch))
    }
}

impl FromStr for ReleaseType {
    type Err = PublishError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "major" => Ok(ReleaseType::Major),
            "minor" => Ok(ReleaseType::Minor),
            "patch" => Ok(ReleaseType::Patch),
            other => Err(PublishError::usage(format!(
                "Unknown release type '{}': expected patch, minor or major",
                other
            ))),
        }
    }
}

impl fmt::Display for ReleaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseType::Major => write!(f, "major"),
            ReleaseType::Minor => write!(f, "minor"),
            ReleaseType::Patch => write!(f, "patch"),
        }
    }
}

/// How the manifest version moves for one run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpPlan {
    /// Bump a component and drop any prerelease suffix.
    Exact(ReleaseType),
    /// Bump only the prerelease counter.
    PrereleaseIncrement,
    /// Bump a component and start a fresh prerelease at counter 0.
    PrereleaseWithBump(ReleaseType),
}

impl BumpPlan {
    pub fn for_request(request: &ReleaseRequest) -> Self {
        match (request.is_prerelease(), request.release_type()) {
            (true, None) => BumpPlan::PrereleaseIncrement,
            (true, Some(release_type)) => BumpPlan::PrereleaseWithBump(release_type),
            (false, Some(release_type)) => BumpPlan::Exact(release_type),
            // ReleaseRequest rejects this combination on construction.
            (false, None) => BumpPlan::PrereleaseIncrement,
        }
    }

    /// Compute the next version from `current`, using `preid` as the
    /// prerelease identifier (e.g. "rc").
    ///
    /// # Example
    /// ```ignore
    /// let v = Version::parse("1.2.3-rc.0")?;
    /// assert_eq!(BumpPlan::PrereleaseIncrement.apply(&v, "rc")?.to_string(), "1.2.3-rc.1");
    /// assert_eq!(BumpPlan::Exact(ReleaseType::Patch).apply(&v, "rc")?.to_string(), "1.2.4");
    /// ```
    pub fn apply(&self, current: &Version, preid: &str) -> Result<Version> {
        let next = match self {
            BumpPlan::Exact(release_type) => release_type.bump(current)?,
            BumpPlan::PrereleaseWithBump(release_type) => {
                let mut next = release_type.bump(current)?;
                next.pre = PreRelease::start(preid)?.to_semver()?;
                next
            }
            BumpPlan::PrereleaseIncrement => {
                let counter = match PreRelease::parse(current.pre.as_str()) {
                    Ok(existing) if existing.identifier == preid => existing.next()?,
                    _ => PreRelease::start(preid)?,
                };
                let mut next = Version::new(current.major, current.minor, current.patch);
                next.pre = counter.to_semver()?;
                next
            }
        };

        debug_assert!(next.build == BuildMetadata::EMPTY);
        Ok(next)
    }
}

/// Parse a manifest or tag version, tolerating a leading `v`.
pub fn parse_version(raw: &str) -> Result<Version> {
    let clean = raw.trim().trim_start_matches('v').trim_start_matches('V');
    Version::parse(clean)
        .map_err(|e| PublishError::version(format!("Invalid version '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn next(current: &str, plan: BumpPlan) -> String {
        plan.apply(&parse_version(current).unwrap(), "rc")
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_release_type_parse() {
        assert_eq!("patch".parse::<ReleaseType>().unwrap(), ReleaseType::Patch);
        assert_eq!("minor".parse::<ReleaseType>().unwrap(), ReleaseType::Minor);
        assert_eq!("major".parse::<ReleaseType>().unwrap(), ReleaseType::Major);
    }

    #[test]
    fn test_release_type_parse_rejects_others() {
        for bad in ["", "Patch", "prepatch", "1.2.3", "--dry"] {
            let err = bad.parse::<ReleaseType>().unwrap_err();
            assert!(matches!(err, PublishError::Usage(_)), "{}", bad);
        }
    }

    #[test]
    fn test_version_bump_major() {
        assert_eq!(next("1.2.3", BumpPlan::Exact(ReleaseType::Major)), "2.0.0");
    }

    #[test]
    fn test_version_bump_minor() {
        assert_eq!(next("1.2.3", BumpPlan::Exact(ReleaseType::Minor)), "1.3.0");
    }

    #[test]
    fn test_version_bump_patch() {
        assert_eq!(next("1.2.3", BumpPlan::Exact(ReleaseType::Patch)), "1.2.4");
    }

    #[test]
    fn test_exact_strips_prerelease() {
        assert_eq!(next("1.2.3-rc.0", BumpPlan::Exact(ReleaseType::Patch)), "1.2.4");
        assert_eq!(next("1.2.3-rc.0", BumpPlan::Exact(ReleaseType::Major)), "2.0.0");
    }

    #[test]
    fn test_prerelease_increment() {
        assert_eq!(next("1.2.3-rc.0", BumpPlan::PrereleaseIncrement), "1.2.3-rc.1");
        assert_eq!(next("1.2.3-rc.9", BumpPlan::PrereleaseIncrement), "1.2.3-rc.10");
    }

    #[test]
    fn test_prerelease_increment_starts_counter() {
        assert_eq!(next("1.2.3", BumpPlan::PrereleaseIncrement), "1.2.3-rc.0");
        assert_eq!(next("1.2.3-rc", BumpPlan::PrereleaseIncrement), "1.2.3-rc.0");
    }

    #[test]
    fn test_prerelease_increment_switches_identifier() {
        assert_eq!(next("1.2.3-beta.4", BumpPlan::PrereleaseIncrement), "1.2.3-rc.0");
    }

    #[test]
    fn test_prerelease_with_bump() {
        let patch = BumpPlan::PrereleaseWithBump(ReleaseType::Patch);
        assert_eq!(next("1.2.3-rc.0", patch), "1.2.4-rc.0");
        assert_eq!(next("1.2.3", patch), "1.2.4-rc.0");
        assert_eq!(
            next("1.2.3", BumpPlan::PrereleaseWithBump(ReleaseType::Major)),
            "2.0.0-rc.0"
        );
    }

    #[test]
    fn test_bump_overflow_is_an_error() {
        let top = Version::new(u64::MAX, u64::MAX, u64::MAX);
        for release_type in [ReleaseType::Major, ReleaseType::Minor, ReleaseType::Patch] {
            let err = release_type.bump(&top).unwrap_err();
            assert!(matches!(err, PublishError::Version(_)), "{}", release_type);
        }
        assert!(BumpPlan::Exact(ReleaseType::Patch).apply(&top, "rc").is_err());
        assert_eq!(
            ReleaseType::Minor.bump(&Version::new(u64::MAX, 1, 0)).unwrap(),
            Version::new(u64::MAX, 2, 0)
        );
    }

    #[test]
    fn test_build_metadata_dropped() {
        assert_eq!(
            next("1.2.3+build.7", BumpPlan::Exact(ReleaseType::Minor)),
            "1.3.0"
        );
        assert_eq!(next("1.2.3-rc.1+sha.1", BumpPlan::PrereleaseIncrement), "1.2.3-rc.2");
    }

    #[test]
    fn test_parse_version_with_prefix() {
        assert_eq!(parse_version("v1.2.3").unwrap(), Version::new(1, 2, 3));
        assert_eq!(parse_version(" 1.2.3 ").unwrap(), Version::new(1, 2, 3));
        assert!(parse_version("1.2").is_err());
    }
}
