//! Pre-release counters such as `rc.0`, `rc.1`.
//!
//! According to semver.org: https://semver.org/#spec-item-9

use crate::error::{PublishError, Result};
use std::fmt;

/// Pre-release identifier with optional iteration number
///
/// # Examples
/// - "rc" -> PreRelease { identifier: "rc", iteration: None }
/// - "rc.3" -> PreRelease { identifier: "rc", iteration: Some(3) }
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreRelease {
    pub identifier: String,
    pub iteration: Option<u64>,
}

fn validate_identifier(identifier: &str) -> Result<()> {
    if identifier.is_empty() {
        return Err(PublishError::version("Empty pre-release identifier"));
    }
    if !identifier.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(PublishError::version(format!(
            "Invalid pre-release identifier: '{}'",
            identifier
        )));
    }
    Ok(())
}

impl PreRelease {
    /// The first pre-release of a cycle: `<identifier>.0`.
    pub fn start(identifier: &str) -> Result<Self> {
        validate_identifier(identifier)?;
        Ok(PreRelease {
            identifier: identifier.to_string(),
            iteration: Some(0),
        })
    }

    /// Parse "rc", "rc.2" or "custom-id.5".
    pub fn parse(s: &str) -> Result<Self> {
        let mut parts = s.split('.');
        let identifier = parts.next().unwrap_or_default();
        validate_identifier(identifier)?;

        let iteration = match parts.next() {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                PublishError::version(format!("Invalid iteration number: '{}'", raw))
            })?),
            None => None,
        };

        if parts.next().is_some() {
            return Err(PublishError::version(format!(
                "Unsupported pre-release format: '{}'",
                s
            )));
        }

        Ok(PreRelease {
            identifier: identifier.to_string(),
            iteration,
        })
    }

    /// The following counter. A bare identifier continues at 0.
    pub fn next(&self) -> Result<Self> {
        let iteration = match self.iteration {
            None => 0,
            Some(n) => n.checked_add(1).ok_or_else(|| {
                PublishError::version(format!("Pre-release counter of '{}' overflows", self))
            })?,
        };
        Ok(PreRelease {
            identifier: self.identifier.clone(),
            iteration: Some(iteration),
        })
    }

    pub fn to_semver(&self) -> Result<semver::Prerelease> {
        semver::Prerelease::new(&self.to_string())
            .map_err(|e| PublishError::version(format!("Invalid pre-release '{}': {}", self, e)))
    }
}

impl fmt::Display for PreRelease {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.identifier)?;
        if let Some(iter) = self.iteration {
            write!(f, ".{}", iter)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prerelease_parse_with_iteration() {
        let pr = PreRelease::parse("rc.2").unwrap();
        assert_eq!(pr.identifier, "rc");
        assert_eq!(pr.iteration, Some(2));
    }

    #[test]
    fn test_prerelease_parse_no_iteration() {
        let pr = PreRelease::parse("rc").unwrap();
        assert_eq!(pr.iteration, None);
    }

    #[test]
    fn test_prerelease_parse_custom_with_iteration() {
        let pr = PreRelease::parse("next-gen.5").unwrap();
        assert_eq!(pr.identifier, "next-gen");
        assert_eq!(pr.iteration, Some(5));
    }

    #[test]
    fn test_prerelease_parse_invalid() {
        assert!(PreRelease::parse("").is_err());
        assert!(PreRelease::parse("rc.abc").is_err());
        assert!(PreRelease::parse("rc.1.2").is_err());
        assert!(PreRelease::parse("invalid!name").is_err());
    }

    #[test]
    fn test_prerelease_start() {
        assert_eq!(PreRelease::start("rc").unwrap().to_string(), "rc.0");
        assert!(PreRelease::start("r c").is_err());
    }

    #[test]
    fn test_prerelease_next() {
        let next = |s: &str| PreRelease::parse(s).unwrap().next().unwrap();
        assert_eq!(next("rc.1").to_string(), "rc.2");
        assert_eq!(next("rc").to_string(), "rc.0");
        assert_eq!(next("rc.99").iteration, Some(100));
    }

    #[test]
    fn test_prerelease_next_overflow() {
        let last = PreRelease::parse(&format!("rc.{}", u64::MAX)).unwrap();
        assert!(matches!(last.next(), Err(PublishError::Version(_))));
    }

    #[test]
    fn test_prerelease_to_semver() {
        let pre = PreRelease::parse("rc.3").unwrap().to_semver().unwrap();
        assert_eq!(pre.as_str(), "rc.3");
    }
}
