use crate::boundary::AdvisoryWarning;
use crate::error::{PublishError, Result};
use semver::Version;

/// Tag naming pattern (e.g., "v{version}", "release-{version}")
#[derive(Debug, Clone)]
pub struct TagPattern {
    pattern: String,
    matcher: regex::Regex,
}

impl TagPattern {
    /// Create a new tag pattern; it must contain the `{version}` placeholder.
    ///
    /// # Arguments
    /// * `pattern` - e.g. "v{version}" or "release-{version}"
    pub fn new(pattern: impl Into<String>) -> Result<Self> {
        let pattern = pattern.into();
        if !pattern.contains("{version}") {
            return Err(PublishError::config(format!(
                "Tag pattern '{}' must contain the {{version}} placeholder",
                pattern
            )));
        }

        let escaped = regex::escape(&pattern);
        let regex_pattern = escaped.replace(r"\{version\}", r"(\d+\.\d+\.\d+(?:-[0-9A-Za-z.-]+)?)");
        let matcher = regex::Regex::new(&format!("^{}$", regex_pattern))
            .map_err(|e| PublishError::config(format!("Invalid tag pattern '{}': {}", pattern, e)))?;

        Ok(TagPattern { pattern, matcher })
    }

    /// Pattern for a plain prefix such as "v".
    pub fn with_prefix(prefix: &str) -> Result<Self> {
        Self::new(format!("{}{{version}}", prefix))
    }

    /// Format a version according to pattern
    /// Example: pattern="v{version}", version="1.2.3" -> "v1.2.3"
    pub fn format(&self, version: &Version) -> String {
        self.pattern.replace("{version}", &version.to_string())
    }

    /// Version encoded in `tag`, if the tag follows this pattern.
    pub fn version_of(&self, tag: &str) -> Option<Version> {
        let captures = self.matcher.captures(tag)?;
        Version::parse(captures.get(1)?.as_str()).ok()
    }
}

/// The two newest release tags, used to bound the release notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePair {
    pub previous: String,
    pub current: String,
}

/// Release (non-prerelease) tags following `pattern`, oldest first by semver.
pub fn release_tags(tags: &[String], pattern: &TagPattern) -> Vec<String> {
    let mut releases: Vec<(Version, &String)> = tags
        .iter()
        .filter_map(|tag| pattern.version_of(tag).map(|v| (v, tag)))
        .filter(|(version, _)| version.pre.is_empty())
        .collect();
    releases.sort_by(|a, b| a.0.cmp(&b.0));
    releases.into_iter().map(|(_, tag)| tag.clone()).collect()
}

/// Select the tag pair release notes are drawn from.
///
/// Notes are only synthesized when exactly two release tags exist; any other
/// count yields [`AdvisoryWarning::TagCountMismatch`] and the caller falls back
/// to a manual reminder.
pub fn release_pair(
    tags: &[String],
    pattern: &TagPattern,
) -> std::result::Result<ReleasePair, AdvisoryWarning> {
    let releases = release_tags(tags, pattern);
    match releases.as_slice() {
        [previous, current] => Ok(ReleasePair {
            previous: previous.clone(),
            current: current.clone(),
        }),
        _ => Err(AdvisoryWarning::TagCountMismatch {
            found: releases.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_pattern_format() {
        let pattern = TagPattern::with_prefix("v").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "v1.2.3");
    }

    #[test]
    fn test_pattern_format_with_suffix() {
        let pattern = TagPattern::new("release-{version}").unwrap();
        assert_eq!(pattern.format(&Version::new(1, 2, 3)), "release-1.2.3");
    }

    #[test]
    fn test_pattern_requires_placeholder() {
        assert!(TagPattern::new("v").is_err());
    }

    #[test]
    fn test_pattern_version_of() {
        let pattern = TagPattern::with_prefix("v").unwrap();
        assert_eq!(pattern.version_of("v1.2.3"), Some(Version::new(1, 2, 3)));
        assert_eq!(
            pattern.version_of("v1.2.3-rc.1").map(|v| v.to_string()),
            Some("1.2.3-rc.1".to_string())
        );
        assert_eq!(pattern.version_of("release-1.2.3"), None);
        assert_eq!(pattern.version_of("v1.2"), None);
    }

    #[test]
    fn test_release_tags_sorted_by_semver() {
        let pattern = TagPattern::with_prefix("v").unwrap();
        let sorted = release_tags(&tags(&["v1.10.0", "v1.9.0", "v1.2.0"]), &pattern);
        assert_eq!(sorted, tags(&["v1.2.0", "v1.9.0", "v1.10.0"]));
    }

    #[test]
    fn test_release_pair_exactly_two() {
        let pattern = TagPattern::with_prefix("v").unwrap();
        let pair = release_pair(&tags(&["v1.3.2", "v1.3.2-rc.0", "v1.3.1", "latest"]), &pattern)
            .unwrap();
        assert_eq!(pair.previous, "v1.3.1");
        assert_eq!(pair.current, "v1.3.2");
    }

    #[test]
    fn test_release_pair_other_counts_fall_back() {
        let pattern = TagPattern::with_prefix("v").unwrap();
        for (names, found) in [
            (vec![], 0),
            (vec!["v1.0.0"], 1),
            (vec!["v1.0.0-rc.0", "v1.0.0-rc.1"], 0),
            (vec!["v1.0.0", "v1.1.0", "v1.2.0"], 3),
        ] {
            let warning = release_pair(&tags(&names), &pattern).unwrap_err();
            assert_eq!(warning, AdvisoryWarning::TagCountMismatch { found });
        }
    }
}
