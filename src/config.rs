use crate::error::{PublishError, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Represents the complete configuration for pkg-publish.
///
/// Every field has a default, so an empty file (or no file at all) describes
/// a yarn package released from `master` with `v`-prefixed tags.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default = "default_remote")]
    pub remote: String,

    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    #[serde(default = "default_prerelease_id")]
    pub prerelease_id: String,

    /// Distribution channel prereleases are published under
    #[serde(default = "default_prerelease_dist_tag")]
    pub prerelease_dist_tag: String,

    #[serde(default = "default_manifest")]
    pub manifest: PathBuf,

    /// Overrides the "new release" page derived from the remote URL
    #[serde(default)]
    pub release_url: Option<String>,

    #[serde(default)]
    pub registries: RegistriesConfig,

    #[serde(default)]
    pub env: EnvConfig,

    #[serde(default)]
    pub signing: SigningConfig,

    #[serde(default)]
    pub tools: ToolsConfig,
}

fn default_release_branch() -> String {
    "master".to_string()
}

fn default_remote() -> String {
    "origin".to_string()
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_prerelease_id() -> String {
    "rc".to_string()
}

fn default_prerelease_dist_tag() -> String {
    "rc".to_string()
}

fn default_manifest() -> PathBuf {
    PathBuf::from("package.json")
}

/// Registries the maintainer must be logged in to.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistriesConfig {
    #[serde(default = "default_primary_registry")]
    pub primary: String,

    #[serde(default = "default_secondary_registry")]
    pub secondary: String,
}

fn default_primary_registry() -> String {
    "https://registry.npmjs.org".to_string()
}

fn default_secondary_registry() -> String {
    "https://registry.yarnpkg.com".to_string()
}

impl Default for RegistriesConfig {
    fn default() -> Self {
        RegistriesConfig {
            primary: default_primary_registry(),
            secondary: default_secondary_registry(),
        }
    }
}

/// Names of the environment variables the run reads.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct EnvConfig {
    #[serde(default = "default_token_var")]
    pub token_var: String,

    #[serde(default = "default_prerelease_var")]
    pub prerelease_var: String,
}

fn default_token_var() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_prerelease_var() -> String {
    "IS_RELEASE_CANDIDATE".to_string()
}

impl Default for EnvConfig {
    fn default() -> Self {
        EnvConfig {
            token_var: default_token_var(),
            prerelease_var: default_prerelease_var(),
        }
    }
}

impl EnvConfig {
    /// Prerelease runs are requested with `<prerelease_var>=1` (or `true`).
    pub fn is_prerelease(&self, env: &HashMap<String, String>) -> bool {
        env.get(&self.prerelease_var)
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true"))
            .unwrap_or(false)
    }

    /// The release-hosting token, if set to a non-empty value.
    pub fn release_token<'a>(&self, env: &'a HashMap<String, String>) -> Option<&'a str> {
        env.get(&self.token_var)
            .map(|token| token.trim())
            .filter(|token| !token.is_empty())
    }
}

/// Expected commit-signing setup.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SigningConfig {
    /// Value `gpg.format` must have
    #[serde(default = "default_signing_format")]
    pub format: String,
}

fn default_signing_format() -> String {
    "ssh".to_string()
}

impl Default for SigningConfig {
    fn default() -> Self {
        SigningConfig {
            format: default_signing_format(),
        }
    }
}

/// External programs the run drives.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ToolsConfig {
    /// Installs, builds, tests and publishes ("yarn" or "npm")
    #[serde(default = "default_package_manager")]
    pub package_manager: String,

    /// Answers registry identity queries
    #[serde(default = "default_registry_cli")]
    pub registry_cli: String,

    /// Creates hosted releases
    #[serde(default = "default_release_cli")]
    pub release_cli: String,
}

fn default_package_manager() -> String {
    "yarn".to_string()
}

fn default_registry_cli() -> String {
    "npm".to_string()
}

fn default_release_cli() -> String {
    "gh".to_string()
}

impl Default for ToolsConfig {
    fn default() -> Self {
        ToolsConfig {
            package_manager: default_package_manager(),
            registry_cli: default_registry_cli(),
            release_cli: default_release_cli(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            release_branch: default_release_branch(),
            remote: default_remote(),
            tag_prefix: default_tag_prefix(),
            prerelease_id: default_prerelease_id(),
            prerelease_dist_tag: default_prerelease_dist_tag(),
            manifest: default_manifest(),
            release_url: None,
            registries: RegistriesConfig::default(),
            env: EnvConfig::default(),
            signing: SigningConfig::default(),
            tools: ToolsConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `pkgpublish.toml` in current directory
/// 3. `.pkgpublish.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let path = if let Some(path) = config_path {
        PathBuf::from(path)
    } else if Path::new("./pkgpublish.toml").exists() {
        PathBuf::from("./pkgpublish.toml")
    } else if let Some(config_dir) = dirs::config_dir() {
        let candidate = config_dir.join(".pkgpublish.toml");
        if candidate.exists() {
            candidate
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    tracing::debug!(path = %path.display(), "loading configuration");
    let config_str = fs::read_to_string(&path).map_err(|e| {
        PublishError::config(format!("Cannot read {}: {}", path.display(), e))
    })?;
    parse_config(&config_str)
        .map_err(|e| PublishError::config(format!("{}: {}", path.display(), e)))
}

/// Parse configuration text, validating the fields defaults cannot fix.
pub fn parse_config(text: &str) -> std::result::Result<Config, String> {
    let config: Config = toml::from_str(text).map_err(|e| e.to_string())?;
    if config.release_branch.trim().is_empty() {
        return Err("release_branch must not be empty".to_string());
    }
    if config.prerelease_dist_tag.trim().is_empty() {
        return Err("prerelease_dist_tag must not be empty".to_string());
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_prerelease_flag_values() {
        let config = EnvConfig::default();
        assert!(config.is_prerelease(&env(&[("IS_RELEASE_CANDIDATE", "1")])));
        assert!(config.is_prerelease(&env(&[("IS_RELEASE_CANDIDATE", "true")])));
        assert!(!config.is_prerelease(&env(&[("IS_RELEASE_CANDIDATE", "0")])));
        assert!(!config.is_prerelease(&env(&[])));
    }

    #[test]
    fn test_release_token_ignores_blank() {
        let config = EnvConfig::default();
        assert_eq!(config.release_token(&env(&[("GITHUB_TOKEN", "  ")])), None);
        assert_eq!(
            config.release_token(&env(&[("GITHUB_TOKEN", "ghp_x")])),
            Some("ghp_x")
        );
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(parse_config("").unwrap(), Config::default());
    }

    #[test]
    fn test_parse_rejects_empty_branch() {
        assert!(parse_config("release_branch = \"\"").is_err());
    }
}
