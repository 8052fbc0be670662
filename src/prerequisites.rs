//! Environment checks that gate every mutation of a release run.
//!
//! Checks run in a fixed order and stop at the first fatal failure. The
//! release-hosting CLI check is the only advisory one: its failure is
//! recorded in the report and the run continues.

use crate::config::Config;
use crate::error::{PublishError, Result};
use crate::git::VersionControl;
use crate::hosting::ReleaseHost;
use crate::package::PackageManager;
use std::collections::HashMap;
use std::fmt;
use std::path::PathBuf;

/// Whether a failed check stops the run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Fatal,
    Advisory,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrerequisiteCheck {
    NpmLogin,
    YarnLogin,
    ReleaseCli,
    ReleaseToken,
    SigningFormat,
    SigningKeyConfigured,
    SigningKeyFile,
    SigningEnabled,
}

impl PrerequisiteCheck {
    /// Evaluation order
    pub const ALL: [PrerequisiteCheck; 8] = [
        PrerequisiteCheck::NpmLogin,
        PrerequisiteCheck::YarnLogin,
        PrerequisiteCheck::ReleaseCli,
        PrerequisiteCheck::ReleaseToken,
        PrerequisiteCheck::SigningFormat,
        PrerequisiteCheck::SigningKeyConfigured,
        PrerequisiteCheck::SigningKeyFile,
        PrerequisiteCheck::SigningEnabled,
    ];

    pub fn severity(&self) -> Severity {
        match self {
            PrerequisiteCheck::ReleaseCli => Severity::Advisory,
            _ => Severity::Fatal,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            PrerequisiteCheck::NpmLogin => "npm-login",
            PrerequisiteCheck::YarnLogin => "yarn-login",
            PrerequisiteCheck::ReleaseCli => "release-cli",
            PrerequisiteCheck::ReleaseToken => "release-token",
            PrerequisiteCheck::SigningFormat => "signing-format",
            PrerequisiteCheck::SigningKeyConfigured => "signing-key-configured",
            PrerequisiteCheck::SigningKeyFile => "signing-key-file",
            PrerequisiteCheck::SigningEnabled => "signing-enabled",
        }
    }
}

impl fmt::Display for PrerequisiteCheck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Result of one evaluated check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOutcome {
    pub check: PrerequisiteCheck,
    pub passed: bool,
    /// What to do about a failure; `None` when the check passed
    pub remediation: Option<String>,
}

impl CheckOutcome {
    fn pass(check: PrerequisiteCheck) -> Self {
        CheckOutcome {
            check,
            passed: true,
            remediation: None,
        }
    }

    fn fail(check: PrerequisiteCheck, remediation: String) -> Self {
        CheckOutcome {
            check,
            passed: false,
            remediation: Some(remediation),
        }
    }

    pub fn severity(&self) -> Severity {
        self.check.severity()
    }
}

/// Outcomes of every check evaluated, in order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PrerequisiteReport {
    pub outcomes: Vec<CheckOutcome>,
}

impl PrerequisiteReport {
    pub fn passed(&self, check: PrerequisiteCheck) -> bool {
        self.outcomes
            .iter()
            .any(|outcome| outcome.check == check && outcome.passed)
    }

    /// Failed advisory checks
    pub fn advisories(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes
            .iter()
            .filter(|outcome| !outcome.passed && outcome.severity() == Severity::Advisory)
    }
}

/// Collaborators and inputs the checks read
pub struct PrerequisiteContext<'a> {
    pub config: &'a Config,
    pub env: &'a HashMap<String, String>,
    pub vcs: &'a dyn VersionControl,
    pub packages: &'a dyn PackageManager,
    pub host: &'a dyn ReleaseHost,
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "yes" | "on" | "1"
    )
}

/// Expand a leading `~/` against `HOME` (from the run's environment first).
pub fn expand_home(path: &str, env: &HashMap<String, String>) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => env
            .get("HOME")
            .map(PathBuf::from)
            .or_else(dirs::home_dir)
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

fn evaluate(
    check: PrerequisiteCheck,
    ctx: &PrerequisiteContext<'_>,
    signing_key: &mut Option<String>,
) -> Result<CheckOutcome> {
    let config = ctx.config;
    let outcome = match check {
        PrerequisiteCheck::NpmLogin | PrerequisiteCheck::YarnLogin => {
            let registry = if check == PrerequisiteCheck::NpmLogin {
                &config.registries.primary
            } else {
                &config.registries.secondary
            };
            match ctx.packages.whoami(registry) {
                Some(user) => {
                    tracing::debug!(%registry, %user, "registry identity confirmed");
                    CheckOutcome::pass(check)
                }
                None => CheckOutcome::fail(
                    check,
                    format!(
                        "You must be logged in to {} to publish. Run '{} login --registry {}' and try again.",
                        registry, config.tools.registry_cli, registry
                    ),
                ),
            }
        }
        PrerequisiteCheck::ReleaseCli => {
            if ctx.host.is_available() {
                CheckOutcome::pass(check)
            } else {
                CheckOutcome::fail(
                    check,
                    format!(
                        "'{}' is not installed, so the release notes draft will be skipped. Install it to have drafts created automatically.",
                        ctx.host.program()
                    ),
                )
            }
        }
        PrerequisiteCheck::ReleaseToken => match config.env.release_token(ctx.env) {
            Some(_) => CheckOutcome::pass(check),
            None => CheckOutcome::fail(
                check,
                format!(
                    "{} is not set. Create a personal access token with repo scope and run 'export {}=<token>' before publishing.",
                    config.env.token_var, config.env.token_var
                ),
            ),
        },
        PrerequisiteCheck::SigningFormat => {
            let format = ctx.vcs.config_value("gpg.format")?;
            if format.as_deref().map(str::trim) == Some(config.signing.format.as_str()) {
                CheckOutcome::pass(check)
            } else {
                CheckOutcome::fail(
                    check,
                    format!(
                        "Git is not configured to sign commits with {}. Run 'git config --global gpg.format {}' and try again.",
                        config.signing.format, config.signing.format
                    ),
                )
            }
        }
        PrerequisiteCheck::SigningKeyConfigured => {
            match ctx.vcs.config_value("user.signingkey")? {
                Some(key) if !key.trim().is_empty() => {
                    *signing_key = Some(key.trim().to_string());
                    CheckOutcome::pass(check)
                }
                _ => CheckOutcome::fail(
                    check,
                    "No signing key is configured. Run 'git config --global user.signingkey ~/.ssh/id_ed25519.pub' and try again.".to_string(),
                ),
            }
        }
        PrerequisiteCheck::SigningKeyFile => {
            let key = signing_key.as_deref().unwrap_or_default();
            // Literal keys ("key::ssh-ed25519 ...") have no file behind them.
            if key.starts_with("key::") {
                CheckOutcome::pass(check)
            } else {
                let path = expand_home(key, ctx.env);
                if path.is_file() {
                    CheckOutcome::pass(check)
                } else {
                    CheckOutcome::fail(
                        check,
                        format!(
                            "The signing key '{}' does not exist. Point user.signingkey at an existing key with 'git config --global user.signingkey <path>' and try again.",
                            path.display()
                        ),
                    )
                }
            }
        }
        PrerequisiteCheck::SigningEnabled => {
            let enabled = ctx.vcs.config_value("commit.gpgsign")?;
            if enabled.as_deref().map(is_truthy).unwrap_or(false) {
                CheckOutcome::pass(check)
            } else {
                CheckOutcome::fail(
                    check,
                    "Commit signing is not enabled. Run 'git config --global commit.gpgsign true' and try again.".to_string(),
                )
            }
        }
    };
    Ok(outcome)
}

/// Run every check in order.
///
/// # Arguments
/// * `ctx` - Config, environment map and the collaborators to query
///
/// # Returns
/// * `Ok(PrerequisiteReport)` - No fatal check failed; advisory failures are in the report
/// * `Err(PublishError::Prerequisite)` - The first fatal failure, with its remediation
pub fn verify(ctx: &PrerequisiteContext<'_>) -> Result<PrerequisiteReport> {
    let mut report = PrerequisiteReport::default();
    let mut signing_key = None;

    for check in PrerequisiteCheck::ALL {
        let outcome = evaluate(check, ctx, &mut signing_key)?;
        if !outcome.passed && outcome.severity() == Severity::Fatal {
            return Err(PublishError::Prerequisite {
                check,
                remediation: outcome.remediation.unwrap_or_default(),
            });
        }
        report.outcomes.push(outcome);
    }

    Ok(report)
}
