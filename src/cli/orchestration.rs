//! Release workflow orchestration
//!
//! A [ReleaseOrchestrator] walks one release run through its stages in a
//! fixed order. Every stage is a gate: a failure aborts the run and nothing
//! done by earlier stages is rolled back. Only release-note drafting is
//! advisory; its failures degrade to a manual reminder.

use std::collections::HashMap;
use std::fmt;

use semver::Version;

use crate::boundary::AdvisoryWarning;
use crate::config::Config;
use crate::domain::{release_page_url, release_pair, BumpPlan, ReleaseNotes, ReleaseRequest, TagPattern};
use crate::error::{PublishError, Result};
use crate::manifest::Manifest;
use crate::package::PublishOptions;
use crate::prerequisites::{self, PrerequisiteCheck, PrerequisiteContext, PrerequisiteReport};
use crate::ui;

use super::Toolchain;

/// Stages of a release run, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseStage {
    ValidatingArgs,
    CheckingPrerequisites,
    CheckingRepoState,
    Installing,
    Building,
    Testing,
    Bumping,
    VerifyingSignature,
    Pushing,
    CreatingRelease,
    Publishing,
    Done,
    Aborted,
}

impl fmt::Display for ReleaseStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReleaseStage::ValidatingArgs => "validating arguments",
            ReleaseStage::CheckingPrerequisites => "checking prerequisites",
            ReleaseStage::CheckingRepoState => "checking repository state",
            ReleaseStage::Installing => "installing dependencies",
            ReleaseStage::Building => "building",
            ReleaseStage::Testing => "testing",
            ReleaseStage::Bumping => "bumping version",
            ReleaseStage::VerifyingSignature => "verifying commit signature",
            ReleaseStage::Pushing => "pushing",
            ReleaseStage::CreatingRelease => "creating release notes",
            ReleaseStage::Publishing => "publishing",
            ReleaseStage::Done => "done",
            ReleaseStage::Aborted => "aborted",
        };
        f.write_str(name)
    }
}

/// What happened to the hosted release of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReleaseNoteOutcome {
    /// A draft was created at `url`
    Drafted { tag: String, url: String },
    /// The operator was reminded to create the release by hand
    Manual {
        warning: AdvisoryWarning,
        url: Option<String>,
    },
    /// Prerelease runs never draft releases
    Skipped,
}

/// Result of a completed release run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseOutcome {
    pub version: Version,
    pub tag: String,
    pub release: ReleaseNoteOutcome,
}

/// What a dry run would have released
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePreview {
    pub current: Version,
    pub version: Version,
    pub tag: String,
}

struct VersionChange {
    next: Version,
    tag: String,
}

/// Drives one release run through its stages.
///
/// Each stage runs only after the previous one succeeded. The first error
/// moves the run to [ReleaseStage::Aborted] and is returned unchanged.
pub struct ReleaseOrchestrator<'a> {
    config: &'a Config,
    request: ReleaseRequest,
    env: &'a HashMap<String, String>,
    tools: &'a Toolchain,
    pattern: TagPattern,
    stage: ReleaseStage,
    history: Vec<ReleaseStage>,
}

impl<'a> ReleaseOrchestrator<'a> {
    /// Prepare a run without touching any collaborator.
    ///
    /// # Arguments
    /// * `config` - Loaded configuration
    /// * `request` - Validated release type and prerelease flag
    /// * `env` - Environment map the token and key paths are read from
    /// * `tools` - Version control, package manager and release host
    ///
    /// # Returns
    /// * `Ok(ReleaseOrchestrator)` - Ready to [execute](Self::execute) or [preview](Self::preview)
    /// * `Err(PublishError)` - The configured tag prefix cannot form a tag pattern
    pub fn new(
        config: &'a Config,
        request: ReleaseRequest,
        env: &'a HashMap<String, String>,
        tools: &'a Toolchain,
    ) -> Result<Self> {
        Ok(ReleaseOrchestrator {
            config,
            request,
            env,
            tools,
            pattern: TagPattern::with_prefix(&config.tag_prefix)?,
            stage: ReleaseStage::ValidatingArgs,
            history: vec![ReleaseStage::ValidatingArgs],
        })
    }

    pub fn stage(&self) -> ReleaseStage {
        self.stage
    }

    /// Every stage entered so far, starting with [ReleaseStage::ValidatingArgs].
    pub fn history(&self) -> &[ReleaseStage] {
        &self.history
    }

    fn advance(&mut self, next: ReleaseStage) {
        tracing::debug!(from = %self.stage, to = %next, "release stage transition");
        self.stage = next;
        self.history.push(next);
    }

    fn abort_on_error<T>(&mut self, result: Result<T>) -> Result<T> {
        if result.is_err() {
            self.advance(ReleaseStage::Aborted);
        }
        result
    }

    /// Run the full release.
    pub fn execute(&mut self) -> Result<ReleaseOutcome> {
        let result = self.run_release();
        self.abort_on_error(result)
    }

    /// Run only the read-only gates and report the version that would be released.
    pub fn preview(&mut self) -> Result<ReleasePreview> {
        let result = self.run_preview();
        self.abort_on_error(result)
    }

    fn run_release(&mut self) -> Result<ReleaseOutcome> {
        self.advance(ReleaseStage::CheckingPrerequisites);
        let report = self.check_prerequisites()?;

        self.advance(ReleaseStage::CheckingRepoState);
        self.check_repository_state()?;

        self.advance(ReleaseStage::Installing);
        ui::display_status("Installing dependencies from the lockfile...");
        self.tools
            .packages
            .install_frozen()
            .map_err(PublishError::DependencyIntegrity)?;

        self.advance(ReleaseStage::Building);
        ui::display_status("Building...");
        self.tools.packages.build().map_err(PublishError::Build)?;

        self.advance(ReleaseStage::Testing);
        ui::display_status("Running tests...");
        self.tools.packages.test().map_err(PublishError::Test)?;

        self.advance(ReleaseStage::Bumping);
        let change = self.bump_version()?;

        self.advance(ReleaseStage::VerifyingSignature);
        let signature = self.tools.vcs.head_signature()?;
        signature.verify()?;
        ui::display_success(&format!("Commit {} is signed", signature.commit));

        self.advance(ReleaseStage::Pushing);
        ui::display_status(&format!("Pushing to {} with tags...", self.config.remote));
        self.tools
            .vcs
            .push_with_tags(&self.config.remote)
            .map_err(PublishError::Push)?;
        ui::display_success(&format!("Pushed {} to {}", change.tag, self.config.remote));

        let release = if self.request.is_prerelease() {
            ReleaseNoteOutcome::Skipped
        } else {
            self.advance(ReleaseStage::CreatingRelease);
            self.create_release(&change.tag, report.passed(PrerequisiteCheck::ReleaseCli))
        };

        self.advance(ReleaseStage::Publishing);
        let dist_tag = self
            .request
            .is_prerelease()
            .then(|| self.config.prerelease_dist_tag.clone());
        ui::display_status(&format!("Publishing {}...", change.next));
        self.tools
            .packages
            .publish(&PublishOptions::public(dist_tag))
            .map_err(PublishError::Publish)?;

        self.advance(ReleaseStage::Done);
        Ok(ReleaseOutcome {
            version: change.next,
            tag: change.tag,
            release,
        })
    }

    fn run_preview(&mut self) -> Result<ReleasePreview> {
        self.advance(ReleaseStage::CheckingPrerequisites);
        self.check_prerequisites()?;

        self.advance(ReleaseStage::CheckingRepoState);
        self.check_repository_state()?;

        let manifest = Manifest::load(&self.config.manifest)?;
        let current = manifest.version()?;
        let version =
            BumpPlan::for_request(&self.request).apply(&current, &self.config.prerelease_id)?;
        let tag = self.pattern.format(&version);

        ui::display_version_change(&current.to_string(), &version.to_string());
        ui::display_dry_run_plan(&self.remaining_steps(&version, &tag));

        self.advance(ReleaseStage::Done);
        Ok(ReleasePreview {
            current,
            version,
            tag,
        })
    }

    fn remaining_steps(&self, version: &Version, tag: &str) -> Vec<String> {
        let tools = &self.config.tools;
        let mut steps = vec![
            format!("Install dependencies with {} using the lockfile", tools.package_manager),
            format!("Run the build and test scripts with {}", tools.package_manager),
            format!(
                "Write {} to {} and create a signed commit",
                version,
                self.config.manifest.display()
            ),
            format!("Create the signed tag {}", tag),
            format!("Push to {} with tags", self.config.remote),
        ];
        if self.request.is_prerelease() {
            steps.push(format!(
                "Publish under the '{}' dist-tag",
                self.config.prerelease_dist_tag
            ));
        } else {
            steps.push(format!("Draft release notes for {}", tag));
            steps.push("Publish to the registry".to_string());
        }
        steps
    }

    fn check_prerequisites(&self) -> Result<PrerequisiteReport> {
        ui::display_status("Checking prerequisites...");
        let report = prerequisites::verify(&PrerequisiteContext {
            config: self.config,
            env: self.env,
            vcs: self.tools.vcs.as_ref(),
            packages: self.tools.packages.as_ref(),
            host: self.tools.host.as_ref(),
        })?;

        if !report.passed(PrerequisiteCheck::ReleaseCli) {
            ui::display_warning(&AdvisoryWarning::ReleaseCliMissing {
                program: self.tools.host.program().to_string(),
            });
        }
        ui::display_success("Prerequisites satisfied");
        Ok(report)
    }

    fn check_repository_state(&self) -> Result<()> {
        let remote = &self.config.remote;
        ui::display_status(&format!("Fetching from {}...", remote));
        self.tools.vcs.fetch(remote)?;

        let state = self.tools.vcs.repository_state(remote)?;
        tracing::debug!(?state, "repository state");
        state.verify(&self.config.release_branch, remote)?;
        ui::display_success(&format!(
            "On {} and up to date with {}",
            self.config.release_branch, remote
        ));
        Ok(())
    }

    fn bump_version(&self) -> Result<VersionChange> {
        let mut manifest = Manifest::load(&self.config.manifest)?;
        let current = manifest.version()?;
        let next =
            BumpPlan::for_request(&self.request).apply(&current, &self.config.prerelease_id)?;
        let tag = self.pattern.format(&next);
        tracing::debug!(%current, %next, %tag, "computed version bump");

        manifest.set_version(&next);
        manifest.save()?;

        let message = next.to_string();
        self.tools.vcs.commit_signed(&message, &[manifest.path()])?;
        self.tools.vcs.tag_signed(&tag, &tag)?;
        ui::display_version_change(&current.to_string(), &message);
        ui::display_success(&format!("Created signed commit and tag {}", tag));

        Ok(VersionChange { next, tag })
    }

    fn create_release(&self, tag: &str, cli_available: bool) -> ReleaseNoteOutcome {
        match self.draft_release(tag, cli_available) {
            Ok((tag, url)) => {
                ui::display_draft_created(&tag, &url);
                ReleaseNoteOutcome::Drafted { tag, url }
            }
            Err(warning) => {
                // Already reported during the prerequisite checks.
                if !matches!(warning, AdvisoryWarning::ReleaseCliMissing { .. }) {
                    ui::display_warning(&warning);
                }
                let url = self.manual_release_url();
                ui::display_manual_release_reminder(tag, url.as_deref());
                ReleaseNoteOutcome::Manual { warning, url }
            }
        }
    }

    fn draft_release(
        &self,
        tag: &str,
        cli_available: bool,
    ) -> std::result::Result<(String, String), AdvisoryWarning> {
        if !cli_available {
            return Err(AdvisoryWarning::ReleaseCliMissing {
                program: self.tools.host.program().to_string(),
            });
        }

        let failed = |reason: String| AdvisoryWarning::ReleaseDraftFailed {
            tag: tag.to_string(),
            reason,
        };

        let tags = self
            .tools
            .vcs
            .list_tags()
            .map_err(|e| failed(e.to_string()))?;
        let pair = release_pair(&tags, &self.pattern)?;
        let subjects = self
            .tools
            .vcs
            .commit_subjects(&pair.previous, &pair.current)
            .map_err(|e| failed(e.to_string()))?;

        let notes = ReleaseNotes::synthesize(&pair.current, &subjects);
        let url = self
            .tools
            .host
            .create_draft(&notes)
            .map_err(|e| failed(e.to_string()))?;
        Ok((pair.current, url))
    }

    fn manual_release_url(&self) -> Option<String> {
        self.config.release_url.clone().or_else(|| {
            match self.tools.vcs.remote_url(&self.config.remote) {
                Ok(Some(url)) => release_page_url(&url),
                Ok(None) => None,
                Err(e) => {
                    tracing::debug!(error = %e, "cannot read remote url");
                    None
                }
            }
        })
    }
}
