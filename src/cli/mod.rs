//! Command-line entry point
//!
//! [run] turns raw arguments and an environment map into an exit code. The
//! collaborators are supplied through a `connect` function so that tests can
//! drive a whole run against mocks.

pub mod orchestration;

pub use orchestration::{
    ReleaseNoteOutcome, ReleaseOrchestrator, ReleaseOutcome, ReleasePreview, ReleaseStage,
};

use std::collections::HashMap;

use anyhow::Context;
use clap::Parser;

use crate::config::{self, Config};
use crate::domain::{ReleaseRequest, ReleaseType};
use crate::git::{Git2Repository, VersionControl};
use crate::hosting::{GhCli, ReleaseHost};
use crate::manifest::Manifest;
use crate::package::{CliPackageManager, PackageManager};
use crate::ui;

const HELP_TOKENS: [&str; 3] = ["-h", "--help", "help"];

#[derive(clap::Parser, Debug)]
#[command(
    name = "pkg-publish",
    about = "Version, tag, push and publish a package release",
    disable_help_flag = true,
    disable_version_flag = true,
    disable_help_subcommand = true
)]
struct Args {
    /// patch, minor or major; optional for prerelease runs
    release_type: Option<String>,

    #[arg(short, long, help = "Custom configuration file path")]
    config: Option<String>,

    #[arg(long, help = "Run the read-only checks and show what would be released")]
    dry_run: bool,
}

/// The external collaborators of a release run
pub struct Toolchain {
    pub vcs: Box<dyn VersionControl>,
    pub packages: Box<dyn PackageManager>,
    pub host: Box<dyn ReleaseHost>,
}

impl Toolchain {
    /// Wire the real git repository, package manager and hosting CLI for
    /// the current directory.
    pub fn connect(config: &Config) -> anyhow::Result<Toolchain> {
        let work_dir =
            std::env::current_dir().context("Cannot determine the current directory")?;
        let repo = Git2Repository::open(&work_dir)
            .with_context(|| format!("{} is not inside a git repository", work_dir.display()))?;

        Ok(Toolchain {
            vcs: Box::new(repo),
            packages: Box::new(CliPackageManager::from_config(config, &work_dir)),
            host: Box::new(GhCli::from_config(config, &work_dir)),
        })
    }
}

/// Run pkg-publish with `args` (program name excluded) and return the exit code.
///
/// `env` is the process environment as seen by this run; the prerelease flag
/// and release token are read from it, never from the ambient environment.
///
/// # Arguments
/// * `args` - Command-line arguments after the program name
/// * `env` - Environment variables visible to this run
/// * `connect` - Builds the collaborators once arguments and config are valid
///
/// # Returns
/// * `0` - Help was shown, the dry run passed or the release was published
/// * `1` - Usage, configuration or gate failure
/// * Otherwise the exit code of the failing install, build, test, push or publish command
pub fn run<F>(args: &[String], env: &HashMap<String, String>, connect: F) -> i32
where
    F: FnOnce(&Config) -> anyhow::Result<Toolchain>,
{
    if args
        .first()
        .is_some_and(|first| HELP_TOKENS.contains(&first.as_str()))
    {
        ui::display_usage();
        return 0;
    }

    let parsed = match Args::try_parse_from(
        std::iter::once("pkg-publish").chain(args.iter().map(String::as_str)),
    ) {
        Ok(parsed) => parsed,
        Err(e) => {
            tracing::debug!(error = %e, "argument parsing failed");
            ui::display_usage();
            return 1;
        }
    };

    // The type is validated before any configuration is read.
    let release_type = match parsed
        .release_type
        .as_deref()
        .map(str::parse::<ReleaseType>)
        .transpose()
    {
        Ok(release_type) => release_type,
        Err(e) => {
            tracing::debug!(error = %e, "invalid release type");
            ui::display_usage();
            return 1;
        }
    };

    let config = match config::load_config(parsed.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            ui::display_error(&e.to_string());
            return 1;
        }
    };

    let is_prerelease = config.env.is_prerelease(env);
    let request = match ReleaseRequest::new(release_type, is_prerelease) {
        Ok(request) => request,
        Err(e) => {
            tracing::debug!(error = %e, "invalid release request");
            ui::display_usage();
            return 1;
        }
    };
    tracing::debug!(?request, dry_run = parsed.dry_run, "release requested");

    let tools = match connect(&config) {
        Ok(tools) => tools,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            return 1;
        }
    };

    let mut orchestrator = match ReleaseOrchestrator::new(&config, request, env, &tools) {
        Ok(orchestrator) => orchestrator,
        Err(e) => {
            ui::display_error(&e.to_string());
            return e.exit_code();
        }
    };

    if parsed.dry_run {
        return match orchestrator.preview() {
            Ok(_) => 0,
            Err(e) => {
                ui::display_error(&e.to_string());
                e.exit_code()
            }
        };
    }

    match orchestrator.execute() {
        Ok(outcome) => {
            let name = Manifest::load(&config.manifest)
                .ok()
                .and_then(|manifest| manifest.name().map(str::to_string))
                .unwrap_or_else(|| "package".to_string());
            println!(
                "\n{} Published {}@{} ({})\n",
                console::style("✓").green(),
                name,
                outcome.version,
                outcome.tag
            );
            0
        }
        Err(e) => {
            tracing::debug!(stage = %orchestrator.stage(), "release aborted");
            ui::display_error(&e.to_string());
            e.exit_code()
        }
    }
}
