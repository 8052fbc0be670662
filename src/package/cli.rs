use crate::config::Config;
use crate::package::{PackageManager, PublishOptions};
use crate::process::{self, ToolFailure};
use std::path::PathBuf;

/// Which command line dialect the package manager speaks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flavor {
    Yarn,
    Npm,
}

/// Package manager driven through its command line (yarn or npm)
pub struct CliPackageManager {
    program: String,
    flavor: Flavor,
    registry_cli: String,
    work_dir: PathBuf,
}

impl CliPackageManager {
    pub fn from_config(config: &Config, work_dir: impl Into<PathBuf>) -> Self {
        let program = config.tools.package_manager.clone();
        let flavor = if program.ends_with("npm") {
            Flavor::Npm
        } else {
            Flavor::Yarn
        };

        CliPackageManager {
            program,
            flavor,
            registry_cli: config.tools.registry_cli.clone(),
            work_dir: work_dir.into(),
        }
    }

    fn run(&self, args: &[&str]) -> Result<(), ToolFailure> {
        process::stream(&self.program, args, Some(&self.work_dir))
    }

    fn install_args(&self) -> Vec<&'static str> {
        match self.flavor {
            Flavor::Yarn => vec!["install", "--frozen-lockfile"],
            Flavor::Npm => vec!["ci"],
        }
    }

    fn publish_args<'a>(&self, options: &'a PublishOptions) -> Vec<&'a str> {
        let mut args = vec!["publish", "--ignore-scripts", "--access", options.access.as_str()];
        if self.flavor == Flavor::Yarn {
            args.push("--non-interactive");
        }
        if let Some(tag) = options.dist_tag.as_deref() {
            args.push("--tag");
            args.push(tag);
        }
        args
    }
}

impl PackageManager for CliPackageManager {
    fn whoami(&self, registry: &str) -> Option<String> {
        let output = process::capture(
            &self.registry_cli,
            &["whoami", "--registry", registry],
            Some(&self.work_dir),
        )
        .ok()?;
        let user = output.trim();
        (!user.is_empty()).then(|| user.to_string())
    }

    fn install_frozen(&self) -> Result<(), ToolFailure> {
        self.run(&self.install_args())
    }

    fn build(&self) -> Result<(), ToolFailure> {
        self.run(&["run", "build"])
    }

    fn test(&self) -> Result<(), ToolFailure> {
        self.run(&["run", "test"])
    }

    fn publish(&self, options: &PublishOptions) -> Result<(), ToolFailure> {
        self.run(&self.publish_args(options))
    }
}
