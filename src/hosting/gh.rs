use crate::config::Config;
use crate::domain::ReleaseNotes;
use crate::hosting::ReleaseHost;
use crate::process::{self, ToolFailure};
use std::path::PathBuf;

/// GitHub releases through the `gh` CLI. `gh` reads `GITHUB_TOKEN` itself.
pub struct GhCli {
    program: String,
    work_dir: PathBuf,
}

impl GhCli {
    pub fn from_config(config: &Config, work_dir: impl Into<PathBuf>) -> Self {
        GhCli {
            program: config.tools.release_cli.clone(),
            work_dir: work_dir.into(),
        }
    }

    fn draft_args<'a>(notes: &'a ReleaseNotes) -> Vec<&'a str> {
        vec![
            "release",
            "create",
            notes.tag.as_str(),
            "--draft",
            "--verify-tag",
            "--title",
            notes.tag.as_str(),
            "--notes",
            notes.body.as_str(),
        ]
    }
}

impl ReleaseHost for GhCli {
    fn program(&self) -> &str {
        &self.program
    }

    fn is_available(&self) -> bool {
        process::command_on_path(&self.program)
    }

    fn create_draft(&self, notes: &ReleaseNotes) -> Result<String, ToolFailure> {
        let output = process::capture(&self.program, &Self::draft_args(notes), Some(&self.work_dir))?;
        Ok(output.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_draft_args() {
        let notes = ReleaseNotes::synthesize("v1.3.2", &["Fix typo".to_string()]);
        let args = GhCli::draft_args(&notes);
        assert_eq!(&args[..4], &["release", "create", "v1.3.2", "--draft"]);
        assert_eq!(args.last().copied(), Some(notes.body.as_str()));
    }

    #[test]
    fn test_missing_cli_unavailable() {
        let mut config = Config::default();
        config.tools.release_cli = "pkg-publish-definitely-missing-gh".to_string();
        assert!(!GhCli::from_config(&config, ".").is_available());
    }
}
