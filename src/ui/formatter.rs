//! Formatting functions for terminal output.
//!
//! Progress goes to stdout, errors and advisory warnings to stderr. Colours
//! are dropped automatically when the stream is not a terminal.

use console::style;

use crate::boundary::AdvisoryWarning;

/// Usage text printed for help and for invalid invocations.
pub fn usage_text() -> String {
    format!(
        "{usage}
  pkg-publish [patch|minor|major] [--config <path>] [--dry-run]

{args}
  patch    Bump the patch version (1.2.3 -> 1.2.4)
  minor    Bump the minor version (1.2.3 -> 1.3.0)
  major    Bump the major version (1.2.3 -> 2.0.0)

{options}
  -c, --config <path>  Custom configuration file path
      --dry-run        Run the read-only checks and show what would be released
  -h, --help           Print this help

{env}
  IS_RELEASE_CANDIDATE=1  Publish a prerelease; the release type becomes optional
  GITHUB_TOKEN            Token used to draft the hosted release",
        usage = style("USAGE:").bold(),
        args = style("ARGS:").bold(),
        options = style("OPTIONS:").bold(),
        env = style("ENVIRONMENT:").bold(),
    )
}

pub fn display_usage() {
    println!("{}", usage_text());
}

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red().bold(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// Display an advisory warning; the run continues afterwards.
pub fn display_warning(warning: &AdvisoryWarning) {
    eprintln!("{} {}", style("⚠ WARNING:").yellow(), warning);
}

/// Tell the operator where to draft the release by hand.
pub fn display_manual_release_reminder(tag: &str, url: Option<&str>) {
    match url {
        Some(url) => println!(
            "\n{} Remember to create the release for {} at:\n  {}",
            style("→").yellow(),
            style(tag).bold(),
            style(url).cyan()
        ),
        None => println!(
            "\n{} Remember to create the release for {} on the hosting service.",
            style("→").yellow(),
            style(tag).bold()
        ),
    }
}

pub fn display_draft_created(tag: &str, url: &str) {
    display_success(&format!(
        "Drafted release {}: {}",
        style(tag).bold(),
        style(url).cyan()
    ));
}

/// Show the version change a release run would make.
pub fn display_version_change(current: &str, next: &str) {
    println!("\n{}", style("Version:").bold());
    println!("  From: {}", style(current).red());
    println!("  To:   {}", style(next).green());
}

/// Show the steps a dry run skipped.
pub fn display_dry_run_plan(steps: &[String]) {
    println!("\n{}", style("Dry run, nothing was changed. A real run would:").bold());
    for (i, step) in steps.iter().enumerate() {
        println!("  {}. {}", i + 1, step);
    }
}
