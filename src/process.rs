//! Running external tools (git, npm, yarn, gh) and classifying their failures.

use std::ffi::OsStr;
use std::fmt;
use std::path::Path;
use std::process::{Command, Stdio};

/// A wrapped tool that did not exit successfully.
///
/// `code` is `None` when the process could not be spawned or was killed by a
/// signal; callers that need an exit status use [`ToolFailure::exit_code`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub command: String,
    pub code: Option<i32>,
    pub stderr: String,
}

impl ToolFailure {
    pub fn new(command: impl Into<String>, code: Option<i32>, stderr: impl Into<String>) -> Self {
        ToolFailure {
            command: command.into(),
            code,
            stderr: stderr.into(),
        }
    }

    /// Exit status to propagate from this failure; never zero.
    pub fn exit_code(&self) -> i32 {
        match self.code {
            Some(0) | None => 1,
            Some(code) => code,
        }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with code {}", self.command, code)?,
            None => write!(f, "`{}` did not run to completion", self.command)?,
        }
        let stderr = self.stderr.trim();
        if !stderr.is_empty() {
            write!(f, "\n{}", stderr)?;
        }
        Ok(())
    }
}

fn command_line(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

fn build(program: &str, args: &[&str], cwd: Option<&Path>) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(args);
    if let Some(dir) = cwd {
        cmd.current_dir(dir);
    }
    cmd
}

/// Run a tool and capture its stdout.
///
/// Used for queries (`whoami`, `git log`) whose output is parsed rather than
/// shown to the operator.
pub fn capture(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<String, ToolFailure> {
    let line = command_line(program, args);
    tracing::debug!(command = %line, "capturing tool output");

    let output = build(program, args, cwd)
        .stdin(Stdio::null())
        .output()
        .map_err(|e| ToolFailure::new(&line, None, e.to_string()))?;

    if !output.status.success() {
        return Err(ToolFailure::new(
            line,
            output.status.code(),
            String::from_utf8_lossy(&output.stderr),
        ));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Run a tool with inherited stdio so the operator sees its progress.
pub fn stream(program: &str, args: &[&str], cwd: Option<&Path>) -> Result<(), ToolFailure> {
    let line = command_line(program, args);
    tracing::debug!(command = %line, "running tool");

    let status = build(program, args, cwd)
        .status()
        .map_err(|e| ToolFailure::new(&line, None, e.to_string()))?;

    if !status.success() {
        return Err(ToolFailure::new(line, status.code(), String::new()));
    }
    Ok(())
}

/// Whether `program` resolves to an executable on `PATH`.
pub fn command_on_path(program: &str) -> bool {
    command_in_path(program, std::env::var_os("PATH").as_deref())
}

/// Whether `program` resolves to an executable in `search_path`.
///
/// # Arguments
/// * `program` - A bare command name or a path to one
/// * `search_path` - A `PATH`-style directory list; `None` finds nothing
///
/// # Returns
/// * `true` - A matching file exists and is executable
/// * `false` - Otherwise, including when the current directory is unreadable
pub fn command_in_path(program: &str, search_path: Option<&OsStr>) -> bool {
    let cwd = match std::env::current_dir() {
        Ok(cwd) => cwd,
        Err(_) => return false,
    };
    match which::which_in(program, search_path, cwd) {
        Ok(resolved) => {
            tracing::debug!(program, path = %resolved.display(), "resolved tool");
            true
        }
        Err(e) => {
            tracing::debug!(program, error = %e, "tool not found");
            false
        }
    }
}
