//! External command execution
//!
//! Every tool the harness drives is a child process. Calls block until the
//! process exits; there is no timeout around an individual call.

use std::process::{ExitStatus, Stdio};
use tokio::process::Command;
use tracing::debug;

use crate::error::{HarnessError, HarnessResult};

#[derive(Debug, Clone)]
pub struct CommandOutput {
    pub command: String,
    pub status: ExitStatus,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.status.success()
    }

    /// Turn a non-zero exit into an error
    pub fn check(self) -> HarnessResult<Self> {
        if self.success() {
            Ok(self)
        } else {
            Err(HarnessError::CommandFailed {
                command: self.command,
                status: self.status.to_string(),
                stderr: self.stderr.trim().to_string(),
            })
        }
    }
}

/// Render a command line for logs and errors
pub fn render_command(program: &str, args: &[String]) -> String {
    let mut rendered = program.to_string();
    for arg in args {
        rendered.push(' ');
        rendered.push_str(arg);
    }
    rendered
}

/// Run a command to completion, capturing both output streams
pub async fn run_command(program: &str, args: &[String]) -> HarnessResult<CommandOutput> {
    let command = render_command(program, args);
    debug!("🔧 Running: {}", command);

    let output = Command::new(program)
        .args(args)
        .stdin(Stdio::null())
        .output()
        .await?;

    let result = CommandOutput {
        command,
        status: output.status,
        stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    };

    debug!("🔧 '{}' exited with {}", result.command, result.status);
    Ok(result)
}

/// Run a command and fail on a non-zero exit
pub async fn check_command(program: &str, args: &[String]) -> HarnessResult<CommandOutput> {
    run_command(program, args).await?.check()
}

/// Convert a list of string slices into owned arguments
pub fn args<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    items.into_iter().map(Into::into).collect()
}
