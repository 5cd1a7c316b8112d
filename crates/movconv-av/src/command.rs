//! Builder for executing external tool commands.
//!
//! Every execution ends in exactly one of three outcomes: the process ran and
//! succeeded, the process ran and exited non-zero ([`Error::ToolFailed`]), or
//! the process never started ([`Error::ToolNotFound`] / [`Error::SpawnFailed`]).
//! Call sites decide which of those are fatal.

use crate::{Error, Result};
use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;
use std::process::{Command, ExitStatus, Stdio};

/// Output captured from a tool execution.
#[derive(Debug, Clone)]
pub struct ToolOutput {
    /// Process exit status.
    pub status: ExitStatus,
    /// Captured standard output (lossy UTF-8).
    pub stdout: String,
    /// Captured standard error (lossy UTF-8).
    pub stderr: String,
}

/// A builder for constructing and executing external tool invocations.
///
/// # Example
///
/// ```no_run
/// use movconv_av::ToolCommand;
///
/// let output = ToolCommand::new("lspci").execute()?;
/// println!("{}", output.stdout);
/// # Ok::<(), movconv_av::Error>(())
/// ```
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: PathBuf,
    args: Vec<OsString>,
}

impl ToolCommand {
    /// Create a new command for the given program name or path.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append a single argument.
    pub fn arg(&mut self, s: impl Into<OsString>) -> &mut Self {
        self.args.push(s.into());
        self
    }

    /// Append multiple arguments.
    pub fn args(&mut self, iter: impl IntoIterator<Item = impl Into<OsString>>) -> &mut Self {
        self.args.extend(iter.into_iter().map(Into::into));
        self
    }

    /// The program this command will run.
    pub fn program(&self) -> &std::path::Path {
        &self.program
    }

    /// The arguments passed to the program, in order.
    pub fn get_args(&self) -> &[OsString] {
        &self.args
    }

    /// Short tool name used in error messages (file name of the program).
    pub fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Execute the command, capturing stdout and stderr.
    ///
    /// # Errors
    ///
    /// - [`Error::ToolNotFound`] if the program does not exist.
    /// - [`Error::SpawnFailed`] if spawning fails for another reason.
    /// - [`Error::ToolFailed`] if the process exits with a non-zero status
    ///   (message includes stderr).
    pub fn execute(&self) -> Result<ToolOutput> {
        let tool = self.tool_name();

        #[cfg(feature = "tracing")]
        tracing::debug!("Running: {}", self);

        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::from_spawn(&tool, e))?;

        let tool_output = ToolOutput {
            status: output.status,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        };

        if !output.status.success() {
            let stderr = tool_output.stderr.trim();
            let message = if stderr.is_empty() {
                format!("exited with {}", output.status)
            } else {
                format!("exited with {}: {}", output.status, stderr)
            };
            return Err(Error::tool_failed(tool, message));
        }

        Ok(tool_output)
    }

    /// Execute the command with stdout and stderr inherited from this process.
    ///
    /// Used for long-running tools whose own progress output should reach the
    /// terminal. Errors are classified the same way as [`ToolCommand::execute`],
    /// except the failure message carries only the exit status.
    pub fn execute_inherited(&self) -> Result<ExitStatus> {
        let tool = self.tool_name();

        #[cfg(feature = "tracing")]
        tracing::debug!("Running: {}", self);

        let status = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .status()
            .map_err(|e| Error::from_spawn(&tool, e))?;

        if !status.success() {
            return Err(Error::tool_failed(tool, format!("exited with {}", status)));
        }

        Ok(status)
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_shell_word(f, &self.program.to_string_lossy())?;
        for arg in &self.args {
            f.write_str(" ")?;
            write_shell_word(f, &arg.to_string_lossy())?;
        }
        Ok(())
    }
}

fn write_shell_word(f: &mut fmt::Formatter<'_>, word: &str) -> fmt::Result {
    if !word.is_empty() && !word.contains(|c: char| c.is_whitespace() || c == '"' || c == '\'') {
        return f.write_str(word);
    }
    write!(f, "\"{}\"", word.replace('"', "\\\""))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_quotes_args_with_spaces() {
        let mut cmd = ToolCommand::new("ffmpeg");
        cmd.arg("-i").arg("/tmp/my clip.mov");
        assert_eq!(cmd.to_string(), "ffmpeg -i \"/tmp/my clip.mov\"");
    }

    #[test]
    fn tool_name_uses_file_name() {
        let cmd = ToolCommand::new("/usr/local/bin/ffmpeg");
        assert_eq!(cmd.tool_name(), "ffmpeg");
    }

    #[test]
    fn execute_echo() {
        let output = ToolCommand::new("echo").arg("hello").execute();

        match output {
            Ok(out) => {
                assert!(out.status.success());
                assert!(out.stdout.trim().contains("hello"));
            }
            Err(_) => {
                // On some minimal environments echo may not exist; skip.
            }
        }
    }

    #[test]
    fn execute_nonexistent_tool() {
        let result = ToolCommand::new("nonexistent_tool_xyz_12345").execute();
        let err = result.unwrap_err();
        assert!(err.is_tool_missing(), "unexpected error: {err}");
    }

    #[cfg(unix)]
    #[test]
    fn non_zero_exit_is_tool_failed() {
        let result = ToolCommand::new("sh")
            .args(["-c", "echo broken >&2; exit 3"])
            .execute();
        match result {
            Err(Error::ToolFailed { tool, message }) => {
                assert_eq!(tool, "sh");
                assert!(message.contains("broken"), "unexpected message: {message}");
            }
            other => panic!("expected ToolFailed, got {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn inherited_non_zero_exit_is_tool_failed() {
        let result = ToolCommand::new("sh").args(["-c", "exit 1"]).execute_inherited();
        assert!(matches!(result, Err(Error::ToolFailed { .. })));
    }
}
