//! External tool detection and management.

use crate::vendor::Platform;
use crate::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Name of the transcoder binary looked up on `PATH`.
pub const FFMPEG: &str = "ffmpeg";

/// Information about an external tool.
#[derive(Debug, Clone, Serialize)]
pub struct ToolInfo {
    /// Name of the tool.
    pub name: String,
    /// Whether the tool is available.
    pub available: bool,
    /// Version string if available.
    pub version: Option<String>,
    /// Path to the tool executable.
    pub path: Option<PathBuf>,
}

/// Check if a tool is available and get its information.
///
/// # Example
///
/// ```no_run
/// use movconv_av::check_tool;
///
/// let info = check_tool("ffmpeg", Some("-version"));
/// if info.available {
///     println!("ffmpeg version: {:?}", info.version);
/// }
/// ```
pub fn check_tool(name: &str, version_arg: Option<&str>) -> ToolInfo {
    let Ok(path) = which::which(name) else {
        return ToolInfo {
            name: name.to_string(),
            available: false,
            version: None,
            path: None,
        };
    };

    let version = version_arg.and_then(|arg| detect_version(&path, arg));

    ToolInfo {
        name: name.to_string(),
        available: true,
        version,
        path: Some(path),
    }
}

/// Check every tool a conversion run may use.
///
/// Returns information about ffmpeg and the hardware inventory command for
/// the given platform (if that platform has one).
pub fn check_tools(platform: Platform) -> Vec<ToolInfo> {
    let mut tools = vec![check_tool(FFMPEG, Some("-version"))];
    if let Some(probe) = platform.probe() {
        tools.push(check_tool(probe.program, None));
    }
    tools
}

/// Require that a tool is available, returning its path.
///
/// # Errors
///
/// Returns an error if the tool is not found.
pub fn require_tool(name: &str) -> Result<PathBuf> {
    which::which(name).map_err(|_| Error::tool_not_found(name))
}

/// Get the path to a tool, preferring a configured path over PATH lookup.
///
/// A configured path that does not exist is an error rather than a silent
/// fallback, so a typo in `--ffmpeg` is reported instead of ignored.
pub fn get_tool_path(name: &str, config_path: Option<&Path>) -> Result<PathBuf> {
    if let Some(path) = config_path {
        if path.exists() {
            return Ok(path.to_path_buf());
        }
        // Bare names like "ffmpeg7" are resolved on PATH.
        if path.components().count() == 1 {
            return which::which(path).map_err(|_| Error::tool_not_found(path.to_string_lossy()));
        }
        return Err(Error::tool_not_found(path.to_string_lossy()));
    }

    require_tool(name)
}

/// Run `<tool> <version_arg>` and return the first line of stdout.
fn detect_version(path: &Path, version_arg: &str) -> Option<String> {
    let output = Command::new(path).arg(version_arg).output().ok()?;

    if !output.status.success() {
        return None;
    }

    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|s| s.to_string())
}
