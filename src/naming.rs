//! Source and output file naming.

use std::ffi::OsStr;
use std::path::{Path, PathBuf};

/// Extension of source files, compared case-insensitively.
pub const SOURCE_EXTENSION: &str = ".mov";

/// Extension of converted files.
pub const OUTPUT_EXTENSION: &str = ".mp4";

/// Check if a file name ends with `.mov` in any letter case.
///
/// # Examples
///
/// ```
/// use std::ffi::OsStr;
/// use movconv::naming::is_source_file;
///
/// assert!(is_source_file(OsStr::new("Holiday.MOV")));
/// assert!(!is_source_file(OsStr::new("notes.txt")));
/// ```
pub fn is_source_file(name: &OsStr) -> bool {
    name.to_string_lossy()
        .to_lowercase()
        .ends_with(SOURCE_EXTENSION)
}

/// Derive the output file name for a source file name.
///
/// The whole name is lowercased and the trailing `.mov` becomes `.mp4`.
/// Names without a `.mov` suffix are only lowercased.
///
/// # Examples
///
/// ```
/// use std::ffi::OsStr;
/// use movconv::naming::derive_output_name;
///
/// assert_eq!(derive_output_name(OsStr::new("Clip.MOV")), "clip.mp4");
/// ```
pub fn derive_output_name(name: &OsStr) -> String {
    let lower = name.to_string_lossy().to_lowercase();
    match lower.strip_suffix(SOURCE_EXTENSION) {
        Some(stem) => format!("{stem}{OUTPUT_EXTENSION}"),
        None => lower,
    }
}

/// Output path for `input` inside `output_dir`.
///
/// Returns `None` if `input` has no file name.
pub fn derive_output_path(input: &Path, output_dir: &Path) -> Option<PathBuf> {
    input
        .file_name()
        .map(|name| output_dir.join(derive_output_name(name)))
}
