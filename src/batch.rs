//! Batch conversion of a directory of `.mov` files.

use crate::convert::{ConvertOutcome, Converter};
use crate::naming::{derive_output_path, is_source_file};
use anyhow::{bail, Context, Result};
use movconv_av::VendorDetector;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Which files a batch run considers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Every `.mov` file; existing outputs are skipped one by one.
    All,
    /// Only `.mov` files whose output does not exist yet.
    Diff,
}

/// Counts for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchReport {
    /// `.mov` files found in the input directory.
    pub found: usize,
    /// Files dropped before processing because their output existed (diff mode).
    pub filtered: usize,
    pub converted: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Dry-run commands printed.
    pub planned: usize,
}

impl fmt::Display for BatchReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} converted, {} skipped, {} failed",
            self.converted,
            self.skipped + self.filtered,
            self.failed
        )?;
        if self.planned > 0 {
            write!(f, ", {} planned", self.planned)?;
        }
        Ok(())
    }
}

/// Drives a [`Converter`] over every source file in a directory.
pub struct BatchDriver<D> {
    converter: Converter<D>,
}

impl<D: VendorDetector> BatchDriver<D> {
    pub fn new(converter: Converter<D>) -> Self {
        Self { converter }
    }

    /// Convert the `.mov` files in `input_dir` into `output_dir`.
    ///
    /// The output directory is created first. Failures while creating it or
    /// reading the input directory abort the run; failures for a single file
    /// are printed and the run continues.
    pub fn run(&self, input_dir: &Path, output_dir: &Path, mode: Mode) -> Result<BatchReport> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", output_dir))?;

        let mut report = BatchReport::default();

        let sources = list_source_files(input_dir)?;
        report.found = sources.len();
        info!("Found {} source files in {:?}", sources.len(), input_dir);

        let candidates = match mode {
            Mode::All => sources,
            Mode::Diff => {
                let remaining = without_existing_outputs(sources, output_dir);
                report.filtered = report.found - remaining.len();
                debug!("{} files already converted", report.filtered);
                remaining
            }
        };

        let total = candidates.len();
        for (idx, input) in candidates.iter().enumerate() {
            let Some(output) = derive_output_path(input, output_dir) else {
                println!("Failed to convert {}: no file name", input.display());
                report.failed += 1;
                continue;
            };

            if output.exists() {
                println!("File already exists, skipping: {}", output.display());
                report.skipped += 1;
                continue;
            }

            println!("Processing file {}/{}: {}", idx + 1, total, input.display());
            match self.converter.convert(input, &output) {
                Ok(ConvertOutcome::Converted) => report.converted += 1,
                Ok(ConvertOutcome::Failed) => report.failed += 1,
                Ok(ConvertOutcome::Planned) => report.planned += 1,
                Err(e) => {
                    println!("Failed to convert {}: {}", input.display(), e);
                    warn!("Failed to convert {:?}: {}", input, e);
                    report.failed += 1;
                }
            }
        }

        Ok(report)
    }
}

/// List `.mov` files directly inside `dir`, in directory-listing order.
///
/// Subdirectories are neither entered nor returned.
pub fn list_source_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("Failed to read input directory: {:?} is not a directory", dir);
    }

    let mut files = Vec::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => {
                return Err(e).with_context(|| format!("Failed to read input directory: {:?}", dir));
            }
            Err(e) => {
                warn!("Skipping unreadable entry in {:?}: {}", dir, e);
                continue;
            }
        };

        if entry.file_type().is_dir() {
            continue;
        }

        if is_source_file(entry.file_name()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Drop sources whose derived output already exists in `output_dir`.
pub fn without_existing_outputs(sources: Vec<PathBuf>, output_dir: &Path) -> Vec<PathBuf> {
    sources
        .into_iter()
        .filter(|input| match derive_output_path(input, output_dir) {
            Some(output) => !output.exists(),
            None => true,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::convert::ConvertOptions;
    use movconv_av::{FixedVendor, Vendor};
    use std::fs;
    use tempfile::tempdir;

    fn dry_run_driver() -> BatchDriver<FixedVendor> {
        BatchDriver::new(Converter::new(
            FixedVendor(Vendor::None),
            ConvertOptions {
                dry_run: true,
                ..Default::default()
            },
        ))
    }

    fn names(paths: &[PathBuf]) -> Vec<String> {
        let mut names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_list_source_files_filters_extension() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("A.mov"), b"").unwrap();
        fs::write(dir.path().join("b.mov"), b"").unwrap();
        fs::write(dir.path().join("c.MOV"), b"").unwrap();
        fs::write(dir.path().join("notes.txt"), b"").unwrap();
        fs::create_dir(dir.path().join("nested.mov")).unwrap();
        fs::write(dir.path().join("nested.mov").join("d.mov"), b"").unwrap();

        let files = list_source_files(dir.path()).unwrap();
        assert_eq!(names(&files), vec!["A.mov", "b.mov", "c.MOV"]);
    }

    #[test]
    fn test_list_missing_directory_is_error() {
        let dir = tempdir().unwrap();
        let result = list_source_files(&dir.path().join("missing"));
        assert!(result.is_err());
    }

    #[test]
    fn test_list_plain_file_is_error() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mov");
        fs::write(&file, b"").unwrap();

        let err = list_source_files(&file).unwrap_err();
        assert!(err.to_string().contains("not a directory"), "unexpected error: {err}");
    }

    #[test]
    fn test_run_with_file_as_input_aborts() {
        let dir = tempdir().unwrap();
        let file = dir.path().join("clip.mov");
        fs::write(&file, b"").unwrap();

        let result = dry_run_driver().run(&file, &dir.path().join("out"), Mode::All);
        assert!(result.is_err());
    }

    #[test]
    fn test_without_existing_outputs() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("out");
        fs::create_dir(&out).unwrap();
        fs::write(out.join("a.mp4"), b"").unwrap();

        let sources = vec![dir.path().join("A.mov"), dir.path().join("b.mov")];
        let remaining = without_existing_outputs(sources, &out);
        assert_eq!(names(&remaining), vec!["b.mov"]);
    }

    #[test]
    fn test_run_creates_output_directory_with_ancestors() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        fs::create_dir(&input).unwrap();
        let output = dir.path().join("deep").join("er").join("out");

        let report = dry_run_driver().run(&input, &output, Mode::All).unwrap();
        assert!(output.is_dir());
        assert_eq!(report, BatchReport::default());
    }

    #[test]
    fn test_convert_mode_skips_existing_per_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        fs::write(input.join("A.mov"), b"").unwrap();
        fs::write(input.join("b.mov"), b"").unwrap();
        fs::write(input.join("notes.txt"), b"").unwrap();
        fs::write(output.join("a.mp4"), b"").unwrap();

        let report = dry_run_driver().run(&input, &output, Mode::All).unwrap();
        assert_eq!(report.found, 2);
        assert_eq!(report.filtered, 0);
        assert_eq!(report.skipped, 1);
        assert_eq!(report.planned, 1);
    }

    #[test]
    fn test_diff_mode_filters_before_processing() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::create_dir(&output).unwrap();
        fs::write(input.join("A.mov"), b"").unwrap();
        fs::write(input.join("b.mov"), b"").unwrap();
        fs::write(output.join("a.mp4"), b"").unwrap();

        let report = dry_run_driver().run(&input, &output, Mode::Diff).unwrap();
        assert_eq!(report.found, 2);
        assert_eq!(report.filtered, 1);
        assert_eq!(report.skipped, 0);
        assert_eq!(report.planned, 1);
    }

    #[test]
    fn test_missing_input_directory_aborts() {
        let dir = tempdir().unwrap();
        let result = dry_run_driver().run(
            &dir.path().join("missing"),
            &dir.path().join("out"),
            Mode::All,
        );
        assert!(result.is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_file_does_not_stop_batch() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("in");
        let output = dir.path().join("out");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.mov"), b"").unwrap();
        fs::write(input.join("b.mov"), b"").unwrap();

        let driver = BatchDriver::new(Converter::new(
            FixedVendor(Vendor::None),
            ConvertOptions {
                ffmpeg: PathBuf::from("false"),
                ..Default::default()
            },
        ));

        let report = driver.run(&input, &output, Mode::All).unwrap();
        assert_eq!(report.failed, 2);
        assert_eq!(report.converted, 0);
    }

    #[test]
    fn test_report_display() {
        let report = BatchReport {
            found: 4,
            filtered: 1,
            converted: 2,
            skipped: 0,
            failed: 1,
            planned: 0,
        };
        assert_eq!(report.to_string(), "2 converted, 1 skipped, 1 failed");
    }
}
