//! Single-file conversion.
//!
//! Picks an encoder from a fresh vendor detection and runs ffmpeg for one
//! input/output pair. A transcoder that runs and fails is reported here and
//! does not propagate; anything else is returned to the caller.

use movconv_av::{select_encoder, EncodeSettings, Error, Transcode, VendorDetector, FFMPEG};
use std::path::{Path, PathBuf};
use tracing::{debug, error};

/// Options shared by every conversion in a run.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Path to the ffmpeg binary.
    pub ffmpeg: PathBuf,
    /// Encoder quality settings.
    pub settings: EncodeSettings,
    /// Print commands instead of running them.
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            ffmpeg: PathBuf::from(FFMPEG),
            settings: EncodeSettings::default(),
            dry_run: false,
        }
    }
}

/// What happened to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvertOutcome {
    /// ffmpeg succeeded.
    Converted,
    /// ffmpeg ran (or failed to start) and the error was reported.
    Failed,
    /// Dry run; the command was printed only.
    Planned,
}

/// Converts single files with a vendor-selected encoder.
pub struct Converter<D> {
    detector: D,
    options: ConvertOptions,
}

impl<D: VendorDetector> Converter<D> {
    pub fn new(detector: D, options: ConvertOptions) -> Self {
        Self { detector, options }
    }

    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Convert `input` to `output`.
    ///
    /// Vendor detection runs on every call. Transcoder failures are printed
    /// and returned as [`ConvertOutcome::Failed`].
    ///
    /// # Errors
    ///
    /// Returns errors that are not about the transcoder itself, such as the
    /// input file having disappeared.
    pub fn convert(&self, input: &Path, output: &Path) -> movconv_av::Result<ConvertOutcome> {
        let (vendor, encoder) = select_encoder(&self.detector);
        debug!("Vendor {} -> encoder {}", vendor, encoder);

        let job = Transcode::new(input, output, encoder).with_settings(self.options.settings.clone());

        if self.options.dry_run {
            println!("Would run: {}", job.command(&self.options.ffmpeg));
            return Ok(ConvertOutcome::Planned);
        }

        match job.run(&self.options.ffmpeg) {
            Ok(()) => {
                println!("Conversion complete: {}", output.display());
                Ok(ConvertOutcome::Converted)
            }
            Err(
                e @ (Error::ToolFailed { .. }
                | Error::ToolNotFound { .. }
                | Error::SpawnFailed { .. }),
            ) => {
                println!(
                    "Error occurred during conversion of {}: {}",
                    input.display(),
                    e
                );
                error!("Conversion of {:?} failed: {}", input, e);
                Ok(ConvertOutcome::Failed)
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use movconv_av::{FixedVendor, Vendor};

    fn converter(ffmpeg: &str, dry_run: bool) -> Converter<FixedVendor> {
        Converter::new(
            FixedVendor(Vendor::None),
            ConvertOptions {
                ffmpeg: PathBuf::from(ffmpeg),
                dry_run,
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_default_options() {
        let options = ConvertOptions::default();
        assert_eq!(options.ffmpeg, PathBuf::from("ffmpeg"));
        assert_eq!(options.settings.preset, "slow");
        assert_eq!(options.settings.crf, 23);
        assert!(!options.dry_run);
    }

    #[test]
    fn test_dry_run_does_not_spawn() {
        let dir = tempfile::tempdir().unwrap();
        let conv = converter("nonexistent_ffmpeg_12345", true);
        let outcome = conv
            .convert(&dir.path().join("a.mov"), &dir.path().join("a.mp4"))
            .unwrap();
        assert_eq!(outcome, ConvertOutcome::Planned);
    }

    #[test]
    fn test_missing_input_propagates() {
        let dir = tempfile::tempdir().unwrap();
        let conv = converter("ffmpeg", false);
        let err = conv
            .convert(&dir.path().join("gone.mov"), &dir.path().join("gone.mp4"))
            .unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }

    #[test]
    fn test_missing_transcoder_is_reported_not_raised() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.mov");
        std::fs::write(&input, b"").unwrap();

        let conv = converter("nonexistent_ffmpeg_12345", false);
        let outcome = conv.convert(&input, &dir.path().join("a.mp4")).unwrap();
        assert_eq!(outcome, ConvertOutcome::Failed);
    }

    #[cfg(unix)]
    #[test]
    fn test_transcoder_exit_codes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("a.mov");
        std::fs::write(&input, b"").unwrap();
        let output = dir.path().join("a.mp4");

        let ok = converter("true", false).convert(&input, &output).unwrap();
        assert_eq!(ok, ConvertOutcome::Converted);

        let failed = converter("false", false).convert(&input, &output).unwrap();
        assert_eq!(failed, ConvertOutcome::Failed);
    }
}
