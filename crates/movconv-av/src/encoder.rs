//! H.264 encoder selection and the ffmpeg command template.

use crate::command::ToolCommand;
use crate::vendor::Vendor;
use crate::{Error, Result};
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};

/// H.264 encoders exposed by ffmpeg.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Encoder {
    /// NVIDIA NVENC
    #[serde(rename = "h264_nvenc")]
    Nvenc,
    /// AMD Advanced Media Framework
    #[serde(rename = "h264_amf")]
    Amf,
    /// Apple VideoToolbox
    #[serde(rename = "h264_videotoolbox")]
    VideoToolbox,
    /// Software x264
    #[serde(rename = "libx264")]
    X264,
}

impl Encoder {
    /// Pick the encoder for a detected vendor.
    pub fn for_vendor(vendor: Vendor) -> Self {
        match vendor {
            Vendor::Nvidia => Encoder::Nvenc,
            Vendor::Amd => Encoder::Amf,
            Vendor::Apple => Encoder::VideoToolbox,
            Vendor::None => Encoder::X264,
        }
    }

    /// Get the ffmpeg codec name.
    pub fn ffmpeg_name(&self) -> &'static str {
        match self {
            Encoder::Nvenc => "h264_nvenc",
            Encoder::Amf => "h264_amf",
            Encoder::VideoToolbox => "h264_videotoolbox",
            Encoder::X264 => "libx264",
        }
    }

    /// Whether this encoder runs on a GPU.
    pub fn is_hardware(&self) -> bool {
        !matches!(self, Encoder::X264)
    }
}

impl fmt::Display for Encoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.ffmpeg_name())
    }
}

/// Quality settings passed to the encoder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EncodeSettings {
    /// Encoder preset.
    pub preset: String,
    /// Constant rate factor.
    pub crf: u8,
}

impl Default for EncodeSettings {
    fn default() -> Self {
        Self {
            preset: "slow".to_string(),
            crf: 23,
        }
    }
}

/// One H.265 → H.264 transcode.
#[derive(Debug, Clone)]
pub struct Transcode {
    input: PathBuf,
    output: PathBuf,
    encoder: Encoder,
    settings: EncodeSettings,
}

impl Transcode {
    /// Create a transcode from `input` to `output` with the given encoder.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>, encoder: Encoder) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            encoder,
            settings: EncodeSettings::default(),
        }
    }

    /// Override the quality settings.
    pub fn with_settings(mut self, settings: EncodeSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Input file.
    pub fn input(&self) -> &Path {
        &self.input
    }

    /// Output file.
    pub fn output(&self) -> &Path {
        &self.output
    }

    /// Chosen encoder.
    pub fn encoder(&self) -> Encoder {
        self.encoder
    }

    /// Build the ffmpeg invocation.
    ///
    /// `-hwaccel auto -i <in> -c:v <enc> -preset <p> -crf <n> -c:a copy <out>`
    pub fn command(&self, ffmpeg: &Path) -> ToolCommand {
        let mut cmd = ToolCommand::new(ffmpeg);
        cmd.args(["-hwaccel", "auto"])
            .arg("-i")
            .arg(self.input.as_os_str())
            .args(["-c:v", self.encoder.ffmpeg_name()])
            .args(["-preset", self.settings.preset.as_str()])
            .arg("-crf")
            .arg(self.settings.crf.to_string())
            .args(["-c:a", "copy"])
            .arg(self.output.as_os_str());
        cmd
    }

    /// Run ffmpeg, streaming its own output to the terminal.
    ///
    /// # Errors
    ///
    /// - [`Error::FileNotFound`] if the input disappeared.
    /// - [`Error::ToolFailed`] if ffmpeg exits non-zero.
    /// - [`Error::ToolNotFound`] / [`Error::SpawnFailed`] if ffmpeg cannot start.
    pub fn run(&self, ffmpeg: &Path) -> Result<()> {
        if !self.input.exists() {
            return Err(Error::file_not_found(&self.input));
        }

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Transcoding {:?} -> {:?} with {}",
            self.input,
            self.output,
            self.encoder
        );

        self.command(ffmpeg).execute_inherited()?;
        Ok(())
    }
}
