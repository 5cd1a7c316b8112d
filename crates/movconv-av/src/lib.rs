//! # movconv-av
//!
//! Hardware encoder selection and ffmpeg invocation for H.265 → H.264
//! conversion.
//!
//! This crate provides functionality for:
//! - Classifying the GPU vendor from OS inventory commands (`lspci`, `wmic`, `sysctl`)
//! - Mapping a vendor to an ffmpeg H.264 encoder
//! - Building and running the ffmpeg command line
//! - Locating external tools
//!
//! ## Features
//!
//! - `tracing` - Enable tracing support
//!
//! ## Example
//!
//! ```no_run
//! use movconv_av::{Encoder, SystemDetector, Transcode, VendorDetector};
//! use std::path::Path;
//!
//! let vendor = SystemDetector::new().detect();
//! let job = Transcode::new("in.mov", "in.mp4", Encoder::for_vendor(vendor));
//! job.run(Path::new("ffmpeg"))?;
//! # Ok::<(), movconv_av::Error>(())
//! ```

pub mod command;
pub mod encoder;
mod error;
pub mod tools;
pub mod vendor;

// Re-exports
pub use command::{ToolCommand, ToolOutput};
pub use encoder::{EncodeSettings, Encoder, Transcode};
pub use error::{Error, Result};
pub use tools::{check_tool, check_tools, get_tool_path, require_tool, ToolInfo, FFMPEG};
pub use vendor::{FixedVendor, Platform, SystemDetector, Vendor, VendorDetector};

/// Detect the vendor of this machine and return the encoder to use.
///
/// Detection is not cached; every call runs the inventory command again.
pub fn select_encoder<D: VendorDetector + ?Sized>(detector: &D) -> (Vendor, Encoder) {
    let vendor = detector.detect();
    (vendor, Encoder::for_vendor(vendor))
}
