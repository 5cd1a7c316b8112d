//! GPU vendor detection.
//!
//! Detection runs one OS-native inventory command and sniffs its text output
//! for vendor keywords. The per-platform command and the keyword rules live in
//! a small table ([`Platform::probe`]), so classification can be tested
//! without spawning anything.

use crate::command::ToolCommand;
use serde::Serialize;
use std::fmt;

/// Coarse GPU vendor classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Vendor {
    /// NVIDIA GPU
    Nvidia,
    /// AMD / Radeon GPU
    Amd,
    /// Apple Silicon
    Apple,
    /// Nothing recognised
    #[default]
    None,
}

impl Vendor {
    /// Lowercase name of the vendor.
    pub fn as_str(&self) -> &'static str {
        match self {
            Vendor::Nvidia => "nvidia",
            Vendor::Amd => "amd",
            Vendor::Apple => "apple",
            Vendor::None => "none",
        }
    }
}

impl fmt::Display for Vendor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operating systems with a known inventory command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Linux,
    Windows,
    #[serde(rename = "macos")]
    MacOs,
    Other,
}

/// The inventory command for a platform and the rule that reads its output.
#[derive(Clone, Copy)]
pub struct Probe {
    /// Program to run.
    pub program: &'static str,
    /// Arguments passed to the program.
    pub args: &'static [&'static str],
    /// Classifier applied to the lowercased stdout.
    pub classify: fn(&str) -> Vendor,
}

impl Probe {
    /// Build the command this probe runs.
    pub fn command(&self) -> ToolCommand {
        let mut cmd = ToolCommand::new(self.program);
        cmd.args(self.args.iter().copied());
        cmd
    }
}

static LINUX_PROBE: Probe = Probe {
    program: "lspci",
    args: &[],
    classify: classify_gpu_listing,
};

static WINDOWS_PROBE: Probe = Probe {
    program: "wmic",
    args: &["path", "win32_videocontroller", "get", "name"],
    classify: classify_gpu_listing,
};

static MACOS_PROBE: Probe = Probe {
    program: "sysctl",
    args: &["machdep.cpu.brand_string"],
    classify: classify_cpu_brand,
};

impl Platform {
    /// Platform this binary was built for.
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identity string (as in `std::env::consts::OS`) to a platform.
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            "macos" => Platform::MacOs,
            _ => Platform::Other,
        }
    }

    /// Inventory command for this platform, if it has one.
    pub fn probe(&self) -> Option<&'static Probe> {
        match self {
            Platform::Linux => Some(&LINUX_PROBE),
            Platform::Windows => Some(&WINDOWS_PROBE),
            Platform::MacOs => Some(&MACOS_PROBE),
            Platform::Other => None,
        }
    }

    /// Classify raw inventory output for this platform.
    ///
    /// Matching is case-insensitive. Platforms without a probe always yield
    /// [`Vendor::None`].
    pub fn classify(&self, output: &str) -> Vendor {
        match self.probe() {
            Some(probe) => (probe.classify)(&output.to_lowercase()),
            None => Vendor::None,
        }
    }
}

/// PCI / video-controller listings: nvidia wins over amd.
fn classify_gpu_listing(output: &str) -> Vendor {
    if output.contains("nvidia") {
        Vendor::Nvidia
    } else if output.contains("amd") || output.contains("radeon") {
        Vendor::Amd
    } else {
        Vendor::None
    }
}

/// macOS CPU brand string: Apple Silicon first, then discrete GPUs.
fn classify_cpu_brand(output: &str) -> Vendor {
    if output.contains("apple") || output.contains("m1") || output.contains("m2") {
        Vendor::Apple
    } else if output.contains("amd") || output.contains("radeon") {
        Vendor::Amd
    } else if output.contains("nvidia") {
        Vendor::Nvidia
    } else {
        Vendor::None
    }
}

/// Source of a vendor classification.
pub trait VendorDetector {
    /// Classify the GPU vendor of this machine.
    fn detect(&self) -> Vendor;
}

/// Detector that runs the platform inventory command.
///
/// A missing or failing inventory command is treated as "no vendor" so the
/// software encoder is used.
#[derive(Clone, Copy)]
pub struct SystemDetector {
    probe: Option<&'static Probe>,
}

impl SystemDetector {
    /// Detector for the platform this binary was built for.
    pub fn new() -> Self {
        Self::for_platform(Platform::current())
    }

    /// Detector for an explicit platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            probe: platform.probe(),
        }
    }

    /// Detector running a custom inventory command.
    pub fn with_probe(probe: &'static Probe) -> Self {
        Self { probe: Some(probe) }
    }
}

impl Default for SystemDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl VendorDetector for SystemDetector {
    fn detect(&self) -> Vendor {
        let Some(probe) = self.probe else {
            #[cfg(feature = "tracing")]
            tracing::debug!("No inventory command for this platform");
            return Vendor::None;
        };

        match probe.command().execute() {
            Ok(output) => {
                let vendor = (probe.classify)(&output.stdout.to_lowercase());
                #[cfg(feature = "tracing")]
                tracing::debug!("{} reported vendor {}", probe.program, vendor);
                vendor
            }
            Err(e) => {
                #[cfg(feature = "tracing")]
                tracing::warn!("GPU detection failed, using software encoder: {}", e);
                let _ = e; // Suppress unused warning when tracing is disabled
                Vendor::None
            }
        }
    }
}

/// Detector that always returns the same vendor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedVendor(pub Vendor);

impl VendorDetector for FixedVendor {
    fn detect(&self) -> Vendor {
        self.0
    }
}

impl<D: VendorDetector + ?Sized> VendorDetector for &D {
    fn detect(&self) -> Vendor {
        (**self).detect()
    }
}

impl<D: VendorDetector + ?Sized> VendorDetector for Box<D> {
    fn detect(&self) -> Vendor {
        (**self).detect()
    }
}
