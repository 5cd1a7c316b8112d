use clap::{Args, Parser, Subcommand, ValueEnum};
use movconv_av::Vendor;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "movconv")]
#[command(author, version, about = "Batch convert H.265 .mov files to H.264 .mp4 with ffmpeg")]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to the ffmpeg binary (defaults to ffmpeg on PATH)
    #[arg(long, global = true, env = "MOVCONV_FFMPEG")]
    pub ffmpeg: Option<PathBuf>,

    /// GPU vendor to encode for, instead of detecting it
    #[arg(long, global = true, value_enum, default_value_t = VendorChoice::Auto)]
    pub vendor: VendorChoice,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert all MOV files in the input directory
    Convert(BatchArgs),

    /// Convert only MOV files not already in the output directory
    ConvertDiff(BatchArgs),

    /// Detect the GPU vendor and show the encoder that would be used
    Detect {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that required external tools are available
    CheckTools,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Path to the input directory containing MOV files
    pub input_directory: PathBuf,

    /// Path to the output directory where results will be saved
    pub output_directory: PathBuf,

    /// Print the ffmpeg commands without running them
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum VendorChoice {
    Auto,
    Nvidia,
    Amd,
    Apple,
    None,
}

impl VendorChoice {
    /// The forced vendor, or `None` when detection should run.
    pub fn forced(self) -> Option<Vendor> {
        match self {
            VendorChoice::Auto => Option::None,
            VendorChoice::Nvidia => Some(Vendor::Nvidia),
            VendorChoice::Amd => Some(Vendor::Amd),
            VendorChoice::Apple => Some(Vendor::Apple),
            VendorChoice::None => Some(Vendor::None),
        }
    }
}
