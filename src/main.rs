mod cli;

use movconv::batch::{BatchDriver, Mode};
use movconv::convert::{ConvertOptions, Converter};
use movconv_av::{
    check_tools, get_tool_path, select_encoder, FixedVendor, Platform, SystemDetector,
    VendorDetector, FFMPEG,
};

use anyhow::{Context, Result};
use clap::Parser;
use cli::{BatchArgs, Cli, Commands};
use serde::Serialize;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "movconv=trace,movconv_av=trace".to_string()
        } else {
            "movconv=info,movconv_av=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .with_writer(std::io::stderr)
        .init();

    let detector = make_detector(&cli);

    match cli.command {
        Commands::Convert(args) => run_batch(args, Mode::All, cli.ffmpeg.as_deref(), detector),
        Commands::ConvertDiff(args) => {
            run_batch(args, Mode::Diff, cli.ffmpeg.as_deref(), detector)
        }
        Commands::Detect { json } => detect(detector.as_ref(), json),
        Commands::CheckTools => check(cli.ffmpeg.as_deref()),
    }
}

fn make_detector(cli: &Cli) -> Box<dyn VendorDetector> {
    match cli.vendor.forced() {
        Some(vendor) => {
            tracing::debug!("Vendor forced to {}", vendor);
            Box::new(FixedVendor(vendor))
        }
        None => Box::new(SystemDetector::new()),
    }
}

fn run_batch(
    args: BatchArgs,
    mode: Mode,
    ffmpeg: Option<&Path>,
    detector: Box<dyn VendorDetector>,
) -> Result<()> {
    // A missing transcoder is an environment problem, not a per-file one.
    let ffmpeg = if args.dry_run {
        ffmpeg.map(Path::to_path_buf).unwrap_or_else(|| PathBuf::from(FFMPEG))
    } else {
        get_tool_path(FFMPEG, ffmpeg).context("ffmpeg is required for conversion")?
    };
    tracing::info!("Using transcoder {:?}", ffmpeg);

    let options = ConvertOptions {
        ffmpeg,
        dry_run: args.dry_run,
        ..Default::default()
    };

    let driver = BatchDriver::new(Converter::new(detector, options));
    let report = driver.run(&args.input_directory, &args.output_directory, mode)?;

    println!("Done: {}", report);
    Ok(())
}

#[derive(Serialize)]
struct Detection {
    platform: Platform,
    vendor: movconv_av::Vendor,
    encoder: movconv_av::Encoder,
    hardware: bool,
}

fn detect(detector: &dyn VendorDetector, json: bool) -> Result<()> {
    let (vendor, encoder) = select_encoder(detector);
    let detection = Detection {
        platform: Platform::current(),
        vendor,
        encoder,
        hardware: encoder.is_hardware(),
    };

    if json {
        let json_str = serde_json::to_string_pretty(&detection)?;
        println!("{}", json_str);
    } else {
        println!("Platform: {:?}", detection.platform);
        println!("Vendor: {}", detection.vendor);
        print!("Encoder: {}", detection.encoder);
        if !detection.hardware {
            print!(" (software)");
        }
        println!();
    }

    Ok(())
}

fn check(ffmpeg: Option<&Path>) -> Result<()> {
    println!("Checking external tools...\n");

    let mut tools = check_tools(Platform::current());
    if let Some(path) = ffmpeg {
        // The configured transcoder replaces the PATH lookup.
        let mut info = movconv_av::check_tool(&path.to_string_lossy(), Some("-version"));
        info.name = FFMPEG.to_string();
        tools[0] = info;
    }

    let mut all_ok = true;

    for tool in &tools {
        let status = if tool.available {
            "✓"
        } else {
            all_ok = false;
            "✗"
        };

        print!("{} {}", status, tool.name);

        if let Some(ref version) = tool.version {
            print!(" ({})", version);
        }

        if let Some(ref path) = tool.path {
            print!(" - {}", path.display());
        }

        println!();
    }

    println!();
    if all_ok {
        println!("All required tools are available!");
    } else {
        println!("Some tools are missing. Without ffmpeg nothing can be converted; without the inventory command the software encoder is used.");
    }

    Ok(())
}
