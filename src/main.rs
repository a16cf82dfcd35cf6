use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use epd_dither::{DitherAlgorithm, FitPolicy, ResolverKind};
use epd_sender::models::DeviceProfile;
use epd_sender::services::{Artifacts, FramePipeline, HttpTransport};

#[derive(Parser)]
#[command(name = "epd-sender")]
#[command(about = "Encode images for multi-color e-paper panels and push them to the display")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Encode an image into a packed frame file
    Encode {
        /// Source image (PNG, JPEG, BMP, GIF or WebP)
        input: PathBuf,

        /// Output file for the packed frame
        #[arg(short, long)]
        output: PathBuf,

        /// Also write the normalized image as PNG
        #[arg(long)]
        normalized: Option<PathBuf>,

        /// Also write a palette preview of the quantized frame as PNG
        #[arg(long)]
        preview: Option<PathBuf>,

        #[command(flatten)]
        options: EncodeOptions,
    },
    /// Encode an image and POST the frame to the display
    Send {
        /// Source image (PNG, JPEG, BMP, GIF or WebP)
        input: PathBuf,

        /// Receiver URL (overrides the profile's endpoint)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// Request timeout in seconds (overrides the profile)
        #[arg(long)]
        timeout: Option<u64>,

        #[command(flatten)]
        options: EncodeOptions,
    },
    /// Print the effective palette
    Palette {
        /// Device profile (YAML); falls back to $EPD_PROFILE
        #[arg(short, long)]
        profile: Option<PathBuf>,
    },
}

#[derive(Args)]
struct EncodeOptions {
    /// Device profile (YAML); falls back to $EPD_PROFILE
    #[arg(short, long)]
    profile: Option<PathBuf>,

    /// Geometry policy: crop-then-scale or scale-then-crop
    #[arg(long)]
    fit: Option<FitPolicy>,

    /// Error diffusion: floyd-steinberg or atkinson
    #[arg(long)]
    dither: Option<DitherAlgorithm>,

    /// Nearest-color lookup: linear or kd-tree
    #[arg(long)]
    resolver: Option<ResolverKind>,

    /// Never rotate portrait sources
    #[arg(long)]
    no_rotate: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "epd_sender=info,epd_dither=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    match cli.command {
        Commands::Encode {
            input,
            output,
            normalized,
            preview,
            options,
        } => run_encode_command(&input, &output, Artifacts { normalized, preview }, &options),
        Commands::Send {
            input,
            endpoint,
            timeout,
            options,
        } => run_send_command(&input, endpoint, timeout, &options),
        Commands::Palette { profile } => run_palette_command(profile.as_deref()),
    }
}

/// Load the profile from the flag, then $EPD_PROFILE, else built-in defaults
fn load_profile(path: Option<&Path>) -> anyhow::Result<DeviceProfile> {
    let env_path = std::env::var("EPD_PROFILE").ok().map(PathBuf::from);
    match path.or(env_path.as_deref()) {
        Some(path) => Ok(DeviceProfile::load(path)?),
        None => {
            tracing::debug!("No profile given, using Spectra 6 defaults");
            Ok(DeviceProfile::default())
        }
    }
}

/// Apply command-line overrides on top of the profile
fn resolve_profile(options: &EncodeOptions) -> anyhow::Result<DeviceProfile> {
    let mut profile = load_profile(options.profile.as_deref())?;
    if let Some(fit) = options.fit {
        profile.fit = fit;
    }
    if let Some(dither) = options.dither {
        profile.dither = dither;
    }
    if let Some(resolver) = options.resolver {
        profile.resolver = resolver;
    }
    if options.no_rotate {
        profile.auto_rotate = false;
    }
    Ok(profile)
}

fn run_encode_command(
    input: &Path,
    output: &Path,
    artifacts: Artifacts,
    options: &EncodeOptions,
) -> anyhow::Result<()> {
    let profile = resolve_profile(options)?;
    let pipeline = FramePipeline::from_profile(&profile)?;
    let encoding = pipeline.encode_file(input)?;

    // Only touch the filesystem once the whole frame exists
    std::fs::write(output, encoding.frame().as_bytes())?;
    pipeline.write_artifacts(&encoding, &artifacts)?;

    println!(
        "Encoded {} -> {} ({} bytes)",
        input.display(),
        output.display(),
        encoding.frame().len()
    );
    Ok(())
}

fn run_send_command(
    input: &Path,
    endpoint: Option<String>,
    timeout: Option<u64>,
    options: &EncodeOptions,
) -> anyhow::Result<()> {
    let profile = resolve_profile(options)?;
    let endpoint = endpoint
        .or_else(|| profile.endpoint.clone())
        .ok_or(epd_sender::error::SenderError::MissingEndpoint)?;
    let timeout = Duration::from_secs(timeout.unwrap_or(profile.timeout_secs).max(1));

    let pipeline = FramePipeline::from_profile(&profile)?;
    let encoding = pipeline.encode_file(input)?;
    let transport = HttpTransport::new(endpoint, timeout)?;
    let status = pipeline.deliver(&encoding, &transport);

    println!("{} -> {}: {status}", input.display(), transport.endpoint());
    if !status.is_ok() {
        anyhow::bail!("display reported {status}");
    }
    Ok(())
}

fn run_palette_command(profile: Option<&Path>) -> anyhow::Result<()> {
    let profile = load_profile(profile)?;
    let palette = profile.palette()?;

    println!("Panel: {}x{}", profile.width, profile.height);
    println!("Palette ({} colors):", palette.len());
    for entry in palette.entries() {
        println!(
            "  {:#03x}  {}  {}",
            entry.code,
            entry.color,
            profile.color_name(entry.code).unwrap_or("-")
        );
    }
    Ok(())
}
