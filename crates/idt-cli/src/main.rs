//! idtool - camera-to-ACES input transform solver CLI
//!
//! Solves 3x3 IDT matrices from camera spectral sensitivity databases or
//! DNG calibration metadata, and lists the hardware a database supports.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod commands;

#[derive(Parser)]
#[command(name = "idtool")]
#[command(author, version, about = "Camera-to-ACES input transform solver")]
#[command(long_about = "
Solves the 3x3 input device transform (IDT) taking a camera's native RGB
into ACES AP0, from either measured spectral sensitivities or DNG
calibration metadata.

Examples:
  idtool spectral -p /data --make nikon --model d200 --illuminant d55
  idtool spectral -p /data --make nikon --model d200 --wb 1.79,1.0,1.40
  idtool metadata shot_metadata.json --json
  idtool list-cameras -p /data
  idtool list-illuminants -p /data
")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Solve an IDT from camera spectral sensitivities
    #[command(visible_alias = "s")]
    Spectral(SpectralArgs),

    /// Solve an IDT from DNG calibration metadata
    #[command(visible_alias = "m")]
    Metadata(MetadataArgs),

    /// List cameras available in the spectral database
    #[command(name = "list-cameras", visible_alias = "lc")]
    ListCameras(DatabaseArgs),

    /// List measured illuminants available in the spectral database
    #[command(name = "list-illuminants", visible_alias = "li")]
    ListIlluminants(DatabaseArgs),
}

#[derive(Args)]
struct DatabaseArgs {
    /// Database directories holding camera/, illuminant/, cmf/, training/
    #[arg(short = 'p', long = "data-path", required = true)]
    data_paths: Vec<PathBuf>,
}

#[derive(Args)]
struct SpectralArgs {
    #[command(flatten)]
    database: DatabaseArgs,

    /// Camera manufacturer (matched case-insensitively)
    #[arg(long)]
    make: String,

    /// Camera model (matched case-insensitively)
    #[arg(long)]
    model: String,

    /// Illuminant name: d55, d6500, 3200k, or a measured illuminant tag
    #[arg(long, conflicts_with = "wb")]
    illuminant: Option<String>,

    /// As-shot white-balance multipliers "r,g,b"; the best-matching
    /// illuminant is selected automatically
    #[arg(long)]
    wb: Option<String>,

    /// Observer colour matching functions, relative to the database
    #[arg(long, default_value = "cmf/cmf_1931.json")]
    observer: String,

    /// Reflectance training set, relative to the database
    #[arg(long, default_value = "training/training_spectral.json")]
    training: String,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MetadataArgs {
    /// DNG metadata JSON file (baseline_exposure, neutral_rgb, calibration)
    input: PathBuf,

    /// Machine-readable output (JSON)
    #[arg(long)]
    json: bool,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Spectral(args) => commands::spectral::run(args),
        Commands::Metadata(args) => commands::metadata::run(args),
        Commands::ListCameras(args) => commands::list::run_cameras(args),
        Commands::ListIlluminants(args) => commands::list::run_illuminants(args),
    }
}
