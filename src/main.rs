use anyhow::Context;
use clap::{Parser, Subcommand};
use pixel_grid::Rgb;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use repixel::models::{AppConfig, RegionConfig, RegionRect, Session};
use repixel::services::{load_png, save_png, RestorePipeline};

#[derive(Parser)]
#[command(name = "repixel")]
#[command(about = "Recover the original pixels of upscaled pixel art")]
struct Cli {
    /// Config file (default: $REPIXEL_CONFIG if set)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log debug detail, including every detection candidate
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Detect the pixel size of an image
    Detect {
        /// Input PNG
        input: PathBuf,

        /// Largest block size to try
        #[arg(long)]
        max_check: Option<usize>,

        /// Fraction of sampled blocks that must be uniform
        #[arg(long)]
        threshold: Option<f64>,
    },
    /// Restore an image on a uniform grid
    Restore {
        /// Input PNG
        input: PathBuf,

        /// Output PNG (default: <input stem>_real.png next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Cell size in pixels (detected when omitted)
        #[arg(short, long)]
        size: Option<usize>,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_x: i64,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_y: i64,

        /// Bits per channel, 1-8
        #[arg(short, long)]
        bits: Option<u8>,

        /// Background color to make transparent (up to two)
        #[arg(short, long)]
        exclude: Vec<Rgb>,

        /// Per-channel tolerance for --exclude
        #[arg(short, long)]
        tolerance: Option<u8>,

        /// Only restore this part of the input: X1,Y1,X2,Y2
        #[arg(long)]
        region: Option<RegionRect>,

        /// Re-compress the output with oxipng
        #[arg(long)]
        optimize: bool,
    },
    /// Write an editable session with a grid seeded from detection
    Init {
        /// Input PNG
        input: PathBuf,

        /// Session file (.yaml or .json)
        #[arg(short, long)]
        output: PathBuf,

        /// Cell size in pixels (detected when omitted)
        #[arg(short, long)]
        size: Option<usize>,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_x: i64,

        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        offset_y: i64,
    },
    /// Restore every region of a session
    Apply {
        /// Session file (.yaml or .json)
        session: PathBuf,

        /// Output directory (default: next to the source image)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "repixel=debug"
    } else {
        "repixel=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    let config = AppConfig::load(cli.config.as_deref()).context("Failed to load config")?;
    let pipeline = RestorePipeline::new(Arc::new(config));

    match cli.command {
        Commands::Detect {
            input,
            max_check,
            threshold,
        } => run_detect_command(pipeline, &input, max_check, threshold),
        Commands::Restore {
            input,
            output,
            size,
            offset_x,
            offset_y,
            bits,
            exclude,
            tolerance,
            region,
            optimize,
        } => {
            let region = RegionConfig {
                rect: region,
                cell_size: size,
                offset_x,
                offset_y,
                bit_depth: bits,
                tolerance,
                exclude: (!exclude.is_empty())
                    .then(|| exclude.iter().map(|c| c.to_hex()).collect()),
                ..RegionConfig::default()
            };
            run_restore_command(&pipeline, &input, output, region, optimize)
        }
        Commands::Init {
            input,
            output,
            size,
            offset_x,
            offset_y,
        } => {
            let region = RegionConfig {
                cell_size: size,
                offset_x,
                offset_y,
                ..RegionConfig::default()
            };
            run_init_command(&pipeline, &input, &output, region)
        }
        Commands::Apply { session, output } => {
            run_apply_command(&pipeline, &session, output.as_deref())
        }
    }
}

/// Print the detected pixel size and the resulting output dimensions
fn run_detect_command(
    pipeline: RestorePipeline,
    input: &Path,
    max_check: Option<usize>,
    threshold: Option<f64>,
) -> anyhow::Result<()> {
    let mut config = pipeline.config().clone();
    if let Some(max_check) = max_check {
        config.detection.max_check = max_check;
    }
    if let Some(threshold) = threshold {
        config.detection.threshold = threshold;
    }
    config.validate().context("Invalid detection options")?;
    let pipeline = RestorePipeline::new(Arc::new(config));

    let buffer = load_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let detection = pipeline.detect(&buffer);
    if detection.found() {
        println!(
            "{}: pixel size {} -> {}x{}",
            input.display(),
            detection.size,
            buffer.width() / detection.size,
            buffer.height() / detection.size
        );
    } else {
        println!("{}: no repeating pattern found", input.display());
    }
    Ok(())
}

/// Restore one image (or one region of it) on a uniform grid
fn run_restore_command(
    pipeline: &RestorePipeline,
    input: &Path,
    output: Option<PathBuf>,
    mut region: RegionConfig,
    optimize: bool,
) -> anyhow::Result<()> {
    let image = load_png(input).with_context(|| format!("Failed to read {}", input.display()))?;

    if region.cell_size.is_none() {
        let buffer = pipeline.region_buffer(&image, &region)?;
        let detection = pipeline.detect(&buffer);
        if !detection.found() {
            println!(
                "{}: no repeating pattern found, use --size to set the pixel size",
                input.display()
            );
            return Ok(());
        }
        region.cell_size = Some(detection.size);
    }

    let restored = pipeline.run_region(&image, &region)?;
    let output = output.unwrap_or_else(|| pipeline.output_path(input, None, None));
    let optimize = optimize || pipeline.config().output.optimize;
    let bytes = save_png(&output, &restored, optimize)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!(
        "Restored {} ({}x{}, {} bytes)",
        output.display(),
        restored.width(),
        restored.height(),
        bytes
    );
    Ok(())
}

/// Write a session file holding a detection-seeded grid
fn run_init_command(
    pipeline: &RestorePipeline,
    input: &Path,
    output: &Path,
    region: RegionConfig,
) -> anyhow::Result<()> {
    let image = load_png(input).with_context(|| format!("Failed to read {}", input.display()))?;
    let region = pipeline.seed_region(&image, region)?;

    let mut session = Session::new(session_source(input, output));
    session.regions.push(region);
    session
        .save(output)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    println!("Wrote session {}", output.display());
    Ok(())
}

/// Store the source relative to the session file when both share a directory
fn session_source(input: &Path, session_path: &Path) -> PathBuf {
    let session_dir = session_path.parent().unwrap_or(Path::new(""));
    match (input.parent(), input.file_name()) {
        (Some(dir), Some(name)) if dir == session_dir => PathBuf::from(name),
        _ => std::path::absolute(input).unwrap_or_else(|_| input.to_path_buf()),
    }
}

/// Replay a session and write one output per region
fn run_apply_command(
    pipeline: &RestorePipeline,
    session_path: &Path,
    out_dir: Option<&Path>,
) -> anyhow::Result<()> {
    let session = Session::load(session_path)
        .with_context(|| format!("Failed to read session {}", session_path.display()))?;
    let source = session.resolve_source(session_path);
    let image = load_png(&source).with_context(|| format!("Failed to read {}", source.display()))?;

    let outputs = pipeline.run_session(&session, &image)?;
    let numbered = outputs.len() > 1;
    let optimize = pipeline.config().output.optimize;
    for (i, restored) in outputs.iter().enumerate() {
        let path = pipeline.output_path(&source, out_dir, numbered.then_some(i + 1));
        let bytes = save_png(&path, restored, optimize)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        println!(
            "Restored {} ({}x{}, {} bytes)",
            path.display(),
            restored.width(),
            restored.height(),
            bytes
        );
    }
    Ok(())
}
