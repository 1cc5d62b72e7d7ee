use std::path::{Path, PathBuf};

use anyhow::{ensure, Context, Result};
use clap::{Parser, Subcommand};
use env_logger::Builder;
use log::{info, warn, LevelFilter};

use censor::censor::censor;
use censor::config::EncodeSettings;
use censor::error::{HeaderError, UnlayoutError};
use censor::layout::{layout, unlayout};
use censor::mask::mask_from_difference;
use censor::restore::restore;

mod io;
mod tasks;

/// Censor images while hiding the censored blocks inside the output, and
/// restore them again
#[derive(Parser)]
#[command(name = "censor", version)]
struct Cli {
    /// Log layout and censoring details
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Censor an image where its edited copy differs, embedding the originals
    Encode {
        /// Input image. When omitted, every image in --dir is processed
        /// except `*_m` masks and `*_o` outputs
        #[arg(long)]
        input: Option<PathBuf>,
        /// Edited copy of the input [default: <input>_m.<ext>]
        #[arg(long)]
        mask: Option<PathBuf>,
        /// Output image [default: <input>_o.jpg]
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory scanned when --input is omitted
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// JPEG output quality (1-100)
        #[arg(long, default_value = "90")]
        quality: u8,
        /// Masked cells in a row that reuse one paint color
        #[arg(long)]
        maskgrid: Option<u32>,
        /// Color distance at which a pixel counts as edited
        #[arg(long)]
        colordistthres: Option<u32>,
        /// TOML settings file; flags override its values
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Restore the original image from a censored one
    Decode {
        /// Input image. When omitted, every image in --dir is processed
        /// except `*_r` and `restored_*` files
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output image [default: restored_<input>.jpg]
        #[arg(long)]
        output: Option<PathBuf>,
        /// Directory scanned when --input is omitted
        #[arg(long, default_value = ".")]
        dir: PathBuf,
        /// JPEG output quality (1-100)
        #[arg(long, default_value = "90")]
        quality: u8,
    },
}

fn init_logger(verbose: bool, quiet: bool) {
    let level = if verbose {
        LevelFilter::Debug
    } else if quiet {
        LevelFilter::Warn
    } else {
        LevelFilter::Info
    };
    Builder::new()
        .filter_level(level)
        .format_timestamp(None)
        .format_target(false)
        .parse_default_env()
        .init();
}

fn load_settings(path: Option<&Path>) -> Result<EncodeSettings> {
    let Some(path) = path else {
        return Ok(EncodeSettings::default());
    };
    let toml_str = std::fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    EncodeSettings::from_toml(&toml_str)
        .with_context(|| format!("parsing settings from {}", path.display()))
}

fn check_quality(quality: u8) -> Result<()> {
    ensure!((1..=100).contains(&quality), "invalid quality: {quality}");
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose, cli.quiet);

    match cli.command {
        Command::Encode {
            input,
            mask,
            output,
            dir,
            quality,
            maskgrid,
            colordistthres,
            config,
        } => {
            check_quality(quality)?;
            let mut settings = load_settings(config.as_deref())?;
            if let Some(g) = maskgrid {
                settings.censor.paint_reuse = g;
            }
            if let Some(t) = colordistthres {
                settings.mask.color_dist_threshold = t;
            }
            let tasks = tasks::encode_tasks(&dir, input, mask, output)?;
            cmd_encode(&tasks, &settings, quality)
        }
        Command::Decode {
            input,
            output,
            dir,
            quality,
        } => {
            check_quality(quality)?;
            let batch = input.is_none();
            let tasks = tasks::decode_tasks(&dir, input, output)?;
            cmd_decode(&tasks, quality, batch)
        }
    }
}

fn cmd_encode(tasks: &[tasks::Task], settings: &EncodeSettings, quality: u8) -> Result<()> {
    ensure!(!tasks.is_empty(), "no input file");

    for task in tasks {
        let mask_path = task
            .mask
            .as_deref()
            .context("encode task without a mask path")?;
        let input = io::load_image(&task.input)?;
        let edited = io::load_image(mask_path)?;
        ensure!(
            (input.width, input.height) == (edited.width, edited.height),
            "different image size for `{}` and `{}`",
            task.input.display(),
            mask_path.display()
        );

        info!("{} -> {}", task.input.display(), task.output.display());
        let mask = mask_from_difference(&input, &edited, &settings.mask)?;
        let result = censor(&input, &mask, &settings.censor)?;
        info!("  {} blocks censored", result.blocks.len());
        io::save_image(layout(result), &task.output, quality)?;
    }
    Ok(())
}

/// Whether a batch run should pass over this file rather than stop.
fn not_censored(err: &UnlayoutError) -> bool {
    matches!(
        err,
        UnlayoutError::Header(HeaderError::WrongFormat) | UnlayoutError::TooSmall { .. }
    )
}

fn cmd_decode(tasks: &[tasks::Task], quality: u8, batch: bool) -> Result<()> {
    ensure!(!tasks.is_empty(), "no input file");

    for task in tasks {
        let img = io::load_image(&task.input)?;
        let result = match unlayout(img) {
            Ok(result) => result,
            Err(e) if batch && not_censored(&e) => {
                warn!("skipping {}: {e}", task.input.display());
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("decoding {}", task.input.display()));
            }
        };

        info!("{} -> {}", task.input.display(), task.output.display());
        io::save_image(restore(result), &task.output, quality)?;
    }
    Ok(())
}
