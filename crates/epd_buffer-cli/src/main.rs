//! epd-buffer - Convert images into e-paper framebuffers
//!
//! Reads an 800x480 or 480x800 image and writes a C source file holding the
//! packed panel buffer as an `unsigned char` array.

use clap::{ArgAction, Parser};
use epd_buffer::{
    encode_panel, render_c_array, BitOrder, BitsPerPixel, EncodeOptions, EpdError, GrayCodes,
    PanelGeometry, Rotation, Thresholds,
};
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "epd-buffer")]
#[command(version)]
#[command(
    about = "Convert an image into a packed C framebuffer array for e-paper panels",
    long_about = None
)]
struct Cli {
    /// Input image file (PNG, JPEG, GIF, WebP), 800x480 or 480x800
    input: PathBuf,

    /// Output C source file
    output: PathBuf,

    /// Which end of each byte receives the first pixel (MSB or LSB)
    #[arg(long, default_value = "MSB")]
    bit_order: BitOrder,

    /// Name of the generated array
    #[arg(long, default_value = "output")]
    name: String,

    /// Force the rotated column scan (480x800 images always use it)
    #[arg(long)]
    rotate: bool,

    /// Rotated scan skips the first column, like older converters did
    #[arg(long)]
    legacy_rotation: bool,

    /// Output depth (1 or 2)
    #[arg(long, default_value_t = 1)]
    bits_per_pixel: u8,

    /// Black/white cut point for 1 bpp [default: 128]
    #[arg(long)]
    threshold: Option<u8>,

    /// Gray cut points for 2 bpp, comma separated [default: 230,200,140]
    #[arg(long, value_delimiter = ',')]
    thresholds: Option<Vec<u8>>,

    /// Derive cut points from the image's brightness percentiles
    #[arg(long, conflicts_with_all = ["threshold", "thresholds"])]
    auto_levels: bool,

    /// Gray level numbering of the controller (linear or waveshare)
    #[arg(long, default_value = "linear")]
    gray_codes: GrayCodes,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to open '{}': {source}", path.display())]
    Image {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("failed to write '{}': {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("{0}")]
    Config(String),

    #[error(transparent)]
    Encode(#[from] EpdError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Status lines and chosen cut points are `info`, so they show by default.
fn log_level(verbose: u8) -> &'static str {
    match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbose: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level(verbose)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let img = image::open(&cli.input).map_err(|source| CliError::Image {
        path: cli.input.clone(),
        source,
    })?;
    let rgba_img = img.to_rgba8();
    let (width, height) = rgba_img.dimensions();
    let (width, height) = (width as usize, height as usize);
    let pixels = rgba_img.into_raw();

    let geometry = PanelGeometry::from_dimensions(width, height)?;
    let opts = encode_options(cli, geometry, &pixels)?;

    info!(
        "Encoding '{}' ({}x{}) at {} bpp, {} bit order, {} scan, cut points {:?}",
        cli.input.display(),
        width,
        height,
        opts.bits_per_pixel,
        opts.bit_order,
        opts.rotation,
        opts.thresholds.cuts()
    );

    let bytes = encode_panel(&pixels, width, height, &opts)?;
    let source = render_c_array(&cli.name, &bytes)?;
    write_output(&cli.output, source.as_bytes())?;

    info!(
        "Written {} bytes as '{}' to '{}'",
        bytes.len(),
        cli.name,
        cli.output.display()
    );
    Ok(())
}

/// Map the flag set onto explicit encoder options.
fn encode_options(
    cli: &Cli,
    geometry: PanelGeometry,
    rgba: &[u8],
) -> Result<EncodeOptions, CliError> {
    let bpp = BitsPerPixel::try_from(cli.bits_per_pixel)?;

    let thresholds = if cli.auto_levels {
        Thresholds::auto_levels(rgba, bpp)
    } else {
        match (bpp, cli.threshold, cli.thresholds.as_deref()) {
            (_, Some(_), Some(_)) => {
                return Err(CliError::Config(
                    "--threshold and --thresholds cannot be combined".to_string(),
                ))
            }
            (BitsPerPixel::Two, Some(t), None) => {
                return Err(CliError::Config(format!(
                    "--threshold {t} only applies to 1 bpp; use --thresholds for 2 bpp"
                )))
            }
            (_, Some(t), None) => Thresholds::single(t),
            (_, None, Some(cuts)) => Thresholds::new(bpp, cuts)?,
            (_, None, None) => Thresholds::default_for(bpp),
        }
    };

    Ok(EncodeOptions {
        bits_per_pixel: bpp,
        bit_order: cli.bit_order,
        rotation: scan_rotation(cli, geometry),
        thresholds,
        gray_codes: cli.gray_codes,
    })
}

fn scan_rotation(cli: &Cli, geometry: PanelGeometry) -> Rotation {
    let rotated = cli.rotate || geometry.native_rotation().is_rotated();
    match (rotated, cli.legacy_rotation) {
        (false, legacy) => {
            if legacy {
                warn!("--legacy-rotation has no effect on a row-major scan");
            }
            Rotation::None
        }
        (true, false) => Rotation::Rotated,
        (true, true) => Rotation::RotatedLegacy,
    }
}

/// Write through a sibling temp file so a failed run never leaves a
/// truncated output behind.
fn write_output(path: &Path, contents: &[u8]) -> Result<(), CliError> {
    let mut tmp = OsString::from(path.as_os_str());
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let result = fs::write(&tmp, contents).and_then(|()| fs::rename(&tmp, path));
    if let Err(source) = result {
        let _ = fs::remove_file(&tmp);
        return Err(CliError::Write {
            path: path.to_path_buf(),
            source,
        });
    }
    Ok(())
}
