//! # epd_buffer
//!
//! Encode RGBA images into the packed framebuffer layout an e-paper panel
//! controller expects.
//!
//! ## Pipeline
//!
//! - **Quantizer** ([`quantize`]): maps each pixel to a 1 or 2 bit gray level
//!   using ordered threshold comparison.
//! - **Scan-order mapper** ([`scan`]): reorders the grid into the panel's
//!   native scan sequence, optionally rotated by 90°.
//! - **Bit packer** ([`pack`]): packs 8 (1 bpp) or 4 (2 bpp) pixels per byte
//!   in MSB or LSB order and inverts the result for the controller's
//!   active-low convention.
//!
//! ## Quick Start
//!
//! ```ignore
//! use epd_buffer::{encode_panel, render_c_array, EncodeOptions, PanelGeometry};
//!
//! // 800x480 RGBA image data (4 bytes per pixel)
//! let rgba = vec![255u8; 800 * 480 * 4];
//! let opts = EncodeOptions {
//!     rotation: PanelGeometry::Landscape.native_rotation(),
//!     ..EncodeOptions::default()
//! };
//! let bytes = encode_panel(&rgba, 800, 480, &opts)?;
//! let source = render_c_array("output", &bytes)?;
//! ```

use thiserror::Error;

pub mod c_array;
pub mod encoder;
pub mod grid;
pub mod pack;
pub mod quantize;
pub mod scan;

pub use c_array::render_c_array;
pub use encoder::{encode, encode_panel, EncodeOptions, PanelGeometry};
pub use grid::{Pixel, PixelGrid};
pub use pack::{pack, pack_with_codes, BitOrder, GrayCodes};
pub use quantize::{quantize, BitsPerPixel, Thresholds};
pub use scan::{map, Rotation};

/// Errors that can occur while encoding a panel buffer.
#[derive(Debug, Error)]
pub enum EpdError {
    /// Width or height is zero
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    /// Buffer size doesn't match expected size for dimensions
    #[error("buffer size mismatch: expected {expected} bytes, got {actual}")]
    BufferSizeMismatch { expected: usize, actual: usize },

    /// Image is not one of the supported panel geometries
    #[error("unsupported image resolution: {width} x {height} (expected 800 x 480 or 480 x 800)")]
    UnsupportedGeometry { width: usize, height: usize },

    #[error("unsupported bits per pixel: {0} (expected 1 or 2)")]
    UnsupportedBitsPerPixel(u8),

    #[error("unsupported bit order: {0} (expected MSB or LSB)")]
    UnsupportedBitOrder(String),

    #[error("unsupported gray codes: {0} (expected linear or waveshare)")]
    UnsupportedGrayCodes(String),

    /// Threshold list length doesn't match the level count
    #[error("{bits_per_pixel} bpp needs {expected} threshold(s), got {actual}")]
    ThresholdCount {
        bits_per_pixel: u8,
        expected: usize,
        actual: usize,
    },

    /// Gray level outside `0..=2^bpp - 1`
    #[error("gray level {level} out of range (max {max})")]
    LevelOutOfRange { level: u8, max: u8 },

    /// Output array name is not a valid C identifier
    #[error("invalid array name: {0:?}")]
    InvalidArrayName(String),
}

/// Result type for encoder operations.
pub type Result<T> = core::result::Result<T, EpdError>;

/// Width of the landscape panel in pixels.
pub const PANEL_LONG_SIDE: usize = 800;
/// Height of the landscape panel in pixels.
pub const PANEL_SHORT_SIDE: usize = 480;
