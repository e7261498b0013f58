//! Panel buffer encoder: quantize, map to scan order, pack.
//!
//! The pipeline is stateless. Every knob lives in [`EncodeOptions`], so two
//! encodes of the same input with the same options give identical bytes.

use crate::grid::PixelGrid;
use crate::pack::{pack_with_codes, BitOrder, GrayCodes};
use crate::quantize::{BitsPerPixel, Thresholds};
use crate::scan::{map, Rotation};
use crate::{EpdError, Result, PANEL_LONG_SIDE, PANEL_SHORT_SIDE};
use tracing::{debug, trace};

/// Options for [`encode`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodeOptions {
    pub bits_per_pixel: BitsPerPixel,
    pub bit_order: BitOrder,
    pub rotation: Rotation,
    /// Cut points; the count must match `bits_per_pixel`.
    pub thresholds: Thresholds,
    pub gray_codes: GrayCodes,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            bits_per_pixel: BitsPerPixel::One,
            bit_order: BitOrder::Msb,
            rotation: Rotation::None,
            thresholds: Thresholds::default_for(BitsPerPixel::One),
            gray_codes: GrayCodes::Linear,
        }
    }
}

impl EncodeOptions {
    /// Defaults for `bpp`, including its default cut points.
    pub fn for_bpp(bpp: BitsPerPixel) -> Self {
        Self {
            bits_per_pixel: bpp,
            thresholds: Thresholds::default_for(bpp),
            ..Self::default()
        }
    }
}

/// The two image geometries the panel accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PanelGeometry {
    /// 800x480, the panel's native scan layout.
    Landscape,
    /// 480x800, scanned column by column.
    Portrait,
}

impl PanelGeometry {
    pub fn from_dimensions(width: usize, height: usize) -> Result<Self> {
        match (width, height) {
            (PANEL_LONG_SIDE, PANEL_SHORT_SIDE) => Ok(PanelGeometry::Landscape),
            (PANEL_SHORT_SIDE, PANEL_LONG_SIDE) => Ok(PanelGeometry::Portrait),
            _ => Err(EpdError::UnsupportedGeometry { width, height }),
        }
    }

    /// Scan order that puts this geometry onto the panel upright.
    pub fn native_rotation(self) -> Rotation {
        match self {
            PanelGeometry::Landscape => Rotation::None,
            PanelGeometry::Portrait => Rotation::Rotated,
        }
    }

    pub fn dimensions(self) -> (usize, usize) {
        match self {
            PanelGeometry::Landscape => (PANEL_LONG_SIDE, PANEL_SHORT_SIDE),
            PanelGeometry::Portrait => (PANEL_SHORT_SIDE, PANEL_LONG_SIDE),
        }
    }
}

/// Encode RGBA image data into a packed panel buffer.
///
/// # Arguments
/// * `rgba` - Raw RGBA pixel data (4 bytes per pixel: R, G, B, A)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `opts` - Encoding options
///
/// Any non-zero size is accepted; use [`encode_panel`] to also enforce the
/// panel geometry.
#[must_use = "this returns the packed panel buffer"]
pub fn encode(rgba: &[u8], width: usize, height: usize, opts: &EncodeOptions) -> Result<Vec<u8>> {
    opts.thresholds.check(opts.bits_per_pixel)?;

    let grid = PixelGrid::from_rgba(rgba, width, height, opts.bits_per_pixel, &opts.thresholds)?;
    trace!(width, height, "quantized pixel grid");

    let sequence = map(&grid, opts.rotation);
    debug!(
        rotation = %opts.rotation,
        pixels = sequence.len(),
        "mapped scan sequence"
    );

    let bytes = pack_with_codes(
        &sequence,
        opts.bits_per_pixel,
        opts.bit_order,
        opts.gray_codes,
    );
    debug!(
        bpp = opts.bits_per_pixel.bits(),
        bit_order = %opts.bit_order,
        bytes = bytes.len(),
        "packed panel buffer"
    );
    Ok(bytes)
}

/// Encode after checking the image is 800x480 or 480x800.
#[must_use = "this returns the packed panel buffer"]
pub fn encode_panel(
    rgba: &[u8],
    width: usize,
    height: usize,
    opts: &EncodeOptions,
) -> Result<Vec<u8>> {
    PanelGeometry::from_dimensions(width, height)?;
    encode(rgba, width, height, opts)
}
