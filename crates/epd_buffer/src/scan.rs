//! Scan-order mapping from the row-major grid to the panel's native order.

use crate::grid::{Pixel, PixelGrid};
use std::fmt;

/// How the grid is walked when building the scan sequence.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rotation {
    /// Row-major: `y` outer, `x` inner, both ascending.
    #[default]
    None,
    /// Columns from `width - 1` down to `0`, each column top to bottom.
    /// Used for portrait images on a landscape-scanning panel.
    Rotated,
    /// Like [`Rotation::Rotated`] but column `0` is never visited, so the
    /// sequence is `(width - 1) * height` pixels long. Reproduces buffers
    /// produced by older converters.
    RotatedLegacy,
}

impl Rotation {
    /// Number of pixels [`map`] emits for a `width x height` grid.
    pub fn sequence_len(self, width: usize, height: usize) -> usize {
        match self {
            Rotation::None | Rotation::Rotated => width * height,
            Rotation::RotatedLegacy => width.saturating_sub(1) * height,
        }
    }

    #[inline]
    pub fn is_rotated(self) -> bool {
        !matches!(self, Rotation::None)
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Rotation::None => "none",
            Rotation::Rotated => "rotated",
            Rotation::RotatedLegacy => "rotated-legacy",
        })
    }
}

/// Reorder `grid` into the sequence the panel receives.
pub fn map(grid: &PixelGrid, rotation: Rotation) -> Vec<Pixel> {
    let (width, height) = (grid.width(), grid.height());
    let pixels = grid.pixels();

    match rotation {
        Rotation::None => pixels.to_vec(),
        Rotation::Rotated => rotated_columns(pixels, width, height, 0),
        Rotation::RotatedLegacy => rotated_columns(pixels, width, height, 1),
    }
}

/// Walk columns `width - 1 ..= first_column` in descending order.
fn rotated_columns(
    pixels: &[Pixel],
    width: usize,
    height: usize,
    first_column: usize,
) -> Vec<Pixel> {
    let mut out = Vec::with_capacity(width.saturating_sub(first_column) * height);
    for x in (first_column..width).rev() {
        for y in 0..height {
            out.push(pixels[y * width + x]);
        }
    }
    out
}
