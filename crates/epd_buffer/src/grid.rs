//! Quantized pixel grid built from an RGBA buffer.

use crate::quantize::{quantize, BitsPerPixel, Thresholds};
use crate::{EpdError, Result};

/// One quantized source pixel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub x: usize,
    pub y: usize,
    /// Gray level, `0` = white.
    pub level: u8,
}

/// `width x height` quantized pixels stored row-major.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PixelGrid {
    width: usize,
    height: usize,
    pixels: Vec<Pixel>,
}

impl PixelGrid {
    /// Quantize an RGBA buffer (4 bytes per pixel, row-major).
    pub fn from_rgba(
        rgba: &[u8],
        width: usize,
        height: usize,
        bpp: BitsPerPixel,
        thresholds: &Thresholds,
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width
            .checked_mul(height)
            .and_then(|n| n.checked_mul(4))
            .ok_or(EpdError::InvalidDimensions { width, height })?;
        if rgba.len() != expected {
            return Err(EpdError::BufferSizeMismatch {
                expected,
                actual: rgba.len(),
            });
        }

        let pixels = rgba
            .chunks_exact(4)
            .enumerate()
            .map(|(i, c)| Pixel {
                x: i % width,
                y: i / width,
                level: quantize(c, bpp, thresholds),
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    /// Build a grid from already quantized row-major levels.
    ///
    /// Every level must fit `bpp`, otherwise [`EpdError::LevelOutOfRange`].
    pub fn from_levels(
        width: usize,
        height: usize,
        bpp: BitsPerPixel,
        levels: &[u8],
    ) -> Result<Self> {
        check_dimensions(width, height)?;
        let expected = width
            .checked_mul(height)
            .ok_or(EpdError::InvalidDimensions { width, height })?;
        if levels.len() != expected {
            return Err(EpdError::BufferSizeMismatch {
                expected,
                actual: levels.len(),
            });
        }
        let max = bpp.max_level();
        if let Some(&level) = levels.iter().find(|&&l| l > max) {
            return Err(EpdError::LevelOutOfRange { level, max });
        }

        let pixels = levels
            .iter()
            .enumerate()
            .map(|(i, &level)| Pixel {
                x: i % width,
                y: i / width,
                level,
            })
            .collect();

        Ok(Self {
            width,
            height,
            pixels,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// All pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Pixel] {
        &self.pixels
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Pixel> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }
}

fn check_dimensions(width: usize, height: usize) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(EpdError::InvalidDimensions { width, height });
    }
    Ok(())
}
