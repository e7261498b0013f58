//! Threshold quantizer mapping RGB(A) pixels to panel gray levels.
//!
//! Level `0` is always the brightest (white) level and `2^bpp - 1` the
//! darkest (black), regardless of how the controller encodes them on the wire.
//!
//! The two depths use different decision rules:
//! - 1 bpp: a pixel is black when *all* of R, G and B are at or below the cut
//!   point.
//! - 2 bpp: cut points are walked from brightest to darkest and the first one
//!   exceeded by *any* of R, G or B picks the level.

use crate::{EpdError, Result};
use std::fmt;

/// Quantized depth of the output buffer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitsPerPixel {
    /// Black and white, 8 pixels per byte.
    #[default]
    One,
    /// Four gray levels, 4 pixels per byte.
    Two,
}

impl BitsPerPixel {
    #[inline]
    pub fn bits(self) -> u8 {
        match self {
            BitsPerPixel::One => 1,
            BitsPerPixel::Two => 2,
        }
    }

    #[inline]
    pub fn pixels_per_byte(self) -> usize {
        8 / self.bits() as usize
    }

    /// Darkest representable level (`2^bpp - 1`).
    #[inline]
    pub fn max_level(self) -> u8 {
        (1u8 << self.bits()) - 1
    }

    /// Number of cut points needed to separate all levels.
    #[inline]
    pub fn threshold_count(self) -> usize {
        self.max_level() as usize
    }
}

impl TryFrom<u8> for BitsPerPixel {
    type Error = EpdError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            1 => Ok(BitsPerPixel::One),
            2 => Ok(BitsPerPixel::Two),
            other => Err(EpdError::UnsupportedBitsPerPixel(other)),
        }
    }
}

impl fmt::Display for BitsPerPixel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bits())
    }
}

/// Ordered brightness cut points, stored brightest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Thresholds {
    cuts: Vec<u8>,
}

impl Thresholds {
    /// Default black/white cut point.
    pub const DEFAULT_1BPP: u8 = 128;
    /// Default gray cut points, brightest first.
    pub const DEFAULT_2BPP: [u8; 3] = [230, 200, 140];

    /// Build a threshold set for `bpp` from cut points given in any order.
    pub fn new(bpp: BitsPerPixel, cuts: &[u8]) -> Result<Self> {
        let expected = bpp.threshold_count();
        if cuts.len() != expected {
            return Err(EpdError::ThresholdCount {
                bits_per_pixel: bpp.bits(),
                expected,
                actual: cuts.len(),
            });
        }
        let mut cuts = cuts.to_vec();
        cuts.sort_unstable_by(|a, b| b.cmp(a));
        Ok(Self { cuts })
    }

    /// Single black/white cut point for 1 bpp.
    pub fn single(cut: u8) -> Self {
        Self { cuts: vec![cut] }
    }

    /// The fixed default cut points for `bpp`.
    pub fn default_for(bpp: BitsPerPixel) -> Self {
        match bpp {
            BitsPerPixel::One => Self::single(Self::DEFAULT_1BPP),
            BitsPerPixel::Two => Self {
                cuts: Self::DEFAULT_2BPP.to_vec(),
            },
        }
    }

    /// Derive cut points from the image's own brightness distribution.
    ///
    /// Brightness is `max(R, G, B)`, matching the any-channel rule. Cut point
    /// `k` of `n` sits at percentile `k / (n + 1)` of the sorted brightness
    /// values, so the same image always produces the same cut points. An empty
    /// buffer falls back to [`Thresholds::default_for`].
    pub fn auto_levels(rgba: &[u8], bpp: BitsPerPixel) -> Self {
        let mut histogram = [0usize; 256];
        let mut total = 0usize;
        for px in rgba.chunks_exact(4) {
            histogram[brightness(px) as usize] += 1;
            total += 1;
        }
        if total == 0 {
            return Self::default_for(bpp);
        }

        let n = bpp.threshold_count();
        let mut cuts = Vec::with_capacity(n);
        for k in 1..=n {
            let rank = total * k / (n + 1);
            cuts.push(value_at_rank(&histogram, rank));
        }
        cuts.sort_unstable_by(|a, b| b.cmp(a));
        Self { cuts }
    }

    /// Cut points, brightest first.
    #[inline]
    pub fn cuts(&self) -> &[u8] {
        &self.cuts
    }

    /// Check that the cut point count fits `bpp`.
    pub fn check(&self, bpp: BitsPerPixel) -> Result<()> {
        let expected = bpp.threshold_count();
        if self.cuts.len() != expected {
            return Err(EpdError::ThresholdCount {
                bits_per_pixel: bpp.bits(),
                expected,
                actual: self.cuts.len(),
            });
        }
        Ok(())
    }
}

impl Default for Thresholds {
    fn default() -> Self {
        Self::default_for(BitsPerPixel::One)
    }
}

#[inline]
fn brightness(px: &[u8]) -> u8 {
    px.iter().take(3).copied().max().unwrap_or(0)
}

/// Value of the element at zero-based `rank` in the sorted sample.
fn value_at_rank(histogram: &[usize; 256], rank: usize) -> u8 {
    let mut seen = 0usize;
    for (value, &count) in histogram.iter().enumerate() {
        seen += count;
        if seen > rank {
            return value as u8;
        }
    }
    u8::MAX
}

/// Quantize one pixel to a gray level in `0..=bpp.max_level()`.
///
/// `channels` holds at least R, G, B; anything after the third channel
/// (alpha) is ignored. The function is total: with a mismatched threshold
/// list the 1 bpp path uses the brightest cut point and the 2 bpp path
/// clamps to the darkest level.
pub fn quantize(channels: &[u8], bpp: BitsPerPixel, thresholds: &Thresholds) -> u8 {
    let rgb = &channels[..channels.len().min(3)];
    match bpp {
        BitsPerPixel::One => {
            let cut = thresholds.cuts.first().copied().unwrap_or(Thresholds::DEFAULT_1BPP);
            u8::from(rgb.iter().all(|&c| c <= cut))
        }
        BitsPerPixel::Two => {
            let max = bpp.max_level();
            for (level, &cut) in thresholds.cuts.iter().enumerate().take(max as usize) {
                if rgb.iter().any(|&c| c > cut) {
                    return level as u8;
                }
            }
            max
        }
    }
}
