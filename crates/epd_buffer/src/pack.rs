//! Bit packer turning a scan sequence into controller bytes.
//!
//! Pixels are grouped into runs of `8 / bpp`. Each pixel's gray code goes into
//! its own bit field, the first pixel of the run landing in the most (MSB) or
//! least (LSB) significant field. The composed byte is then inverted: the
//! controller treats a set bit as "not driven", so white must come out as 1s.
//! A short final run is padded with white (level 0) pixels before inversion.

use crate::grid::Pixel;
use crate::quantize::BitsPerPixel;
use crate::{EpdError, Result};
use std::fmt;
use std::str::FromStr;

/// Which end of a byte receives the first pixel of a run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum BitOrder {
    #[default]
    Msb,
    Lsb,
}

impl FromStr for BitOrder {
    type Err = EpdError;

    fn from_str(s: &str) -> Result<Self> {
        if s.eq_ignore_ascii_case("msb") {
            Ok(BitOrder::Msb)
        } else if s.eq_ignore_ascii_case("lsb") {
            Ok(BitOrder::Lsb)
        } else {
            Err(EpdError::UnsupportedBitOrder(s.to_string()))
        }
    }
}

impl fmt::Display for BitOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            BitOrder::Msb => "MSB",
            BitOrder::Lsb => "LSB",
        })
    }
}

/// Mapping from visual gray level to the bit pattern the controller expects.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum GrayCodes {
    /// Level is written as-is.
    #[default]
    Linear,
    /// Waveshare 7.5" V2 numbering: `00` white, `10` light gray,
    /// `01` dark gray, `11` black. Identity at 1 bpp.
    Waveshare,
}

impl GrayCodes {
    const WAVESHARE_2BPP: [u8; 4] = [0b00, 0b10, 0b01, 0b11];

    /// Bit code for `level`. Levels past the darkest one saturate to it.
    #[inline]
    pub fn code(self, level: u8, bpp: BitsPerPixel) -> u8 {
        let level = level.min(bpp.max_level());
        match (self, bpp) {
            (GrayCodes::Waveshare, BitsPerPixel::Two) => Self::WAVESHARE_2BPP[level as usize],
            _ => level,
        }
    }
}

impl FromStr for GrayCodes {
    type Err = EpdError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "linear" => Ok(GrayCodes::Linear),
            "waveshare" => Ok(GrayCodes::Waveshare),
            _ => Err(EpdError::UnsupportedGrayCodes(s.to_string())),
        }
    }
}

impl fmt::Display for GrayCodes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            GrayCodes::Linear => "linear",
            GrayCodes::Waveshare => "waveshare",
        })
    }
}

/// Pack `sequence` with levels written as-is.
#[must_use = "this returns the packed panel buffer"]
pub fn pack(sequence: &[Pixel], bpp: BitsPerPixel, order: BitOrder) -> Vec<u8> {
    pack_with_codes(sequence, bpp, order, GrayCodes::Linear)
}

/// Pack `sequence`, translating each level through `codes` first.
#[must_use = "this returns the packed panel buffer"]
pub fn pack_with_codes(
    sequence: &[Pixel],
    bpp: BitsPerPixel,
    order: BitOrder,
    codes: GrayCodes,
) -> Vec<u8> {
    let per_byte = bpp.pixels_per_byte();
    sequence
        .chunks(per_byte)
        .map(|run| !compose(run, bpp, order, codes))
        .collect()
}

/// Compose one byte before inversion. Missing pixels stay zero.
fn compose(run: &[Pixel], bpp: BitsPerPixel, order: BitOrder, codes: GrayCodes) -> u8 {
    let per_byte = bpp.pixels_per_byte();
    let bits = bpp.bits() as usize;
    let mut byte = 0u8;
    for (i, px) in run.iter().enumerate().take(per_byte) {
        let shift = match order {
            BitOrder::Msb => (per_byte - 1 - i) * bits,
            BitOrder::Lsb => i * bits,
        };
        byte |= codes.code(px.level, bpp) << shift;
    }
    byte
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(levels: &[u8]) -> Vec<Pixel> {
        levels
            .iter()
            .enumerate()
            .map(|(x, &level)| Pixel { x, y: 0, level })
            .collect()
    }

    #[test]
    fn test_bit_order_symmetry() {
        let seq = run(&[1, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(pack(&seq, BitsPerPixel::One, BitOrder::Msb), vec![0x7F]);
        assert_eq!(pack(&seq, BitsPerPixel::One, BitOrder::Lsb), vec![0xFE]);
    }

    #[test]
    fn test_all_white_is_all_ones() {
        let seq = run(&[0; 8]);
        assert_eq!(pack(&seq, BitsPerPixel::One, BitOrder::Msb), vec![0xFF]);
        let seq = run(&[0; 4]);
        assert_eq!(pack(&seq, BitsPerPixel::Two, BitOrder::Lsb), vec![0xFF]);
    }

    #[test]
    fn test_two_bpp_fields() {
        // 3,2,1,0 -> 0b11_10_01_00 MSB, 0b00_01_10_11 LSB
        let seq = run(&[3, 2, 1, 0]);
        assert_eq!(pack(&seq, BitsPerPixel::Two, BitOrder::Msb), vec![!0b1110_0100u8]);
        assert_eq!(pack(&seq, BitsPerPixel::Two, BitOrder::Lsb), vec![!0b0001_1011u8]);
    }

    #[test]
    fn test_inversion_law() {
        let seq = run(&[1, 1, 0, 1, 0, 0, 1, 0]);
        let raw = compose(&seq, BitsPerPixel::One, BitOrder::Msb, GrayCodes::Linear);
        assert_eq!(raw, 0b1101_0010);
        assert_eq!(pack(&seq, BitsPerPixel::One, BitOrder::Msb), vec![raw ^ 0xFF]);
    }

    #[test]
    fn test_short_final_run_padded_white() {
        let seq = run(&[1; 10]);
        let out = pack(&seq, BitsPerPixel::One, BitOrder::Msb);
        assert_eq!(out, vec![0x00, 0x3F]);
        let out = pack(&seq, BitsPerPixel::One, BitOrder::Lsb);
        assert_eq!(out, vec![0x00, 0xFC]);
    }

    #[test]
    fn test_empty_sequence() {
        assert!(pack(&[], BitsPerPixel::Two, BitOrder::Msb).is_empty());
    }

    #[test]
    fn test_waveshare_codes() {
        let seq = run(&[0, 1, 2, 3]);
        assert_eq!(
            pack_with_codes(&seq, BitsPerPixel::Two, BitOrder::Msb, GrayCodes::Waveshare),
            vec![!0b00_10_01_11u8]
        );
        let seq = run(&[1, 0, 1, 0, 1, 0, 1, 0]);
        assert_eq!(
            pack_with_codes(&seq, BitsPerPixel::One, BitOrder::Msb, GrayCodes::Waveshare),
            pack(&seq, BitsPerPixel::One, BitOrder::Msb)
        );
    }

    #[test]
    fn test_out_of_range_level_saturates_dark() {
        let seq = run(&[2, 0, 0, 0, 0, 0, 0, 0]);
        assert_eq!(pack(&seq, BitsPerPixel::One, BitOrder::Msb), vec![0x7F]);
        let seq = run(&[7, 0, 0, 0]);
        assert_eq!(pack(&seq, BitsPerPixel::Two, BitOrder::Msb), vec![!0b1100_0000u8]);
    }

    #[test]
    fn test_parse_bit_order() {
        assert_eq!("MSB".parse::<BitOrder>().unwrap(), BitOrder::Msb);
        assert_eq!("lsb".parse::<BitOrder>().unwrap(), BitOrder::Lsb);
        assert!(matches!(
            "middle".parse::<BitOrder>(),
            Err(EpdError::UnsupportedBitOrder(s)) if s == "middle"
        ));
        assert_eq!(BitOrder::Lsb.to_string(), "LSB");
    }

    #[test]
    fn test_parse_gray_codes() {
        assert_eq!("Waveshare".parse::<GrayCodes>().unwrap(), GrayCodes::Waveshare);
        assert!("gamma".parse::<GrayCodes>().is_err());
    }
}
