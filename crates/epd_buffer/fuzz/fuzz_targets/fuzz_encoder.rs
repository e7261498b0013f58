#![no_main]

use arbitrary::Arbitrary;
use epd_buffer::{encode, BitOrder, BitsPerPixel, EncodeOptions, GrayCodes, Rotation, Thresholds};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    width: u8,
    height: u8,
    pixels: Vec<u8>,
    two_bpp: bool,
    lsb: bool,
    rotation: u8,
    waveshare: bool,
    cuts: [u8; 3],
}

fuzz_target!(|input: FuzzInput| {
    // Skip invalid dimensions
    let width = (input.width as usize).max(1);
    let height = (input.height as usize).max(1);

    // Ensure we have enough pixels (RGBA = 4 bytes per pixel)
    let expected_size = width * height * 4;
    if input.pixels.len() < expected_size {
        return;
    }
    let pixels = &input.pixels[..expected_size];

    let bpp = if input.two_bpp {
        BitsPerPixel::Two
    } else {
        BitsPerPixel::One
    };
    let thresholds = match Thresholds::new(bpp, &input.cuts[..bpp.threshold_count()]) {
        Ok(t) => t,
        Err(_) => return,
    };
    let rotation = match input.rotation % 3 {
        0 => Rotation::None,
        1 => Rotation::Rotated,
        _ => Rotation::RotatedLegacy,
    };
    let opts = EncodeOptions {
        bits_per_pixel: bpp,
        bit_order: if input.lsb { BitOrder::Lsb } else { BitOrder::Msb },
        rotation,
        thresholds,
        gray_codes: if input.waveshare {
            GrayCodes::Waveshare
        } else {
            GrayCodes::Linear
        },
    };

    let out = encode(pixels, width, height, &opts).expect("valid input must encode");
    let expected_len = rotation
        .sequence_len(width, height)
        .div_ceil(bpp.pixels_per_byte());
    assert_eq!(out.len(), expected_len);
});
