use criterion::{criterion_group, criterion_main, Criterion};
use epd_buffer::{encode_panel, render_c_array, BitsPerPixel, EncodeOptions, Rotation};
use std::hint::black_box;

/// Four vertical bands, one per 2 bpp level (white, light, dark, black),
/// with a small per-row wobble so rows differ.
fn gray_band_panel(width: usize, height: usize) -> Vec<u8> {
    const BANDS: [u8; 4] = [245, 215, 170, 60];
    let mut rgba = Vec::with_capacity(width * height * 4);
    for y in 0..height {
        for x in 0..width {
            let v = BANDS[x * BANDS.len() / width].saturating_sub((y % 8) as u8);
            rgba.extend_from_slice(&[v, v, v, 0xFF]);
        }
    }
    rgba
}

fn bench_encode_landscape_1bpp(c: &mut Criterion) {
    let rgba = gray_band_panel(800, 480);
    let opts = EncodeOptions::default();

    c.bench_function("encode_landscape_800x480_1bpp", |b| {
        b.iter(|| {
            let result = encode_panel(black_box(&rgba), 800, 480, &opts);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_encode_portrait_2bpp(c: &mut Criterion) {
    let rgba = gray_band_panel(480, 800);
    let opts = EncodeOptions {
        rotation: Rotation::Rotated,
        ..EncodeOptions::for_bpp(BitsPerPixel::Two)
    };

    c.bench_function("encode_portrait_480x800_2bpp", |b| {
        b.iter(|| {
            let result = encode_panel(black_box(&rgba), 480, 800, &opts);
            assert!(result.is_ok());
            result
        })
    });
}

fn bench_render_c_array(c: &mut Criterion) {
    let rgba = gray_band_panel(800, 480);
    let bytes = encode_panel(&rgba, 800, 480, &EncodeOptions::default()).unwrap();

    c.bench_function("render_c_array_48000", |b| {
        b.iter(|| render_c_array("output", black_box(&bytes)))
    });
}

criterion_group!(
    benches,
    bench_encode_landscape_1bpp,
    bench_encode_portrait_2bpp,
    bench_render_c_array,
);
criterion_main!(benches);
