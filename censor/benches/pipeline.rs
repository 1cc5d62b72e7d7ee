use criterion::{black_box, criterion_group, criterion_main, Criterion};

use censor::censor::{censor, CensorConfig};
use censor::image::{ImageU8, RgbaImage};
use censor::layout::{layout, unlayout};
use censor::restore::restore;

fn scene(width: u32, height: u32) -> (RgbaImage, ImageU8) {
    let mut img = RgbaImage::new(width, height);
    let mut mask = ImageU8::new(width, height);
    for y in 0..height {
        for x in 0..width {
            img.set(x, y, [(x ^ y) as u8, (x * 7) as u8, (y * 13) as u8, 255]);
            // a diagonal band of censored cells
            if (x as i64 - y as i64).abs() < 96 {
                mask.set(x, y, 255);
            }
        }
    }
    (img, mask)
}

fn bench_pipeline(c: &mut Criterion) {
    let (img, mask) = scene(1280, 720);
    let config = CensorConfig::default();
    let laid_out = layout(censor(&img, &mask, &config).unwrap());

    c.bench_function("encode_1280x720", |b| {
        b.iter(|| layout(censor(black_box(&img), black_box(&mask), &config).unwrap()))
    });

    c.bench_function("decode_1280x720", |b| {
        b.iter(|| restore(unlayout(black_box(laid_out.clone())).unwrap()))
    });
}

criterion_group!(benches, bench_pipeline);
criterion_main!(benches);
