//! Full pipeline tests: censor → layout → unlayout → restore.
use censor::censor::{censor, CensorConfig};
use censor::error::{HeaderError, UnlayoutError};
use censor::image::{ImageU8, RgbaImage};
use censor::layout::{layout, unlayout};
use censor::mask::{mask_from_difference, MaskConfig};
use censor::raster::to_rgba_image;
use censor::restore::restore;

/// Deterministic opaque test pattern.
fn pattern(width: u32, height: u32, seed: u32) -> RgbaImage {
    let mut img = RgbaImage::new(width, height);
    let mut state = seed.wrapping_mul(2654435761).wrapping_add(1);
    for y in 0..height {
        for x in 0..width {
            state ^= state << 13;
            state ^= state >> 17;
            state ^= state << 5;
            let r = (x * 3 + y) as u8;
            img.set(x, y, [r, (state & 0xFF) as u8, (state >> 8) as u8, 255]);
        }
    }
    img
}

/// Mask with a filled rectangle.
fn rect_mask(width: u32, height: u32, x0: u32, y0: u32, x1: u32, y1: u32) -> ImageU8 {
    let mut mask = ImageU8::new(width, height);
    for y in y0..y1.min(height) {
        for x in x0..x1.min(width) {
            mask.set(x, y, 255);
        }
    }
    mask
}

fn full_round_trip(img: &RgbaImage, mask: &ImageU8, paint_reuse: u32) -> RgbaImage {
    let censored = censor(img, mask, &CensorConfig { paint_reuse }).unwrap();
    let laid_out = layout(censored);
    let recovered = unlayout(laid_out).unwrap();
    restore(recovered)
}

#[test]
fn round_trip_exact_grid() {
    let img = pattern(64, 48, 1);
    let mask = rect_mask(64, 48, 10, 5, 40, 30);
    assert_eq!(full_round_trip(&img, &mask, 1), img);
}

#[test]
fn round_trip_odd_dimensions() {
    for (w, h) in [(37, 29), (17, 100), (100, 17), (16, 16), (250, 3)] {
        let img = pattern(w, h, w * h);
        let mask = rect_mask(w, h, w / 3, h / 4, w, h);
        for reuse in [0, 1, 2, 7] {
            assert_eq!(
                full_round_trip(&img, &mask, reuse),
                img,
                "{w}x{h} reuse {reuse}"
            );
        }
    }
}

#[test]
fn round_trip_narrow_image() {
    let img = pattern(9, 70, 3);
    let mask = rect_mask(9, 70, 0, 0, 9, 70);
    assert_eq!(full_round_trip(&img, &mask, 1), img);
}

#[test]
fn round_trip_everything_masked() {
    let img = pattern(80, 80, 4);
    let mask = rect_mask(80, 80, 0, 0, 80, 80);
    let censored = censor(&img, &mask, &CensorConfig::default()).unwrap();
    assert_eq!(censored.blocks.len(), 25);
    let back = restore(unlayout(layout(censored)).unwrap());
    assert_eq!(back, img);
}

#[test]
fn round_trip_scattered_mask() {
    let (w, h) = (160, 96);
    let img = pattern(w, h, 5);
    let mut mask = ImageU8::new(w, h);
    for (x, y) in [(0, 0), (17, 3), (159, 95), (80, 40), (81, 41), (120, 20), (5, 90)] {
        mask.set(x, y, 200);
    }
    let censored = censor(&img, &mask, &CensorConfig::default()).unwrap();
    let indices = censored.block_indices();
    assert!(indices.windows(2).all(|p| p[0] < p[1]));
    assert_eq!(full_round_trip(&img, &mask, 3), img);
}

#[test]
fn empty_mask_round_trip() {
    let img = pattern(33, 33, 6);
    let mask = ImageU8::new(33, 33);
    let censored = censor(&img, &mask, &CensorConfig::default()).unwrap();
    assert!(censored.blocks.is_empty());
    assert_eq!(censored.canvas, img);
    assert_eq!(full_round_trip(&img, &mask, 1), img);
}

#[test]
fn visible_part_is_censored() {
    let img = pattern(64, 32, 7);
    let mask = rect_mask(64, 32, 16, 0, 32, 16);
    let laid_out = layout(censor(&img, &mask, &CensorConfig::default()).unwrap());
    assert!(laid_out.height > 32);
    // unmasked cells stay visible, the masked cell is flat
    assert_eq!(laid_out.get(0, 0), img.get(0, 0));
    let painted = laid_out.get(16, 0);
    assert!((16..32).all(|x| (0..16).all(|y| laid_out.get(x, y) == painted)));
    assert_ne!(img.get(16, 0), img.get(17, 0));
}

#[test]
fn mask_from_edited_copy() {
    let img = pattern(48, 48, 8);
    let mut edited = img.clone();
    for y in 20..24 {
        for x in 20..24 {
            edited.set(x, y, [0, 0, 0, 255]);
        }
    }
    let mask = mask_from_difference(&img, &edited, &MaskConfig::default()).unwrap();
    let censored = censor(&img, &mask, &CensorConfig::default()).unwrap();
    // (20..24, 20..24) lies in cell row 1, column 1 of a 3-wide grid
    assert_eq!(censored.block_indices(), vec![5]);
}

#[test]
fn decode_through_generic_raster() {
    let img = pattern(40, 40, 9);
    let mask = rect_mask(40, 40, 0, 0, 20, 20);
    let laid_out = layout(censor(&img, &mask, &CensorConfig::default()).unwrap());
    let back = restore(unlayout(to_rgba_image(laid_out)).unwrap());
    assert_eq!(back, img);
}

#[test]
fn corrupted_first_magic_byte() {
    let img = pattern(32, 32, 10);
    let mask = rect_mask(32, 32, 0, 0, 32, 32);
    let mut laid_out = layout(censor(&img, &mask, &CensorConfig::default()).unwrap());
    let (w, h) = (laid_out.width, laid_out.height);
    laid_out.set(w - 1, h - 1, [0, 0, 0, 255]);
    assert_eq!(
        unlayout(laid_out).unwrap_err(),
        UnlayoutError::Header(HeaderError::WrongFormat)
    );
}

#[test]
fn tiny_image_is_too_small() {
    let img = RgbaImage::filled(12, 12, [255, 255, 255, 255]);
    assert!(matches!(
        unlayout(img),
        Err(UnlayoutError::TooSmall { area: 144, .. })
    ));
}

#[test]
fn header_height_beyond_image_is_incorrect() {
    // Lay out a tall canvas, then keep only the header rows of a wide strip.
    let img = pattern(200, 300, 11);
    let mask = ImageU8::new(200, 300);
    let laid_out = layout(censor(&img, &mask, &CensorConfig::default()).unwrap());
    let rows = 2;
    let tail = laid_out.buf.len() - (200 * rows * 4) as usize;
    let strip = RgbaImage::from_raw(200, rows, laid_out.buf[tail..].to_vec());
    assert_eq!(
        unlayout(strip).unwrap_err(),
        UnlayoutError::IncorrectHeader {
            declared: 300,
            actual: 2
        }
    );
}
