#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CensorError;
use crate::image::ImageU8;
use crate::raster::Raster;

/// Mask derivation configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct MaskConfig {
    /// Euclidean RGB distance at which a pixel counts as edited.
    pub color_dist_threshold: u32,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            color_dist_threshold: 50,
        }
    }
}

fn color_dist_squared(a: [u8; 4], b: [u8; 4]) -> u32 {
    (0..3)
        .map(|c| {
            let d = a[c] as i32 - b[c] as i32;
            (d * d) as u32
        })
        .sum()
}

/// Build a binary mask marking where `edited` differs from `original`.
///
/// A pixel is 255 when the squared RGB distance reaches the squared
/// threshold, 0 otherwise. Alpha is ignored.
pub fn mask_from_difference<A: Raster, B: Raster>(
    original: &A,
    edited: &B,
    config: &MaskConfig,
) -> Result<ImageU8, CensorError> {
    let (width, height) = original.dimensions();
    let (ew, eh) = edited.dimensions();
    if (ew, eh) != (width, height) {
        return Err(CensorError::SizeMismatch(width, height, ew, eh));
    }

    let thresh = config.color_dist_threshold as u64 * config.color_dist_threshold as u64;
    let mut mask = ImageU8::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let d = color_dist_squared(original.pixel(x, y), edited.pixel(x, y));
            if d as u64 >= thresh {
                mask.set(x, y, 255);
            }
        }
    }
    Ok(mask)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::RgbaImage;

    #[test]
    fn distance_threshold_is_inclusive() {
        let original = RgbaImage::filled(3, 1, [100, 100, 100, 255]);
        let mut edited = original.clone();
        edited.set(0, 0, [130, 140, 100, 255]); // distance exactly 50
        edited.set(1, 0, [130, 139, 100, 255]); // just under
        let mask = mask_from_difference(&original, &edited, &MaskConfig::default()).unwrap();
        assert_eq!(mask.get(0, 0), 255);
        assert_eq!(mask.get(1, 0), 0);
        assert_eq!(mask.get(2, 0), 0);
    }

    #[test]
    fn zero_threshold_masks_everything() {
        let img = RgbaImage::filled(2, 2, [5, 5, 5, 255]);
        let cfg = MaskConfig {
            color_dist_threshold: 0,
        };
        let mask = mask_from_difference(&img, &img, &cfg).unwrap();
        assert!(mask.buf.iter().all(|&v| v == 255));
    }

    #[test]
    fn alpha_is_ignored() {
        let original = RgbaImage::filled(1, 1, [9, 9, 9, 255]);
        let edited = RgbaImage::filled(1, 1, [9, 9, 9, 0]);
        let mask = mask_from_difference(&original, &edited, &MaskConfig::default()).unwrap();
        assert_eq!(mask.get(0, 0), 0);
    }

    #[test]
    fn mismatched_sizes() {
        let a = RgbaImage::new(4, 4);
        let b = ImageU8::new(4, 5);
        assert!(matches!(
            mask_from_difference(&a, &b, &MaskConfig::default()),
            Err(CensorError::SizeMismatch(4, 4, 4, 5))
        ));
    }
}
