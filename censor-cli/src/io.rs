//! PNG/JPEG reading and writing.

use std::path::Path;

use anyhow::{bail, Context, Result};
use censor::image::{Rgba, RgbaImage};
use censor::raster::{self, Raster};
use image::codecs::jpeg::JpegEncoder;
use image::{DynamicImage, GenericImageView, ImageFormat};

use crate::tasks;

/// A decoded file, read through [`Raster`] so RGBA8 files skip conversion.
struct Decoded(DynamicImage);

impl Raster for Decoded {
    fn dimensions(&self) -> (u32, u32) {
        self.0.dimensions()
    }

    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.0.get_pixel(x, y).0
    }

    fn is_canonical_rgba(&self) -> bool {
        matches!(self.0, DynamicImage::ImageRgba8(_))
    }

    fn into_canonical_buf(self) -> Vec<u8> {
        self.0.into_rgba8().into_raw()
    }
}

pub fn load_image(path: &Path) -> Result<RgbaImage> {
    if !path.exists() {
        bail!("file `{}` does not exist", path.display());
    }
    if !tasks::is_image(path) {
        bail!(
            "unknown format: {}",
            tasks::extension(path).unwrap_or_default()
        );
    }
    let img = image::open(path).with_context(|| format!("failed to open image: {}", path.display()))?;
    Ok(raster::to_rgba_image(Decoded(img)))
}

/// Write `img` as PNG when `path` ends in `.png`, otherwise as JPEG.
pub fn save_image(img: RgbaImage, path: &Path, quality: u8) -> Result<()> {
    let (width, height) = (img.width, img.height);
    let buf = image::RgbaImage::from_raw(width, height, img.into_raw())
        .context("image buffer does not match its dimensions")?;

    if tasks::extension(path).as_deref() == Some("png") {
        return buf
            .save_with_format(path, ImageFormat::Png)
            .with_context(|| format!("writing PNG {}", path.display()));
    }

    let file = std::fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    let w = std::io::BufWriter::new(file);
    let rgb = DynamicImage::ImageRgba8(buf).to_rgb8();
    rgb.write_with_encoder(JpegEncoder::new_with_quality(w, quality))
        .with_context(|| format!("writing JPEG {}", path.display()))
}
