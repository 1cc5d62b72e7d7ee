use crate::image::{ImageU8, Rgba, RgbaImage};

/// Read access to any pixel source that can be viewed as RGBA8.
pub trait Raster {
    fn dimensions(&self) -> (u32, u32);

    fn pixel(&self, x: u32, y: u32) -> Rgba;

    /// Whether the source already stores tightly packed RGBA8 rows, so
    /// [`into_canonical_buf`](Self::into_canonical_buf) can hand them over
    /// without a per-pixel conversion.
    fn is_canonical_rgba(&self) -> bool {
        false
    }

    /// Tightly packed RGBA8 rows. The default converts pixel by pixel;
    /// canonical sources override it to move their buffer out.
    fn into_canonical_buf(self) -> Vec<u8>
    where
        Self: Sized,
    {
        copy_pixels(&self).buf
    }
}

/// Convert any raster into an owned [`RgbaImage`].
pub fn to_rgba_image<R: Raster>(src: R) -> RgbaImage {
    let (width, height) = src.dimensions();
    if src.is_canonical_rgba() {
        RgbaImage::from_raw(width, height, src.into_canonical_buf())
    } else {
        copy_pixels(&src)
    }
}

fn copy_pixels<R: Raster + ?Sized>(src: &R) -> RgbaImage {
    let (width, height) = src.dimensions();
    let mut out = RgbaImage::new(width, height);
    for y in 0..height {
        for x in 0..width {
            out.set(x, y, src.pixel(x, y));
        }
    }
    out
}

impl Raster for RgbaImage {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Rgba {
        self.get(x, y)
    }

    fn is_canonical_rgba(&self) -> bool {
        self.stride == self.width
    }

    fn into_canonical_buf(self) -> Vec<u8> {
        self.into_raw()
    }
}

impl Raster for ImageU8 {
    fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    #[inline]
    fn pixel(&self, x: u32, y: u32) -> Rgba {
        let v = self.get(x, y);
        [v, v, v, 255]
    }
}
