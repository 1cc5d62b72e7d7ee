/// One RGBA8 pixel.
pub type Rgba = [u8; 4];

pub const OPAQUE_BLACK: Rgba = [0, 0, 0, 255];
pub const OPAQUE_WHITE: Rgba = [255, 255, 255, 255];

/// Grayscale image with row-major pixel data, used for masks.
#[derive(Debug, Clone)]
pub struct ImageU8 {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub buf: Vec<u8>,
}

impl ImageU8 {
    /// Create a new image filled with zeros.
    pub fn new(width: u32, height: u32) -> Self {
        let stride = width;
        let buf = vec![0u8; (stride * height) as usize];
        Self { width, height, stride, buf }
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.buf[(y * self.stride + x) as usize]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, val: u8) {
        self.buf[(y * self.stride + x) as usize] = val;
    }
}

/// RGBA8 image with row-major pixel data.
///
/// `stride` is measured in pixels. The backing buffer may hold spare capacity
/// beyond `stride * height` pixels so that [`grow_height`](Self::grow_height)
/// can extend the image without moving it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub buf: Vec<u8>,
}

impl RgbaImage {
    /// Create a new image filled with transparent black.
    pub fn new(width: u32, height: u32) -> Self {
        let buf = vec![0u8; width as usize * height as usize * 4];
        Self {
            width,
            height,
            stride: width,
            buf,
        }
    }

    /// Create an image filled with a single color.
    pub fn filled(width: u32, height: u32, color: Rgba) -> Self {
        let mut img = Self::new(width, height);
        for px in img.buf.chunks_exact_mut(4) {
            px.copy_from_slice(&color);
        }
        img
    }

    /// Adopt a tightly packed RGBA8 buffer.
    ///
    /// `buf` must contain at least `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, buf: Vec<u8>) -> Self {
        assert!(buf.len() >= width as usize * height as usize * 4);
        Self {
            width,
            height,
            stride: width,
            buf,
        }
    }

    #[inline]
    fn offset(&self, x: u32, y: u32) -> usize {
        (y as usize * self.stride as usize + x as usize) * 4
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Rgba {
        let i = self.offset(x, y);
        [self.buf[i], self.buf[i + 1], self.buf[i + 2], self.buf[i + 3]]
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, px: Rgba) {
        let i = self.offset(x, y);
        self.buf[i..i + 4].copy_from_slice(&px);
    }

    /// Copy out the `w`×`h` region at (`x`, `y`), clipped to the image bounds.
    pub fn crop(&self, x: u32, y: u32, w: u32, h: u32) -> RgbaImage {
        let w = w.min(self.width.saturating_sub(x));
        let h = h.min(self.height.saturating_sub(y));
        let mut out = RgbaImage::new(w, h);
        for dy in 0..h {
            let src = self.offset(x, y + dy);
            let dst = out.offset(0, dy);
            let n = w as usize * 4;
            out.buf[dst..dst + n].copy_from_slice(&self.buf[src..src + n]);
        }
        out
    }

    /// Extend the image downward to `height` rows, keeping existing rows.
    ///
    /// New rows are transparent black. Spare capacity in the buffer is reused
    /// in place; otherwise a new buffer is allocated and the rows are copied
    /// over. A `height` at or below the current height is a no-op.
    pub fn grow_height(&mut self, height: u32) {
        if height <= self.height {
            return;
        }
        let needed = self.stride as usize * height as usize * 4;
        if self.buf.capacity() >= needed {
            self.buf.resize(needed, 0);
        } else {
            let mut buf = Vec::with_capacity(needed);
            let used = self.stride as usize * self.height as usize * 4;
            buf.extend_from_slice(&self.buf[..used.min(self.buf.len())]);
            buf.resize(needed, 0);
            self.buf = buf;
        }
        self.height = height;
    }

    /// Keep only the top `height` rows. The buffer keeps its capacity.
    pub fn truncate_height(&mut self, height: u32) {
        if height >= self.height {
            return;
        }
        self.buf.truncate(self.stride as usize * height as usize * 4);
        self.height = height;
    }

    /// Tightly packed RGBA8 rows, dropping any stride padding.
    pub fn into_raw(self) -> Vec<u8> {
        if self.stride == self.width {
            let mut buf = self.buf;
            buf.truncate(self.width as usize * self.height as usize * 4);
            return buf;
        }
        self.crop(0, 0, self.width, self.height).buf
    }
}
