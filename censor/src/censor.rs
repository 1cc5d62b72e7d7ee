use log::debug;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::CensorError;
use crate::grid::{self, CELL_SIZE};
use crate::image::{ImageU8, Rgba, RgbaImage};
use crate::raster::Raster;

/// Mask values at or above this mark a pixel as censored.
pub const MASK_THRESHOLD: u8 = 128;

/// Censoring configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CensorConfig {
    /// How many following masked cells in the same grid row reuse a computed
    /// paint color before a fresh average is taken.
    pub paint_reuse: u32,
}

impl Default for CensorConfig {
    fn default() -> Self {
        Self { paint_reuse: 1 }
    }
}

/// Original pixels of one masked cell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Block {
    /// Cell index, see [`grid::Cell::index`].
    pub index: u32,
    pub pixels: RgbaImage,
}

/// A painted canvas plus the blocks needed to restore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CensorResult {
    pub canvas: RgbaImage,
    /// Sorted by strictly increasing index.
    pub blocks: Vec<Block>,
}

impl CensorResult {
    pub fn block_indices(&self) -> Vec<u32> {
        self.blocks.iter().map(|b| b.index).collect()
    }
}

/// Mean of the RGB channels with integer truncation, fully opaque.
pub fn average_color(img: &RgbaImage) -> Rgba {
    let count = img.width as u64 * img.height as u64;
    if count == 0 {
        return [0, 0, 0, 0];
    }
    let mut sum = [0u64; 3];
    for y in 0..img.height {
        for x in 0..img.width {
            let px = img.get(x, y);
            for (s, &v) in sum.iter_mut().zip(&px[..3]) {
                *s += v as u64;
            }
        }
    }
    [
        (sum[0] / count) as u8,
        (sum[1] / count) as u8,
        (sum[2] / count) as u8,
        255,
    ]
}

fn cell_is_masked(mask: &ImageU8, cell: &grid::Cell) -> bool {
    (cell.y..cell.y + cell.height)
        .any(|y| (cell.x..cell.x + cell.width).any(|x| mask.get(x, y) >= MASK_THRESHOLD))
}

/// Paint color choice within one grid row.
struct Painter {
    budget: u32,
    last: Rgba,
    remaining: u32,
}

impl Painter {
    fn new(budget: u32) -> Self {
        Self {
            budget,
            last: [0, 0, 0, 0],
            remaining: 0,
        }
    }

    fn next_row(&mut self) {
        self.remaining = 0;
    }

    fn color_for(&mut self, block: &RgbaImage) -> Rgba {
        if self.remaining > 0 {
            self.remaining -= 1;
        } else {
            self.last = average_color(block);
            self.remaining = self.budget;
        }
        self.last
    }
}

/// Censor every grid cell that contains a masked pixel.
///
/// Masked cells are cut out as [`Block`]s and painted with the average color
/// of their original pixels. Within one grid row, a computed color is reused
/// for the next `paint_reuse` masked cells. Unmasked cells are copied.
pub fn censor<R: Raster>(
    original: &R,
    mask: &ImageU8,
    config: &CensorConfig,
) -> Result<CensorResult, CensorError> {
    let (width, height) = original.dimensions();
    if (mask.width, mask.height) != (width, height) {
        return Err(CensorError::SizeMismatch(
            width,
            height,
            mask.width,
            mask.height,
        ));
    }

    let mut canvas = RgbaImage::new(width, height);
    let mut blocks = Vec::new();
    let mut painter = Painter::new(config.paint_reuse);
    let mut ncells = 0u32;

    for cell in grid::cells(width, height) {
        ncells += 1;
        if cell.starts_row() {
            painter.next_row();
        }

        if !cell_is_masked(mask, &cell) {
            for y in cell.y..cell.y + cell.height {
                for x in cell.x..cell.x + cell.width {
                    canvas.set(x, y, original.pixel(x, y));
                }
            }
            continue;
        }

        let mut pixels = RgbaImage::new(cell.width, cell.height);
        for dy in 0..cell.height {
            for dx in 0..cell.width {
                pixels.set(dx, dy, original.pixel(cell.x + dx, cell.y + dy));
            }
        }
        let color = painter.color_for(&pixels);
        for y in cell.y..cell.y + cell.height {
            for x in cell.x..cell.x + cell.width {
                canvas.set(x, y, color);
            }
        }
        blocks.push(Block {
            index: cell.index,
            pixels,
        });
    }

    debug!(
        "censored {}x{}: {} of {} cells masked ({}px cells)",
        width,
        height,
        blocks.len(),
        ncells,
        CELL_SIZE
    );
    Ok(CensorResult { canvas, blocks })
}
