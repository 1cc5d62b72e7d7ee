//! Embed blocks and the header into spare rows below the canvas, and back.
//!
//! A laid out image looks like this, top to bottom:
//!
//! ```text
//! +---------------------------+  0
//! | censored canvas           |
//! | (padded to a cell row)    |
//! +---------------------------+  ceil16(height)
//! | block cells, row-major,   |
//! | channels inverted         |
//! +---------------------------+
//! | header bits, one per      |
//! | pixel, from the last      |
//! | pixel backwards           |
//! +---------------------------+  total height
//! ```

use log::debug;

use crate::bits::BitStream;
use crate::censor::{Block, CensorResult};
use crate::error::UnlayoutError;
use crate::grid::{ceil_to_cell, CELL_SIZE};
use crate::header::{self, PREAMBLE_BITS};
use crate::image::{Rgba, RgbaImage, OPAQUE_BLACK, OPAQUE_WHITE};

/// Stored block pixels are the channel-wise inverse of the original, with
/// channels kept in place.
#[inline]
fn invert(px: Rgba) -> Rgba {
    [255 - px[0], 255 - px[1], 255 - px[2], 255]
}

/// Placement of block storage cells below the canvas.
#[derive(Debug, Clone, Copy)]
struct BlockSlots {
    top: u32,
    per_row: u32,
}

impl BlockSlots {
    fn new(canvas_height: u32, width: u32) -> Self {
        Self {
            top: ceil_to_cell(canvas_height),
            // narrow images still get one (clipped) slot per row
            per_row: (width / CELL_SIZE).max(1),
        }
    }

    /// Top-left corner of the `i`-th storage cell.
    fn origin(&self, i: usize) -> (u32, u32) {
        let i = i as u32;
        (
            (i % self.per_row) * CELL_SIZE,
            self.top + (i / self.per_row) * CELL_SIZE,
        )
    }

    fn rows_for(&self, nblocks: usize) -> u32 {
        (nblocks as u32).div_ceil(self.per_row) * CELL_SIZE
    }

    /// Number of whole storage cells between the slot origin and `height`.
    fn capacity(&self, height: u32) -> u64 {
        let rows = height.saturating_sub(self.top) / CELL_SIZE;
        rows as u64 * self.per_row as u64
    }
}

/// Geometry of a laid out image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LayoutPlan {
    /// Canvas height rounded up to a whole cell row.
    image_height: u32,
    blocks_height: u32,
    header_height: u32,
    header_bits: usize,
}

impl LayoutPlan {
    fn total_height(&self) -> u32 {
        self.image_height + self.blocks_height + self.header_height
    }
}

/// Pixel walk from the last pixel backwards: bottom row first, each row from
/// right to left.
struct BackwardScan {
    width: u32,
    x: u32,
    y: u32,
}

impl BackwardScan {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            x: width - 1,
            y: height - 1,
        }
    }

    fn next_pos(&mut self) -> (u32, u32) {
        let pos = (self.x, self.y);
        if self.x == 0 {
            self.x = self.width - 1;
            self.y = self.y.wrapping_sub(1);
        } else {
            self.x -= 1;
        }
        pos
    }

    fn read_bits(&mut self, img: &RgbaImage, n: usize, out: &mut BitStream) {
        out.extend((0..n).map(|_| {
            let (x, y) = self.next_pos();
            img.get(x, y)[0] >= 128
        }));
    }
}

fn plan(result: &CensorResult, header_bits: usize) -> LayoutPlan {
    let width = result.canvas.width;
    let slots = BlockSlots::new(result.canvas.height, width);
    LayoutPlan {
        image_height: slots.top,
        blocks_height: slots.rows_for(result.blocks.len()),
        header_height: (header_bits as u64).div_ceil(width as u64) as u32,
        header_bits,
    }
}

/// Grow the canvas and write the blocks and the header into the new rows.
///
/// Takes ownership of `result`; its canvas becomes the returned image.
pub fn layout(result: CensorResult) -> RgbaImage {
    let header = header::make_header(result.canvas.height, &result.block_indices());
    let plan = plan(&result, header.len());
    let CensorResult { mut canvas, blocks } = result;
    let width = canvas.width;
    let slots = BlockSlots::new(canvas.height, width);

    debug!(
        "layout {}x{}: {} blocks in {} rows, {} header bits in {} rows",
        width,
        canvas.height,
        blocks.len(),
        plan.blocks_height,
        plan.header_bits,
        plan.header_height
    );
    canvas.grow_height(plan.total_height());

    for (i, block) in blocks.iter().enumerate() {
        let (ox, oy) = slots.origin(i);
        let px = &block.pixels;
        for y in 0..px.height {
            for x in 0..px.width.min(width - ox) {
                canvas.set(ox + x, oy + y, invert(px.get(x, y)));
            }
        }
    }

    let mut scan = BackwardScan::new(width, canvas.height);
    for &bit in header.bits() {
        let (x, y) = scan.next_pos();
        canvas.set(x, y, if bit { OPAQUE_WHITE } else { OPAQUE_BLACK });
    }

    canvas
}

/// Recover the canvas and blocks from a laid out image.
///
/// Takes ownership of `img`; its buffer becomes the recovered canvas.
pub fn unlayout(mut img: RgbaImage) -> Result<CensorResult, UnlayoutError> {
    let (width, height) = (img.width, img.height);
    let area = width as u64 * height as u64;
    if area < PREAMBLE_BITS as u64 {
        return Err(UnlayoutError::TooSmall {
            area,
            needed: PREAMBLE_BITS as u64,
        });
    }

    let mut scan = BackwardScan::new(width, height);
    let mut preamble = BitStream::with_capacity(PREAMBLE_BITS);
    scan.read_bits(&img, PREAMBLE_BITS, &mut preamble);
    let body_bits = header::parse_magic_and_length(&mut preamble)?;

    let needed = PREAMBLE_BITS as u64 + body_bits as u64;
    if area < needed {
        return Err(UnlayoutError::TooSmall { area, needed });
    }
    let mut body = BitStream::with_capacity(body_bits as usize);
    scan.read_bits(&img, body_bits as usize, &mut body);

    let (declared, count) = header::peek_counts(&body);
    if declared > height {
        return Err(UnlayoutError::IncorrectHeader {
            declared,
            actual: height,
        });
    }
    let slots = BlockSlots::new(declared, width);
    let capacity = slots.capacity(height);
    if count as u64 > capacity {
        return Err(UnlayoutError::TooManyBlocks { count, capacity });
    }
    let parsed = header::parse_header(&mut body);

    debug!(
        "unlayout {}x{}: canvas height {}, {} blocks, {} header bits",
        width, height, parsed.height, parsed.block_count, body_bits
    );

    let blocks = parsed
        .block_index
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            let (ox, oy) = slots.origin(i);
            let mut pixels = RgbaImage::new(CELL_SIZE, CELL_SIZE);
            let w = CELL_SIZE.min(width.saturating_sub(ox));
            let h = CELL_SIZE.min(height.saturating_sub(oy));
            for y in 0..h {
                for x in 0..w {
                    pixels.set(x, y, invert(img.get(ox + x, oy + y)));
                }
            }
            Block { index, pixels }
        })
        .collect();

    img.truncate_height(parsed.height);
    Ok(CensorResult {
        canvas: img,
        blocks,
    })
}
