/// Side length of a grid cell in pixels.
pub const CELL_SIZE: u32 = 16;

/// One grid cell, clipped to the image bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cell {
    /// 1-based row-major sequence number, counting every cell.
    pub index: u32,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Cell {
    /// Whether this is the first cell of a grid row.
    pub fn starts_row(&self) -> bool {
        self.x == 0
    }
}

/// Round `v` up to a multiple of [`CELL_SIZE`].
pub fn ceil_to_cell(v: u32) -> u32 {
    v.div_ceil(CELL_SIZE) * CELL_SIZE
}

/// Iterate the cells of a `width`×`height` image in row-major order.
///
/// Cells in the last column and row are narrower or shorter when the image
/// dimensions are not multiples of [`CELL_SIZE`].
pub fn cells(width: u32, height: u32) -> Cells {
    Cells {
        width,
        height,
        x: 0,
        y: 0,
        index: 1,
    }
}

#[derive(Debug, Clone)]
pub struct Cells {
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    index: u32,
}

impl Iterator for Cells {
    type Item = Cell;

    fn next(&mut self) -> Option<Cell> {
        if self.width == 0 || self.y >= self.height {
            return None;
        }
        let cell = Cell {
            index: self.index,
            x: self.x,
            y: self.y,
            width: CELL_SIZE.min(self.width - self.x),
            height: CELL_SIZE.min(self.height - self.y),
        };
        self.index += 1;
        self.x += CELL_SIZE;
        if self.x >= self.width {
            self.x = 0;
            self.y += CELL_SIZE;
        }
        Some(cell)
    }
}
