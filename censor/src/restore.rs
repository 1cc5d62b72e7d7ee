use std::collections::HashMap;

use log::debug;

use crate::censor::{Block, CensorResult};
use crate::grid;
use crate::image::RgbaImage;

/// Splice every block back into its grid cell.
///
/// Cells are addressed exactly as in [`censor`](crate::censor::censor);
/// cells without a block keep the canvas pixels. Block pixels outside the
/// cell are ignored.
pub fn restore(result: CensorResult) -> RgbaImage {
    let CensorResult { mut canvas, blocks } = result;
    let by_index: HashMap<u32, &Block> = blocks.iter().map(|b| (b.index, b)).collect();

    let mut restored = 0usize;
    for cell in grid::cells(canvas.width, canvas.height) {
        let Some(block) = by_index.get(&cell.index) else {
            continue;
        };
        let w = cell.width.min(block.pixels.width);
        let h = cell.height.min(block.pixels.height);
        for dy in 0..h {
            for dx in 0..w {
                canvas.set(cell.x + dx, cell.y + dy, block.pixels.get(dx, dy));
            }
        }
        restored += 1;
    }

    debug!("restored {} of {} blocks", restored, blocks.len());
    canvas
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_go_to_their_cells() {
        let canvas = RgbaImage::filled(40, 20, [0, 0, 0, 255]);
        let result = CensorResult {
            canvas,
            blocks: vec![
                Block {
                    index: 3,
                    pixels: RgbaImage::filled(16, 16, [1, 1, 1, 255]),
                },
                Block {
                    index: 5,
                    pixels: RgbaImage::filled(16, 16, [2, 2, 2, 255]),
                },
            ],
        };
        let img = restore(result);
        // cell 3 is the clipped 8-wide cell at x = 32
        assert_eq!(img.get(39, 15), [1, 1, 1, 255]);
        assert_eq!(img.get(31, 15), [0, 0, 0, 255]);
        // cell 5 is the second cell of the 4-high second row
        assert_eq!(img.get(16, 16), [2, 2, 2, 255]);
        assert_eq!(img.get(31, 19), [2, 2, 2, 255]);
        assert_eq!(img.get(32, 19), [0, 0, 0, 255]);
        assert_eq!((img.width, img.height), (40, 20));
    }

    #[test]
    fn unknown_index_is_ignored() {
        let canvas = RgbaImage::filled(16, 16, [7, 7, 7, 255]);
        let result = CensorResult {
            canvas: canvas.clone(),
            blocks: vec![Block {
                index: 2,
                pixels: RgbaImage::filled(16, 16, [1, 1, 1, 255]),
            }],
        };
        assert_eq!(restore(result), canvas);
    }
}
