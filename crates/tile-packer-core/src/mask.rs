use crate::grid::BitGrid;
use crate::model::{Rect, Rotation};

/// Tile occupancy of one image at one orientation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileMask {
    cells: BitGrid,
    rotation: Rotation,
    /// Smallest rect (tiles) holding every occupied cell.
    tight: Rect,
}

impl TileMask {
    /// Wraps an unrotated occupancy grid and computes its tight rect.
    ///
    /// A grid without any occupied cell is treated as fully solid so that the image still gets a
    /// slot of its own.
    pub fn from_cells(cells: BitGrid) -> Self {
        let cells = if cells.is_empty() {
            BitGrid::filled(cells.width(), cells.height())
        } else {
            cells
        };
        let tight = tight_rect(&cells);
        Self {
            cells,
            rotation: Rotation::None,
            tight,
        }
    }

    pub fn cells(&self) -> &BitGrid {
        &self.cells
    }

    pub fn tile_width(&self) -> u32 {
        self.cells.width()
    }

    pub fn tile_height(&self) -> u32 {
        self.cells.height()
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn tight(&self) -> Rect {
        self.tight
    }

    #[inline]
    pub fn get(&self, x: u32, y: u32) -> bool {
        self.cells.get(x, y)
    }

    /// True when every cell of the mask is occupied.
    pub fn is_solid(&self) -> bool {
        self.cells.is_full()
    }

    /// Copy of this mask turned by `by` (counter-clockwise), on top of its current rotation.
    pub fn rotated(&self, by: Rotation) -> TileMask {
        let (w, h) = (self.tile_width(), self.tile_height());
        let (rw, rh) = by.apply_size(w, h);
        let mut cells = BitGrid::new(rw, rh);
        for (x, y) in self.cells.iter_ones() {
            let (rx, ry) = by.apply_cell(x, y, w, h);
            cells.set(rx, ry);
        }
        let tight = tight_rect(&cells);
        TileMask {
            cells,
            rotation: compose(self.rotation, by),
            tight,
        }
    }

    /// Renders the mask as a greyscale image of `width x height` pixels, one white block per
    /// occupied tile. Tiles past the image edge are clipped.
    #[cfg(feature = "image")]
    pub fn to_luma(&self, width: u32, height: u32, tile_size: u32) -> image::GrayImage {
        image::GrayImage::from_fn(width, height, |x, y| {
            let (tx, ty) = (x / tile_size, y / tile_size);
            let on = tx < self.tile_width() && ty < self.tile_height() && self.get(tx, ty);
            image::Luma([if on { 255 } else { 0 }])
        })
    }
}

fn compose(a: Rotation, b: Rotation) -> Rotation {
    Rotation::ALL[((a.degrees() + b.degrees()) / 90 % 4) as usize]
}

fn tight_rect(cells: &BitGrid) -> Rect {
    let mut min_x = u32::MAX;
    let mut min_y = u32::MAX;
    let mut max_x = 0;
    let mut max_y = 0;
    for (x, y) in cells.iter_ones() {
        min_x = min_x.min(x);
        min_y = min_y.min(y);
        max_x = max_x.max(x);
        max_y = max_y.max(y);
    }
    if min_x == u32::MAX {
        return Rect::default();
    }
    Rect::new(min_x, min_y, max_x - min_x + 1, max_y - min_y + 1)
}
