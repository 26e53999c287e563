//! Tile-grid placement: masks are OR-ed into a page occupancy grid at the first anchor (row-major)
//! where none of their occupied tiles collide.

use tracing::debug;

use crate::error::{Result, TilePackError};
use crate::grid::BitGrid;
use crate::mask::TileMask;
use crate::model::Rect;
use crate::orient::OrientedImage;

/// Where an image ended up: page, tile offset of its mask origin, and the variant used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub page: usize,
    /// Tile coordinates of the variant's (0, 0) cell. Negative when empty mask rows/columns hang
    /// over the top/left page edge.
    pub pos: (i32, i32),
    pub variant: usize,
}

/// One page being filled.
#[derive(Debug)]
pub struct TilePage {
    pub id: usize,
    grid: Option<BitGrid>,
    /// Grid extent before the last growth, searched first.
    priority: Option<Rect>,
    /// Caller-side image ids in placement order.
    images: Vec<usize>,
}

impl TilePage {
    fn new(id: usize) -> Self {
        Self {
            id,
            grid: None,
            priority: None,
            images: Vec::new(),
        }
    }

    /// Occupancy grid, `None` until the first image was tried against this page.
    pub fn grid(&self) -> Option<&BitGrid> {
        self.grid.as_ref()
    }

    pub fn images(&self) -> &[usize] {
        &self.images
    }

    /// Page size in tiles (0x0 before allocation).
    pub fn tiles(&self) -> (u32, u32) {
        self.grid
            .as_ref()
            .map_or((0, 0), |g| (g.width(), g.height()))
    }
}

/// Places oriented masks into pages, adding pages (fixed size) or growing the only page
/// (unbounded).
#[derive(Debug)]
pub struct TilePlacer {
    tile_size: u32,
    /// Page edge in pixels, 0 when pages grow.
    page_size: u32,
    /// Initial page edge in tiles.
    start_tiles: u32,
    pages: Vec<TilePage>,
}

impl TilePlacer {
    /// Creates a placer for a fixed page size (`page_size > 0`) or, when `page_size` is 0, a
    /// single growing page starting at `start_size` pixels.
    pub fn new(tile_size: u32, page_size: u32, start_size: u32) -> Self {
        let edge = if page_size > 0 { page_size } else { start_size };
        Self {
            tile_size,
            page_size,
            start_tiles: edge.div_ceil(tile_size).max(1),
            pages: vec![TilePage::new(0)],
        }
    }

    pub fn pages(&self) -> &[TilePage] {
        &self.pages
    }

    /// Page size in pixels. A page that never saw an image reports its initial size.
    pub fn page_pixels(&self, page: &TilePage) -> (u32, u32) {
        let (w, h) = page
            .grid
            .as_ref()
            .map_or((self.start_tiles, self.start_tiles), |g| (g.width(), g.height()));
        (w * self.tile_size, h * self.tile_size)
    }

    /// Places one image (identified by `id` in the page's image list) and records the chosen
    /// variant on `image`.
    pub fn place(&mut self, id: usize, image: &mut OrientedImage, name: &str) -> Result<Placement> {
        if self.page_size > 0 {
            self.ensure_fits_empty_page(image, name)?;
        }

        let mut first = 0;
        loop {
            for page_idx in first..self.pages.len() {
                let start_tiles = self.start_tiles;
                let page = &mut self.pages[page_idx];
                let page_id = page.id;
                let grid = page.grid.get_or_insert_with(|| {
                    debug!(page = page_id, tiles = start_tiles, "allocating page grid");
                    BitGrid::new(start_tiles, start_tiles)
                });
                let priority = page.priority;
                let found = image
                    .variants()
                    .iter()
                    .enumerate()
                    .find_map(|(vi, v)| fit_image(grid, v, priority).map(|pos| (vi, pos)));
                if let Some((variant, pos)) = found {
                    page.images.push(id);
                    image.select(variant);
                    return Ok(Placement {
                        page: page_idx,
                        pos,
                        variant,
                    });
                }
            }

            if self.page_size > 0 {
                let next = self.pages.len();
                debug!(page = next, size = self.page_size, "adding page");
                first = next;
                self.pages.push(TilePage::new(next));
            } else {
                self.grow(0);
                first = 0;
            }
        }
    }

    /// Doubles the smaller axis of a page (width on ties). Old occupancy keeps its coordinates and
    /// becomes the priority area.
    fn grow(&mut self, page_idx: usize) {
        let tile_size = self.tile_size;
        let page = &mut self.pages[page_idx];
        let Some(grid) = page.grid.as_mut() else {
            return;
        };
        let (w, h) = (grid.width(), grid.height());
        page.priority = Some(Rect::new(0, 0, w, h));
        let (nw, nh) = if w <= h {
            (w * 2, h)
        } else {
            (w, h * 2)
        };
        grid.resize(nw, nh);
        debug!(
            page = page.id,
            width = nw * tile_size,
            height = nh * tile_size,
            "growing page"
        );
    }

    fn ensure_fits_empty_page(&self, image: &OrientedImage, name: &str) -> Result<()> {
        let tiles = self.start_tiles;
        let fits = image
            .variants()
            .iter()
            .any(|v| v.tight().w <= tiles && v.tight().h <= tiles);
        if fits {
            return Ok(());
        }
        let t = image.base().tight();
        Err(TilePackError::Placement {
            image: name.to_string(),
            width: t.w * self.tile_size,
            height: t.h * self.tile_size,
            page_size: self.page_size,
        })
    }
}

/// Searches the priority area first, then the rest of the grid. Returns the variant origin in
/// tiles.
pub fn fit_image(grid: &mut BitGrid, mask: &TileMask, priority: Option<Rect>) -> Option<(i32, i32)> {
    let mut area = Rect::new(0, 0, grid.width(), grid.height());

    if let Some(prio) = priority {
        if let Some(pos) = fit_in_area(grid, mask, prio) {
            return Some(pos);
        }
        // The priority area spans the full grid along one axis. Search the newly added band,
        // reaching back by the mask extent so placements straddling the old edge are found.
        let tight = mask.tight();
        if prio.h == grid.height() {
            area.x = prio.w.saturating_sub(tight.w);
            area.w = grid.width() - area.x;
        } else {
            area.y = prio.h.saturating_sub(tight.h);
            area.h = grid.height() - area.y;
        }
    }

    fit_in_area(grid, mask, area)
}

/// Row-major scan over anchors in `area`. The anchor is where the mask's tight rect starts.
fn fit_in_area(grid: &mut BitGrid, mask: &TileMask, area: Rect) -> Option<(i32, i32)> {
    let tight = mask.tight();
    let x_end = area.x + area.w;
    let y_end = area.y + area.h;
    for dy in area.y..y_end {
        let mut dx = area.x;
        while dx < x_end {
            let skip = test_at(grid, mask, dx, dy, x_end - dx, y_end - dy);
            if skip == 0 {
                write_at(grid, mask, dx, dy);
                return Some((
                    dx as i32 - tight.x as i32,
                    dy as i32 - tight.y as i32,
                ));
            }
            dx += skip;
        }
    }
    None
}

/// Returns 0 when the mask fits with its tight rect at `(px, py)`, otherwise how many anchor
/// columns can be skipped.
fn test_at(grid: &BitGrid, mask: &TileMask, px: u32, py: u32, width_left: u32, height_left: u32) -> u32 {
    let tight = mask.tight();
    if width_left < tight.w || height_left < tight.h {
        return width_left;
    }
    for sy in 0..tight.h {
        for sx in 0..tight.w {
            let (dx, dy) = (px + sx, py + sy);
            if mask.get(tight.x + sx, tight.y + sy) && grid.get(dx, dy) {
                // Every anchor that maps this mask tile into the same run of occupied page tiles
                // collides too.
                return grid.run_from(dx, dy);
            }
        }
    }
    0
}

fn write_at(grid: &mut BitGrid, mask: &TileMask, px: u32, py: u32) {
    let tight = mask.tight();
    for sy in 0..tight.h {
        for sx in 0..tight.w {
            if mask.get(tight.x + sx, tight.y + sy) {
                grid.set(px + sx, py + sy);
            }
        }
    }
}
