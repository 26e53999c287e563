//! Projects a placed mask back into page pixels: where the image lands, which part of it is
//! visible, and the polygons describing its silhouette.
//!
//! Outlines follow screen orientation (y down): outer boundaries run clockwise, holes
//! counter-clockwise. Every vertex is clamped to the unpadded image, so padding borders never
//! show up in the output.

use crate::grid::BitGrid;
use crate::hull::convex_hull;
use crate::mask::TileMask;
use crate::model::{Point, Rect, Rotation};

/// Page-space geometry of one placed image.
#[derive(Debug, Clone, PartialEq)]
pub struct Footprint {
    pub origin: (i32, i32),
    pub size: (u32, u32),
    pub rect: Rect,
    pub outline: Vec<Vec<Point>>,
    pub triangles: Vec<Point>,
}

/// Where a placed variant's unpadded image sits on the page.
#[derive(Debug, Clone, Copy)]
struct Frame {
    origin: (i32, i32),
    size: (u32, u32),
    /// Tight footprint intersected with the image, in page pixels.
    visible: Rect,
}

impl Frame {
    fn new(mask: &TileMask, pos: (i32, i32), tile_size: u32, padding: u32, width: u32, height: u32) -> Self {
        let rotation = mask.rotation();
        let ts = tile_size as i64;
        let (pw, ph) = rotation.apply_size(width + padding * 2, height + padding * 2);
        // Mask slack sits right/bottom of the unrotated image and follows it through the rotation.
        let extra_x = mask.tile_width() as i64 * ts - pw as i64;
        let extra_y = mask.tile_height() as i64 * ts - ph as i64;
        let (off_x, off_y) = match rotation {
            Rotation::None => (0, 0),
            Rotation::Ccw90 => (0, extra_y),
            Rotation::Ccw180 => (extra_x, extra_y),
            Rotation::Ccw270 => (extra_x, 0),
        };
        let ox = pos.0 as i64 * ts + off_x + padding as i64;
        let oy = pos.1 as i64 * ts + off_y + padding as i64;
        let size = rotation.apply_size(width, height);

        let tight = mask.tight();
        let tx0 = (pos.0 as i64 + tight.x as i64) * ts;
        let ty0 = (pos.1 as i64 + tight.y as i64) * ts;
        let tx1 = tx0 + tight.w as i64 * ts;
        let ty1 = ty0 + tight.h as i64 * ts;

        let x0 = tx0.max(ox);
        let y0 = ty0.max(oy);
        let x1 = tx1.min(ox + size.0 as i64).max(x0);
        let y1 = ty1.min(oy + size.1 as i64).max(y0);

        Self {
            origin: (ox as i32, oy as i32),
            size,
            visible: Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32),
        }
    }

    fn clamp(&self, p: Point) -> Point {
        let (x0, y0) = (self.origin.0 as f32, self.origin.1 as f32);
        Point::new(
            p.x.clamp(x0, x0 + self.size.0 as f32),
            p.y.clamp(y0, y0 + self.size.1 as f32),
        )
    }

    fn clip(&self, r: Rect) -> Option<Rect> {
        let ox = self.origin.0 as i64;
        let oy = self.origin.1 as i64;
        let x0 = (r.x as i64).max(ox);
        let y0 = (r.y as i64).max(oy);
        let x1 = (r.x as i64 + r.w as i64).min(ox + self.size.0 as i64);
        let y1 = (r.y as i64 + r.h as i64).min(oy + self.size.1 as i64);
        (x1 > x0 && y1 > y0).then(|| Rect::new(x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32))
    }
}

/// Silhouette of a mask built from alpha: traced tile boundaries and merged tile rectangles.
pub fn project_mask(
    mask: &TileMask,
    pos: (i32, i32),
    tile_size: u32,
    padding: u32,
    width: u32,
    height: u32,
) -> Footprint {
    let frame = Frame::new(mask, pos, tile_size, padding, width, height);
    let ts = tile_size as f32;
    let to_page = |(x, y): (u32, u32)| {
        Point::new(
            (pos.0 as f32 + x as f32) * ts,
            (pos.1 as f32 + y as f32) * ts,
        )
    };

    let outline = trace_outline(mask.cells())
        .into_iter()
        .filter_map(|ring| {
            let ring: Vec<Point> = ring.into_iter().map(|v| frame.clamp(to_page(v))).collect();
            let ring = simplify(ring);
            (ring.len() >= 3).then_some(ring)
        })
        .collect();

    let mut triangles = Vec::new();
    for r in merge_rects(mask.cells()) {
        let px = Rect::new(
            ((pos.0 + r.x as i32) as i64 * tile_size as i64).max(0) as u32,
            ((pos.1 + r.y as i32) as i64 * tile_size as i64).max(0) as u32,
            r.w * tile_size,
            r.h * tile_size,
        );
        if let Some(c) = frame.clip(px) {
            push_quad(&mut triangles, c);
        }
    }

    Footprint {
        origin: frame.origin,
        size: frame.size,
        rect: frame.visible,
        outline,
        triangles,
    }
}

/// Silhouette from a normalized triangle list, turned with the mask and moved onto the page. The
/// outline is the convex hull of the resulting vertices.
pub fn project_triangles(
    mask: &TileMask,
    pos: (i32, i32),
    tile_size: u32,
    padding: u32,
    width: u32,
    height: u32,
    normalized: &[Point],
) -> Footprint {
    let frame = Frame::new(mask, pos, tile_size, padding, width, height);
    let rotation = mask.rotation();
    let (w, h) = (width as f32, height as f32);
    let triangles: Vec<Point> = normalized
        .iter()
        .map(|p| {
            let local = Point::new((p.x + 0.5) * w, (p.y + 0.5) * h);
            let r = rotation.apply_point(local, w, h);
            frame.clamp(Point::new(
                r.x + frame.origin.0 as f32,
                r.y + frame.origin.1 as f32,
            ))
        })
        .collect();

    let hull = convex_hull(triangles.clone());
    let outline = if hull.len() >= 3 { vec![hull] } else { Vec::new() };

    Footprint {
        origin: frame.origin,
        size: frame.size,
        rect: frame.visible,
        outline,
        triangles,
    }
}

/// Footprint of a whole rectangle placed at `(x, y)` with `size` already rotated.
pub fn project_rect(x: u32, y: u32, size: (u32, u32)) -> Footprint {
    let rect = Rect::new(x, y, size.0, size.1);
    let (x0, y0) = (x as f32, y as f32);
    let (x1, y1) = (x0 + size.0 as f32, y0 + size.1 as f32);
    let mut triangles = Vec::with_capacity(6);
    push_quad(&mut triangles, rect);
    Footprint {
        origin: (x as i32, y as i32),
        size,
        rect,
        outline: vec![vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ]],
        triangles,
    }
}

fn push_quad(out: &mut Vec<Point>, r: Rect) {
    let (x0, y0) = (r.x as f32, r.y as f32);
    let (x1, y1) = ((r.x + r.w) as f32, (r.y + r.h) as f32);
    out.extend_from_slice(&[
        Point::new(x0, y0),
        Point::new(x1, y0),
        Point::new(x1, y1),
        Point::new(x0, y0),
        Point::new(x1, y1),
        Point::new(x0, y1),
    ]);
}

/// Covers the set cells with maximal rectangles: take the longest run along a row, then extend it
/// down while every cell below is set and unclaimed.
pub fn merge_rects(cells: &BitGrid) -> Vec<Rect> {
    let (w, h) = (cells.width(), cells.height());
    let mut claimed = BitGrid::new(w, h);
    let mut out = Vec::new();
    for y in 0..h {
        let mut x = 0;
        while x < w {
            if !cells.get(x, y) || claimed.get(x, y) {
                x += 1;
                continue;
            }
            let mut run = 1;
            while x + run < w && cells.get(x + run, y) && !claimed.get(x + run, y) {
                run += 1;
            }
            let mut rows = 1;
            while y + rows < h
                && (x..x + run).all(|cx| cells.get(cx, y + rows) && !claimed.get(cx, y + rows))
            {
                rows += 1;
            }
            for cy in y..y + rows {
                for cx in x..x + run {
                    claimed.set(cx, cy);
                }
            }
            out.push(Rect::new(x, y, run, rows));
            x += run;
        }
    }
    out
}

#[derive(Debug, Clone, Copy)]
struct Edge {
    from: (u32, u32),
    to: (u32, u32),
}

impl Edge {
    fn dir(&self) -> (i32, i32) {
        (
            self.to.0 as i32 - self.from.0 as i32,
            self.to.1 as i32 - self.from.1 as i32,
        )
    }
}

/// Boundary loops of the set cells, in cell-corner coordinates. Cells touching only at a corner
/// end up in separate loops.
pub fn trace_outline(cells: &BitGrid) -> Vec<Vec<(u32, u32)>> {
    let (w, h) = (cells.width(), cells.height());
    let set = |x: i64, y: i64| x >= 0 && y >= 0 && x < w as i64 && y < h as i64 && cells.get(x as u32, y as u32);

    let mut edges = Vec::new();
    for (x, y) in cells.iter_ones() {
        let (ix, iy) = (x as i64, y as i64);
        if !set(ix, iy - 1) {
            edges.push(Edge { from: (x, y), to: (x + 1, y) });
        }
        if !set(ix + 1, iy) {
            edges.push(Edge { from: (x + 1, y), to: (x + 1, y + 1) });
        }
        if !set(ix, iy + 1) {
            edges.push(Edge { from: (x + 1, y + 1), to: (x, y + 1) });
        }
        if !set(ix - 1, iy) {
            edges.push(Edge { from: (x, y + 1), to: (x, y) });
        }
    }

    let vertex = |p: (u32, u32)| p.1 as usize * (w as usize + 1) + p.0 as usize;
    let mut outgoing: Vec<Vec<usize>> = vec![Vec::new(); (w as usize + 1) * (h as usize + 1)];
    for (i, e) in edges.iter().enumerate() {
        outgoing[vertex(e.from)].push(i);
    }

    let mut used = vec![false; edges.len()];
    let mut loops = Vec::new();
    for start in 0..edges.len() {
        if used[start] {
            continue;
        }
        let mut ring = Vec::new();
        let mut cur = start;
        loop {
            used[cur] = true;
            ring.push(edges[cur].from);
            let d = edges[cur].dir();
            // Right turn first (towards the interior), then straight, then left.
            let preferred = [(-d.1, d.0), d, (d.1, -d.0)];
            let candidates = &outgoing[vertex(edges[cur].to)];
            let next = preferred.iter().find_map(|want| {
                candidates
                    .iter()
                    .copied()
                    .find(|&e| (!used[e] || e == start) && edges[e].dir() == *want)
            });
            match next {
                Some(e) if e != start => cur = e,
                _ => break,
            }
        }
        loops.push(remove_collinear(ring));
    }
    loops
}

fn remove_collinear(ring: Vec<(u32, u32)>) -> Vec<(u32, u32)> {
    let n = ring.len();
    if n < 3 {
        return ring;
    }
    (0..n)
        .filter(|&i| {
            let a = ring[(i + n - 1) % n];
            let b = ring[i];
            let c = ring[(i + 1) % n];
            let (ax, ay) = (b.0 as i64 - a.0 as i64, b.1 as i64 - a.1 as i64);
            let (cx, cy) = (c.0 as i64 - b.0 as i64, c.1 as i64 - b.1 as i64);
            ax * cy - ay * cx != 0
        })
        .map(|i| ring[i])
        .collect()
}

/// Drops repeated and collinear vertices until none are left. Clamping can fold edges onto each
/// other, this removes the resulting zero-width spikes.
fn simplify(mut ring: Vec<Point>) -> Vec<Point> {
    loop {
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        let n = ring.len();
        if n < 3 {
            return ring;
        }
        let drop = (0..n).find(|&i| {
            let a = ring[(i + n - 1) % n];
            let b = ring[i];
            let c = ring[(i + 1) % n];
            let cross = (b.x - a.x) as f64 * (c.y - b.y) as f64 - (b.y - a.y) as f64 * (c.x - b.x) as f64;
            cross == 0.0
        });
        match drop {
            Some(i) => {
                ring.remove(i);
            }
            None => return ring,
        }
    }
}
