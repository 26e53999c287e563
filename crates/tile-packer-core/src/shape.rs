//! Turns source pixels into tile occupancy masks.
//!
//! Two rasterizers feed the placer:
//! - alpha: a tile is occupied when any texel inside it is visible (alpha above the threshold and
//!   a non-zero channel)
//! - triangles: a tile is occupied when its square overlaps any triangle of a silhouette given in
//!   normalized `[-0.5, 0.5]` image space
//!
//! Both work on the padded extent when padding was applied, so neighbours never share a filtered
//! edge.

use std::borrow::Cow;

use crate::config::{Algorithm, Options};
use crate::error::{Result, TilePackError};
use crate::grid::BitGrid;
use crate::hull;
use crate::mask::TileMask;
use crate::model::{Point, SourceImage};

/// Result of shape extraction for one image.
#[derive(Debug, Clone)]
pub struct Shape {
    /// Unrotated mask over the padded extent.
    pub mask: TileMask,
    /// Transparent border added on every side, 0 when the image was used as is.
    pub padding: u32,
    /// Normalized silhouette when the mask came from triangles.
    pub triangles: Option<Vec<Point>>,
}

/// Texels a mask is built from: the caller's buffer, or a padded copy of it.
#[derive(Debug, Clone)]
pub struct Texels<'a> {
    pub data: Cow<'a, [u8]>,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub padding: u32,
}

impl<'a> Texels<'a> {
    /// Applies the padding rule: only images with alpha whose border band holds visible texels get
    /// a transparent border.
    pub fn prepare(img: &SourceImage<'a>, padding: u32, alpha_threshold: u8) -> Self {
        if padding > 0 && img.has_alpha() && needs_padding(img, padding, alpha_threshold) {
            Self {
                data: Cow::Owned(pad_image(img, padding)),
                width: img.width + padding * 2,
                height: img.height + padding * 2,
                channels: img.channels,
                padding,
            }
        } else {
            Self {
                data: Cow::Borrowed(img.data),
                width: img.width,
                height: img.height,
                channels: img.channels,
                padding: 0,
            }
        }
    }

    #[inline]
    fn texel(&self, x: u32, y: u32) -> &[u8] {
        let c = self.channels as usize;
        let i = (y as usize * self.width as usize + x as usize) * c;
        &self.data[i..i + c]
    }
}

/// A texel counts as occupied when it is above the alpha threshold (RGBA only) and any channel is
/// non-zero.
#[inline]
pub fn is_visible(texel: &[u8], alpha_threshold: u8) -> bool {
    if texel.len() == 4 && texel[3] <= alpha_threshold {
        return false;
    }
    texel.iter().any(|&c| c != 0)
}

/// Checks buffer shape before anything reads from it.
pub fn validate_image(img: &SourceImage<'_>, index: usize) -> Result<()> {
    if img.width == 0 || img.height == 0 {
        return Err(TilePackError::shape(
            img.identity(index),
            format!("empty image ({}x{})", img.width, img.height),
        ));
    }
    if img.channels != 3 && img.channels != 4 {
        return Err(TilePackError::shape(
            img.identity(index),
            format!("unsupported channel count {}", img.channels),
        ));
    }
    let expected = img.width as usize * img.height as usize * img.channels as usize;
    if img.data.len() != expected {
        return Err(TilePackError::shape(
            img.identity(index),
            format!(
                "buffer holds {} bytes, expected {}",
                img.data.len(),
                expected
            ),
        ));
    }
    if let Some(tris) = &img.triangles {
        validate_triangles(tris).map_err(|reason| TilePackError::shape(img.identity(index), reason))?;
    }
    Ok(())
}

fn validate_triangles(tris: &[Point]) -> std::result::Result<(), String> {
    if tris.len() < 3 {
        return Err(format!("degenerate hull: {} vertices", tris.len()));
    }
    if tris.len() % 3 != 0 {
        return Err(format!(
            "triangle list length {} is not a multiple of 3",
            tris.len()
        ));
    }
    if tris.iter().any(|p| !p.x.is_finite() || !p.y.is_finite()) {
        return Err("triangle list contains non-finite coordinates".into());
    }
    Ok(())
}

/// Runs the rasterizer selected by `opts` for one image.
pub fn extract(img: &SourceImage<'_>, index: usize, opts: &Options) -> Result<Shape> {
    validate_image(img, index)?;
    let texels = Texels::prepare(img, opts.padding, opts.alpha_threshold);

    let triangles = match (opts.algorithm, &img.triangles) {
        (Algorithm::TileGrid, _) => None,
        (Algorithm::AutoTile, tris) => tris.clone(),
        (Algorithm::TileConvexHull, Some(tris)) => Some(tris.clone()),
        (Algorithm::TileConvexHull, None) => Some(
            hull::triangles_from_alpha(img, opts.alpha_threshold)
                .map_err(|reason| TilePackError::shape(img.identity(index), reason))?,
        ),
        (Algorithm::BinSkyline, _) => {
            return Err(TilePackError::Configuration(
                "bin-skyline does not extract tile shapes".into(),
            ));
        }
    };

    let cells = match &triangles {
        Some(tris) => rasterize_triangles(tris, img.width, img.height, &texels, opts.tile_size),
        None => rasterize_alpha(&texels, opts.tile_size, opts.alpha_threshold),
    };

    Ok(Shape {
        mask: TileMask::from_cells(cells),
        padding: texels.padding,
        triangles,
    })
}

/// True if any visible texel lies within `padding` texels of an edge.
pub fn needs_padding(img: &SourceImage<'_>, padding: u32, alpha_threshold: u8) -> bool {
    let texels = Texels {
        data: Cow::Borrowed(img.data),
        width: img.width,
        height: img.height,
        channels: img.channels,
        padding: 0,
    };
    let (w, h) = (img.width, img.height);
    for y in 0..h {
        let edge_row = y < padding || y >= h.saturating_sub(padding);
        for x in 0..w {
            if !(edge_row || x < padding || x >= w.saturating_sub(padding)) {
                continue;
            }
            if is_visible(texels.texel(x, y), alpha_threshold) {
                return true;
            }
        }
    }
    false
}

/// Copies the image into a buffer with a zeroed border of `padding` texels.
pub fn pad_image(img: &SourceImage<'_>, padding: u32) -> Vec<u8> {
    let c = img.channels as usize;
    let pw = (img.width + padding * 2) as usize;
    let ph = (img.height + padding * 2) as usize;
    let row_bytes = img.width as usize * c;
    let mut out = vec![0u8; pw * ph * c];
    for y in 0..img.height as usize {
        let src = &img.data[y * row_bytes..(y + 1) * row_bytes];
        let dst = ((y + padding as usize) * pw + padding as usize) * c;
        out[dst..dst + row_bytes].copy_from_slice(src);
    }
    out
}

/// Alpha-threshold rasterization, `ceil(size / tile_size)` tiles per axis. Edge tiles only look at
/// texels inside the image.
pub fn rasterize_alpha(texels: &Texels<'_>, tile_size: u32, alpha_threshold: u8) -> BitGrid {
    let tw = texels.width.div_ceil(tile_size);
    let th = texels.height.div_ceil(tile_size);
    let mut cells = BitGrid::new(tw, th);
    for ty in 0..th {
        let y0 = ty * tile_size;
        let y1 = (y0 + tile_size).min(texels.height);
        for tx in 0..tw {
            let x0 = tx * tile_size;
            let x1 = (x0 + tile_size).min(texels.width);
            let occupied = (y0..y1)
                .any(|y| (x0..x1).any(|x| is_visible(texels.texel(x, y), alpha_threshold)));
            if occupied {
                cells.set(tx, ty);
            }
        }
    }
    cells
}

/// Triangle rasterization over the padded extent of `texels`. Triangles are normalized to the
/// unpadded `width x height` image.
pub fn rasterize_triangles(
    triangles: &[Point],
    width: u32,
    height: u32,
    texels: &Texels<'_>,
    tile_size: u32,
) -> BitGrid {
    let tw = texels.width.div_ceil(tile_size);
    let th = texels.height.div_ceil(tile_size);
    let mut cells = BitGrid::new(tw, th);
    let ts = tile_size as f32;
    let pad = texels.padding as f32;
    let to_tiles = |p: &Point| {
        Point::new(
            (pad + (p.x + 0.5) * width as f32) / ts,
            (pad + (p.y + 0.5) * height as f32) / ts,
        )
    };

    for tri in triangles.chunks_exact(3) {
        let t = [to_tiles(&tri[0]), to_tiles(&tri[1]), to_tiles(&tri[2])];
        let min_x = t.iter().map(|p| p.x).fold(f32::INFINITY, f32::min);
        let max_x = t.iter().map(|p| p.x).fold(f32::NEG_INFINITY, f32::max);
        let min_y = t.iter().map(|p| p.y).fold(f32::INFINITY, f32::min);
        let max_y = t.iter().map(|p| p.y).fold(f32::NEG_INFINITY, f32::max);
        let x0 = min_x.floor().max(0.0) as u32;
        let y0 = min_y.floor().max(0.0) as u32;
        let x1 = (max_x.ceil().max(0.0) as u32).min(tw);
        let y1 = (max_y.ceil().max(0.0) as u32).min(th);
        for y in y0..y1 {
            for x in x0..x1 {
                if cells.get(x, y) {
                    continue;
                }
                let (fx, fy) = (x as f32, y as f32);
                let square = [
                    Point::new(fx, fy),
                    Point::new(fx + 1.0, fy),
                    Point::new(fx + 1.0, fy + 1.0),
                    Point::new(fx, fy + 1.0),
                ];
                if convex_overlap(&t, &square) {
                    cells.set(x, y);
                }
            }
        }
    }
    cells
}

/// Separating-axis test for two convex polygons. Shapes that only touch do not overlap.
pub fn convex_overlap(a: &[Point], b: &[Point]) -> bool {
    !(has_separating_axis(a, b) || has_separating_axis(b, a))
}

fn has_separating_axis(edges_of: &[Point], other: &[Point]) -> bool {
    let n = edges_of.len();
    for i in 0..n {
        let p = edges_of[i];
        let q = edges_of[(i + 1) % n];
        let axis = (-(q.y - p.y), q.x - p.x);
        if axis.0 == 0.0 && axis.1 == 0.0 {
            continue;
        }
        let (a_min, a_max) = project(edges_of, axis);
        let (b_min, b_max) = project(other, axis);
        if a_max <= b_min || b_max <= a_min {
            return true;
        }
    }
    false
}

fn project(poly: &[Point], axis: (f32, f32)) -> (f32, f32) {
    poly.iter()
        .map(|p| p.x * axis.0 + p.y * axis.1)
        .fold((f32::INFINITY, f32::NEG_INFINITY), |(lo, hi), d| {
            (lo.min(d), hi.max(d))
        })
}
