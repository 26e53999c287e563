//! Convex hulls of visible texels and of point sets.

use crate::model::{Point, SourceImage};
use crate::shape::is_visible;

/// Builds a triangle list for the convex hull of every visible texel of `img`, in normalized
/// `[-0.5, 0.5]` image space. Errors when the hull has fewer than 3 vertices.
pub fn triangles_from_alpha(
    img: &SourceImage<'_>,
    alpha_threshold: u8,
) -> std::result::Result<Vec<Point>, String> {
    let c = img.channels as usize;
    let row_bytes = img.width as usize * c;
    let mut corners = Vec::new();
    for y in 0..img.height as usize {
        let row = &img.data[y * row_bytes..(y + 1) * row_bytes];
        let visible = |x: &usize| is_visible(&row[x * c..x * c + c], alpha_threshold);
        let Some(first) = (0..img.width as usize).find(visible) else {
            continue;
        };
        let last = (0..img.width as usize).rev().find(visible).unwrap_or(first);
        let (y0, y1) = (y as f32, (y + 1) as f32);
        corners.push(Point::new(first as f32, y0));
        corners.push(Point::new(first as f32, y1));
        corners.push(Point::new((last + 1) as f32, y0));
        corners.push(Point::new((last + 1) as f32, y1));
    }

    let hull = convex_hull(corners);
    if hull.len() < 3 {
        return Err(format!("degenerate hull: {} vertices", hull.len()));
    }
    let (w, h) = (img.width as f32, img.height as f32);
    let normalized: Vec<Point> = hull
        .iter()
        .map(|p| Point::new(p.x / w - 0.5, p.y / h - 0.5))
        .collect();
    Ok(fan_triangulate(&normalized))
}

/// Andrew's monotone chain. Returns the hull without collinear points, starting at the
/// lowest-x point; consecutive vertices turn the same way.
pub fn convex_hull(mut points: Vec<Point>) -> Vec<Point> {
    points.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
    points.dedup();
    if points.len() < 3 {
        return points;
    }

    let mut hull: Vec<Point> = Vec::with_capacity(points.len() * 2);
    for &p in points.iter() {
        while hull.len() >= 2 && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0 {
            hull.pop();
        }
        hull.push(p);
    }
    let lower_len = hull.len() + 1;
    for &p in points.iter().rev().skip(1) {
        while hull.len() >= lower_len && cross(hull[hull.len() - 2], hull[hull.len() - 1], p) <= 0.0
        {
            hull.pop();
        }
        hull.push(p);
    }
    hull.pop();
    hull
}

/// Splits a convex polygon into triangles sharing its first vertex.
pub fn fan_triangulate(polygon: &[Point]) -> Vec<Point> {
    let mut out = Vec::with_capacity(polygon.len().saturating_sub(2) * 3);
    for i in 1..polygon.len().saturating_sub(1) {
        out.push(polygon[0]);
        out.push(polygon[i]);
        out.push(polygon[i + 1]);
    }
    out
}

#[inline]
fn cross(o: Point, a: Point, b: Point) -> f64 {
    (a.x - o.x) as f64 * (b.y - o.y) as f64 - (a.y - o.y) as f64 * (b.x - o.x) as f64
}
