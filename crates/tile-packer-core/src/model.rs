use serde::{Deserialize, Serialize};

use crate::config::Algorithm;

/// Axis-aligned rectangle (pixels or tiles). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self` (inclusive edges).
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.right() <= self.right() && r.bottom() <= self.bottom()
    }
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.x + r.w || r.x >= self.x + self.w || self.y >= r.y + r.h || r.y >= self.y + self.h)
    }
}

/// 2D point in pixel space.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Counter-clockwise rotation applied to an image when it was placed (image space, y down).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
pub enum Rotation {
    #[default]
    None,
    Ccw90,
    Ccw180,
    Ccw270,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [Self::None, Self::Ccw90, Self::Ccw180, Self::Ccw270];

    pub fn degrees(&self) -> u32 {
        match self {
            Self::None => 0,
            Self::Ccw90 => 90,
            Self::Ccw180 => 180,
            Self::Ccw270 => 270,
        }
    }

    /// True for 90 and 270, where width and height trade places.
    pub fn swaps_axes(&self) -> bool {
        matches!(self, Self::Ccw90 | Self::Ccw270)
    }

    pub fn inverse(&self) -> Self {
        match self {
            Self::None => Self::None,
            Self::Ccw90 => Self::Ccw270,
            Self::Ccw180 => Self::Ccw180,
            Self::Ccw270 => Self::Ccw90,
        }
    }

    /// Size of a `w x h` extent after rotation.
    pub fn apply_size(&self, w: u32, h: u32) -> (u32, u32) {
        if self.swaps_axes() { (h, w) } else { (w, h) }
    }

    /// Maps cell `(x, y)` of a `w x h` grid into the rotated grid.
    pub fn apply_cell(&self, x: u32, y: u32, w: u32, h: u32) -> (u32, u32) {
        match self {
            Self::None => (x, y),
            Self::Ccw90 => (y, w - 1 - x),
            Self::Ccw180 => (w - 1 - x, h - 1 - y),
            Self::Ccw270 => (h - 1 - y, x),
        }
    }

    /// Maps a continuous point of a `w x h` extent into the rotated extent.
    pub fn apply_point(&self, p: Point, w: f32, h: f32) -> Point {
        match self {
            Self::None => p,
            Self::Ccw90 => Point::new(p.y, w - p.x),
            Self::Ccw180 => Point::new(w - p.x, h - p.y),
            Self::Ccw270 => Point::new(h - p.y, p.x),
        }
    }
}

/// Decoded image handed in by the caller. Borrowed for the duration of one pack call.
#[derive(Debug, Clone)]
pub struct SourceImage<'a> {
    /// Row-major texels, `channels` bytes each.
    pub data: &'a [u8],
    pub width: u32,
    pub height: u32,
    /// 3 (RGB) or 4 (RGBA).
    pub channels: u8,
    /// Used for ordering ties and in diagnostics.
    pub path: Option<String>,
    /// Silhouette as a triangle list in normalized `[-0.5, 0.5]` image space.
    pub triangles: Option<Vec<Point>>,
}

impl<'a> SourceImage<'a> {
    pub fn new(data: &'a [u8], width: u32, height: u32, channels: u8) -> Self {
        Self {
            data,
            width,
            height,
            channels,
            path: None,
            triangles: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_triangles(mut self, triangles: Vec<Point>) -> Self {
        self.triangles = Some(triangles);
        self
    }

    pub fn has_alpha(&self) -> bool {
        self.channels == 4
    }

    /// Name used in errors: the path when known, otherwise `#index`.
    pub fn identity(&self, index: usize) -> String {
        match &self.path {
            Some(p) => p.clone(),
            None => format!("#{index}"),
        }
    }

    #[cfg(feature = "image")]
    pub fn from_rgba(img: &'a image::RgbaImage) -> Self {
        Self::new(img.as_raw(), img.width(), img.height(), 4)
    }

    #[cfg(feature = "image")]
    pub fn from_rgb(img: &'a image::RgbImage) -> Self {
        Self::new(img.as_raw(), img.width(), img.height(), 3)
    }
}

/// An image placed on a page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlacedImage {
    /// Position of the image in the caller's input list.
    pub index: usize,
    pub path: Option<String>,
    /// Visible rectangle on the page: the occupied footprint clipped to the image. Always inside the page.
    pub rect: Rect,
    /// Page position of the rotated image's top-left texel. Transparent margins may hang outside the page.
    pub origin: (i32, i32),
    /// Image size after rotation.
    pub size: (u32, u32),
    pub rotation: Rotation,
    /// Boundary loops in page pixels.
    pub outline: Vec<Vec<Point>>,
    /// Triangle list (3 vertices per triangle) covering the silhouette, page pixels.
    pub triangles: Vec<Point>,
}

impl PlacedImage {
    /// Area covered by `triangles`.
    pub fn silhouette_area(&self) -> f64 {
        self.triangles
            .chunks_exact(3)
            .map(|t| {
                let (a, b, c) = (t[0], t[1], t[2]);
                let cross = (b.x - a.x) as f64 * (c.y - a.y) as f64
                    - (b.y - a.y) as f64 * (c.x - a.x) as f64;
                cross.abs() * 0.5
            })
            .sum()
    }
}

/// A single atlas page.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Page {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    pub images: Vec<PlacedImage>,
}

/// Atlas-level metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Meta {
    pub app: String,
    pub version: String,
    pub algorithm: Algorithm,
    pub tile_size: u32,
    pub padding: u32,
    pub page_size: u32,
    pub allow_rotation: bool,
}

/// Atlas of pages and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Atlas {
    pub pages: Vec<Page>,
    pub meta: Meta,
}

/// Statistics about atlas packing efficiency.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct AtlasStats {
    pub num_pages: usize,
    pub num_images: usize,
    /// Sum of width * height over all pages.
    pub total_page_area: u64,
    /// Sum of visible rectangle areas.
    pub covered_area: u64,
    /// Sum of silhouette triangle areas.
    pub silhouette_area: f64,
    /// covered_area / total_page_area (0.0 to 1.0).
    pub occupancy: f64,
    pub num_rotated: usize,
}

impl Atlas {
    /// Computes packing statistics for this atlas.
    pub fn stats(&self) -> AtlasStats {
        let mut num_images = 0;
        let mut total_page_area = 0u64;
        let mut covered_area = 0u64;
        let mut silhouette_area = 0f64;
        let mut num_rotated = 0;

        for page in &self.pages {
            total_page_area += page.width as u64 * page.height as u64;
            for img in &page.images {
                num_images += 1;
                covered_area += img.rect.area();
                silhouette_area += img.silhouette_area();
                if img.rotation != Rotation::None {
                    num_rotated += 1;
                }
            }
        }

        let occupancy = if total_page_area > 0 {
            covered_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        AtlasStats {
            num_pages: self.pages.len(),
            num_images,
            total_page_area,
            covered_area,
            silhouette_area,
            occupancy,
            num_rotated,
        }
    }

    /// Iterates every placed image with its page id, in page then placement order.
    pub fn placements(&self) -> impl Iterator<Item = (usize, &PlacedImage)> {
        self.pages
            .iter()
            .flat_map(|p| p.images.iter().map(move |img| (p.id, img)))
    }
}

impl AtlasStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Images: {}, Occupancy: {:.2}%, Page Area: {} px², Covered: {} px², Silhouette: {:.0} px², Rotated: {}",
            self.num_pages,
            self.num_images,
            self.occupancy * 100.0,
            self.total_page_area,
            self.covered_area,
            self.silhouette_area,
            self.num_rotated,
        )
    }
}
