use super::{Packer, Slot};
use crate::model::Rect;

#[derive(Clone, Copy, Debug)]
struct SkylineNode {
    x: u32,
    y: u32,
    w: u32,
}

impl SkylineNode {
    #[inline]
    fn left(&self) -> u32 {
        self.x
    }
    #[inline]
    fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
}

/// Bottom-left skyline packer for whole rectangles.
#[derive(Debug, Clone)]
pub struct SkylinePacker {
    bounds: Rect,
    allow_rotation: bool,
    skylines: Vec<SkylineNode>,
}

impl SkylinePacker {
    pub fn new(width: u32, height: u32, allow_rotation: bool) -> Self {
        Self {
            bounds: Rect::new(0, 0, width, height),
            allow_rotation,
            skylines: vec![SkylineNode { x: 0, y: 0, w: width }],
        }
    }

    pub fn width(&self) -> u32 {
        self.bounds.w
    }

    pub fn height(&self) -> u32 {
        self.bounds.h
    }

    fn can_put(&self, mut i: usize, w: u32, h: u32) -> Option<Rect> {
        let mut rect = Rect::new(self.skylines[i].x, 0, w, h);
        let mut width_left = rect.w;
        loop {
            rect.y = rect.y.max(self.skylines[i].y);
            if !self.bounds.contains(&rect) {
                return None;
            }
            if self.skylines[i].w >= width_left {
                return Some(rect);
            }
            width_left -= self.skylines[i].w;
            i += 1;
            if i >= self.skylines.len() {
                return None;
            }
        }
    }

    /// Lowest bottom edge wins, then the narrower skyline segment. Upright beats rotated on ties.
    fn find_bottom_left(&self, w: u32, h: u32) -> Option<(usize, Rect)> {
        let mut best: Option<(usize, Rect)> = None;
        let mut best_key = (u32::MAX, u32::MAX);

        let mut consider = |i: usize, r: Rect, seg_w: u32| {
            let key = (r.bottom(), seg_w);
            if key < best_key {
                best_key = key;
                best = Some((i, r));
            }
        };

        for i in 0..self.skylines.len() {
            let seg_w = self.skylines[i].w;
            if let Some(r) = self.can_put(i, w, h) {
                consider(i, r, seg_w);
            }
            if self.allow_rotation && w != h {
                if let Some(r) = self.can_put(i, h, w) {
                    consider(i, r, seg_w);
                }
            }
        }
        best
    }

    fn split(&mut self, index: usize, rect: &Rect) {
        let skyline = SkylineNode {
            x: rect.x,
            y: rect.y + rect.h,
            w: rect.w,
        };
        debug_assert!(skyline.right() <= self.bounds.right());

        self.skylines.insert(index, skyline);

        let i = index + 1;
        while i < self.skylines.len() {
            let (prev, cur) = (self.skylines[i - 1], self.skylines[i]);
            if prev.left() > cur.left() || cur.left() > prev.right() {
                break;
            }
            let shrink = prev.right() - cur.left() + 1;
            if cur.w <= shrink {
                self.skylines.remove(i);
            } else {
                self.skylines[i].x += shrink;
                self.skylines[i].w -= shrink;
                break;
            }
        }
    }

    fn merge(&mut self) {
        let mut i = 1;
        while i < self.skylines.len() {
            if self.skylines[i - 1].y == self.skylines[i].y {
                let w = self.skylines[i].w;
                self.skylines[i - 1].w += w;
                self.skylines.remove(i);
            } else {
                i += 1;
            }
        }
    }
}

impl Packer for SkylinePacker {
    fn can_pack(&self, w: u32, h: u32) -> bool {
        self.find_bottom_left(w, h).is_some()
    }

    fn pack(&mut self, w: u32, h: u32) -> Option<Slot> {
        let (i, rect) = self.find_bottom_left(w, h)?;
        self.split(i, &rect);
        self.merge();
        Some(Slot {
            rect,
            rotated: rect.w != w,
        })
    }
}

