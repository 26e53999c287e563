use crate::mask::TileMask;
use crate::model::Rotation;

/// All orientations of one image's mask that are worth trying, unrotated first.
#[derive(Debug, Clone)]
pub struct OrientedImage {
    variants: Vec<TileMask>,
    selected: Option<usize>,
}

impl OrientedImage {
    /// Derives rotated variants from an unrotated mask.
    ///
    /// A solid mask only gains a 90 degree variant when it is not square; 180/270 would repeat an
    /// existing footprint. With `allow_rotation` off only the unrotated mask is kept.
    pub fn new(mask: TileMask, allow_rotation: bool) -> Self {
        let mut variants = Vec::with_capacity(4);
        if allow_rotation {
            if !mask.is_solid() {
                variants.push(mask.rotated(Rotation::Ccw90));
                variants.push(mask.rotated(Rotation::Ccw180));
                variants.push(mask.rotated(Rotation::Ccw270));
            } else if mask.tile_width() != mask.tile_height() {
                variants.push(mask.rotated(Rotation::Ccw90));
            }
        }
        variants.insert(0, mask);
        Self {
            variants,
            selected: None,
        }
    }

    pub fn variants(&self) -> &[TileMask] {
        &self.variants
    }

    pub fn select(&mut self, index: usize) {
        debug_assert!(index < self.variants.len());
        self.selected = Some(index);
    }

    /// The variant the placer committed, if any.
    pub fn selected(&self) -> Option<&TileMask> {
        self.selected.map(|i| &self.variants[i])
    }

    /// The unrotated mask.
    pub fn base(&self) -> &TileMask {
        &self.variants[0]
    }
}
