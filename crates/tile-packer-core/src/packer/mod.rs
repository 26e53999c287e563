use crate::model::Rect;

pub mod skyline;
pub mod tile;

/// A slot reserved by a rectangle packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    /// Reserved area on the page, size after rotation.
    pub rect: Rect,
    /// True when the rectangle was turned 90 degrees to fit.
    pub rotated: bool,
}

/// A packer places rectangles into a page.
///
/// Implementations must ensure no overlaps and keep every slot inside the page.
/// `pack` returns `None` if the rectangle cannot be placed on the current page.
pub trait Packer {
    fn can_pack(&self, w: u32, h: u32) -> bool;
    fn pack(&mut self, w: u32, h: u32) -> Option<Slot>;
}
