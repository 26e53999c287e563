use tile_packer_core::grid::BitGrid;
use tile_packer_core::mask::TileMask;
use tile_packer_core::model::{Point, Rotation};
use tile_packer_core::orient::OrientedImage;

/// 3x2 mask shaped like a "Γ" with a gap.
fn gamma() -> TileMask {
    let mut cells = BitGrid::new(3, 2);
    cells.set(0, 0);
    cells.set(1, 0);
    cells.set(2, 0);
    cells.set(0, 1);
    TileMask::from_cells(cells)
}

#[test]
fn four_quarter_turns_restore_the_mask() {
    let m = gamma();
    let mut r = m.clone();
    for _ in 0..4 {
        r = r.rotated(Rotation::Ccw90);
    }
    assert_eq!(r, m);
    assert_eq!(r.rotation(), Rotation::None);
}

#[test]
fn inverse_rotation_undoes_each_variant() {
    let m = gamma();
    for rot in Rotation::ALL {
        let there = m.rotated(rot);
        let back = there.rotated(rot.inverse());
        assert_eq!(back, m, "{rot:?}");
    }
}

#[test]
fn rotation_moves_cells_counter_clockwise() {
    let m = gamma();
    let r = m.rotated(Rotation::Ccw90);
    assert_eq!((r.tile_width(), r.tile_height()), (2, 3));
    // (x, y) -> (y, w - 1 - x) with w = 3.
    assert!(r.get(0, 2)); // from (0, 0)
    assert!(r.get(0, 1)); // from (1, 0)
    assert!(r.get(0, 0)); // from (2, 0)
    assert!(r.get(1, 2)); // from (0, 1)
    assert!(!r.get(1, 0));
    assert_eq!(r.cells().count_ones(), m.cells().count_ones());
    assert_eq!(r.rotation(), Rotation::Ccw90);
}

#[test]
fn points_return_after_inverse_rotation() {
    let (w, h) = (30.0f32, 12.0f32);
    let p = Point::new(7.5, 2.0);
    for rot in Rotation::ALL {
        let (rw, rh) = if rot.swaps_axes() { (h, w) } else { (w, h) };
        let q = rot.apply_point(p, w, h);
        let back = rot.inverse().apply_point(q, rw, rh);
        assert!((back.x - p.x).abs() < 1e-4 && (back.y - p.y).abs() < 1e-4, "{rot:?}");
    }
}

#[test]
fn variant_sets_follow_mask_shape() {
    let irregular = OrientedImage::new(gamma(), true);
    assert_eq!(irregular.variants().len(), 4);
    assert_eq!(irregular.base().rotation(), Rotation::None);

    let bar = OrientedImage::new(TileMask::from_cells(BitGrid::filled(4, 1)), true);
    let rots: Vec<Rotation> = bar.variants().iter().map(|v| v.rotation()).collect();
    assert_eq!(rots, vec![Rotation::None, Rotation::Ccw90]);

    let square = OrientedImage::new(TileMask::from_cells(BitGrid::filled(3, 3)), true);
    assert_eq!(square.variants().len(), 1);

    let locked = OrientedImage::new(gamma(), false);
    assert_eq!(locked.variants().len(), 1);
    assert!(locked.selected().is_none());
}

#[test]
fn empty_mask_counts_as_solid() {
    let m = TileMask::from_cells(BitGrid::new(2, 3));
    assert!(m.is_solid());
    assert_eq!(m.tight().w, 2);
    assert_eq!(m.tight().h, 3);
}
