use tile_packer_core::model::Rect;
use tile_packer_core::packer::skyline::SkylinePacker;
use tile_packer_core::packer::Packer;

#[test]
fn skyline_fills_a_row_before_stacking() {
    let mut p = SkylinePacker::new(64, 64, false);
    let a = p.pack(32, 16).expect("first");
    let b = p.pack(32, 16).expect("second");
    let c = p.pack(32, 16).expect("third");
    assert_eq!(a.rect, Rect::new(0, 0, 32, 16));
    assert_eq!(b.rect, Rect::new(32, 0, 32, 16));
    assert_eq!(c.rect, Rect::new(0, 16, 32, 16));
}

#[test]
fn skyline_rotates_when_only_rotated_fits() {
    // 64x16 is too wide for a 16 px page; upright 16x64 fits.
    let mut p = SkylinePacker::new(16, 64, true);
    let s = p.pack(64, 16).expect("rotated fit should succeed");
    assert!(s.rotated, "should rotate because only rotated fits");
    assert_eq!((s.rect.w, s.rect.h), (16, 64));
}

#[test]
fn skyline_without_rotation_rejects() {
    let mut p = SkylinePacker::new(16, 64, false);
    assert!(!p.can_pack(64, 16));
    assert!(p.pack(64, 16).is_none());
}
