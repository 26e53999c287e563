use tile_packer_core::model::SourceImage;
use tile_packer_core::order::{packing_order, squareness};

#[test]
fn squareness_prefers_large_and_elongated() {
    assert_eq!(squareness(10, 10), 100.0);
    assert_eq!(squareness(20, 5), 400.0);
    assert_eq!(squareness(5, 20), squareness(20, 5));
    assert!(squareness(40, 40) > squareness(20, 5));
}

#[test]
fn ties_break_on_path_then_index() {
    let data = vec![0u8; 16 * 16 * 4];
    let images = vec![
        SourceImage::new(&data, 16, 16, 4),
        SourceImage::new(&data, 16, 16, 4).with_path("zeta"),
        SourceImage::new(&data[..8 * 8 * 4], 8, 8, 4).with_path("aardvark"),
        SourceImage::new(&data, 16, 16, 4).with_path("alpha"),
        SourceImage::new(&data, 16, 16, 4),
    ];
    assert_eq!(packing_order(&images), vec![3, 1, 0, 4, 2]);
}

#[test]
fn larger_images_come_first() {
    let data = vec![0u8; 64 * 64 * 4];
    let images = vec![
        SourceImage::new(&data[..4 * 4 * 4], 4, 4, 4),
        SourceImage::new(&data, 64, 64, 4),
        SourceImage::new(&data[..64 * 8 * 4], 64, 8, 4),
    ];
    // 64x8: 8 * 512 = 4096, same as 64x64 area; the path-less tie keeps input order.
    assert_eq!(packing_order(&images), vec![1, 2, 0]);
}
