use tile_packer_core::prelude::*;

#[test]
fn identical_sprites_cover_the_same_area_with_either_strategy() {
    let data = vec![255u8; 20 * 12 * 4];
    let images: Vec<SourceImage<'_>> = (0..12)
        .map(|i| SourceImage::new(&data, 20, 12, 4).with_path(format!("spr{i:02}")))
        .collect();

    let tile = pack_images(&images, &Options::default()).expect("tile pack");
    let rects = pack_images(
        &images,
        &Options::builder().algorithm(Algorithm::BinSkyline).build(),
    )
    .expect("skyline pack");

    let a = tile.stats();
    let b = rects.stats();
    assert_eq!(a.num_images, 12);
    assert_eq!(b.num_images, 12);
    assert_eq!(a.covered_area, 12 * 20 * 12);
    assert_eq!(a.covered_area, b.covered_area);
}

#[test]
fn skyline_pages_stay_disjoint_and_inside() {
    let sizes = [(40u32, 10u32), (10, 40), (25, 25), (33, 7), (7, 33), (16, 16)];
    let buffers: Vec<Vec<u8>> = sizes
        .iter()
        .map(|&(w, h)| vec![255u8; (w * h * 4) as usize])
        .collect();
    let images: Vec<SourceImage<'_>> = sizes
        .iter()
        .zip(&buffers)
        .map(|(&(w, h), b)| SourceImage::new(b, w, h, 4))
        .collect();
    let opts = Options::builder()
        .algorithm(Algorithm::BinSkyline)
        .page_size(64)
        .build();

    let atlas = pack_images(&images, &opts).expect("pack");
    for page in &atlas.pages {
        let page_rect = Rect::new(0, 0, page.width, page.height);
        for (i, a) in page.images.iter().enumerate() {
            assert!(page_rect.contains(&a.rect));
            assert_eq!((a.rect.w, a.rect.h), a.size);
            for b in &page.images[i + 1..] {
                assert!(!a.rect.intersects(&b.rect));
            }
        }
    }
    assert_eq!(atlas.stats().num_images, sizes.len());
}
