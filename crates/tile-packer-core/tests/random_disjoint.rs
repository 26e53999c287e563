use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use tile_packer_core::prelude::*;

/// Random RGBA sprite made of a few opaque blobs on a transparent background.
fn blob_sprite(rng: &mut impl Rng, w: u32, h: u32) -> Vec<u8> {
    let mut data = vec![0u8; (w * h * 4) as usize];
    for _ in 0..rng.gen_range(1..=3) {
        let cx = rng.gen_range(0..w) as i64;
        let cy = rng.gen_range(0..h) as i64;
        let r = rng.gen_range(2..=(w.min(h) / 2).max(2)) as i64;
        for y in 0..h as i64 {
            for x in 0..w as i64 {
                if (x - cx).pow(2) + (y - cy).pow(2) <= r * r {
                    let i = ((y as u32 * w + x as u32) * 4) as usize;
                    data[i..i + 4].copy_from_slice(&[90, 180, 40, 255]);
                }
            }
        }
    }
    data
}

fn sprites(seed: u64, count: usize) -> Vec<(u32, u32, Vec<u8>)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|_| {
            let w = rng.gen_range(6..=60);
            let h = rng.gen_range(6..=60);
            let data = blob_sprite(&mut rng, w, h);
            (w, h, data)
        })
        .collect()
}

/// Tiles touched by the merged silhouette rectangles (six vertices per rectangle).
fn tiles_of(placed: &PlacedImage, tile: u32) -> Vec<(u32, u32)> {
    let mut out = Vec::new();
    for quad in placed.triangles.chunks_exact(6) {
        let (x0, y0) = (quad[0].x, quad[0].y);
        let (x1, y1) = (quad[2].x, quad[2].y);
        let tx0 = (x0 / tile as f32).floor() as u32;
        let ty0 = (y0 / tile as f32).floor() as u32;
        let tx1 = (x1 / tile as f32).ceil() as u32;
        let ty1 = (y1 / tile as f32).ceil() as u32;
        for ty in ty0..ty1 {
            for tx in tx0..tx1 {
                out.push((tx, ty));
            }
        }
    }
    out
}

fn check_atlas(atlas: &Atlas, count: usize, tile: u32) {
    let mut seen = HashSet::new();
    for page in &atlas.pages {
        let page_rect = Rect::new(0, 0, page.width, page.height);
        let mut occupied: HashSet<(u32, u32)> = HashSet::new();
        for placed in &page.images {
            assert!(seen.insert(placed.index), "image placed twice");
            assert!(page_rect.contains(&placed.rect), "rect leaves the page");
            for p in placed.outline.iter().flatten().chain(placed.triangles.iter()) {
                assert!(p.x >= 0.0 && p.y >= 0.0);
                assert!(p.x <= page.width as f32 && p.y <= page.height as f32);
            }
            for t in tiles_of(placed, tile) {
                assert!(occupied.insert(t), "tile {t:?} covered twice");
            }
        }
    }
    assert_eq!(seen.len(), count);
}

#[test]
fn unbounded_pack_is_disjoint_and_single_page() {
    let data = sprites(7, 48);
    let images: Vec<SourceImage<'_>> = data
        .iter()
        .map(|(w, h, d)| SourceImage::new(d, *w, *h, 4))
        .collect();
    let opts = Options::builder().tile_size(8).build();

    let atlas = pack_images(&images, &opts).expect("pack");
    assert_eq!(atlas.pages.len(), 1);
    check_atlas(&atlas, images.len(), 8);
}

#[test]
fn fixed_pack_is_disjoint_across_pages() {
    let data = sprites(11, 64);
    let images: Vec<SourceImage<'_>> = data
        .iter()
        .map(|(w, h, d)| SourceImage::new(d, *w, *h, 4))
        .collect();
    let opts = Options::builder().tile_size(8).page_size(128).build();

    let atlas = pack_images(&images, &opts).expect("pack");
    for page in &atlas.pages {
        assert_eq!((page.width, page.height), (128, 128));
        assert!(!page.images.is_empty());
    }
    check_atlas(&atlas, images.len(), 8);
}

#[test]
fn no_rotation_keeps_every_image_upright() {
    let data = sprites(3, 24);
    let images: Vec<SourceImage<'_>> = data
        .iter()
        .map(|(w, h, d)| SourceImage::new(d, *w, *h, 4))
        .collect();
    let opts = Options::builder().tile_size(8).allow_rotation(false).build();

    let atlas = pack_images(&images, &opts).expect("pack");
    assert_eq!(atlas.stats().num_rotated, 0);
    check_atlas(&atlas, images.len(), 8);
}
