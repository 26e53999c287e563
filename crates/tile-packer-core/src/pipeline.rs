use crate::config::{Algorithm, Options};
use crate::error::{Result, TilePackError};
use crate::model::{Atlas, Meta, Page, PlacedImage, Point, Rotation, SourceImage};
use crate::order::packing_order;
use crate::orient::OrientedImage;
use crate::packer::tile::{Placement, TilePlacer};
use crate::packer::{Packer, Slot, skyline::SkylinePacker};
use crate::shape::{self, Shape};
use crate::silhouette::{self, Footprint};
use std::time::Instant;
use tracing::{debug, instrument};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

#[instrument(skip_all, fields(images = images.len(), algorithm = %opts.algorithm))]
/// Packs `images` into atlas pages and returns the page layout with per-image silhouettes.
///
/// Notes:
/// - Images are placed in a deterministic order (see [`crate::order::packing_order`]), output
///   keeps each image's input `index`.
/// - With `page_size == 0` the atlas has exactly one page, grown until everything fits.
/// - Any failing image aborts the whole call; no partial atlas is returned.
pub fn pack_images(images: &[SourceImage<'_>], opts: &Options) -> Result<Atlas> {
    opts.validate()?;

    let order = packing_order(images);
    let pages = match opts.algorithm {
        Algorithm::BinSkyline => pack_rects(images, &order, opts)?,
        _ => pack_tiles(images, &order, opts)?,
    };

    Ok(Atlas {
        pages,
        meta: Meta {
            app: "tile-packer".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            algorithm: opts.algorithm,
            tile_size: opts.tile_size,
            padding: opts.padding,
            page_size: opts.page_size,
            allow_rotation: opts.allow_rotation,
        },
    })
}

fn next_pow2(mut v: u32) -> u32 {
    if v <= 1 {
        return 1;
    }
    v -= 1;
    v |= v >> 1;
    v |= v >> 2;
    v |= v >> 4;
    v |= v >> 8;
    v |= v >> 16;
    v + 1
}

/// Initial edge of a growing page: the power of two covering the summed footprint area (and the
/// largest footprint), halved once.
pub fn start_size(footprints: impl IntoIterator<Item = (u32, u32)>) -> u32 {
    let mut total = 0u64;
    let mut largest = 0u32;
    for (w, h) in footprints {
        total += w as u64 * h as u64;
        largest = largest.max(w).max(h);
    }
    let side = if total == 0 {
        128
    } else {
        (total as f64).sqrt().ceil() as u32
    };
    (next_pow2(side.max(largest)) / 2).max(1)
}

fn extract_all(images: &[SourceImage<'_>], opts: &Options) -> Result<Vec<Shape>> {
    #[cfg(feature = "parallel")]
    {
        if opts.parallel {
            // Collected per image first so the reported error does not depend on scheduling.
            let results: Vec<Result<Shape>> = images
                .par_iter()
                .enumerate()
                .map(|(i, img)| shape::extract(img, i, opts))
                .collect();
            return results.into_iter().collect();
        }
    }
    images
        .iter()
        .enumerate()
        .map(|(i, img)| shape::extract(img, i, opts))
        .collect()
}

struct Prep {
    oriented: OrientedImage,
    padding: u32,
    triangles: Option<Vec<Point>>,
    placement: Option<Placement>,
}

fn pack_tiles(images: &[SourceImage<'_>], order: &[usize], opts: &Options) -> Result<Vec<Page>> {
    let ts = opts.tile_size;

    let started = Instant::now();
    let shapes = extract_all(images, opts)?;
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "extracted tile shapes"
    );

    let start = start_size(shapes.iter().map(|s| {
        let t = s.mask.tight();
        (t.w * ts, t.h * ts)
    }));
    let mut placer = TilePlacer::new(ts, opts.page_size, start);
    let mut prepared: Vec<Prep> = shapes
        .into_iter()
        .map(|s| Prep {
            oriented: OrientedImage::new(s.mask, opts.allow_rotation),
            padding: s.padding,
            triangles: s.triangles,
            placement: None,
        })
        .collect();

    let started = Instant::now();
    for &i in order {
        let name = images[i].identity(i);
        let prep = &mut prepared[i];
        prep.placement = Some(placer.place(i, &mut prep.oriented, &name)?);
    }
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        pages = placer.pages().len(),
        "placed images"
    );

    let started = Instant::now();
    let fixed = opts.is_fixed_page();
    let mut pages = Vec::with_capacity(placer.pages().len());
    for page in placer.pages() {
        if fixed && page.images().is_empty() {
            continue;
        }
        let (width, height) = placer.page_pixels(page);
        let mut placed = Vec::with_capacity(page.images().len());
        for &i in page.images() {
            let prep = &prepared[i];
            let (Some(p), Some(mask)) = (prep.placement, prep.oriented.selected()) else {
                continue;
            };
            let img = &images[i];
            let fp = match &prep.triangles {
                Some(tris) => silhouette::project_triangles(
                    mask,
                    p.pos,
                    ts,
                    prep.padding,
                    img.width,
                    img.height,
                    tris,
                ),
                None => {
                    silhouette::project_mask(mask, p.pos, ts, prep.padding, img.width, img.height)
                }
            };
            placed.push(placed_image(i, img, mask.rotation(), fp));
        }
        pages.push(Page {
            id: pages.len(),
            width,
            height,
            images: placed,
        });
    }
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        "projected silhouettes"
    );
    Ok(pages)
}

fn placed_image(index: usize, img: &SourceImage<'_>, rotation: Rotation, fp: Footprint) -> PlacedImage {
    PlacedImage {
        index,
        path: img.path.clone(),
        rect: fp.rect,
        origin: fp.origin,
        size: fp.size,
        rotation,
        outline: fp.outline,
        triangles: fp.triangles,
    }
}

/// Rectangle packing: every image reserves its bounds plus padding, no masks are built.
fn pack_rects(images: &[SourceImage<'_>], order: &[usize], opts: &Options) -> Result<Vec<Page>> {
    let mut pads = Vec::with_capacity(images.len());
    for (i, img) in images.iter().enumerate() {
        shape::validate_image(img, i)?;
        let padded = opts.padding > 0
            && img.has_alpha()
            && shape::needs_padding(img, opts.padding, opts.alpha_threshold);
        pads.push(if padded { opts.padding } else { 0 });
    }
    let slot = |i: usize| {
        (
            images[i].width + pads[i] * 2,
            images[i].height + pads[i] * 2,
        )
    };

    let started = Instant::now();
    let pages = if opts.is_fixed_page() {
        let size = opts.page_size;
        for &i in order {
            let (w, h) = slot(i);
            if w > size || h > size {
                return Err(TilePackError::Placement {
                    image: images[i].identity(i),
                    width: w,
                    height: h,
                    page_size: size,
                });
            }
        }

        let mut pages = Vec::new();
        let mut remaining: Vec<usize> = order.to_vec();
        while !remaining.is_empty() {
            let mut packer = SkylinePacker::new(size, size, opts.allow_rotation);
            let mut placed = Vec::new();
            remaining.retain(|&i| {
                let (w, h) = slot(i);
                match packer.pack(w, h) {
                    Some(s) => {
                        placed.push((i, s));
                        false
                    }
                    None => true,
                }
            });
            debug!(page = pages.len(), images = placed.len(), size, "filled skyline page");
            pages.push(rect_page(pages.len(), &packer, placed, images, &pads));
        }
        pages
    } else {
        let edge = start_size(order.iter().map(|&i| slot(i)));
        let (mut width, mut height) = (edge, edge);
        loop {
            let mut packer = SkylinePacker::new(width, height, opts.allow_rotation);
            let mut placed = Vec::with_capacity(order.len());
            let complete = order.iter().all(|&i| {
                let (w, h) = slot(i);
                match packer.pack(w, h) {
                    Some(s) => {
                        placed.push((i, s));
                        true
                    }
                    None => false,
                }
            });
            if complete {
                break vec![rect_page(0, &packer, placed, images, &pads)];
            }
            if width <= height {
                width *= 2;
            } else {
                height *= 2;
            }
            debug!(width, height, "restarting skyline page with larger size");
        }
    };
    debug!(
        elapsed_ms = started.elapsed().as_millis() as u64,
        pages = pages.len(),
        "placed rectangles"
    );
    Ok(pages)
}

fn rect_page(
    id: usize,
    packer: &SkylinePacker,
    placed: Vec<(usize, Slot)>,
    images: &[SourceImage<'_>],
    pads: &[u32],
) -> Page {
    let images_out = placed
        .into_iter()
        .map(|(i, s)| {
            let img = &images[i];
            let rotation = if s.rotated {
                Rotation::Ccw90
            } else {
                Rotation::None
            };
            let size = rotation.apply_size(img.width, img.height);
            let fp = silhouette::project_rect(s.rect.x + pads[i], s.rect.y + pads[i], size);
            placed_image(i, img, rotation, fp)
        })
        .collect();
    Page {
        id,
        width: packer.width(),
        height: packer.height(),
        images: images_out,
    }
}
