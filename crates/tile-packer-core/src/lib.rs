//! Core library for packing sprites into atlases on a tile grid.
//!
//! - Shapes: each image becomes a tile occupancy mask, from its alpha channel or from a supplied
//!   triangle silhouette, so irregular sprites can interlock
//! - Placement: first fit, row-major, over up to four rotations; pages are added (fixed size) or
//!   grown (unbounded)
//! - Output: per-image page rectangle, rotation, outline loops and triangles in page pixels
//! - A rectangle-only skyline strategy shares the same entry point
//!
//! Quick example:
//! ```ignore
//! use tile_packer_core::prelude::*;
//! # fn main() -> tile_packer_core::Result<()> {
//! let sprite = image::open("hero.png").unwrap().to_rgba8();
//! let images = vec![SourceImage::from_rgba(&sprite).with_path("hero.png")];
//! let opts = Options::builder().tile_size(8).page_size(512).build();
//! let atlas = pack_images(&images, &opts)?;
//! println!("{}", atlas.stats().summary());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod grid;
pub mod hull;
pub mod mask;
pub mod model;
pub mod order;
pub mod orient;
pub mod packer;
pub mod pipeline;
pub mod shape;
pub mod silhouette;

pub use config::*;
pub use error::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `tile_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Algorithm, Options, OptionsBuilder};
    pub use crate::error::{Result, TilePackError};
    pub use crate::mask::TileMask;
    pub use crate::model::{
        Atlas, AtlasStats, Meta, Page, PlacedImage, Point, Rect, Rotation, SourceImage,
    };
    pub use crate::pack_images;
}
