use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{Result, TilePackError};

/// Packing strategies.
/// Key notes:
///   - the three `Tile*` variants share the tile-grid placer and differ only in how an image's
///     occupancy mask is produced
///   - `BinSkyline` packs plain rectangles and ignores tile size and alpha
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Algorithm {
    /// Triangle rasterization for images that carry a triangle list, alpha rasterization otherwise.
    AutoTile,
    /// Alpha-threshold rasterization for every image.
    TileGrid,
    /// Triangle rasterization for every image; hulls are built from alpha when not supplied.
    TileConvexHull,
    /// Rectangle skyline (bottom-left), no masks.
    BinSkyline,
}

impl Algorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AutoTile => "auto-tile",
            Self::TileGrid => "tile-grid",
            Self::TileConvexHull => "tile-convex-hull",
            Self::BinSkyline => "bin-skyline",
        }
    }

    /// True for the strategies that run through the tile placer.
    pub fn is_tile(&self) -> bool {
        !matches!(self, Self::BinSkyline)
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = TilePackError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "auto-tile" | "auto" => Ok(Self::AutoTile),
            "tile-grid" | "tile" => Ok(Self::TileGrid),
            "tile-convex-hull" | "convex-hull" | "hull" => Ok(Self::TileConvexHull),
            "bin-skyline" | "skyline" => Ok(Self::BinSkyline),
            other => Err(TilePackError::Configuration(format!(
                "unrecognized algorithm '{other}'"
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Options {
    #[serde(default = "default_algorithm")]
    pub algorithm: Algorithm,
    /// Square page size in pixels. 0 packs everything into one page that grows to fit.
    #[serde(default)]
    pub page_size: u32,
    /// Allow 90/180/270 degree variants.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
    /// Edge of one collision cell in pixels.
    #[serde(default = "default_tile_size")]
    pub tile_size: u32,
    /// Transparent border added around images whose edges are not already clear.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Texels with alpha at or below this value count as empty.
    #[serde(default = "default_alpha_threshold")]
    pub alpha_threshold: u8,

    /// Run shape extraction on the rayon pool when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            algorithm: default_algorithm(),
            page_size: 0,
            allow_rotation: default_allow_rotation(),
            tile_size: default_tile_size(),
            padding: default_padding(),
            alpha_threshold: default_alpha_threshold(),
            parallel: false,
        }
    }
}

impl Options {
    /// Validates the option combination.
    ///
    /// Returns an error if:
    /// - `tile_size` is zero
    /// - a fixed `page_size` is not a whole number of tiles
    pub fn validate(&self) -> Result<()> {
        if self.algorithm.is_tile() && self.tile_size == 0 {
            return Err(TilePackError::Configuration(format!(
                "tile_size must be positive for {}",
                self.algorithm
            )));
        }
        if self.algorithm.is_tile() && self.page_size != 0 && self.page_size % self.tile_size != 0
        {
            return Err(TilePackError::Configuration(format!(
                "page_size ({}) is not a multiple of tile_size ({})",
                self.page_size, self.tile_size
            )));
        }
        Ok(())
    }

    /// True when pages have a fixed size and more pages are added on overflow.
    pub fn is_fixed_page(&self) -> bool {
        self.page_size != 0
    }

    /// Create a fluent builder for `Options`.
    pub fn builder() -> OptionsBuilder {
        OptionsBuilder::new()
    }
}

fn default_algorithm() -> Algorithm {
    Algorithm::AutoTile
}
fn default_allow_rotation() -> bool {
    true
}
fn default_tile_size() -> u32 {
    16
}
fn default_padding() -> u32 {
    1
}
fn default_alpha_threshold() -> u8 {
    1
}

/// Builder for `Options` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct OptionsBuilder {
    opts: Options,
}

impl OptionsBuilder {
    pub fn new() -> Self {
        Self {
            opts: Options::default(),
        }
    }
    pub fn algorithm(mut self, v: Algorithm) -> Self {
        self.opts.algorithm = v;
        self
    }
    pub fn page_size(mut self, v: u32) -> Self {
        self.opts.page_size = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.opts.allow_rotation = v;
        self
    }
    pub fn tile_size(mut self, v: u32) -> Self {
        self.opts.tile_size = v;
        self
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.opts.padding = v;
        self
    }
    pub fn alpha_threshold(mut self, v: u8) -> Self {
        self.opts.alpha_threshold = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.opts.parallel = v;
        self
    }
    pub fn build(self) -> Options {
        self.opts
    }
}
