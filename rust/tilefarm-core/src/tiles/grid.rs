//! Partitioning of the target image into square tiles.

use std::fmt;

use super::TileIndex;

/// Pixel bounds of a tile. `x1` and `y1` are exclusive and clamped to the image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRect {
    pub x0: u32,
    pub x1: u32,
    pub y0: u32,
    pub y1: u32,
}

impl TileRect {
    pub fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> u32 {
        self.y1 - self.y0
    }
}

impl fmt::Display for TileRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) x [{}, {})", self.x0, self.x1, self.y0, self.y1)
    }
}

/// Tile layout derived from the image size and tile edge length.
///
/// Tiles are numbered row-major: index `i` sits in column `i % tiles_x` and
/// row `i / tiles_x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileGrid {
    width: u32,
    height: u32,
    tile_size: u32,
    tiles_x: u32,
    tiles_y: u32,
}

impl TileGrid {
    /// Create the grid for a `width` x `height` image.
    ///
    /// `tile_size` must be non-zero; configuration validation guarantees it.
    pub fn new(width: u32, height: u32, tile_size: u32) -> Self {
        Self {
            width,
            height,
            tile_size,
            tiles_x: width.div_ceil(tile_size),
            tiles_y: height.div_ceil(tile_size),
        }
    }

    /// Returns `(tiles_x, tiles_y, total_tiles)`.
    pub fn grid_dimensions(&self) -> (u32, u32, u64) {
        (self.tiles_x, self.tiles_y, self.total_tiles())
    }

    pub fn total_tiles(&self) -> u64 {
        u64::from(self.tiles_x) * u64::from(self.tiles_y)
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Pixel rectangle of tile `index`.
    ///
    /// The caller must pass `index < total_tiles`; the result is meaningless
    /// otherwise. The row is derived by dividing by `tiles_x`, so non-square
    /// grids map correctly.
    pub fn tile_rect(&self, index: TileIndex) -> TileRect {
        debug_assert!(u64::from(index) < self.total_tiles());

        let col = index % self.tiles_x;
        let row = index / self.tiles_x;
        let x0 = col * self.tile_size;
        let y0 = row * self.tile_size;

        TileRect {
            x0,
            x1: x0.saturating_add(self.tile_size).min(self.width),
            y0,
            y1: y0.saturating_add(self.tile_size).min(self.height),
        }
    }
}
