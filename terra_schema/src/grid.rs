use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one addressable tile grid.
///
/// Grid 0 is the live world; staging buffers are handed out further ids by
/// the engine. Two [`TileRef`]s are comparable only when they carry the
/// same grid id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridId(pub u16);

impl GridId {
    /// The live world grid.
    pub const WORLD: GridId = GridId(0);
}

impl fmt::Display for GridId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Width and height of a grid, in tiles.
///
/// Indexing is plain `y * width + x`; widths do not have to be powers of
/// two.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridDims {
    pub width: u32,
    pub height: u32,
}

impl GridDims {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[inline]
    pub fn tile_count(&self) -> u32 {
        self.width * self.height
    }

    /// Whether the signed coordinate pair names a tile of this grid.
    #[inline]
    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= 0 && (x as u32) < self.width && y >= 0 && (y as u32) < self.height
    }

    #[inline]
    pub fn index_of(&self, x: u32, y: u32) -> u32 {
        debug_assert!(x < self.width && y < self.height);
        y * self.width + x
    }

    #[inline]
    pub fn x_of(&self, index: u32) -> u32 {
        index % self.width
    }

    #[inline]
    pub fn y_of(&self, index: u32) -> u32 {
        index / self.width
    }

    #[inline]
    pub fn xy_of(&self, index: u32) -> (u32, u32) {
        (self.x_of(index), self.y_of(index))
    }
}

/// Offset between two tiles, in tile coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileOffset {
    pub x: i32,
    pub y: i32,
}

impl TileOffset {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Reference to a tile: the grid it lives on plus its raw index there.
///
/// Invariant: `index < dims.tile_count()` for the dims of `grid`, except
/// for the [`TileRef::INVALID`] sentinel, which must never be dereferenced.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct TileRef {
    pub grid: GridId,
    pub index: u32,
}

impl TileRef {
    /// Sentinel naming no tile at all.
    pub const INVALID: TileRef = TileRef {
        grid: GridId(u16::MAX),
        index: u32::MAX,
    };

    pub fn new(grid: GridId, index: u32) -> Self {
        Self { grid, index }
    }

    pub fn at_xy(grid: GridId, dims: &GridDims, x: u32, y: u32) -> Self {
        Self::new(grid, dims.index_of(x, y))
    }

    #[inline]
    pub fn is_valid(&self) -> bool {
        self.index != u32::MAX
    }

    #[inline]
    pub fn xy(&self, dims: &GridDims) -> (u32, u32) {
        dims.xy_of(self.index)
    }

    /// Step by a coordinate offset, or `None` when the result would leave
    /// the grid. Stepping never wraps around a grid border.
    pub fn offset_by(&self, dims: &GridDims, dx: i32, dy: i32) -> Option<TileRef> {
        let (x, y) = self.xy(dims);
        let nx = x as i32 + dx;
        let ny = y as i32 + dy;
        if !dims.contains(nx, ny) {
            return None;
        }
        Some(TileRef::at_xy(self.grid, dims, nx as u32, ny as u32))
    }

    /// Coordinate difference `self - other`.
    pub fn diff_to(&self, other: &TileRef, dims: &GridDims) -> TileOffset {
        debug_assert_eq!(self.grid, other.grid);
        let (ax, ay) = self.xy(dims);
        let (bx, by) = other.xy(dims);
        TileOffset::new(ax as i32 - bx as i32, ay as i32 - by as i32)
    }
}

impl fmt::Display for TileRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "{}#{}", self.grid, self.index)
        } else {
            write!(f, "invalid")
        }
    }
}
