use serde::{Deserialize, Serialize};

use crate::grid::{GridDims, TileRef};

/// Rectangular piece of one grid.
///
/// `tile` is the northern (minimum-coordinate) base tile. An area with
/// zero width or height is degenerate: it contains nothing and intersects
/// nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileArea {
    pub tile: TileRef,
    pub w: u16,
    pub h: u16,
}

impl TileArea {
    pub fn new(tile: TileRef, w: u16, h: u16) -> Self {
        Self { tile, w, h }
    }

    pub fn empty() -> Self {
        Self {
            tile: TileRef::INVALID,
            w: 0,
            h: 0,
        }
    }

    /// Build the smallest area spanning two tiles of the same grid. The
    /// stored base is always the minimum corner.
    pub fn from_corners(a: TileRef, b: TileRef, dims: &GridDims) -> Self {
        debug_assert_eq!(a.grid, b.grid);
        debug_assert!(a.is_valid() && b.is_valid());

        let (ax, ay) = a.xy(dims);
        let (bx, by) = b.xy(dims);
        let (sx, ex) = (ax.min(bx), ax.max(bx));
        let (sy, ey) = (ay.min(by), ay.max(by));

        Self {
            tile: TileRef::at_xy(a.grid, dims, sx, sy),
            w: (ex - sx + 1) as u16,
            h: (ey - sy + 1) as u16,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.w == 0 || self.h == 0
    }

    /// Grow the area to include a tile; an empty area adopts the tile as
    /// a 1x1 area.
    pub fn add(&mut self, to_add: TileRef, dims: &GridDims) {
        if !self.tile.is_valid() {
            self.tile = to_add;
            self.w = 1;
            self.h = 1;
            return;
        }

        debug_assert_eq!(self.tile.grid, to_add.grid);

        let (sx, sy) = self.tile.xy(dims);
        let ex = sx + self.w as u32 - 1;
        let ey = sy + self.h as u32 - 1;
        let (ax, ay) = to_add.xy(dims);

        let sx = ax.min(sx);
        let sy = ay.min(sy);
        let ex = ax.max(ex);
        let ey = ay.max(ey);

        self.tile = TileRef::at_xy(to_add.grid, dims, sx, sy);
        self.w = (ex - sx + 1) as u16;
        self.h = (ey - sy + 1) as u16;
    }

    pub fn contains(&self, tile: TileRef, dims: &GridDims) -> bool {
        if self.is_degenerate() {
            return false;
        }
        debug_assert_eq!(self.tile.grid, tile.grid);

        let (left, top) = self.tile.xy(dims);
        let (x, y) = tile.xy(dims);
        x >= left && x < left + self.w as u32 && y >= top && y < top + self.h as u32
    }

    pub fn contains_area(&self, other: &TileArea, dims: &GridDims) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        debug_assert_eq!(self.tile.grid, other.tile.grid);

        let (left1, top1) = self.tile.xy(dims);
        let (right1, bottom1) = (left1 + self.w as u32 - 1, top1 + self.h as u32 - 1);
        let (left2, top2) = other.tile.xy(dims);
        let (right2, bottom2) = (left2 + other.w as u32 - 1, top2 + other.h as u32 - 1);

        left2 >= left1 && right2 <= right1 && top2 >= top1 && bottom2 <= bottom1
    }

    pub fn intersects(&self, other: &TileArea, dims: &GridDims) -> bool {
        if self.is_degenerate() || other.is_degenerate() {
            return false;
        }
        debug_assert_eq!(self.tile.grid, other.tile.grid);

        let (left1, top1) = self.tile.xy(dims);
        let (right1, bottom1) = (left1 + self.w as u32 - 1, top1 + self.h as u32 - 1);
        let (left2, top2) = other.tile.xy(dims);
        let (right2, bottom2) = (left2 + other.w as u32 - 1, top2 + other.h as u32 - 1);

        !(left2 > right1 || right2 < left1 || top2 > bottom1 || bottom2 < top1)
    }

    /// Expand by `rad` tiles in each direction, clamped to grid bounds.
    pub fn expand(&mut self, rad: i32, dims: &GridDims) -> &mut Self {
        let (x, y) = self.tile.xy(dims);
        let sx = (x as i32 - rad).max(0);
        let sy = (y as i32 - rad).max(0);
        let ex = (x as i32 + self.w as i32 + rad).min(dims.width as i32);
        let ey = (y as i32 + self.h as i32 + rad).min(dims.height as i32);

        self.tile = TileRef::at_xy(self.tile.grid, dims, sx as u32, sy as u32);
        self.w = (ex - sx) as u16;
        self.h = (ey - sy) as u16;
        self
    }

    /// Truncate width and height so the area fits the grid.
    pub fn clamp_to_grid(&mut self, dims: &GridDims) {
        debug_assert!(self.tile.is_valid());
        let (x, y) = self.tile.xy(dims);
        self.w = self.w.min((dims.width - x) as u16);
        self.h = self.h.min((dims.height - y) as u16);
    }

    /// The tile at the centre, or just north of it.
    pub fn center_tile(&self, dims: &GridDims) -> TileRef {
        let (x, y) = self.tile.xy(dims);
        TileRef::at_xy(
            self.tile.grid,
            dims,
            x + self.w as u32 / 2,
            y + self.h as u32 / 2,
        )
    }
}

/// Diagonal piece of one grid.
///
/// `a` and `b` are signed one-past-end extents along the two diagonal
/// axes; their signs give the scan direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiagTileArea {
    pub tile: TileRef,
    pub a: i16,
    pub b: i16,
}

impl DiagTileArea {
    pub fn new(tile: TileRef, a: i16, b: i16) -> Self {
        Self { tile, a, b }
    }

    /// Build a diagonal area from two opposite corners.
    ///
    /// The base stays at `start`; re-anchoring is not possible because the
    /// opposite corner of a diagonal rectangle may be a "flattened" spot
    /// with no tile on it.
    pub fn from_corners(start: TileRef, end: TileRef, dims: &GridDims) -> Self {
        debug_assert_eq!(start.grid, end.grid);
        debug_assert!(start.is_valid() && end.is_valid());

        let (sx, sy) = start.xy(dims);
        let (ex, ey) = end.xy(dims);
        let mut a = (ey as i32 + ex as i32) - (sy as i32 + sx as i32);
        let mut b = (ey as i32 - ex as i32) - (sy as i32 - sx as i32);

        // One-past-end semantics, like w/h on the orthogonal area.
        if a > 0 {
            a += 1;
        } else {
            a -= 1;
        }
        if b > 0 {
            b += 1;
        } else {
            b -= 1;
        }

        Self {
            tile: start,
            a: a as i16,
            b: b as i16,
        }
    }

    pub fn is_degenerate(&self) -> bool {
        self.a == 0 || self.b == 0
    }

    pub fn contains(&self, tile: TileRef, dims: &GridDims) -> bool {
        debug_assert_eq!(self.tile.grid, tile.grid);

        let (x, y) = tile.xy(dims);
        let a = y as i32 + x as i32;
        let b = y as i32 - x as i32;

        let (bx, by) = self.tile.xy(dims);
        let mut start_a = by as i32 + bx as i32;
        let mut start_b = by as i32 - bx as i32;
        let mut end_a = start_a + self.a as i32;
        let mut end_b = start_b + self.b as i32;

        // Swap if necessary, preserving the one-past-end semantics.
        if start_a > end_a {
            let tmp = start_a;
            start_a = end_a + 1;
            end_a = tmp + 1;
        }
        if start_b > end_b {
            let tmp = start_b;
            start_b = end_b + 1;
            end_b = tmp + 1;
        }

        a >= start_a && a < end_a && b >= start_b && b < end_b
    }
}
