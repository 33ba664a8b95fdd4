use terra_schema::{GridDims, GridId, Slope, TileRef};

/// Corner heights of one grid.
///
/// The stored value for a tile is the height of its north corner; the
/// remaining three corners are the north corners of the neighbours toward
/// +X, +Y and the shared diagonal.
#[derive(Debug, Clone)]
pub struct HeightField {
    grid: GridId,
    dims: GridDims,
    heights: Vec<u8>,
}

impl HeightField {
    pub fn new(grid: GridId, dims: GridDims) -> Self {
        Self {
            grid,
            dims,
            heights: vec![0; dims.tile_count() as usize],
        }
    }

    pub fn grid(&self) -> GridId {
        self.grid
    }

    pub fn dims(&self) -> GridDims {
        self.dims
    }

    pub fn tile_at(&self, x: u32, y: u32) -> TileRef {
        TileRef::at_xy(self.grid, &self.dims, x, y)
    }

    #[inline]
    pub fn height_at(&self, tile: TileRef) -> i32 {
        debug_assert_eq!(tile.grid, self.grid);
        debug_assert!(tile.index < self.dims.tile_count());
        self.heights[tile.index as usize] as i32
    }

    #[inline]
    pub fn set_height(&mut self, tile: TileRef, height: i32) {
        debug_assert_eq!(tile.grid, self.grid);
        debug_assert!((0..=u8::MAX as i32).contains(&height));
        self.heights[tile.index as usize] = height as u8;
    }

    /// Raw height data, for hosts that snapshot or compare whole grids.
    pub fn raw_heights(&self) -> &[u8] {
        &self.heights
    }
}

/// Derive a tile's slope from its four corner heights.
///
/// Returns the slope flags together with the minimum and maximum corner
/// height. The tile is `STEEP` when the spread exceeds one unit.
pub fn slope_from_corners(n: i32, w: i32, s: i32, e: i32) -> (Slope, i32, i32) {
    let z_min = n.min(w).min(s).min(e);
    let z_max = n.max(w).max(s).max(e);

    let mut slope = if z_max > z_min + 1 {
        Slope::STEEP
    } else {
        Slope::empty()
    };
    if w > z_min {
        slope |= Slope::W;
    }
    if s > z_min {
        slope |= Slope::S;
    }
    if e > z_min {
        slope |= Slope::E;
    }
    if n > z_min {
        slope |= Slope::N;
    }

    (slope, z_min, z_max)
}
