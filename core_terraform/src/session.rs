use std::collections::{BTreeMap, BTreeSet};

use terra_schema::{GridDims, GridId, TileRef};

use crate::heightfield::HeightField;

/// Scratch state of one in-flight terraform command.
///
/// Collects the proposed corner heights and the tiles needing redraw while
/// the solver and the validation passes run. Nothing here touches the
/// persisted height field; on failure the session is simply dropped.
/// Ordered containers keep validation order deterministic.
#[derive(Debug)]
pub(crate) struct TerraformSession {
    grid: GridId,
    pending: BTreeMap<u32, i32>,
    dirty: BTreeSet<u32>,
}

impl TerraformSession {
    pub(crate) fn new(grid: GridId) -> Self {
        Self {
            grid,
            pending: BTreeMap::new(),
            dirty: BTreeSet::new(),
        }
    }

    /// Height of a corner as of current progress: the pending value when
    /// one is recorded, the persisted one otherwise.
    pub(crate) fn effective_height(&self, field: &HeightField, tile: TileRef) -> i32 {
        debug_assert_eq!(tile.grid, self.grid);
        match self.pending.get(&tile.index) {
            Some(&h) => h,
            None => field.height_at(tile),
        }
    }

    /// Record a proposed height; a later write for the same corner wins.
    pub(crate) fn set_pending(&mut self, tile: TileRef, height: i32) {
        debug_assert_eq!(tile.grid, self.grid);
        self.pending.insert(tile.index, height);
    }

    pub(crate) fn pending_height_of(&self, tile: TileRef) -> Option<i32> {
        self.pending.get(&tile.index).copied()
    }

    pub(crate) fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Flag the tile and its up-to-three neighbours sharing its north
    /// corner. Neighbour references leaving the grid are skipped, never
    /// wrapped.
    pub(crate) fn mark_dirty_around(&mut self, dims: &GridDims, tile: TileRef) {
        let (x, y) = tile.xy(dims);
        if y >= 1 {
            self.dirty.insert(dims.index_of(x, y - 1));
        }
        if y >= 1 && x >= 1 {
            self.dirty.insert(dims.index_of(x - 1, y - 1));
        }
        if x >= 1 {
            self.dirty.insert(dims.index_of(x - 1, y));
        }
        self.dirty.insert(tile.index);
    }

    pub(crate) fn dirty_count(&self) -> usize {
        self.dirty.len()
    }

    pub(crate) fn dirty_tiles(&self) -> impl Iterator<Item = TileRef> + '_ {
        let grid = self.grid;
        self.dirty.iter().map(move |&index| TileRef::new(grid, index))
    }

    pub(crate) fn pending_heights(&self) -> impl Iterator<Item = (TileRef, i32)> + '_ {
        let grid = self.grid;
        self.pending
            .iter()
            .map(move |(&index, &height)| (TileRef::new(grid, index), height))
    }
}
