use terra_schema::{GridDims, GridId};

use crate::heightfield::HeightField;

/// Number of staging buffers available for copied selections.
pub const NUM_STAGING_BUFFERS: usize = 5;

/// Bank of off-world staging buffers holding copied height data.
///
/// Buffers are sized one tile larger than their content in each dimension
/// so that corner areas (content size + 1) always fit; the extra border
/// row and column play the role the void map border plays on the live
/// world. Buffers are never validated against structures or content.
#[derive(Debug)]
pub struct ClipboardBank {
    buffers: [Option<HeightField>; NUM_STAGING_BUFFERS],
}

impl Default for ClipboardBank {
    fn default() -> Self {
        Self::new()
    }
}

impl ClipboardBank {
    pub fn new() -> Self {
        Self {
            buffers: std::array::from_fn(|_| None),
        }
    }

    /// Grid id a buffer slot is addressed by.
    pub fn grid_id(slot: usize) -> GridId {
        debug_assert!(slot < NUM_STAGING_BUFFERS);
        GridId(slot as u16 + 1)
    }

    /// Buffer slot behind a grid id, if it names one.
    pub fn slot_of(grid: GridId) -> Option<usize> {
        let slot = grid.0.checked_sub(1)? as usize;
        (slot < NUM_STAGING_BUFFERS).then_some(slot)
    }

    /// Allocate a buffer for the given content size, clearing any earlier
    /// content. Heights start at zero.
    pub fn allocate(&mut self, slot: usize, content_w: u32, content_h: u32) -> GridId {
        debug_assert!(content_w >= 1 && content_h >= 1);
        let grid = Self::grid_id(slot);
        let dims = GridDims::new(content_w + 1, content_h + 1);
        self.buffers[slot] = Some(HeightField::new(grid, dims));
        tracing::debug!(
            target: "earthworks::clipboard",
            slot,
            width = dims.width,
            height = dims.height,
            "staging buffer allocated"
        );
        grid
    }

    pub fn clear(&mut self, slot: usize) {
        debug_assert!(slot < NUM_STAGING_BUFFERS);
        self.buffers[slot] = None;
    }

    pub fn is_empty(&self, slot: usize) -> bool {
        debug_assert!(slot < NUM_STAGING_BUFFERS);
        self.buffers[slot].is_none()
    }

    pub fn get(&self, grid: GridId) -> Option<&HeightField> {
        let slot = Self::slot_of(grid)?;
        self.buffers[slot].as_ref()
    }

    pub fn get_mut(&mut self, grid: GridId) -> Option<&mut HeightField> {
        let slot = Self::slot_of(grid)?;
        self.buffers[slot].as_mut()
    }
}
