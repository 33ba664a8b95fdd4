//! Minimal collaborator implementations shared by the unit tests.

use terra_schema::{GridDims, Slope, TileRef};

use crate::collaborators::{
    BudgetProvider, FundsProvider, RedrawSink, StructureQuery, TileContentPolicy,
};
use crate::error::{TerraformError, TerraformErrorKind};
use crate::terraform::ApplyMode;
use crate::Money;

/// Open ground everywhere, with a void border row/column and an optional
/// tile whose content refuses to settle.
pub(crate) struct OpenContent {
    pub dims: GridDims,
    pub refuse_at: Option<TileRef>,
    pub settle_cost: Money,
}

impl OpenContent {
    pub fn new(dims: GridDims) -> Self {
        Self {
            dims,
            refuse_at: None,
            settle_cost: 0,
        }
    }
}

impl TileContentPolicy for OpenContent {
    fn is_void(&self, tile: TileRef) -> bool {
        let (x, y) = tile.xy(&self.dims);
        x == self.dims.width - 1 || y == self.dims.height - 1
    }

    fn is_indirectly_cleared(&self, _tile: TileRef) -> bool {
        false
    }

    fn try_settle(
        &mut self,
        tile: TileRef,
        _z_min: i32,
        _slope: Slope,
        _mode: ApplyMode,
    ) -> Result<Money, TerraformError> {
        if self.refuse_at == Some(tile) {
            return Err(TerraformError::new(TerraformErrorKind::ContentRejected));
        }
        Ok(self.settle_cost)
    }

    fn clear_tile(&mut self, _tile: TileRef, _mode: ApplyMode) -> Result<Money, TerraformError> {
        Ok(0)
    }
}

pub(crate) struct NoStructures;

impl StructureQuery for NoStructures {
    fn elevated_clearance_over(&self, _tile: TileRef) -> Option<i32> {
        None
    }

    fn buried_structure_under(&self, _tile: TileRef, _proposed_min: i32) -> bool {
        false
    }
}

/// One elevated structure spanning a single tile.
pub(crate) struct BridgeOver {
    pub tile: TileRef,
    pub clearance: i32,
}

impl StructureQuery for BridgeOver {
    fn elevated_clearance_over(&self, tile: TileRef) -> Option<i32> {
        (tile == self.tile).then_some(self.clearance)
    }

    fn buried_structure_under(&self, _tile: TileRef, _proposed_min: i32) -> bool {
        false
    }
}

/// One buried structure whose roof sits at the given height.
pub(crate) struct TunnelUnder {
    pub tile: TileRef,
    pub roof: i32,
}

impl StructureQuery for TunnelUnder {
    fn elevated_clearance_over(&self, _tile: TileRef) -> Option<i32> {
        None
    }

    fn buried_structure_under(&self, tile: TileRef, proposed_min: i32) -> bool {
        tile == self.tile && proposed_min <= self.roof
    }
}

pub(crate) struct OpsBudget(pub u32);

impl BudgetProvider for OpsBudget {
    fn remaining_terraform_ops(&self) -> u32 {
        self.0
    }

    fn consume_terraform_ops(&mut self, n: u32) {
        self.0 = self.0.saturating_sub(n);
    }
}

pub(crate) struct Wallet(pub Money);

impl FundsProvider for Wallet {
    fn available_funds(&self) -> Money {
        self.0
    }
}

#[derive(Default)]
pub(crate) struct DirtyLog(pub Vec<(TileRef, Option<i32>, Option<i32>)>);

impl RedrawSink for DirtyLog {
    fn mark_dirty(&mut self, tile: TileRef, old_height: Option<i32>, new_height: Option<i32>) {
        self.0.push((tile, old_height, new_height));
    }
}
