use terra_schema::{Slope, TileRef};

use crate::error::TerraformError;
use crate::terraform::ApplyMode;
use crate::Money;

/// How a tile's content reacts to the ground shifting underneath it.
///
/// The engine does not know what a tile holds; it asks once per touched
/// tile per validation pass whether the content can settle on the new
/// land shape.
pub trait TileContentPolicy {
    /// Void border tiles can be terraformed but never take part in
    /// validation.
    fn is_void(&self, tile: TileRef) -> bool;

    /// Whether the tile was already cleared indirectly as part of a wider
    /// multi-tile clear, in which case settling goes through the generic
    /// clear path instead.
    fn is_indirectly_cleared(&self, tile: TileRef) -> bool;

    /// Ask the tile content whether it can settle at the new minimum
    /// height and slope; in commit mode the content may mutate itself.
    fn try_settle(
        &mut self,
        tile: TileRef,
        z_min: i32,
        slope: Slope,
        mode: ApplyMode,
    ) -> Result<Money, TerraformError>;

    /// Clear the tile through the generic landscape-clear path.
    fn clear_tile(&mut self, tile: TileRef, mode: ApplyMode) -> Result<Money, TerraformError>;
}

/// Queries about structures above and below the surface.
pub trait StructureQuery {
    /// Clearance height of an elevated structure spanning the tile, if
    /// any.
    fn elevated_clearance_over(&self, tile: TileRef) -> Option<i32>;

    /// Whether a buried structure under the tile would be exposed at the
    /// proposed minimum surface height.
    fn buried_structure_under(&self, tile: TileRef, proposed_min: i32) -> bool;
}

/// Per-actor terraforming allowance, counted in corners.
pub trait BudgetProvider {
    fn remaining_terraform_ops(&self) -> u32;
    fn consume_terraform_ops(&mut self, n: u32);
}

/// Money available to the acting party.
pub trait FundsProvider {
    fn available_funds(&self) -> Money;
}

/// Fire-and-forget redraw notifications. No failure mode is visible to
/// the engine.
pub trait RedrawSink {
    /// A tile's appearance changed; the heights bound the affected
    /// vertical span. `new_height` is absent when only a neighbour's
    /// corner moved.
    fn mark_dirty(&mut self, tile: TileRef, old_height: Option<i32>, new_height: Option<i32>);
}

/// Borrowed bundle of the collaborator implementations one command runs
/// against.
pub struct Collaborators<'a> {
    pub content: &'a mut dyn TileContentPolicy,
    pub structures: &'a dyn StructureQuery,
    pub budget: &'a mut dyn BudgetProvider,
    pub funds: &'a dyn FundsProvider,
    pub redraw: &'a mut dyn RedrawSink,
}
