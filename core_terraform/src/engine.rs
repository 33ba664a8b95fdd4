use terra_schema::{GridDims, GridId, Slope, TileArea, TileRef, TransformIter};

use crate::clipboard::ClipboardBank;
use crate::collaborators::Collaborators;
use crate::config::TerraformConfig;
use crate::error::{TerraformError, TerraformErrorKind};
use crate::heightfield::HeightField;
use crate::terraform::{self, ApplyMode, LevelMode, TerraformDir};
use crate::transfer::{
    self, CopyHeights, CopyPasteParams, HeightPasteMode, PasteSession,
};
use crate::Money;

/// Owns the world height field, the staging buffers and the
/// configuration, and exposes the terraforming command surface.
///
/// Edits on the world run through the full validated pipeline; edits on a
/// staging buffer copy raw heights with no validation, since buffers hold
/// no structures or content.
#[derive(Debug)]
pub struct TerraformEngine {
    config: TerraformConfig,
    world: HeightField,
    clipboard: ClipboardBank,
}

impl TerraformEngine {
    pub fn new(config: TerraformConfig) -> Self {
        let world = HeightField::new(
            GridId::WORLD,
            GridDims::new(config.world_width, config.world_height),
        );
        Self {
            config,
            world,
            clipboard: ClipboardBank::new(),
        }
    }

    pub fn config(&self) -> &TerraformConfig {
        &self.config
    }

    pub fn world(&self) -> &HeightField {
        &self.world
    }

    /// Mutable world access, for hosts seeding initial terrain.
    pub fn world_mut(&mut self) -> &mut HeightField {
        &mut self.world
    }

    pub fn clipboard(&self) -> &ClipboardBank {
        &self.clipboard
    }

    pub fn clipboard_mut(&mut self) -> &mut ClipboardBank {
        &mut self.clipboard
    }

    /// Resolve a grid id to its height field.
    pub fn field(&self, grid: GridId) -> Option<&HeightField> {
        if grid == GridId::WORLD {
            Some(&self.world)
        } else {
            self.clipboard.get(grid)
        }
    }

    /// Raise or lower the selected corners of one world tile by a step.
    pub fn terraform_land(
        &mut self,
        collab: &mut Collaborators<'_>,
        tile: TileRef,
        corners: Slope,
        dir: TerraformDir,
        mode: ApplyMode,
    ) -> Result<Money, TerraformError> {
        terraform::terraform_land(&mut self.world, &self.config, collab, tile, corners, dir, mode)
    }

    /// Level a world area toward the height of a reference tile.
    pub fn level_land(
        &mut self,
        collab: &mut Collaborators<'_>,
        tile: TileRef,
        reference: TileRef,
        diagonal: bool,
        lmode: LevelMode,
        mode: ApplyMode,
    ) -> Result<Money, TerraformError> {
        terraform::level_land(
            &mut self.world,
            &self.config,
            collab,
            tile,
            reference,
            diagonal,
            lmode,
            mode,
        )
    }

    /// Level world tile corners into a height range as part of a paste.
    pub fn level_paste_land(
        &mut self,
        collab: &mut Collaborators<'_>,
        area: &TileArea,
        min_height: i32,
        max_height: i32,
        paste: &mut PasteSession,
    ) {
        debug_assert_eq!(area.tile.grid, GridId::WORLD);
        transfer::level_paste_land(
            &mut self.world,
            &self.config,
            collab,
            area,
            min_height,
            max_height,
            paste,
        );
    }

    /// Copy heights from the source area onto the destination area under
    /// the configured transformation.
    ///
    /// A world destination runs through the validated terraform pipeline;
    /// a staging-buffer destination receives raw heights. The source area
    /// is given in tiles; the corners along its south and east edges are
    /// carried along, so a single-tile area moves four corners.
    pub fn copy_paste_heights(
        &mut self,
        collab: &mut Collaborators<'_>,
        params: &CopyPasteParams,
        paste: &mut PasteSession,
    ) -> Result<(), TerraformError> {
        if params.height_mode != HeightPasteMode::Full {
            return Ok(());
        }
        if params.src_area.is_degenerate() || params.dst_area.is_degenerate() {
            return Err(TerraformError::new(TerraformErrorKind::DegenerateArea));
        }

        let src_grid = params.src_area.tile.grid;
        let dst_grid = params.dst_area.tile.grid;
        let src_dims = self
            .field(src_grid)
            .ok_or(TerraformError::new(TerraformErrorKind::UnknownGrid))?
            .dims();
        let dst_dims = self
            .field(dst_grid)
            .ok_or(TerraformError::new(TerraformErrorKind::UnknownGrid))?
            .dims();

        let src_corners = TileArea::new(
            params.src_area.tile,
            params.src_area.w + 1,
            params.src_area.h + 1,
        );
        let corner_tf = params.corner_transform(&src_dims, &dst_dims);

        tracing::debug!(
            target: "earthworks::paste",
            src = %params.src_area.tile,
            dst = %params.dst_area.tile,
            transformation = ?params.transformation,
            delta = params.height_delta,
            "copying heights"
        );

        if dst_grid == GridId::WORLD {
            let policy = {
                let src_field = self
                    .field(src_grid)
                    .ok_or(TerraformError::new(TerraformErrorKind::UnknownGrid))?;
                CopyHeights::snapshot(src_field, &src_corners, params.height_delta)
            };
            let start = corner_tf.apply_tile(src_corners.tile, &src_dims, dst_grid, &dst_dims);
            let pairs = TransformIter::new(&src_corners, src_dims, corner_tf, dst_grid, dst_dims);
            transfer::terraform_paste_tiles(
                &mut self.world,
                &self.config,
                collab,
                pairs,
                &policy,
                paste,
                start,
            );
        } else {
            // Raw copy into a staging buffer; no validation and no delta.
            let copied: Vec<(TileRef, i32)> = {
                let src_field = self
                    .field(src_grid)
                    .ok_or(TerraformError::new(TerraformErrorKind::UnknownGrid))?;
                TransformIter::new(&src_corners, src_dims, corner_tf, dst_grid, dst_dims)
                    .map(|(src, dst)| (dst, src_field.height_at(src)))
                    .collect()
            };
            let dst_field = self
                .clipboard
                .get_mut(dst_grid)
                .ok_or(TerraformError::new(TerraformErrorKind::UnknownGrid))?;
            for (tile, height) in copied {
                dst_field.set_height(tile, height);
            }
        }

        Ok(())
    }
}
