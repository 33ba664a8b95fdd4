use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use terra_schema::{DirTransform, GridDims, RectIter, TileArea, TileRef, TileTransform};

use crate::collaborators::Collaborators;
use crate::config::TerraformConfig;
use crate::error::{TerraformError, TerraformErrorKind};
use crate::heightfield::HeightField;
use crate::terraform::{terraform_tiles, ApplyMode, ClampHeights, HeightPolicy};
use crate::Money;

/// How a paste operation treats tile heights.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HeightPasteMode {
    /// Leave destination heights alone.
    Skip,
    /// Terraform only as much as pasted objects require; handled by the
    /// per-object content handlers, not by the height transfer.
    Minimal,
    /// Copy all tile heights from the source.
    Full,
}

/// Parameters of one copy/paste operation.
#[derive(Debug, Clone)]
pub struct CopyPasteParams {
    pub src_area: TileArea,
    pub dst_area: TileArea,
    pub transformation: DirTransform,
    pub height_mode: HeightPasteMode,
    /// Units added to every copied height.
    pub height_delta: i32,
}

impl CopyPasteParams {
    /// Transformation between corresponding tiles of the two areas.
    pub fn tile_transform(&self, src_dims: &GridDims, dst_dims: &GridDims) -> TileTransform {
        TileTransform::between_areas(
            &self.src_area,
            src_dims,
            &self.dst_area,
            dst_dims,
            self.transformation,
        )
    }

    /// Transformation between corresponding tile corners of the two
    /// areas, for height work.
    pub fn corner_transform(&self, src_dims: &GridDims, dst_dims: &GridDims) -> TileTransform {
        TileTransform::between_area_corners(
            &self.src_area,
            src_dims,
            &self.dst_area,
            dst_dims,
            self.transformation,
        )
    }
}

/// Copies the height of the matching source corner, shifted by a fixed
/// delta.
///
/// Source heights are snapshotted up front, so a transfer overlapping its
/// own source reads the pre-edit heights.
#[derive(Debug, Clone)]
pub struct CopyHeights {
    heights: BTreeMap<u32, i32>,
    delta: i32,
}

impl CopyHeights {
    pub fn snapshot(src: &HeightField, src_corners: &TileArea, delta: i32) -> Self {
        let mut heights = BTreeMap::new();
        for tile in RectIter::new(src_corners, src.dims()) {
            heights.insert(tile.index, src.height_at(tile));
        }
        Self { heights, delta }
    }
}

impl HeightPolicy for CopyHeights {
    fn target_height(&self, _field: &HeightField, src: TileRef, _dst: TileRef) -> i32 {
        let h = self.heights.get(&src.index).copied();
        debug_assert!(h.is_some(), "source corner outside the snapshot");
        h.unwrap_or(0) + self.delta
    }
}

/// Gathers costs and errors across the steps of one paste operation.
#[derive(Debug)]
pub struct PasteSession {
    mode: ApplyMode,
    available_funds: Money,
    pub total_cost: Money,
    pub had_success: bool,
    pub last_error: Option<TerraformError>,
}

impl PasteSession {
    pub fn new(mode: ApplyMode, available_funds: Money) -> Self {
        Self {
            mode,
            available_funds,
            total_cost: 0,
            had_success: false,
            last_error: None,
        }
    }

    pub fn mode(&self) -> ApplyMode {
        self.mode
    }

    /// Money still available to later paste steps.
    pub fn available_funds(&self) -> Money {
        self.available_funds
    }

    pub fn collect_cost(&mut self, cost: Money) {
        self.total_cost += cost;
        self.had_success = true;
        if self.mode.commits() {
            self.available_funds -= cost;
        }
    }

    pub fn collect_error(&mut self, error: TerraformError) {
        self.last_error = Some(error);
    }
}

/// Terraform destination tiles as one step of a paste operation.
///
/// Failures that carried no location highlight the start of the pasted
/// block, so a failed paste still points somewhere useful.
pub(crate) fn terraform_paste_tiles<I>(
    field: &mut HeightField,
    config: &TerraformConfig,
    collab: &mut Collaborators<'_>,
    pairs: I,
    policy: &dyn HeightPolicy,
    paste: &mut PasteSession,
    start_tile: TileRef,
) where
    I: Iterator<Item = (TileRef, TileRef)>,
{
    let result = terraform_tiles(
        field,
        config,
        collab,
        pairs,
        policy,
        paste.mode(),
        paste.available_funds(),
    );

    if result.had_success {
        paste.collect_cost(result.cost);
    }
    if let Some(short) = result.funds_shortfall {
        paste.collect_error(TerraformError::at(
            TerraformErrorKind::InsufficientFunds {
                shortfall: short.required,
            },
            short.at,
        ));
    }
    if let Some(error) = result.last_error {
        paste.collect_error(error.with_location(start_tile));
    }
}

/// Level an area of tile corners into `[min_height, max_height]` as part
/// of a paste operation.
pub fn level_paste_land(
    field: &mut HeightField,
    config: &TerraformConfig,
    collab: &mut Collaborators<'_>,
    area: &TileArea,
    min_height: i32,
    max_height: i32,
    paste: &mut PasteSession,
) {
    let dims = field.dims();
    let policy = ClampHeights::new(min_height, max_height);
    let pairs = RectIter::new(area, dims).map(|t| (t, t));
    terraform_paste_tiles(field, config, collab, pairs, &policy, paste, area.tile);
}
