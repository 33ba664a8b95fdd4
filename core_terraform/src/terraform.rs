use terra_schema::{DiagIter, DiagTileArea, RectIter, Slope, TileArea, TileRef};

use crate::collaborators::Collaborators;
use crate::config::TerraformConfig;
use crate::error::{TerraformError, TerraformErrorKind};
use crate::heightfield::{slope_from_corners, HeightField};
use crate::session::TerraformSession;
use crate::solver::solve_corner;
use crate::Money;

/// Whether a verb only estimates its cost or also mutates the world.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyMode {
    Estimate,
    Commit,
}

impl ApplyMode {
    pub fn commits(self) -> bool {
        matches!(self, ApplyMode::Commit)
    }
}

/// Direction of a corner edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformDir {
    Raise,
    Lower,
}

impl TerraformDir {
    fn delta(self) -> i32 {
        match self {
            TerraformDir::Raise => 1,
            TerraformDir::Lower => -1,
        }
    }
}

/// How the leveling verb picks its target height from the reference tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LevelMode {
    Level,
    Raise,
    Lower,
}

/// Supplies the target height for each destination tile of a batch edit.
pub trait HeightPolicy {
    fn target_height(&self, field: &HeightField, src: TileRef, dst: TileRef) -> i32;
}

/// Clamp every corner into a fixed range; equal bounds flatten the area
/// to a single height.
#[derive(Debug, Clone, Copy)]
pub struct ClampHeights {
    pub min: i32,
    pub max: i32,
}

impl ClampHeights {
    pub fn new(min: i32, max: i32) -> Self {
        debug_assert!(min <= max);
        Self { min, max }
    }
}

impl HeightPolicy for ClampHeights {
    fn target_height(&self, field: &HeightField, _src: TileRef, dst: TileRef) -> i32 {
        field.height_at(dst).clamp(self.min, self.max)
    }
}

/// A batch step the acting party could not pay for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FundsShortfall {
    pub required: Money,
    pub at: TileRef,
}

/// Compound result of a batch terraform run.
///
/// Per-tile failures do not abort a batch; only the most recent one is
/// kept for highlighting. `cost` covers the steps that succeeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TerraformBatchResult {
    pub cost: Money,
    pub had_success: bool,
    pub last_error: Option<TerraformError>,
    pub funds_shortfall: Option<FundsShortfall>,
}

/// Map a corner selection onto the tiles owning those corners' height
/// samples.
const CORNER_TILES: [(Slope, (i32, i32)); 4] = [
    (Slope::W, (1, 0)),
    (Slope::S, (1, 1)),
    (Slope::E, (0, 1)),
    (Slope::N, (0, 0)),
];

/// Raise or lower the selected corners of one tile by a single step.
///
/// The solve phase builds the full cascade in a scratch session; the
/// session's touched tiles are then validated in a dry pass before any
/// content is disturbed, and the whole proposal commits atomically or not
/// at all. Returns the cost of the edit, including content settling costs
/// collected in the second pass.
pub fn terraform_land(
    field: &mut HeightField,
    config: &TerraformConfig,
    collab: &mut Collaborators<'_>,
    tile: TileRef,
    corners: Slope,
    dir: TerraformDir,
    mode: ApplyMode,
) -> Result<Money, TerraformError> {
    let dims = field.dims();
    debug_assert_eq!(tile.grid, field.grid());

    let delta = dir.delta();
    let mut session = TerraformSession::new(field.grid());
    let mut total: Money = 0;

    for (corner, (dx, dy)) in CORNER_TILES {
        if !corners.contains(corner) {
            continue;
        }
        let Some(t) = tile.offset_by(&dims, dx, dy) else {
            continue;
        };
        let target = field.height_at(t) + delta;
        total += solve_corner(field, config, &mut session, t, target)?;
    }

    // Pass 0 checks the proposal against structures and content without
    // touching anything; pass 1 repeats the content delegation live and
    // collects the real costs.
    for pass in 0..2 {
        for t in session.dirty_tiles() {
            if collab.content.is_void(t) {
                continue;
            }
            let (x, y) = t.xy(&dims);
            if x + 1 >= dims.width || y + 1 >= dims.height {
                // The far corners of this tile live outside the grid; such
                // border tiles never validate.
                continue;
            }

            let z_n = session.effective_height(field, t);
            let z_w = session.effective_height(field, field.tile_at(x + 1, y));
            let z_s = session.effective_height(field, field.tile_at(x + 1, y + 1));
            let z_e = session.effective_height(field, field.tile_at(x, y + 1));
            let (slope, z_min, z_max) = slope_from_corners(z_n, z_w, z_s, z_e);

            if pass == 0 {
                if let Some(clearance) = collab.structures.elevated_clearance_over(t) {
                    if delta > 0 && clearance <= z_max {
                        return Err(TerraformError::at(
                            TerraformErrorKind::MustDemolishBridgeFirst,
                            t,
                        ));
                    }
                    if delta < 0 && clearance > z_min + config.max_clearance_above_lowered {
                        return Err(TerraformError::at(
                            TerraformErrorKind::TooHighAfterLowering,
                            t,
                        ));
                    }
                }
                if delta < 0 && collab.structures.buried_structure_under(t, z_min) {
                    return Err(TerraformError::at(
                        TerraformErrorKind::ExcavationWouldDamage,
                        t,
                    ));
                }
            }

            let settle_mode = if pass == 0 { ApplyMode::Estimate } else { mode };
            let settled = if collab.content.is_indirectly_cleared(t) {
                collab.content.clear_tile(t, settle_mode)
            } else {
                collab.content.try_settle(t, z_min, slope, settle_mode)
            };
            match settled {
                Ok(cost) => {
                    if pass == 1 {
                        total += cost;
                    }
                }
                Err(e) => return Err(e.with_location(t)),
            }
        }
    }

    let pending = session.pending_count() as u32;
    if pending > collab.budget.remaining_terraform_ops() {
        return Err(TerraformError::new(TerraformErrorKind::TerraformLimitReached));
    }

    if mode.commits() {
        for t in session.dirty_tiles() {
            let old = field.height_at(t);
            collab.redraw.mark_dirty(t, Some(old), session.pending_height_of(t));
        }
        let new_heights: Vec<_> = session.pending_heights().collect();
        for (t, h) in new_heights {
            field.set_height(t, h);
        }
        collab.budget.consume_terraform_ops(pending);
        tracing::debug!(
            target: "earthworks::terraform",
            corners = pending,
            dirty = session.dirty_count(),
            cost = total,
            "terraform committed"
        );
    }

    Ok(total)
}

/// Terraform a run of destination tiles toward policy-chosen heights, one
/// unit at a time.
///
/// Per-tile failures are recorded and skipped; only an exhausted
/// terraform budget or a funds shortfall ends the batch early. In
/// estimate mode a local step counter stands in for the budget, which can
/// underestimate the cost of batches running close to the limit.
pub(crate) fn terraform_tiles<I>(
    field: &mut HeightField,
    config: &TerraformConfig,
    collab: &mut Collaborators<'_>,
    pairs: I,
    policy: &dyn HeightPolicy,
    mode: ApplyMode,
    mut available: Money,
) -> TerraformBatchResult
where
    I: Iterator<Item = (TileRef, TileRef)>,
{
    let mut result = TerraformBatchResult {
        cost: 0,
        had_success: false,
        last_error: None,
        funds_shortfall: None,
    };

    let mut limit = collab.budget.remaining_terraform_ops() as i64;
    if limit == 0 {
        result.last_error = Some(TerraformError::new(TerraformErrorKind::TerraformLimitReached));
    }

    'tiles: for (src, dst) in pairs {
        if limit <= 0 {
            break;
        }
        let target = policy.target_height(field, src, dst);
        let mut current = field.height_at(dst);

        while current != target {
            let dir = if current > target {
                TerraformDir::Lower
            } else {
                TerraformDir::Raise
            };

            let step = match terraform_land(
                field,
                config,
                collab,
                dst,
                Slope::N,
                dir,
                ApplyMode::Estimate,
            ) {
                Ok(cost) => cost,
                Err(e) => {
                    if e.kind == TerraformErrorKind::TerraformLimitReached {
                        limit = 0;
                    }
                    result.last_error = Some(e);
                    continue 'tiles;
                }
            };

            if mode.commits() {
                available -= step;
                if available < 0 {
                    result.funds_shortfall = Some(FundsShortfall {
                        required: step,
                        at: dst,
                    });
                    return result;
                }
                if let Err(e) =
                    terraform_land(field, config, collab, dst, Slope::N, dir, ApplyMode::Commit)
                {
                    // A clean dry run makes this unreachable; record it
                    // rather than lose the failure.
                    result.last_error = Some(e);
                    continue 'tiles;
                }
            } else {
                limit -= 1;
                if limit <= 0 {
                    // Estimation is cut off at the limit; the remaining
                    // steps stay uncounted.
                    result.had_success = true;
                    break 'tiles;
                }
            }

            result.cost += step;
            result.had_success = true;
            current += dir.delta();
        }
    }

    if !result.had_success && result.last_error.is_none() {
        result.last_error = Some(TerraformError::new(TerraformErrorKind::AlreadyLevel));
    }

    result
}

/// Level an orthogonal or diagonal area toward the height of a reference
/// tile, optionally shifted one step up or down.
///
/// Tiles that refuse to move are skipped; the command fails only when no
/// tile moved at all, or when committed funds run out mid-way.
pub fn level_land(
    field: &mut HeightField,
    config: &TerraformConfig,
    collab: &mut Collaborators<'_>,
    tile: TileRef,
    reference: TileRef,
    diagonal: bool,
    lmode: LevelMode,
    mode: ApplyMode,
) -> Result<Money, TerraformError> {
    let dims = field.dims();
    debug_assert_eq!(tile.grid, reference.grid);

    let mut height = field.height_at(reference);
    match lmode {
        LevelMode::Level => {}
        LevelMode::Raise => height += 1,
        LevelMode::Lower => height -= 1,
    }

    let policy = ClampHeights {
        min: height,
        max: height,
    };
    let available = collab.funds.available_funds();

    let result = if diagonal {
        let area = DiagTileArea::from_corners(tile, reference, &dims);
        let pairs = DiagIter::new(&area, dims).map(|t| (t, t));
        terraform_tiles(field, config, collab, pairs, &policy, mode, available)
    } else {
        let area = TileArea::from_corners(tile, reference, &dims);
        let pairs = RectIter::new(&area, dims).map(|t| (t, t));
        terraform_tiles(field, config, collab, pairs, &policy, mode, available)
    };

    if let Some(short) = result.funds_shortfall {
        return Err(TerraformError::at(
            TerraformErrorKind::InsufficientFunds {
                shortfall: short.required,
            },
            short.at,
        ));
    }
    if !result.had_success {
        if let Some(e) = result.last_error {
            return Err(e);
        }
    }
    Ok(result.cost)
}
