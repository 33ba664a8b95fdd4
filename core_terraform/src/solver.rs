use terra_schema::TileRef;

use crate::config::TerraformConfig;
use crate::error::{TerraformError, TerraformErrorKind};
use crate::heightfield::HeightField;
use crate::session::TerraformSession;
use crate::Money;

/// Neighbour corners sharing an edge of the height lattice, in the order
/// they are visited: +X, -X, +Y, -Y.
const CASCADE_NEIGHBOURS: [(i32, i32); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];

struct Frame {
    x: i32,
    y: i32,
    target: i32,
    next: usize,
}

/// Run the entry checks for one corner edit and record it in the session.
fn begin_corner(
    field: &HeightField,
    config: &TerraformConfig,
    session: &mut TerraformSession,
    tile: TileRef,
    target: i32,
) -> Result<(), TerraformError> {
    if target < 0 {
        return Err(TerraformError::new(TerraformErrorKind::AtSeaLevel));
    }
    if target > config.max_height {
        return Err(TerraformError::new(TerraformErrorKind::TooHigh));
    }

    // A corner already at the target height means the whole edit has no
    // effect; cascades converging back onto their start height fail too,
    // so nothing is ever charged twice.
    if target == session.effective_height(field, tile) {
        return Err(TerraformError::new(TerraformErrorKind::NoEffect));
    }

    let dims = field.dims();
    let (x, y) = tile.xy(&dims);
    if !config.allow_edge_terraform {
        let (x, y) = (x as i32, y as i32);
        let max_x = dims.width as i32 - 1;
        let max_y = dims.height as i32 - 1;
        if x <= 1 || y <= 1 || x >= max_x - 1 || y >= max_y - 1 {
            let hx = if x == 1 { 0 } else { x };
            let hy = if y == 1 { 0 } else { y };
            return Err(TerraformError::at(
                TerraformErrorKind::TooCloseToEdge,
                TileRef::at_xy(tile.grid, &dims, hx as u32, hy as u32),
            ));
        }
    }

    session.mark_dirty_around(&dims, tile);
    session.set_pending(tile, target);
    tracing::trace!(target: "earthworks::solver", x, y, height = target, "corner scheduled");
    Ok(())
}

/// Terraform one corner of the height lattice to a specific height,
/// pulling neighbouring corners along wherever the edit would leave two
/// adjacent corners more than one unit apart.
///
/// The walk is depth-first over the forced edits, kept on an explicit
/// stack so its memory use is bounded by the cascade size rather than the
/// call stack. Any refused corner aborts the whole cascade; the session
/// then holds a partial proposal the caller must discard.
pub(crate) fn solve_corner(
    field: &HeightField,
    config: &TerraformConfig,
    session: &mut TerraformSession,
    tile: TileRef,
    target: i32,
) -> Result<Money, TerraformError> {
    let dims = field.dims();
    debug_assert_eq!(tile.grid, field.grid());
    debug_assert!(tile.index < dims.tile_count());

    begin_corner(field, config, session, tile, target)?;
    let mut total: Money = config.terraform_price;

    let (sx, sy) = tile.xy(&dims);
    let mut stack = vec![Frame {
        x: sx as i32,
        y: sy as i32,
        target,
        next: 0,
    }];

    while let Some(top) = stack.last_mut() {
        if top.next == CASCADE_NEIGHBOURS.len() {
            stack.pop();
            continue;
        }
        let (dx, dy) = CASCADE_NEIGHBOURS[top.next];
        top.next += 1;
        let (nx, ny) = (top.x + dx, top.y + dy);
        let wanted = top.target;

        // A coordinate leaving the grid is not a neighbour; the far side
        // of a wrapped row or column is not adjacent either.
        if !dims.contains(nx, ny) {
            continue;
        }

        let neighbour = TileRef::at_xy(tile.grid, &dims, nx as u32, ny as u32);
        let current = session.effective_height(field, neighbour);
        let diff = wanted - current;
        if diff.abs() > 1 {
            // Pull the neighbour to one unit within the wanted height.
            let neighbour_target = current + diff - diff.signum();
            begin_corner(field, config, session, neighbour, neighbour_target)?;
            total += config.terraform_price;
            stack.push(Frame {
                x: nx,
                y: ny,
                target: neighbour_target,
                next: 0,
            });
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use terra_schema::{GridDims, GridId};

    fn open_config() -> TerraformConfig {
        TerraformConfig {
            allow_edge_terraform: true,
            ..TerraformConfig::default()
        }
    }

    fn flat_field(w: u32, h: u32) -> HeightField {
        HeightField::new(GridId::WORLD, GridDims::new(w, h))
    }

    #[test]
    fn single_step_has_no_cascade() {
        let field = flat_field(4, 4);
        let config = open_config();
        let mut session = TerraformSession::new(GridId::WORLD);
        let tile = field.tile_at(1, 1);

        let cost = solve_corner(&field, &config, &mut session, tile, 1).unwrap();
        assert_eq!(cost, config.terraform_price);
        assert_eq!(session.pending_count(), 1);
        assert_eq!(session.pending_height_of(tile), Some(1));
        // The tile and its three north-corner mates need redraw.
        assert_eq!(session.dirty_count(), 4);
    }

    #[test]
    fn second_step_cascades_to_neighbours() {
        let mut field = flat_field(4, 4);
        let config = open_config();
        let tile = field.tile_at(1, 1);
        field.set_height(tile, 1);

        let mut session = TerraformSession::new(GridId::WORLD);
        let cost = solve_corner(&field, &config, &mut session, tile, 2).unwrap();

        // All four lattice neighbours sit at 0 and get pulled to 1.
        assert_eq!(session.pending_count(), 5);
        assert_eq!(cost, 5 * config.terraform_price);
        assert_eq!(session.pending_height_of(tile), Some(2));
        for (dx, dy) in CASCADE_NEIGHBOURS {
            let n = tile.offset_by(&field.dims(), dx, dy).unwrap();
            assert_eq!(session.pending_height_of(n), Some(1));
        }
    }

    #[test]
    fn tall_edit_builds_a_pyramid() {
        let field = flat_field(32, 32);
        let config = open_config();
        let mut session = TerraformSession::new(GridId::WORLD);
        let tile = field.tile_at(8, 8);

        let cost = solve_corner(&field, &config, &mut session, tile, 3).unwrap();

        // Heights fall off by one per Manhattan step: 1 + 4 + 8 corners.
        assert_eq!(session.pending_count(), 13);
        assert_eq!(cost, 13 * config.terraform_price);
        let dims = field.dims();
        for (t, h) in session.pending_heights() {
            let (x, y) = t.xy(&dims);
            let d = (x as i32 - 8).abs() + (y as i32 - 8).abs();
            assert_eq!(h, 3 - d, "corner at ({x},{y})");
        }
    }

    #[test]
    fn steepness_holds_across_the_pending_set() {
        let field = flat_field(24, 24);
        let config = open_config();
        let mut session = TerraformSession::new(GridId::WORLD);
        let tile = field.tile_at(10, 12);

        solve_corner(&field, &config, &mut session, tile, 5).unwrap();

        let dims = field.dims();
        for y in 0..24 {
            for x in 0..24 {
                let here = session.effective_height(&field, field.tile_at(x, y));
                if x + 1 < 24 {
                    let right = session.effective_height(&field, field.tile_at(x + 1, y));
                    assert!((here - right).abs() <= 1, "({x},{y}) -> ({},{y})", x + 1);
                }
                if y + 1 < 24 {
                    let below = session.effective_height(&field, field.tile_at(x, y + 1));
                    assert!((here - below).abs() <= 1, "({x},{y}) -> ({x},{})", y + 1);
                }
            }
        }
    }

    #[test]
    fn no_op_edit_is_rejected() {
        let field = flat_field(8, 8);
        let config = open_config();
        let mut session = TerraformSession::new(GridId::WORLD);
        let tile = field.tile_at(3, 3);

        let err = solve_corner(&field, &config, &mut session, tile, 0).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::NoEffect);
    }

    #[test]
    fn height_range_is_enforced() {
        let field = flat_field(8, 8);
        let config = open_config();
        let tile = field.tile_at(3, 3);

        let mut session = TerraformSession::new(GridId::WORLD);
        let err = solve_corner(&field, &config, &mut session, tile, -1).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::AtSeaLevel);

        let mut session = TerraformSession::new(GridId::WORLD);
        let err =
            solve_corner(&field, &config, &mut session, tile, config.max_height + 1).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::TooHigh);
    }

    #[test]
    fn mid_cascade_failure_aborts_the_whole_edit() {
        // Edge checking on: a tall edit three tiles from the border forces
        // a cascade that reaches the forbidden rim and fails there.
        let field = flat_field(16, 16);
        let config = TerraformConfig::default();
        let mut session = TerraformSession::new(GridId::WORLD);

        let err = solve_corner(&field, &config, &mut session, field.tile_at(3, 8), 3).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::TooCloseToEdge);
        assert_eq!(err.at, Some(field.tile_at(0, 8)));
    }

    #[test]
    fn edge_proximity_is_rejected_with_a_highlight_tile() {
        let field = flat_field(8, 8);
        let config = TerraformConfig::default();
        let mut session = TerraformSession::new(GridId::WORLD);

        let err = solve_corner(&field, &config, &mut session, field.tile_at(1, 3), 1).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::TooCloseToEdge);
        assert_eq!(err.at, Some(field.tile_at(0, 3)));

        let mut session = TerraformSession::new(GridId::WORLD);
        let err = solve_corner(&field, &config, &mut session, field.tile_at(3, 6), 1).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::TooCloseToEdge);
        assert_eq!(err.at, Some(field.tile_at(3, 6)));
    }

    #[test]
    fn random_single_corner_edits_keep_the_lattice_legal() {
        use rand::rngs::SmallRng;
        use rand::{Rng, SeedableRng};

        let config = open_config();
        let mut field = flat_field(20, 20);
        let mut rng = SmallRng::seed_from_u64(42);

        for _ in 0..200 {
            let x = rng.gen_range(0..20);
            let y = rng.gen_range(0..20);
            let target = rng.gen_range(0..8);
            let mut session = TerraformSession::new(GridId::WORLD);
            if solve_corner(&field, &config, &mut session, field.tile_at(x, y), target).is_ok() {
                let pending: Vec<_> = session.pending_heights().collect();
                for (t, h) in pending {
                    field.set_height(t, h);
                }
            }
        }

        for y in 0..20 {
            for x in 0..20 {
                let here = field.height_at(field.tile_at(x, y));
                if x + 1 < 20 {
                    let right = field.height_at(field.tile_at(x + 1, y));
                    assert!((here - right).abs() <= 1, "({x},{y})");
                }
                if y + 1 < 20 {
                    let below = field.height_at(field.tile_at(x, y + 1));
                    assert!((here - below).abs() <= 1, "({x},{y})");
                }
            }
        }
    }

    #[test]
    fn converging_cascade_still_counts_as_no_effect() {
        // Documented quirk: a second edit in the same session whose target
        // equals the already-pending height is refused outright, even
        // though the first edit had real side effects.
        let field = flat_field(16, 16);
        let config = open_config();
        let mut session = TerraformSession::new(GridId::WORLD);
        let tile = field.tile_at(5, 5);

        solve_corner(&field, &config, &mut session, tile, 2).unwrap();
        let err = solve_corner(&field, &config, &mut session, tile, 2).unwrap_err();
        assert_eq!(err.kind, TerraformErrorKind::NoEffect);
    }
}
