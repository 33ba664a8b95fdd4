mod common;

use anyhow::Result;
use common::{BridgeOver, Host, NO_STRUCTURES};
use core_terraform::{
    ApplyMode, LevelMode, PasteSession, TerraformDir, TerraformErrorKind,
};
use terra_schema::{GridId, Slope, TileArea, TileRef};

#[test]
fn config_fixture_reaches_the_engine() {
    let engine = common::new_engine();
    assert_eq!(engine.world().dims().width, 48);
    assert_eq!(engine.world().dims().height, 48);
    assert!(engine.config().allow_edge_terraform);
}

#[test]
fn raising_one_corner_of_flat_ground() -> Result<()> {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    let price = engine.config().terraform_price;

    let tile = engine.world().tile_at(1, 1);
    let cost = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine.terraform_land(
            &mut collab,
            tile,
            Slope::N,
            TerraformDir::Raise,
            ApplyMode::Commit,
        )?
    };

    assert_eq!(cost, price);
    assert_eq!(engine.world().height_at(tile), 1);
    // The tile and its three corner-sharing mates were reported dirty.
    let dirtied: Vec<_> = host.redraw.0.iter().map(|(t, _, _)| *t).collect();
    for (x, y) in [(0, 0), (1, 0), (0, 1), (1, 1)] {
        assert!(dirtied.contains(&engine.world().tile_at(x, y)), "({x},{y})");
    }
    Ok(())
}

#[test]
fn second_raise_cascades_atomically() -> Result<()> {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    let price = engine.config().terraform_price;
    let tile = engine.world().tile_at(5, 5);

    // Bring three of the four lattice neighbours up to 1 first, so the
    // second raise drags exactly one lagging corner along.
    {
        let mut collab = host.collab(&NO_STRUCTURES);
        for (x, y) in [(5, 5), (4, 5), (6, 5), (5, 6)] {
            let t = engine.world().tile_at(x, y);
            engine.terraform_land(
                &mut collab,
                t,
                Slope::N,
                TerraformDir::Raise,
                ApplyMode::Commit,
            )?;
        }
    }

    let cost = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine.terraform_land(
            &mut collab,
            tile,
            Slope::N,
            TerraformDir::Raise,
            ApplyMode::Commit,
        )?
    };

    assert_eq!(cost, 2 * price);
    assert_eq!(engine.world().height_at(tile), 2);
    assert_eq!(engine.world().height_at(engine.world().tile_at(5, 4)), 1);
    Ok(())
}

#[test]
fn leveling_around_a_bridge_partially_succeeds() {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    let price = engine.config().terraform_price;

    let bridge_tile = engine.world().tile_at(4, 4);
    let bridge = BridgeOver {
        tile: bridge_tile,
        clearance: 1,
    };

    let area = TileArea::new(engine.world().tile_at(3, 3), 3, 3);
    let mut paste = PasteSession::new(ApplyMode::Commit, host.wallet.0);
    {
        let mut collab = host.collab(&bridge);
        engine.level_paste_land(&mut collab, &area, 1, 1, &mut paste);
    }

    // Corner edits whose touched tiles include the bridge tile fail; the
    // remaining five corners land, and the bridge tile is highlighted.
    assert!(paste.had_success);
    assert_eq!(paste.total_cost, 5 * price);
    let err = paste.last_error.expect("bridge failures are recorded");
    assert_eq!(err.kind, TerraformErrorKind::MustDemolishBridgeFirst);
    assert_eq!(err.at, Some(bridge_tile));
    assert_eq!(engine.world().height_at(engine.world().tile_at(3, 3)), 1);
    assert_eq!(engine.world().height_at(bridge_tile), 0);
}

#[test]
fn budget_of_n_refuses_n_plus_one_corners() {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    host.budget.0 = 3;

    let before = engine.world().raw_heights().to_vec();
    let err = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine
            .terraform_land(
                &mut collab,
                engine.world().tile_at(8, 8),
                Slope::CORNERS,
                TerraformDir::Raise,
                ApplyMode::Commit,
            )
            .unwrap_err()
    };

    assert_eq!(err.kind, TerraformErrorKind::TerraformLimitReached);
    assert_eq!(engine.world().raw_heights(), &before[..]);
    assert_eq!(host.budget.0, 3);
}

#[test]
fn failed_edits_leave_no_trace() {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    host.content.refuse_at = Some(engine.world().tile_at(6, 6));

    let before = engine.world().raw_heights().to_vec();
    let err = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine
            .terraform_land(
                &mut collab,
                engine.world().tile_at(6, 6),
                Slope::N,
                TerraformDir::Raise,
                ApplyMode::Commit,
            )
            .unwrap_err()
    };

    assert_eq!(err.kind, TerraformErrorKind::ContentRejected);
    assert_eq!(engine.world().raw_heights(), &before[..]);
    assert!(host.redraw.0.is_empty());
}

#[test]
fn diagonal_leveling_raises_the_band() -> Result<()> {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);
    let price = engine.config().terraform_price;

    let cost = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine.level_land(
            &mut collab,
            engine.world().tile_at(10, 10),
            engine.world().tile_at(13, 13),
            true,
            LevelMode::Raise,
            ApplyMode::Commit,
        )?
    };

    assert_eq!(cost, 4 * price);
    for d in 10..=13 {
        assert_eq!(engine.world().height_at(engine.world().tile_at(d, d)), 1);
    }
    assert_eq!(engine.world().height_at(engine.world().tile_at(11, 10)), 0);
    Ok(())
}

#[test]
fn no_op_leveling_reports_already_level() {
    let mut engine = common::new_engine();
    let dims = engine.world().dims();
    let mut host = Host::new(dims);

    let err = {
        let mut collab = host.collab(&NO_STRUCTURES);
        engine
            .level_land(
                &mut collab,
                engine.world().tile_at(20, 20),
                engine.world().tile_at(22, 22),
                false,
                LevelMode::Level,
                ApplyMode::Commit,
            )
            .unwrap_err()
    };
    assert_eq!(err.kind, TerraformErrorKind::AlreadyLevel);
}

#[test]
fn fixture_matches_the_loaded_config() {
    common::ensure_test_config();
    let text = std::fs::read_to_string(
        std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests/fixtures/test_terraform_config.json"),
    )
    .unwrap();
    let raw: serde_json::Value = serde_json::from_str(&text).unwrap();
    let engine = common::new_engine();
    assert_eq!(
        raw["terraform_price"].as_i64().unwrap(),
        engine.config().terraform_price
    );
}

#[test]
fn world_tiles_live_on_the_world_grid() {
    let engine = common::new_engine();
    let tile = engine.world().tile_at(0, 0);
    assert_eq!(tile.grid, GridId::WORLD);
    assert!(tile.is_valid());
    assert!(!TileRef::INVALID.is_valid());
}
