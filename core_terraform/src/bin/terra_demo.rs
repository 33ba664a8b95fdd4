use tracing::{info, warn};

use core_terraform::{
    ApplyMode, BudgetProvider, Collaborators, CopyPasteParams, FundsProvider, HeightPasteMode,
    LevelMode, Money, PasteSession, RedrawSink, StructureQuery, TerraformConfig, TerraformDir,
    TerraformEngine, TerraformError, TileContentPolicy,
};
use terra_schema::{DirTransform, GridDims, Slope, TileArea, TileRef};

/// Open ground everywhere except the void border row and column.
struct DemoContent {
    dims: GridDims,
}

impl TileContentPolicy for DemoContent {
    fn is_void(&self, tile: TileRef) -> bool {
        let (x, y) = tile.xy(&self.dims);
        x == self.dims.width - 1 || y == self.dims.height - 1
    }

    fn is_indirectly_cleared(&self, _tile: TileRef) -> bool {
        false
    }

    fn try_settle(
        &mut self,
        _tile: TileRef,
        _z_min: i32,
        _slope: Slope,
        _mode: ApplyMode,
    ) -> Result<Money, TerraformError> {
        Ok(0)
    }

    fn clear_tile(&mut self, _tile: TileRef, _mode: ApplyMode) -> Result<Money, TerraformError> {
        Ok(0)
    }
}

struct NoStructures;

impl StructureQuery for NoStructures {
    fn elevated_clearance_over(&self, _tile: TileRef) -> Option<i32> {
        None
    }

    fn buried_structure_under(&self, _tile: TileRef, _proposed_min: i32) -> bool {
        false
    }
}

struct Budget(u32);

impl BudgetProvider for Budget {
    fn remaining_terraform_ops(&self) -> u32 {
        self.0
    }

    fn consume_terraform_ops(&mut self, n: u32) {
        self.0 = self.0.saturating_sub(n);
    }
}

struct Wallet(Money);

impl FundsProvider for Wallet {
    fn available_funds(&self) -> Money {
        self.0
    }
}

struct RedrawCounter(usize);

impl RedrawSink for RedrawCounter {
    fn mark_dirty(&mut self, _tile: TileRef, _old_height: Option<i32>, _new_height: Option<i32>) {
        self.0 += 1;
    }
}

fn render(engine: &TerraformEngine) -> String {
    let dims = engine.world().dims();
    let mut out = String::new();
    for y in 0..dims.height {
        for x in 0..dims.width {
            let h = engine.world().height_at(engine.world().tile_at(x, y));
            out.push(char::from_digit(h as u32 % 16, 16).unwrap_or('?'));
        }
        out.push('\n');
    }
    out
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = TerraformConfig::load().unwrap_or_else(|e| {
        warn!(error = %e, "falling back to default terraform config");
        TerraformConfig::default()
    });
    let config = TerraformConfig {
        world_width: 24,
        world_height: 12,
        allow_edge_terraform: true,
        ..config
    };
    let mut engine = TerraformEngine::new(config);
    let dims = engine.world().dims();

    let mut content = DemoContent { dims };
    let mut budget = Budget(10_000);
    let mut redraw = RedrawCounter(0);
    let wallet = Wallet(10_000_000);
    let mut collab = Collaborators {
        content: &mut content,
        structures: &NoStructures,
        budget: &mut budget,
        funds: &wallet,
        redraw: &mut redraw,
    };

    // Pile up a hill, three steps of the same corner.
    let peak = engine.world().tile_at(6, 6);
    for _ in 0..3 {
        match engine.terraform_land(
            &mut collab,
            peak,
            Slope::N,
            TerraformDir::Raise,
            ApplyMode::Commit,
        ) {
            Ok(cost) => info!(cost, "raised the hill"),
            Err(e) => warn!(error = %e, "raise refused"),
        }
    }

    // Flatten a plateau to the right of it.
    match engine.level_land(
        &mut collab,
        engine.world().tile_at(14, 8),
        engine.world().tile_at(11, 4),
        false,
        LevelMode::Raise,
        ApplyMode::Commit,
    ) {
        Ok(cost) => info!(cost, "levelled the plateau"),
        Err(e) => warn!(error = %e, "levelling refused"),
    }

    // Copy the hill into a staging buffer and stamp it back, rotated.
    let buffer = engine.clipboard_mut().allocate(0, 4, 4);
    let buffer_dims = engine.field(buffer).expect("just allocated").dims();
    let copy = CopyPasteParams {
        src_area: TileArea::new(engine.world().tile_at(4, 4), 4, 4),
        dst_area: TileArea::new(TileRef::at_xy(buffer, &buffer_dims, 0, 0), 4, 4),
        transformation: DirTransform::Identity,
        height_mode: HeightPasteMode::Full,
        height_delta: 0,
    };
    let mut paste = PasteSession::new(ApplyMode::Commit, wallet.available_funds());
    if let Err(e) = engine.copy_paste_heights(&mut collab, &copy, &mut paste) {
        warn!(error = %e, "copy refused");
    }

    let stamp = CopyPasteParams {
        src_area: TileArea::new(TileRef::at_xy(buffer, &buffer_dims, 0, 0), 4, 4),
        dst_area: TileArea::new(engine.world().tile_at(16, 4), 4, 4),
        transformation: DirTransform::Rotate90Cw,
        height_mode: HeightPasteMode::Full,
        height_delta: 0,
    };
    let mut paste = PasteSession::new(ApplyMode::Commit, wallet.available_funds());
    if let Err(e) = engine.copy_paste_heights(&mut collab, &stamp, &mut paste) {
        warn!(error = %e, "paste refused");
    }
    info!(
        cost = paste.total_cost,
        success = paste.had_success,
        redraws = redraw.0,
        "paste finished"
    );

    println!("{}", render(&engine));
}
