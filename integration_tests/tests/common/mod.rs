#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use core_terraform::{
    ApplyMode, BudgetProvider, Collaborators, FundsProvider, Money, RedrawSink, StructureQuery,
    TerraformConfig, TerraformEngine, TerraformError, TerraformErrorKind, TileContentPolicy,
    CONFIG_ENV,
};
use terra_schema::{GridDims, Slope, TileRef};

static INIT: Once = Once::new();

pub fn ensure_test_config() {
    INIT.call_once(|| {
        let config_path = PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join("test_terraform_config.json");

        debug_assert!(
            config_path.exists(),
            "missing test terraform config at {}",
            config_path.display()
        );

        std::env::set_var(CONFIG_ENV, &config_path);
    });
}

pub fn new_engine() -> TerraformEngine {
    ensure_test_config();
    let config = TerraformConfig::load().expect("test terraform config should load");
    TerraformEngine::new(config)
}

/// Open ground everywhere, with a void border row/column and an optional
/// refusing tile.
pub struct OpenContent {
    pub dims: GridDims,
    pub refuse_at: Option<TileRef>,
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
        Ok(0)
    }

    fn clear_tile(&mut self, _tile: TileRef, _mode: ApplyMode) -> Result<Money, TerraformError> {
        Ok(0)
    }
}

pub struct NoStructures;

pub static NO_STRUCTURES: NoStructures = NoStructures;

impl StructureQuery for NoStructures {
    fn elevated_clearance_over(&self, _tile: TileRef) -> Option<i32> {
        None
    }

    fn buried_structure_under(&self, _tile: TileRef, _proposed_min: i32) -> bool {
        false
    }
}

/// One elevated structure spanning a single tile.
pub struct BridgeOver {
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

pub struct OpsBudget(pub u32);

impl BudgetProvider for OpsBudget {
    fn remaining_terraform_ops(&self) -> u32 {
        self.0
    }

    fn consume_terraform_ops(&mut self, n: u32) {
        self.0 = self.0.saturating_sub(n);
    }
}

pub struct Wallet(pub Money);

impl FundsProvider for Wallet {
    fn available_funds(&self) -> Money {
        self.0
    }
}

#[derive(Default)]
pub struct DirtyLog(pub Vec<(TileRef, Option<i32>, Option<i32>)>);

impl RedrawSink for DirtyLog {
    fn mark_dirty(&mut self, tile: TileRef, old_height: Option<i32>, new_height: Option<i32>) {
        self.0.push((tile, old_height, new_height));
    }
}

/// Everything one command needs, bundled so tests stay short.
pub struct Host {
    pub content: OpenContent,
    pub budget: OpsBudget,
    pub wallet: Wallet,
    pub redraw: DirtyLog,
}

impl Host {
    pub fn new(dims: GridDims) -> Self {
        Self {
            content: OpenContent {
                dims,
                refuse_at: None,
            },
            budget: OpsBudget(10_000),
            wallet: Wallet(10_000_000),
            redraw: DirtyLog::default(),
        }
    }

    pub fn collab<'a>(&'a mut self, structures: &'a dyn StructureQuery) -> Collaborators<'a> {
        Collaborators {
            content: &mut self.content,
            structures,
            budget: &mut self.budget,
            funds: &self.wallet,
            redraw: &mut self.redraw,
        }
    }
}
