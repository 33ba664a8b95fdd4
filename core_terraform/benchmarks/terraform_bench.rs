use criterion::{criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};

use core_terraform::{
    ApplyMode, BudgetProvider, Collaborators, FundsProvider, LevelMode, Money, RedrawSink,
    StructureQuery, TerraformConfig, TerraformDir, TerraformEngine, TerraformError,
    TileContentPolicy,
};
use terra_schema::{Slope, TileRef};

struct OpenContent;

impl TileContentPolicy for OpenContent {
    fn is_void(&self, _tile: TileRef) -> bool {
        false
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

struct Wallet;

impl FundsProvider for Wallet {
    fn available_funds(&self) -> Money {
        Money::MAX / 2
    }
}

struct NullRedraw;

impl RedrawSink for NullRedraw {
    fn mark_dirty(&mut self, _tile: TileRef, _old: Option<i32>, _new: Option<i32>) {}
}

fn bench_engine() -> TerraformEngine {
    TerraformEngine::new(TerraformConfig {
        world_width: 128,
        world_height: 128,
        allow_edge_terraform: true,
        ..TerraformConfig::default()
    })
}

fn bench_pyramid(c: &mut Criterion) {
    let mut group = c.benchmark_group("terraform");

    for height in [4u32, 8, 12] {
        group.bench_with_input(BenchmarkId::new("pyramid", height), &height, |b, &height| {
            b.iter_batched(
                bench_engine,
                |mut engine| {
                    let peak = engine.world().tile_at(64, 64);
                    let mut content = OpenContent;
                    let mut budget = Budget(u32::MAX);
                    let mut redraw = NullRedraw;
                    let mut collab = Collaborators {
                        content: &mut content,
                        structures: &NoStructures,
                        budget: &mut budget,
                        funds: &Wallet,
                        redraw: &mut redraw,
                    };
                    for _ in 0..height {
                        engine
                            .terraform_land(
                                &mut collab,
                                peak,
                                Slope::N,
                                TerraformDir::Raise,
                                ApplyMode::Commit,
                            )
                            .unwrap();
                    }
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

fn bench_level(c: &mut Criterion) {
    let mut group = c.benchmark_group("level");

    for size in [8u32, 16, 32] {
        group.bench_with_input(BenchmarkId::new("area", size), &size, |b, &size| {
            b.iter_batched(
                bench_engine,
                |mut engine| {
                    let from = engine.world().tile_at(32, 32);
                    let to = engine.world().tile_at(32 + size - 1, 32 + size - 1);
                    let mut content = OpenContent;
                    let mut budget = Budget(u32::MAX);
                    let mut redraw = NullRedraw;
                    let mut collab = Collaborators {
                        content: &mut content,
                        structures: &NoStructures,
                        budget: &mut budget,
                        funds: &Wallet,
                        redraw: &mut redraw,
                    };
                    engine
                        .level_land(
                            &mut collab,
                            to,
                            from,
                            false,
                            LevelMode::Raise,
                            ApplyMode::Commit,
                        )
                        .unwrap();
                },
                BatchSize::SmallInput,
            )
        });
    }

    group.finish();
}

criterion_group!(terraform_benches, bench_pyramid, bench_level);
criterion_main!(terraform_benches);
