use crate::{CashLedger, FarmConfig, HarvestLedger, PlotGrid, SeedInventory};
use serde::{Deserialize, Serialize};

/// One consistent snapshot of everything the daily automation touches.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FarmState {
    /// Simulated day the snapshot belongs to (>= 1).
    pub day: u32,
    pub plots: PlotGrid,
    pub seeds: SeedInventory,
    pub cash: CashLedger,
    pub harvested: HarvestLedger,
}

impl FarmState {
    /// Starting state for a session: day 1, empty plots, initial stock and cash.
    pub fn initial(config: &FarmConfig) -> Self {
        Self {
            day: 1,
            plots: PlotGrid::new(config.plot_count),
            seeds: SeedInventory::from_items(config.initial_seeds.iter().cloned()),
            cash: CashLedger::new(config.initial_cash),
            harvested: HarvestLedger::new(),
        }
    }
}
