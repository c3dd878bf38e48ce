use farm_core::{LedgerItem, PlotStatus, ProduceId};
use serde::{Deserialize, Serialize};

/// Lifetime counters for a session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionStats {
    pub days_automated: u64,
    pub plots_harvested: u64,
    pub seeds_planted: u64,
    pub seeds_bought: u64,
    pub seed_spend: u64,
    pub weeks_settled: u64,
    pub sales_earnings: u64,
}

/// One plot as the presentation layer sees it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlotView {
    pub id: usize,
    pub status: PlotStatus,
    pub produce_id: Option<ProduceId>,
    pub produce_name: Option<String>,
    pub icon: Option<String>,
    pub planted_at_day: Option<u32>,
    pub growth_progress_pct: u32,
}

/// Read model of a whole session at one instant.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    pub cash: i64,
    pub day: u32,
    pub hour: u32,
    pub week: u32,
    pub day_of_week: u32,
    pub day_progress_pct: u32,
    pub plots: Vec<PlotView>,
    pub seeds: Vec<LedgerItem>,
    pub harvested: Vec<LedgerItem>,
    pub notification: Option<String>,
    pub stats: SessionStats,
}
