use crate::{Catalog, FarmError, ProduceId};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::warn;

/// Lifecycle of a single plot.
///
/// The planted produce and planting day only exist while something is in
/// the ground.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlotState {
    Empty,
    Growing {
        produce_id: ProduceId,
        planted_at_day: u32,
    },
    ReadyForHarvest {
        produce_id: ProduceId,
        planted_at_day: u32,
    },
}

/// Data-free view of [`PlotState`], used in errors and read models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlotStatus {
    Empty,
    Growing,
    ReadyForHarvest,
}

impl fmt::Display for PlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PlotStatus::Empty => "EMPTY",
            PlotStatus::Growing => "GROWING",
            PlotStatus::ReadyForHarvest => "READY_FOR_HARVEST",
        };
        f.write_str(s)
    }
}

impl PlotState {
    pub fn status(&self) -> PlotStatus {
        match self {
            PlotState::Empty => PlotStatus::Empty,
            PlotState::Growing { .. } => PlotStatus::Growing,
            PlotState::ReadyForHarvest { .. } => PlotStatus::ReadyForHarvest,
        }
    }

    pub fn produce_id(&self) -> Option<&ProduceId> {
        match self {
            PlotState::Empty => None,
            PlotState::Growing { produce_id, .. } | PlotState::ReadyForHarvest { produce_id, .. } => {
                Some(produce_id)
            }
        }
    }

    pub fn planted_at_day(&self) -> Option<u32> {
        match self {
            PlotState::Empty => None,
            PlotState::Growing { planted_at_day, .. }
            | PlotState::ReadyForHarvest { planted_at_day, .. } => Some(*planted_at_day),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, PlotState::Empty)
    }
}

/// One unit of farmable space. `id` is the stable index in the grid.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plot {
    pub id: usize,
    pub state: PlotState,
}

impl Plot {
    /// Growth progress in percent: 0 when empty, 100 when ready, and
    /// `min(100, elapsed / growth * 100)` while growing.
    pub fn growth_progress_pct(&self, day: u32, catalog: &Catalog) -> u32 {
        match &self.state {
            PlotState::Empty => 0,
            PlotState::ReadyForHarvest { .. } => 100,
            PlotState::Growing {
                produce_id,
                planted_at_day,
            } => match catalog.find(produce_id.as_str()) {
                Some(p) if p.growth_time_days > 0 => {
                    let elapsed = u64::from(day.saturating_sub(*planted_at_day));
                    let pct = elapsed * 100 / u64::from(p.growth_time_days);
                    pct.min(100) as u32
                }
                _ => 0,
            },
        }
    }
}

/// Fixed-size collection of plots. Plots are reset in place, never removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlotGrid {
    plots: Vec<Plot>,
}

impl PlotGrid {
    /// Create `count` empty plots with ids `0..count`.
    pub fn new(count: usize) -> Self {
        let plots = (0..count)
            .map(|id| Plot {
                id,
                state: PlotState::Empty,
            })
            .collect();
        Self { plots }
    }

    pub fn len(&self) -> usize {
        self.plots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plots.is_empty()
    }

    pub fn get(&self, plot_id: usize) -> Option<&Plot> {
        self.plots.get(plot_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Plot> {
        self.plots.iter()
    }

    /// Ids of plots with nothing planted, ascending.
    pub fn empty_plot_ids(&self) -> Vec<usize> {
        self.ids_with(PlotStatus::Empty)
    }

    /// Ids of plots ready for harvest, ascending.
    pub fn ready_plot_ids(&self) -> Vec<usize> {
        self.ids_with(PlotStatus::ReadyForHarvest)
    }

    pub fn count(&self, status: PlotStatus) -> usize {
        self.plots
            .iter()
            .filter(|p| p.state.status() == status)
            .count()
    }

    fn ids_with(&self, status: PlotStatus) -> Vec<usize> {
        self.plots
            .iter()
            .filter(|p| p.state.status() == status)
            .map(|p| p.id)
            .collect()
    }

    fn plot_mut(&mut self, plot_id: usize) -> Result<&mut Plot, FarmError> {
        self.plots
            .get_mut(plot_id)
            .ok_or(FarmError::UnknownPlot(plot_id))
    }

    /// Put `produce_id` in the ground on `day`. The plot must be empty.
    pub fn plant(
        &mut self,
        plot_id: usize,
        produce_id: ProduceId,
        day: u32,
    ) -> Result<(), FarmError> {
        let plot = self.plot_mut(plot_id)?;
        if !plot.state.is_empty() {
            return Err(FarmError::InvalidPlotState {
                plot: plot_id,
                expected: PlotStatus::Empty,
                found: plot.state.status(),
            });
        }
        plot.state = PlotState::Growing {
            produce_id,
            planted_at_day: day,
        };
        Ok(())
    }

    /// Promote every growing plot whose growth time has elapsed by `day`.
    /// Returns the number of plots that became ready.
    pub fn check_ready(&mut self, day: u32, catalog: &Catalog) -> usize {
        let mut promoted = 0;
        for plot in &mut self.plots {
            let PlotState::Growing {
                produce_id,
                planted_at_day,
            } = &plot.state
            else {
                continue;
            };
            let Some(produce) = catalog.find(produce_id.as_str()) else {
                warn!(plot = plot.id, produce = %produce_id, "growing plot references unknown produce");
                continue;
            };
            if produce.is_ripe(*planted_at_day, day) {
                plot.state = PlotState::ReadyForHarvest {
                    produce_id: produce_id.clone(),
                    planted_at_day: *planted_at_day,
                };
                promoted += 1;
            }
        }
        promoted
    }

    /// Take one unit of produce from a ready plot and reset it to empty.
    pub fn harvest(&mut self, plot_id: usize) -> Result<ProduceId, FarmError> {
        let plot = self.plot_mut(plot_id)?;
        match std::mem::replace(&mut plot.state, PlotState::Empty) {
            PlotState::ReadyForHarvest { produce_id, .. } => Ok(produce_id),
            other => {
                let found = other.status();
                plot.state = other;
                Err(FarmError::InvalidPlotState {
                    plot: plot_id,
                    expected: PlotStatus::ReadyForHarvest,
                    found,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn id(s: &str) -> ProduceId {
        ProduceId::from(s)
    }

    #[test]
    fn new_grid_is_all_empty() {
        let g = PlotGrid::new(9);
        assert_eq!(g.len(), 9);
        assert_eq!(g.empty_plot_ids(), (0..9).collect::<Vec<_>>());
        assert!(g.iter().all(|p| p.state.produce_id().is_none()));
    }

    #[test]
    fn plant_rejects_occupied_plot() {
        let mut g = PlotGrid::new(2);
        g.plant(0, id("tomato"), 1).unwrap();
        let err = g.plant(0, id("corn"), 1).unwrap_err();
        assert_eq!(
            err,
            FarmError::InvalidPlotState {
                plot: 0,
                expected: PlotStatus::Empty,
                found: PlotStatus::Growing
            }
        );
        assert_eq!(g.get(0).unwrap().state.produce_id(), Some(&id("tomato")));
        assert_eq!(g.plant(7, id("corn"), 1), Err(FarmError::UnknownPlot(7)));
    }

    #[test]
    fn harvest_requires_ready_and_resets() {
        let catalog = Catalog::default();
        let mut g = PlotGrid::new(1);
        g.plant(0, id("strawberry"), 3).unwrap();
        assert!(g.harvest(0).is_err());
        assert_eq!(g.get(0).unwrap().state.status(), PlotStatus::Growing);

        assert_eq!(g.check_ready(5, &catalog), 1);
        assert_eq!(g.harvest(0).unwrap(), id("strawberry"));
        let plot = g.get(0).unwrap();
        assert_eq!(plot.state, PlotState::Empty);
        assert_eq!(plot.state.planted_at_day(), None);
        assert!(g.harvest(0).is_err());
    }

    #[test]
    fn unknown_produce_never_ripens() {
        let mut g = PlotGrid::new(1);
        g.plant(0, id("pumpkin"), 1).unwrap();
        assert_eq!(g.check_ready(100, &Catalog::default()), 0);
        assert_eq!(g.get(0).unwrap().state.status(), PlotStatus::Growing);
    }

    #[test]
    fn progress_tracks_elapsed_days() {
        let catalog = Catalog::default();
        let mut g = PlotGrid::new(2);
        g.plant(0, id("wheat"), 1).unwrap();
        assert_eq!(g.get(0).unwrap().growth_progress_pct(1, &catalog), 0);
        assert_eq!(g.get(0).unwrap().growth_progress_pct(4, &catalog), 50);
        assert_eq!(g.get(1).unwrap().growth_progress_pct(4, &catalog), 0);
    }

    #[test]
    fn plot_state_serializes_tagged() {
        let s = PlotState::Growing {
            produce_id: id("corn"),
            planted_at_day: 4,
        };
        let json = serde_json::to_string(&s).unwrap();
        assert!(json.contains("\"state\":\"GROWING\""));
        let back: PlotState = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
    }

    proptest! {
        #[test]
        fn ready_exactly_after_growth_time(planted in 1u32..1_000, offset in 0u32..20) {
            let catalog = Catalog::default();
            for produce in catalog.iter() {
                let mut g = PlotGrid::new(1);
                g.plant(0, produce.id.clone(), planted).unwrap();
                let day = planted + offset;
                let promoted = g.check_ready(day, &catalog);
                let expect_ready = offset >= produce.growth_time_days;
                prop_assert_eq!(promoted == 1, expect_ready);
                let status = g.get(0).unwrap().state.status();
                prop_assert_eq!(status == PlotStatus::ReadyForHarvest, expect_ready);
            }
        }
    }
}
