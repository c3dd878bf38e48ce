#![deny(warnings)]

//! Daily automation that runs the farm on the player's behalf.
//!
//! [`apply_daily_automation`] takes one consistent [`FarmState`] snapshot
//! and returns the fully updated snapshot together with a [`DailyReport`].
//! The four phases always run in this order:
//!
//! 1. auto-harvest every ready plot,
//! 2. auto-plant every empty plot, priority produce first,
//! 3. auto-shop for seeds (priority restock, else cheapest seed),
//! 4. weekly sale of the harvested ledger on settlement days.

mod report;

pub use report::{DailyReport, PlotEvent, PurchaseTier, SeedPurchase};

use farm_core::{Catalog, FarmConfig, FarmState, ProduceId, ProduceType};
use farm_econ::{is_settlement_day, purchase_cost, purchase_quantity, settle};
use tracing::{debug, info, warn};

/// Thresholds and batch sizes that steer planting and shopping.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutomationPolicy {
    pub priority_produce: ProduceId,
    pub priority_threshold: u32,
    pub priority_batch_size: u32,
    pub any_seed_threshold: u64,
    pub cheapest_batch_size: u32,
    pub days_in_week: u32,
}

impl AutomationPolicy {
    pub fn from_config(cfg: &FarmConfig) -> Self {
        Self {
            priority_produce: cfg.priority_produce.clone(),
            priority_threshold: cfg.priority_threshold,
            priority_batch_size: cfg.priority_batch_size,
            any_seed_threshold: cfg.any_seed_threshold,
            cheapest_batch_size: cfg.cheapest_batch_size,
            days_in_week: cfg.days_in_week,
        }
    }
}

impl Default for AutomationPolicy {
    fn default() -> Self {
        Self::from_config(&FarmConfig::default())
    }
}

/// Updated snapshot and report produced by one automation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DailyOutcome {
    pub state: FarmState,
    pub report: DailyReport,
}

/// Run the whole pipeline for `state.day` as a single transition.
pub fn apply_daily_automation(
    mut state: FarmState,
    catalog: &Catalog,
    policy: &AutomationPolicy,
) -> DailyOutcome {
    let mut report = DailyReport::new(state.day);
    auto_harvest(&mut state, catalog, &mut report);
    auto_plant(&mut state, catalog, policy, &mut report);
    auto_shop(&mut state, catalog, policy, &mut report);
    weekly_sale(&mut state, catalog, policy, &mut report);
    debug!(
        day = state.day,
        harvested = report.harvested.len(),
        planted = report.planted.len(),
        bought = report.purchase.as_ref().map_or(0, |p| p.quantity),
        cash = state.cash.balance(),
        "daily automation applied"
    );
    DailyOutcome { state, report }
}

/// Phase 1: harvest one unit from every ready plot into the harvested ledger.
pub fn auto_harvest(state: &mut FarmState, catalog: &Catalog, report: &mut DailyReport) {
    for plot_id in state.plots.ready_plot_ids() {
        let Some(produce_id) = state
            .plots
            .get(plot_id)
            .and_then(|p| p.state.produce_id())
            .cloned()
        else {
            continue;
        };
        let Some(produce) = catalog.find(produce_id.as_str()) else {
            warn!(plot = plot_id, produce = %produce_id, "skipping harvest of unknown produce");
            continue;
        };
        match state.plots.harvest(plot_id) {
            Ok(harvested) => {
                state.harvested.add(&harvested, 1);
                report.record_harvest(plot_id, harvested, &produce.name);
            }
            Err(e) => debug!(plot = plot_id, error = %e, "harvest rejected"),
        }
    }
}

/// Phase 2: give every empty plot, in id order, one planting attempt.
pub fn auto_plant(
    state: &mut FarmState,
    catalog: &Catalog,
    policy: &AutomationPolicy,
    report: &mut DailyReport,
) {
    let priority = &policy.priority_produce;
    let priority_known = catalog.find(priority.as_str()).is_some();
    for plot_id in state.plots.empty_plot_ids() {
        let choice = if priority_known && state.seeds.quantity(priority.as_str()) > 0 {
            Some(priority.clone())
        } else {
            state.seeds.first_in_stock().cloned()
        };
        let Some(produce_id) = choice else {
            continue;
        };
        let Some(produce) = catalog.find(produce_id.as_str()) else {
            warn!(plot = plot_id, produce = %produce_id, "skipping planting of unknown produce");
            continue;
        };
        if let Err(e) = state.seeds.consume(&produce_id, 1) {
            debug!(plot = plot_id, error = %e, "no seed to plant");
            continue;
        }
        match state.plots.plant(plot_id, produce_id.clone(), state.day) {
            Ok(()) => report.record_plant(plot_id, produce_id, &produce.name),
            Err(e) => {
                state.seeds.add(&produce_id, 1);
                debug!(plot = plot_id, error = %e, "plant rejected");
            }
        }
    }
    state.seeds.prune();
}

/// Phase 3: restock the priority produce, or failing that buy the
/// cheapest seed when overall stock is low. At most one purchase per day.
pub fn auto_shop(
    state: &mut FarmState,
    catalog: &Catalog,
    policy: &AutomationPolicy,
    report: &mut DailyReport,
) {
    if let Some(priority) = catalog.find(policy.priority_produce.as_str()) {
        let stock = state.seeds.quantity(priority.id.as_str());
        if stock < policy.priority_threshold && state.cash.can_afford(priority.seed_cost) {
            if let Some(purchase) = buy_seeds(
                state,
                priority,
                policy.priority_batch_size,
                PurchaseTier::Priority,
            ) {
                report.record_purchase(purchase, &priority.name);
                return;
            }
        }
    }

    if state.seeds.total() >= policy.any_seed_threshold {
        return;
    }
    let Some(cheapest) = catalog.cheapest_seed() else {
        return;
    };
    if !state.cash.can_afford(cheapest.seed_cost) {
        return;
    }
    if let Some(purchase) = buy_seeds(
        state,
        cheapest,
        policy.cheapest_batch_size,
        PurchaseTier::Cheapest,
    ) {
        report.record_purchase(purchase, &cheapest.name);
    }
}

fn buy_seeds(
    state: &mut FarmState,
    produce: &ProduceType,
    batch: u32,
    tier: PurchaseTier,
) -> Option<SeedPurchase> {
    let quantity = match purchase_quantity(state.cash.balance(), produce.seed_cost, batch) {
        Ok(0) => return None,
        Ok(q) => q,
        Err(e) => {
            warn!(produce = %produce.id, error = %e, "cannot size purchase");
            return None;
        }
    };
    let cost = purchase_cost(produce.seed_cost, quantity).ok()?;
    if let Err(e) = state.cash.spend(cost) {
        debug!(produce = %produce.id, error = %e, "purchase not covered");
        return None;
    }
    state.seeds.add(&produce.id, quantity);
    Some(SeedPurchase {
        produce_id: produce.id.clone(),
        quantity,
        cost,
        tier,
    })
}

/// Phase 4: on settlement days, sell the whole harvested ledger.
///
/// An empty ledger reports "nothing sold", except on the first week's
/// settlement day.
pub fn weekly_sale(
    state: &mut FarmState,
    catalog: &Catalog,
    policy: &AutomationPolicy,
    report: &mut DailyReport,
) {
    if !is_settlement_day(state.day, policy.days_in_week) {
        return;
    }
    if state.harvested.is_empty() {
        if state.day > policy.days_in_week {
            report.record_nothing_sold();
        }
        return;
    }
    let sale = settle(&state.harvested, catalog);
    state.cash.credit(sale.total);
    state.harvested.clear();
    info!(day = state.day, earnings = sale.total, cash = state.cash.balance(), "weekly sale settled");
    report.record_sale(sale);
}

#[cfg(test)]
mod tests {
    use super::*;
    use farm_core::{LedgerItem, PlotStatus, SeedInventory};
    use proptest::prelude::*;

    fn state_with(seeds: &[(&str, u32)], cash: i64, day: u32) -> FarmState {
        let mut s = FarmState::initial(&FarmConfig::default());
        s.seeds = SeedInventory::from_items(seeds.iter().map(|(id, q)| LedgerItem::new(*id, *q)));
        s.cash = farm_core::CashLedger::new(cash);
        s.day = day;
        s
    }

    fn planted(report: &DailyReport) -> Vec<&str> {
        report.planted.iter().map(|e| e.produce_id.as_str()).collect()
    }

    /// Advance a snapshot to `day` the way the clock does: readiness first,
    /// then the pipeline.
    fn run_day(state: FarmState, day: u32) -> DailyOutcome {
        let catalog = Catalog::default();
        let mut state = state;
        state.day = day;
        state.plots.check_ready(day, &catalog);
        apply_daily_automation(state, &catalog, &AutomationPolicy::default())
    }

    #[test]
    fn priority_planted_first_regardless_of_position() {
        let catalog = Catalog::default();
        let mut s = state_with(&[("tomato", 2), ("corn", 1), ("strawberry", 2)], 0, 3);
        let mut report = DailyReport::new(3);
        s.plots = farm_core::PlotGrid::new(6);
        auto_plant(&mut s, &catalog, &AutomationPolicy::default(), &mut report);
        assert_eq!(
            planted(&report),
            vec!["strawberry", "strawberry", "tomato", "tomato", "corn"]
        );
        assert_eq!(s.plots.count(PlotStatus::Empty), 1);
        assert!(s.seeds.is_empty());
        let plot = s.plots.get(0).unwrap();
        assert_eq!(plot.state.planted_at_day(), Some(3));
        assert_eq!(report.lines()[0], "Auto-planted Strawberry on plot 1.");
    }

    #[test]
    fn harvest_then_replant_same_day() {
        let catalog = Catalog::default();
        let mut s = state_with(&[("corn", 1)], 0, 1);
        s.plots = farm_core::PlotGrid::new(1);
        s.plots.plant(0, "strawberry".into(), 1).unwrap();
        s.day = 3;
        s.plots.check_ready(3, &catalog);
        let out = apply_daily_automation(s, &catalog, &AutomationPolicy::default());
        assert_eq!(out.state.harvested.quantity("strawberry"), 1);
        assert_eq!(
            out.state.plots.get(0).unwrap().state.produce_id().map(|p| p.as_str()),
            Some("corn")
        );
        assert_eq!(
            out.report.lines()[..2],
            [
                "Auto-harvested Strawberry from plot 1.".to_string(),
                "Auto-planted Corn on plot 1.".to_string()
            ]
        );
    }

    #[test]
    fn priority_tier_skips_cheapest_tier() {
        let catalog = Catalog::default();
        let mut s = state_with(&[], 100, 2);
        let mut report = DailyReport::new(2);
        auto_shop(&mut s, &catalog, &AutomationPolicy::default(), &mut report);
        let p = report.purchase.clone().unwrap();
        assert_eq!(p.tier, PurchaseTier::Priority);
        assert_eq!(p.quantity, 5);
        assert_eq!(p.cost, 50);
        assert_eq!(s.cash.balance(), 50);
        assert_eq!(s.seeds.quantity("carrot"), 0);
        assert_eq!(s.seeds.quantity("strawberry"), 5);
    }

    #[test]
    fn cheapest_tier_when_priority_unaffordable() {
        let catalog = Catalog::default();
        let mut s = state_with(&[("strawberry", 1)], 9, 2);
        let mut report = DailyReport::new(2);
        auto_shop(&mut s, &catalog, &AutomationPolicy::default(), &mut report);
        let p = report.purchase.clone().unwrap();
        assert_eq!(p.tier, PurchaseTier::Cheapest);
        assert_eq!(p.produce_id.as_str(), "carrot");
        assert_eq!(p.quantity, 3);
        assert_eq!(s.cash.balance(), 0);
        assert_eq!(report.lines(), ["Auto-purchased 3 Carrot seeds.".to_string()]);
    }

    #[test]
    fn no_purchase_when_stock_sufficient() {
        let catalog = Catalog::default();
        let mut s = state_with(&[("strawberry", 3)], 100, 2);
        let mut report = DailyReport::new(2);
        auto_shop(&mut s, &catalog, &AutomationPolicy::default(), &mut report);
        assert!(report.purchase.is_none());
        assert_eq!(s.cash.balance(), 100);

        // strawberry low but broke, total stock high enough: nothing either
        let mut s = state_with(&[("strawberry", 1), ("tomato", 4)], 4, 2);
        auto_shop(&mut s, &catalog, &AutomationPolicy::default(), &mut report);
        assert!(report.purchase.is_none());
    }

    #[test]
    fn weekly_sale_includes_same_day_harvest() {
        let mut s = state_with(&[], 0, 5);
        s.plots = farm_core::PlotGrid::new(1);
        s.plots.plant(0, "strawberry".into(), 5).unwrap();
        s.harvested.add(&"tomato".into(), 2);
        let out = run_day(s, 7);
        // 2 tomatoes + 1 strawberry harvested today
        assert_eq!(out.state.cash.balance(), 55);
        assert!(out.state.harvested.is_empty());
        let sale = out.report.sale.clone().unwrap();
        assert_eq!(sale.total, 55);
        let text = out.report.notification().unwrap();
        assert!(text.contains("Weekly Sales:\nTomato x2: $30\nStrawberry x1: $25\nTotal: $55"));
    }

    #[test]
    fn nothing_sold_suppressed_in_first_week() {
        let catalog = Catalog::default();
        let policy = AutomationPolicy::default();
        let mut s = state_with(&[], 0, 7);
        let mut report = DailyReport::new(7);
        weekly_sale(&mut s, &catalog, &policy, &mut report);
        assert!(report.is_empty());

        s.day = 14;
        let mut report = DailyReport::new(14);
        weekly_sale(&mut s, &catalog, &policy, &mut report);
        assert!(report.nothing_sold);
        assert_eq!(report.notification().as_deref(), Some("Nothing sold this week."));

        s.day = 13;
        let mut report = DailyReport::new(13);
        weekly_sale(&mut s, &catalog, &policy, &mut report);
        assert!(report.is_empty());
    }

    #[test]
    fn quiet_day_produces_no_notification() {
        let mut s = state_with(&[("strawberry", 3)], 0, 2);
        s.plots = farm_core::PlotGrid::new(0);
        let out = run_day(s, 2);
        assert!(out.report.notification().is_none());
    }

    #[test]
    fn first_week_walkthrough() {
        // default session: 100 cash, tomato x5 + strawberry x3, 9 empty plots
        let start = FarmState::initial(&FarmConfig::default());

        let d2 = run_day(start, 2);
        let r = &d2.report;
        assert_eq!(
            planted(r),
            vec![
                "strawberry", "strawberry", "strawberry", "tomato", "tomato", "tomato",
                "tomato", "tomato"
            ]
        );
        assert_eq!(d2.state.plots.empty_plot_ids(), vec![8]);
        let p = r.purchase.clone().unwrap();
        assert_eq!((p.tier, p.quantity), (PurchaseTier::Priority, 5));
        assert_eq!(d2.state.cash.balance(), 50);

        let d3 = run_day(d2.state, 3);
        assert_eq!(planted(&d3.report), vec!["strawberry"]);
        assert!(d3.report.purchase.is_none());

        let d4 = run_day(d3.state, 4);
        assert_eq!(d4.report.harvested.len(), 3);
        assert_eq!(d4.state.seeds.quantity("strawberry"), 6);
        assert_eq!(d4.state.cash.balance(), 0);

        let d5 = run_day(d4.state, 5);
        assert_eq!(d5.report.harvested.len(), 6);
        assert_eq!(d5.report.planted.len(), 6);
        assert!(d5.report.purchase.is_none());

        let d6 = run_day(d5.state, 6);
        assert_eq!(d6.report.harvested.len(), 3);
        assert!(d6.report.planted.is_empty());

        let d7 = run_day(d6.state, 7);
        let sale = d7.report.sale.clone().unwrap();
        assert_eq!(sale.total, 13 * 25 + 5 * 15);
        assert_eq!(d7.state.cash.balance(), 400);
        assert!(d7.state.harvested.is_empty());
        assert_eq!(d7.state.plots.count(PlotStatus::Empty), 9);
    }

    proptest! {
        #[test]
        fn pipeline_preserves_invariants(
            seeds in prop::collection::vec((0usize..6, 0u32..6), 0..6),
            cash in 0i64..200,
            day in 1u32..40,
        ) {
            let catalog = Catalog::default();
            let ids: Vec<String> = catalog.iter().map(|p| p.id.to_string()).collect();
            let mut s = FarmState::initial(&FarmConfig::default());
            s.seeds = SeedInventory::from_items(seeds.iter().map(|(i, q)| LedgerItem::new(ids[*i].as_str(), *q)));
            s.cash = farm_core::CashLedger::new(cash);
            s.day = day;
            let available = s.seeds.total();
            let out = apply_daily_automation(s, &catalog, &AutomationPolicy::default());
            prop_assert_eq!(out.state.plots.len(), 9);
            prop_assert_eq!(out.report.planted.len() as u64, available.min(9));
            prop_assert!(out.state.cash.balance() >= 0);
            prop_assert!(out.state.seeds.items().iter().all(|i| i.quantity > 0));
            if let Some(p) = &out.report.purchase {
                prop_assert_eq!(out.state.cash.balance(), cash - p.cost as i64);
            } else {
                prop_assert_eq!(out.state.cash.balance(), cash);
            }
        }

        #[test]
        fn settlement_day_sells_whole_ledger(
            harvested in prop::collection::vec((0usize..6, 1u32..20), 1..6),
            seeds in prop::collection::vec((0usize..6, 0u32..6), 0..6),
            cash in 0i64..200,
            week in 1u32..10,
        ) {
            let catalog = Catalog::default();
            let ids: Vec<String> = catalog.iter().map(|p| p.id.to_string()).collect();
            let mut s = FarmState::initial(&FarmConfig::default());
            s.seeds = SeedInventory::from_items(seeds.iter().map(|(i, q)| LedgerItem::new(ids[*i].as_str(), *q)));
            for (i, q) in &harvested {
                s.harvested.add(&ProduceId::from(ids[*i].as_str()), *q);
            }
            s.cash = farm_core::CashLedger::new(cash);
            s.day = week * 7;
            let expected: u64 = harvested
                .iter()
                .map(|(i, q)| catalog.find(&ids[*i]).unwrap().sell_price * u64::from(*q))
                .sum();

            let out = apply_daily_automation(s, &catalog, &AutomationPolicy::default());
            prop_assert!(out.state.harvested.is_empty());
            let sale = out.report.sale.clone().unwrap();
            prop_assert_eq!(sale.total, expected);
            let spent = out.report.purchase.as_ref().map_or(0, |p| p.cost as i64);
            prop_assert_eq!(out.state.cash.balance(), cash - spent + expected as i64);
        }
    }
}
