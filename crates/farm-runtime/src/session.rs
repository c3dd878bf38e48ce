use crate::clock::{Clock, DayRollover};
use crate::notify::NotificationSink;
use crate::view::{PlotView, SessionStats, SessionView};
use crate::SessionError;
use farm_auto::{apply_daily_automation, AutomationPolicy, DailyReport};
use farm_core::{
    validate_config, Catalog, FarmConfig, FarmError, FarmState, HarvestLedger, PlotGrid, ProduceId,
    SeedInventory,
};
use farm_econ::purchase_cost;
use serde::Serialize;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Outcome of a successful manual seed purchase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PurchaseReceipt {
    pub produce_id: ProduceId,
    pub quantity: u32,
    pub cost: u64,
    pub cash_after: i64,
}

/// Owned context for one in-memory farm: clock, state, notifications and
/// counters. Every mutation goes through `&mut self`, so a caller that owns
/// the session (or serializes access to it) never observes a half-applied day.
#[derive(Debug)]
pub struct Session {
    config: FarmConfig,
    policy: AutomationPolicy,
    clock: Clock,
    state: FarmState,
    notifications: NotificationSink,
    stats: SessionStats,
    last_automated_day: Option<u32>,
}

impl Session {
    /// Validate `config` and open a session at day 1, hour 0.
    pub fn new(config: FarmConfig, now: Instant) -> Result<Self, SessionError> {
        validate_config(&config)?;
        let clock = Clock::new(config.hours_in_day)?;
        let mut session = Self {
            policy: AutomationPolicy::from_config(&config),
            clock,
            state: FarmState::initial(&config),
            notifications: NotificationSink::new(config.notification_ttl()),
            stats: SessionStats::default(),
            last_automated_day: None,
            config,
        };
        info!(
            plots = session.state.plots.len(),
            cash = session.state.cash.balance(),
            "farm session opened"
        );
        if session.config.automate_opening_day {
            session.run_automation(now);
        }
        Ok(session)
    }

    /// Advance the clock one hour. On a day rollover, ripen crops and run
    /// the daily automation; the report is returned when it ran.
    pub fn tick(&mut self, now: Instant) -> Option<DailyReport> {
        let DayRollover { day } = self.clock.tick()?;
        self.on_day_rollover(day, now)
    }

    /// Advance `ticks` hours. Returns the reports of every automated day.
    pub fn run_ticks(&mut self, ticks: u64, now: Instant) -> Vec<DailyReport> {
        (0..ticks).filter_map(|_| self.tick(now)).collect()
    }

    /// Advance until `days` rollovers have happened.
    pub fn run_days(&mut self, days: u32, now: Instant) -> Vec<DailyReport> {
        let target = self.clock.day().saturating_add(days);
        let mut reports = Vec::new();
        while self.clock.day() < target {
            reports.extend(self.tick(now));
        }
        reports
    }

    fn on_day_rollover(&mut self, day: u32, now: Instant) -> Option<DailyReport> {
        self.state.day = day;
        let ripened = self.state.plots.check_ready(day, &self.config.catalog);
        info!(day, week = self.week(), ripened, "new day");
        self.run_automation(now)
    }

    /// Run the pipeline for the current day at most once.
    fn run_automation(&mut self, now: Instant) -> Option<DailyReport> {
        let day = self.state.day;
        if self.last_automated_day == Some(day) {
            debug!(day, "automation already ran today");
            return None;
        }
        let snapshot = self.state.clone();
        let outcome = apply_daily_automation(snapshot, &self.config.catalog, &self.policy);
        self.state = outcome.state;
        self.last_automated_day = Some(day);

        let report = outcome.report;
        self.record_stats(&report);
        if let Some(text) = report.notification() {
            self.notifications.post(text, now);
        }
        Some(report)
    }

    fn record_stats(&mut self, report: &DailyReport) {
        let s = &mut self.stats;
        s.days_automated += 1;
        s.plots_harvested += report.harvested.len() as u64;
        s.seeds_planted += report.planted.len() as u64;
        if let Some(p) = &report.purchase {
            s.seeds_bought += u64::from(p.quantity);
            s.seed_spend = s.seed_spend.saturating_add(p.cost);
        }
        if let Some(sale) = &report.sale {
            s.weeks_settled += 1;
            s.sales_earnings = s.sales_earnings.saturating_add(sale.total);
        }
    }

    /// Manual purchase. Posts a success or "not enough cash" notification;
    /// unknown produce is rejected without one.
    pub fn buy_seed(
        &mut self,
        produce_id: &str,
        quantity: u32,
        now: Instant,
    ) -> Result<PurchaseReceipt, FarmError> {
        if quantity == 0 {
            return Err(FarmError::ZeroQuantity);
        }
        let Some(produce) = self.config.catalog.find(produce_id) else {
            warn!(produce = produce_id, "purchase of unknown produce ignored");
            return Err(FarmError::UnknownProduce(produce_id.to_string()));
        };
        // a cost that does not fit in u64 is never affordable
        let cost = purchase_cost(produce.seed_cost, quantity).unwrap_or(u64::MAX);
        if let Err(e) = self.state.cash.spend(cost) {
            self.notifications.post("Not enough cash!", now);
            debug!(produce = produce_id, quantity, cost, "manual purchase rejected");
            return Err(e);
        }
        self.state.seeds.add(&produce.id, quantity);
        self.stats.seeds_bought += u64::from(quantity);
        self.stats.seed_spend = self.stats.seed_spend.saturating_add(cost);
        self.notifications
            .post(format!("Bought {quantity} {} seed(s).", produce.name), now);
        info!(produce = produce_id, quantity, cost, "manual purchase");
        Ok(PurchaseReceipt {
            produce_id: produce.id.clone(),
            quantity,
            cost,
            cash_after: self.state.cash.balance(),
        })
    }

    pub fn cash(&self) -> i64 {
        self.state.cash.balance()
    }

    pub fn day(&self) -> u32 {
        self.clock.day()
    }

    pub fn hour(&self) -> u32 {
        self.clock.hour()
    }

    /// 1-based week number: `floor((day - 1) / days_in_week) + 1`.
    pub fn week(&self) -> u32 {
        self.config.week_of(self.clock.day())
    }

    pub fn plots(&self) -> &PlotGrid {
        &self.state.plots
    }

    pub fn seeds(&self) -> &SeedInventory {
        &self.state.seeds
    }

    pub fn harvested(&self) -> &HarvestLedger {
        &self.state.harvested
    }

    pub fn catalog(&self) -> &Catalog {
        &self.config.catalog
    }

    pub fn config(&self) -> &FarmConfig {
        &self.config
    }

    pub fn state(&self) -> &FarmState {
        &self.state
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn tick_interval(&self) -> Duration {
        self.config.tick_interval()
    }

    pub fn notification(&self, now: Instant) -> Option<&str> {
        self.notifications.current(now)
    }

    pub fn notification_expiry(&self) -> Option<Instant> {
        self.notifications.expires_at()
    }

    pub fn expire_notification(&mut self, now: Instant) -> bool {
        self.notifications.expire(now)
    }

    /// Snapshot every read model at `now`.
    pub fn view(&self, now: Instant) -> SessionView {
        let day = self.clock.day();
        let catalog = &self.config.catalog;
        let plots = self
            .state
            .plots
            .iter()
            .map(|plot| {
                let produce = plot
                    .state
                    .produce_id()
                    .and_then(|id| catalog.find(id.as_str()));
                PlotView {
                    id: plot.id,
                    status: plot.state.status(),
                    produce_id: plot.state.produce_id().cloned(),
                    produce_name: produce.map(|p| p.name.clone()),
                    icon: produce.map(|p| p.icon.clone()),
                    planted_at_day: plot.state.planted_at_day(),
                    growth_progress_pct: plot.growth_progress_pct(day, catalog),
                }
            })
            .collect();
        SessionView {
            cash: self.cash(),
            day,
            hour: self.clock.hour(),
            week: self.week(),
            day_of_week: (day - 1) % self.config.days_in_week + 1,
            day_progress_pct: self.clock.day_progress_pct(),
            plots,
            seeds: self.state.seeds.items().to_vec(),
            harvested: self.state.harvested.items().to_vec(),
            notification: self.notification(now).map(str::to_string),
            stats: self.stats.clone(),
        }
    }
}
