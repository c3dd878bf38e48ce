use farm_core::ProduceId;
use farm_econ::Settlement;
use serde::Serialize;

/// Which rule of the auto-shop made a purchase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchaseTier {
    /// Restock of the priority produce.
    Priority,
    /// Cheapest catalog seed, bought when overall stock ran low.
    Cheapest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct SeedPurchase {
    pub produce_id: ProduceId,
    pub quantity: u32,
    pub cost: u64,
    pub tier: PurchaseTier,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PlotEvent {
    pub plot: usize,
    pub produce_id: ProduceId,
}

/// Everything the automation did on one day, plus the human-readable lines
/// that become the day's notification.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct DailyReport {
    pub day: u32,
    pub harvested: Vec<PlotEvent>,
    pub planted: Vec<PlotEvent>,
    pub purchase: Option<SeedPurchase>,
    pub sale: Option<Settlement>,
    pub nothing_sold: bool,
    lines: Vec<String>,
}

impl DailyReport {
    pub fn new(day: u32) -> Self {
        Self {
            day,
            ..Self::default()
        }
    }

    pub(crate) fn record_harvest(&mut self, plot: usize, produce_id: ProduceId, name: &str) {
        // plots are numbered from 1 for people
        self.lines
            .push(format!("Auto-harvested {name} from plot {}.", plot + 1));
        self.harvested.push(PlotEvent { plot, produce_id });
    }

    pub(crate) fn record_plant(&mut self, plot: usize, produce_id: ProduceId, name: &str) {
        self.lines
            .push(format!("Auto-planted {name} on plot {}.", plot + 1));
        self.planted.push(PlotEvent { plot, produce_id });
    }

    pub(crate) fn record_purchase(&mut self, purchase: SeedPurchase, name: &str) {
        self.lines.push(format!(
            "Auto-purchased {} {name} seeds.",
            purchase.quantity
        ));
        self.purchase = Some(purchase);
    }

    pub(crate) fn record_sale(&mut self, sale: Settlement) {
        self.lines.push("Weekly Sales:".to_string());
        for line in &sale.lines {
            self.lines.push(format!(
                "{} x{}: ${}",
                line.name, line.quantity, line.earnings
            ));
        }
        self.lines.push(format!("Total: ${}", sale.total));
        self.sale = Some(sale);
    }

    pub(crate) fn record_nothing_sold(&mut self) {
        self.lines.push("Nothing sold this week.".to_string());
        self.nothing_sold = true;
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Newline-joined report, or `None` when nothing happened.
    pub fn notification(&self) -> Option<String> {
        if self.lines.is_empty() {
            None
        } else {
            Some(self.lines.join("\n"))
        }
    }
}
