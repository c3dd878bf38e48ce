use crate::{FarmError, ProduceId};
use serde::{Deserialize, Serialize};

/// A quantity of one produce type, in a seed or harvest ledger.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerItem {
    pub produce_id: ProduceId,
    pub quantity: u32,
}

impl LedgerItem {
    pub fn new(produce_id: impl Into<ProduceId>, quantity: u32) -> Self {
        Self {
            produce_id: produce_id.into(),
            quantity,
        }
    }
}

fn upsert(items: &mut Vec<LedgerItem>, produce_id: &ProduceId, quantity: u32) {
    if quantity == 0 {
        return;
    }
    match items.iter_mut().find(|i| &i.produce_id == produce_id) {
        Some(item) => item.quantity = item.quantity.saturating_add(quantity),
        None => items.push(LedgerItem {
            produce_id: produce_id.clone(),
            quantity,
        }),
    }
}

/// Seed stock keyed by produce id, in first-acquired order.
///
/// Holds at most one entry per id and never keeps an entry at zero.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SeedInventory {
    items: Vec<LedgerItem>,
}

impl SeedInventory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an inventory, merging duplicate ids and dropping zero entries.
    pub fn from_items(items: impl IntoIterator<Item = LedgerItem>) -> Self {
        let mut inv = Self::new();
        for item in items {
            inv.add(&item.produce_id, item.quantity);
        }
        inv
    }

    pub fn add(&mut self, produce_id: &ProduceId, quantity: u32) {
        upsert(&mut self.items, produce_id, quantity);
    }

    /// Remove `quantity` seeds; the entry disappears when it reaches zero.
    pub fn consume(&mut self, produce_id: &ProduceId, quantity: u32) -> Result<(), FarmError> {
        if quantity == 0 {
            return Err(FarmError::ZeroQuantity);
        }
        let available = self.quantity(produce_id.as_str());
        if available < quantity {
            return Err(FarmError::InsufficientSeedStock {
                produce: produce_id.to_string(),
                requested: quantity,
                available,
            });
        }
        if let Some(item) = self.items.iter_mut().find(|i| &i.produce_id == produce_id) {
            item.quantity -= quantity;
        }
        self.prune();
        Ok(())
    }

    pub fn quantity(&self, produce_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.produce_id.as_str() == produce_id)
            .map_or(0, |i| i.quantity)
    }

    /// Total seeds across all types.
    pub fn total(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// The first entry, in inventory order, that still has stock.
    pub fn first_in_stock(&self) -> Option<&ProduceId> {
        self.items
            .iter()
            .find(|i| i.quantity > 0)
            .map(|i| &i.produce_id)
    }

    pub fn prune(&mut self) {
        self.items.retain(|i| i.quantity > 0);
    }

    pub fn items(&self) -> &[LedgerItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Produce collected this week, awaiting the weekly sale.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HarvestLedger {
    items: Vec<LedgerItem>,
}

impl HarvestLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, produce_id: &ProduceId, quantity: u32) {
        upsert(&mut self.items, produce_id, quantity);
    }

    pub fn quantity(&self, produce_id: &str) -> u32 {
        self.items
            .iter()
            .find(|i| i.produce_id.as_str() == produce_id)
            .map_or(0, |i| i.quantity)
    }

    pub fn total_units(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn items(&self) -> &[LedgerItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Cash balance in whole currency units.
///
/// Only purchases are guarded; nothing else prevents the balance from
/// going negative.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CashLedger {
    balance: i64,
}

impl CashLedger {
    pub fn new(balance: i64) -> Self {
        Self { balance }
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn can_afford(&self, cost: u64) -> bool {
        i64::try_from(cost).map_or(false, |c| self.balance >= c)
    }

    /// Deduct `cost`, or leave the balance untouched if it is not covered.
    pub fn spend(&mut self, cost: u64) -> Result<(), FarmError> {
        if !self.can_afford(cost) {
            return Err(FarmError::InsufficientFunds {
                cost,
                cash: self.balance,
            });
        }
        self.balance -= i64::try_from(cost).map_err(|_| FarmError::Overflow)?;
        Ok(())
    }

    pub fn credit(&mut self, amount: u64) {
        let amount = i64::try_from(amount).unwrap_or(i64::MAX);
        self.balance = self.balance.saturating_add(amount);
    }
}
