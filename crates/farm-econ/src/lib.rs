#![deny(warnings)]

//! Economic helpers for the farm: seed purchase sizing and weekly settlement.
//!
//! This module provides validated utilities for:
//! - How many seeds a balance can buy, capped by a batch size
//! - The total cost of a purchase, with overflow checks
//! - Settling the harvested ledger at the end of a week

use farm_core::{Catalog, HarvestLedger, ProduceId};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

/// Errors produced by economic helpers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EconError {
    /// Unit costs must be strictly positive.
    #[error("unit cost must be > 0")]
    ZeroUnitCost,
    /// Cost computation overflowed.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Whole units of `unit_cost` that `cash` covers. Negative cash buys nothing.
///
/// Example:
/// assert_eq!(affordable_units(97, 3).unwrap(), 32);
pub fn affordable_units(cash: i64, unit_cost: u64) -> Result<u64, EconError> {
    if unit_cost == 0 {
        return Err(EconError::ZeroUnitCost);
    }
    if cash <= 0 {
        return Ok(0);
    }
    Ok(cash.unsigned_abs() / unit_cost)
}

/// Quantity to buy under a batch cap: `min(floor(cash / unit_cost), batch)`.
///
/// Example:
/// assert_eq!(purchase_quantity(100, 10, 5).unwrap(), 5);
/// assert_eq!(purchase_quantity(25, 10, 5).unwrap(), 2);
pub fn purchase_quantity(cash: i64, unit_cost: u64, batch: u32) -> Result<u32, EconError> {
    let affordable = affordable_units(cash, unit_cost)?;
    Ok(affordable.min(u64::from(batch)) as u32)
}

/// Total cost of `quantity` units.
pub fn purchase_cost(unit_cost: u64, quantity: u32) -> Result<u64, EconError> {
    unit_cost
        .checked_mul(u64::from(quantity))
        .ok_or(EconError::Overflow)
}

/// Whether `day` closes a sales week (a positive multiple of `days_in_week`).
pub fn is_settlement_day(day: u32, days_in_week: u32) -> bool {
    day > 0 && days_in_week > 0 && day % days_in_week == 0
}

/// Proceeds from one produce type at the weekly sale.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleLine {
    pub produce_id: ProduceId,
    pub name: String,
    pub quantity: u32,
    pub earnings: u64,
}

/// Result of selling the whole harvested ledger.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settlement {
    pub lines: Vec<SaleLine>,
    pub total: u64,
}

/// Price every ledger entry at its catalog sell price.
///
/// Entries whose produce is missing from the catalog earn nothing and are
/// left out of the lines. The ledger itself is not modified.
pub fn settle(harvested: &HarvestLedger, catalog: &Catalog) -> Settlement {
    let mut out = Settlement::default();
    for item in harvested.items() {
        let Some(produce) = catalog.find(item.produce_id.as_str()) else {
            warn!(produce = %item.produce_id, "cannot price unknown produce");
            continue;
        };
        let earnings = produce.sell_price.saturating_mul(u64::from(item.quantity));
        out.total = out.total.saturating_add(earnings);
        out.lines.push(SaleLine {
            produce_id: item.produce_id.clone(),
            name: produce.name.clone(),
            quantity: item.quantity,
            earnings,
        });
    }
    out
}
