#![deny(warnings)]

//! Core domain models and invariants for the automated farm.
//!
//! This crate defines the produce catalog, the plot grid, the seed and
//! harvest ledgers, the cash balance and the [`FarmState`] snapshot that the
//! automation pipeline consumes and produces. Configuration and the shared
//! error types live here as well so every other crate speaks the same
//! vocabulary.

mod catalog;
mod config;
mod ledger;
mod plots;
mod state;

pub use catalog::{Catalog, ProduceId, ProduceType};
pub use config::{validate_config, ConfigError, FarmConfig};
pub use ledger::{CashLedger, HarvestLedger, LedgerItem, SeedInventory};
pub use plots::{Plot, PlotGrid, PlotState, PlotStatus};
pub use state::FarmState;

use thiserror::Error;

/// Recoverable errors raised by farm operations.
///
/// None of these are fatal: callers either surface them as a notification
/// (manual purchases) or skip the affected step (automation).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FarmError {
    /// The referenced produce id has no catalog entry.
    #[error("unknown produce: {0}")]
    UnknownProduce(String),
    /// The referenced plot index is outside the grid.
    #[error("unknown plot: {0}")]
    UnknownPlot(usize),
    /// Plant on a non-empty plot, or harvest on a plot that is not ready.
    #[error("plot {plot} is {found}, expected {expected}")]
    InvalidPlotState {
        plot: usize,
        expected: PlotStatus,
        found: PlotStatus,
    },
    /// Consumption asked for more seeds than are in stock.
    #[error("not enough {produce} seeds: requested {requested}, available {available}")]
    InsufficientSeedStock {
        produce: String,
        requested: u32,
        available: u32,
    },
    /// Purchase cost exceeds the cash balance.
    #[error("insufficient funds: cost {cost}, cash {cash}")]
    InsufficientFunds { cost: u64, cash: i64 },
    /// Quantities in commands must be positive.
    #[error("quantity must be > 0")]
    ZeroQuantity,
    /// Monetary arithmetic overflowed.
    #[error("arithmetic overflow")]
    Overflow,
}

/// Validation errors for configuration invariants.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Catalog must contain at least one entry.
    #[error("catalog is empty")]
    EmptyCatalog,
    /// Catalog ids must be unique.
    #[error("duplicate catalog id: {0}")]
    DuplicateProduce(String),
    /// Seed cost, sell price and growth time must be strictly positive.
    #[error("produce {0} has a non-positive cost, price or growth time")]
    NonPositiveProduce(String),
    /// Referenced produce id is not in the catalog.
    #[error("produce not in catalog: {0}")]
    ProduceNotInCatalog(String),
    /// Starting cash must not be negative.
    #[error("initial cash must be >= 0")]
    NegativeCash,
    /// Count-like settings (plots, hours, days, tick period, batches) must be > 0.
    #[error("{0} must be > 0")]
    ZeroSetting(&'static str),
}
