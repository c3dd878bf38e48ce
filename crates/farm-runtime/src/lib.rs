#![deny(warnings)]

//! Runtime for the automated farm.
//!
//! A [`Session`] owns all mutable state of one in-memory farm and is driven
//! either by direct calls (`tick`, `run_days`, `buy_seed`), which keeps tests
//! deterministic, or by the tokio [`driver`] which ticks it in real time.

pub mod clock;
pub mod driver;
pub mod notify;
mod session;
mod view;

pub use clock::{Clock, ClockError, DayRollover};
pub use driver::{spawn, DriverError, SessionHandle};
pub use notify::{Notification, NotificationSink};
pub use session::{PurchaseReceipt, Session};
pub use view::{PlotView, SessionStats, SessionView};

use farm_core::ValidationError;
use thiserror::Error;

/// Errors raised when opening a session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("invalid config: {0}")]
    Config(#[from] ValidationError),
    #[error("invalid clock: {0}")]
    Clock(#[from] ClockError),
}
