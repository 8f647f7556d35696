//! # Expense Tracker Backend
//!
//! Local-first expense ledger with analytics, notifications, settings and
//! backup. All state lives in whole JSON documents behind a [`storage::Connection`];
//! the [`Tracker`] facade owns the domain services and runs [`shared::Command`]s.
//!
//! ```no_run
//! use expense_tracker_backend::{JsonConnection, Tracker};
//!
//! # fn main() -> anyhow::Result<()> {
//! let connection = JsonConnection::new("/tmp/expenses")?;
//! let mut tracker = Tracker::open(connection)?;
//! let summary = tracker.dashboard();
//! println!("{:.2} spent this month", summary.monthly_total);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod domain;
pub mod error;
pub mod storage;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::{TrackerError, TrackerResult};
pub use storage::{Connection, JsonConnection, MemoryConnection};
pub use tracker::Tracker;
