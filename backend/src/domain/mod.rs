//! # Domain Module
//!
//! Business logic of the expense tracker, independent of where data is stored
//! and how it is shown.
//!
//! ## Stateful services
//!
//! Each service owns one document's in-memory copy and writes it back through
//! its repository after every change:
//! - [`Ledger`]: the ordered expense collection
//! - [`NotificationLog`]: in-app notifications, newest first
//! - [`SettingsService`]: user preferences and the derived theme
//! - [`AccountService`]: credentials and the signed-in user
//!
//! ## Pure functions
//!
//! Filtering, aggregation, validation and formatting work on borrowed slices
//! and take "today" or "now" as arguments, so they never read the clock.

pub mod account_service;
pub mod aggregation;
pub mod clock;
pub mod export_service;
pub mod filter;
pub mod formatting;
pub mod ids;
pub mod ledger;
pub mod notification_log;
pub mod settings_service;
pub mod validation;

pub use account_service::AccountService;
pub use clock::{Clock, FixedClock, SystemClock};
pub use export_service::{ExportService, ImportPlan};
pub use filter::filter_expenses;
pub use ledger::{Ledger, LARGE_EXPENSE_THRESHOLD};
pub use notification_log::NotificationLog;
pub use settings_service::SettingsService;
