//! # JSON File Storage
//!
//! Stores each document as a standalone JSON file in a data directory.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── expense_tracker_users.json
//! ├── expense_tracker_user.json
//! ├── expense_tracker_expenses.json
//! ├── expense_tracker_settings.json
//! └── expense_tracker_notifications.json
//! ```
//!
//! Writes go to a temp file which is then renamed over the target, so a crash
//! mid-write leaves the previous document intact.

pub mod connection;

pub use connection::JsonConnection;
