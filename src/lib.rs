//! An expense tracker.
//!
//! Expenses are kept in a single list that is saved to a key-value store
//! after every change. Everything shown to the user (category totals, the
//! monthly series, the daily heatmap and the headline summary) is derived from
//! that list by the pure functions in [dashboard].
//!
//! The `expenses` binary wraps the library in a command line interface backed
//! by a SQLite database.

#![warn(missing_docs)]

mod config;
mod csv;
mod currency;
pub mod dashboard;
mod db;
mod error;
pub mod expense;
mod logging;
pub mod stores;
mod timezone;

pub use crate::csv::{CSV_HEADER, DEFAULT_EXPORT_FILE, export_csv};
pub use config::{Config, DEFAULT_DB_PATH};
pub use currency::{CurrencyCode, format_currency};
pub use db::initialize as initialize_db;
pub use error::Error;
pub use expense::{Category, Expense, ExpenseStore};
pub use logging::setup_logging;
pub use timezone::{DEFAULT_TIMEZONE, get_local_offset};
