//! Application settings, built once at start up and passed to whatever needs them.

use std::path::PathBuf;

use time::{Date, OffsetDateTime, UtcOffset};

use crate::{Error, dashboard::DEFAULT_MONTHLY_BUDGET, expense::validate_amount, timezone};

/// The database file used when none is given.
pub const DEFAULT_DB_PATH: &str = "expenses.db";

/// Settings for one run of the app.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// File path to the SQLite database.
    pub db_path: PathBuf,
    /// The canonical name of the local timezone, e.g. "Pacific/Auckland".
    pub timezone: String,
    /// The current UTC offset of `timezone`.
    pub local_offset: UtcOffset,
    /// Spending above this in a month is flagged.
    pub budget: f64,
    /// Where to write debug logs, if anywhere.
    pub log_file: Option<PathBuf>,
}

impl Config {
    /// Create a config, resolving `timezone` to its current offset.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidTimezoneError] if `timezone` is not a canonical timezone name,
    /// - or [Error::InvalidAmount] if `budget` is not greater than zero.
    pub fn new(
        db_path: PathBuf,
        timezone: &str,
        budget: f64,
        log_file: Option<PathBuf>,
    ) -> Result<Self, Error> {
        let local_offset = timezone::get_local_offset(timezone)?;
        let budget = validate_amount(budget)?;

        Ok(Self {
            db_path,
            timezone: timezone.to_owned(),
            local_offset,
            budget,
            log_file,
        })
    }

    /// The current time in the local timezone.
    pub fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.local_offset)
    }

    /// The current date in the local timezone.
    pub fn today(&self) -> Date {
        self.now().date()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            timezone: timezone::DEFAULT_TIMEZONE.to_owned(),
            local_offset: UtcOffset::UTC,
            budget: DEFAULT_MONTHLY_BUDGET,
            log_file: None,
        }
    }
}
