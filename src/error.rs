//! Defines the crate level error type and how errors are reported to the user.

use crate::expense::ExpenseId;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty (or whitespace only) string was used as an expense title.
    #[error("expense title cannot be empty")]
    EmptyTitle,

    /// The amount of an expense was zero, negative or not a finite number.
    ///
    /// Expenses record money that was spent, so the amount must be a positive
    /// magnitude.
    #[error("{0} is not a valid amount, amounts must be greater than zero")]
    InvalidAmount(f64),

    /// A date string could not be parsed as an RFC 3339 timestamp or a
    /// `YYYY-MM-DD` date.
    #[error("could not parse \"{0}\" as a date")]
    InvalidDate(String),

    /// A category label did not match any of the known categories.
    #[error("\"{0}\" is not a known category")]
    UnknownCategory(String),

    /// A currency code did not match any of the supported currencies.
    #[error("\"{0}\" is not a supported currency")]
    UnknownCurrency(String),

    /// A month number outside of 1 to 12 was given.
    #[error("{0} is not a valid month, expected a number from 1 to 12")]
    InvalidMonth(u8),

    /// Tried to edit an expense that does not exist.
    ///
    /// The store itself treats this as a no-op, callers that need to tell the
    /// user about it (e.g., the CLI) check first and return this error.
    #[error("there is no expense with the ID {0}")]
    MissingExpense(ExpenseId),

    /// The largest expense ID is already in use, so no new ID can be assigned.
    #[error("no more expense IDs are available")]
    ExpenseIdOverflow,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// An error occurred while serializing a struct as JSON
    #[error("could not serialize as JSON: {0}")]
    JSONSerializationError(String),

    /// The expenses could not be written as CSV.
    #[error("could not write CSV: {0}")]
    CsvError(String),

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A file could not be read or written.
    #[error("could not access file: {0}")]
    Io(String),

    /// The logger could not be set up.
    #[error("could not set up logging: {0}")]
    LoggingError(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<csv::Error> for Error {
    fn from(value: csv::Error) -> Self {
        Error::CsvError(value.to_string())
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::Io(value.to_string())
    }
}

impl Error {
    /// A short message and a suggested fix for showing the error to the user.
    pub fn into_message(self) -> (String, String) {
        match self {
            Error::EmptyTitle => (
                "Invalid title".to_owned(),
                "Give the expense a title, e.g. \"Coffee\".".to_owned(),
            ),
            Error::InvalidAmount(amount) => (
                "Invalid amount".to_owned(),
                format!("{amount} is not allowed. Enter an amount greater than zero."),
            ),
            Error::InvalidDate(text) => (
                "Invalid date".to_owned(),
                format!(
                    "Could not read \"{text}\" as a date. \
                    Use the format YYYY-MM-DD or a full RFC 3339 timestamp."
                ),
            ),
            Error::UnknownCategory(label) => (
                "Unknown category".to_owned(),
                format!(
                    "\"{label}\" is not a category. \
                    Choose one of General, Food, Travel, Bills, Shopping or Substances."
                ),
            ),
            Error::UnknownCurrency(code) => (
                "Unknown currency".to_owned(),
                format!("\"{code}\" is not supported. Choose one of INR, USD, EUR, GBP or JPY."),
            ),
            Error::InvalidMonth(month) => (
                "Invalid month".to_owned(),
                format!("{month} is not a month. Enter a number from 1 to 12."),
            ),
            Error::MissingExpense(id) => (
                "Could not find expense".to_owned(),
                format!("There is no expense with the ID {id}. Run `list` to see expense IDs."),
            ),
            Error::InvalidTimezoneError(timezone) => (
                "Invalid timezone".to_owned(),
                format!(
                    "Could not get local timezone \"{timezone}\". \
                    Ensure the timezone is a valid, canonical timezone string, e.g. \"Pacific/Auckland\"."
                ),
            ),
            error => (
                "Something went wrong".to_owned(),
                format!("An unexpected error occurred: {error}"),
            ),
        }
    }
}
