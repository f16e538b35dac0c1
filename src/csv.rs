//! Exporting expenses as CSV.

use time::{format_description::BorrowedFormatItem, macros::format_description};

use crate::{Error, expense::Expense};

/// The header row of an exported file.
pub const CSV_HEADER: [&str; 4] = ["Title", "Amount", "Category", "Date"];

/// The default name of the exported file.
pub const DEFAULT_EXPORT_FILE: &str = "expenses.csv";

/// Day/month/year without zero padding, e.g. `5/1/2024`.
const DATE_FORMAT: &[BorrowedFormatItem] =
    format_description!("[day padding:none]/[month padding:none]/[year]");

/// Writes `expenses` as CSV text, one row per expense after a header row.
///
/// Fields containing commas, quotes or newlines are quoted.
///
/// # Errors
/// Returns [Error::CsvError] if a row could not be written.
pub fn export_csv(expenses: &[Expense]) -> Result<String, Error> {
    let mut writer = ::csv::Writer::from_writer(Vec::new());

    writer.write_record(CSV_HEADER)?;

    for expense in expenses {
        let date = expense
            .date
            .format(DATE_FORMAT)
            .map_err(|error| Error::CsvError(error.to_string()))?;

        writer.write_record([
            expense.title.as_ref(),
            &expense.amount.to_string(),
            expense.category.as_str(),
            &date,
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|error| Error::CsvError(error.to_string()))?;

    String::from_utf8(bytes).map_err(|error| Error::CsvError(error.to_string()))
}
