//! Expenses: the domain model, the store that persists them and the
//! filters used to pick which ones to show.

mod domain;
mod query;
mod store;

pub use domain::{
    Category, Expense, ExpenseBuilder, ExpenseEdit, ExpenseId, Title, parse_timestamp,
    validate_amount,
};
pub use query::{SortKey, filter_by_category, filter_by_month, month_from_number, sort_expenses};
pub use store::{CURRENCY_KEY, EXPENSES_KEY, ExpenseStore, load_expenses, parse_expenses};
