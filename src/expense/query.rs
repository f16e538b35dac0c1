//! Filtering and sorting the expense list for display.

use time::Month;

use crate::{
    Error,
    expense::{Category, Expense},
};

/// The key to sort expenses by, largest first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Most recent first.
    #[default]
    Date,
    /// Largest amount first.
    Amount,
}

/// Get the month numbered `number`, where January is 1.
///
/// # Errors
/// Returns [Error::InvalidMonth] if `number` is not from 1 to 12.
pub fn month_from_number(number: u8) -> Result<Month, Error> {
    Month::try_from(number).map_err(|_| Error::InvalidMonth(number))
}

/// Keep the expenses that happened in `month` of any year.
///
/// The month is read in the offset of each expense's date, which is the local
/// offset for expenses from [ExpenseStore](crate::ExpenseStore).
///
/// `None` keeps every expense.
pub fn filter_by_month(expenses: &[Expense], month: Option<Month>) -> Vec<Expense> {
    match month {
        Some(month) => expenses
            .iter()
            .filter(|expense| expense.month() == month)
            .cloned()
            .collect(),
        None => expenses.to_vec(),
    }
}

/// Keep the expenses in `category`.
///
/// `None` keeps every expense.
pub fn filter_by_category(expenses: &[Expense], category: Option<Category>) -> Vec<Expense> {
    match category {
        Some(category) => expenses
            .iter()
            .filter(|expense| expense.category == category)
            .cloned()
            .collect(),
        None => expenses.to_vec(),
    }
}

/// Sort a copy of `expenses` by `key`, largest first.
///
/// The sort is stable: expenses with equal keys keep their relative order.
pub fn sort_expenses(expenses: &[Expense], key: SortKey) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();

    match key {
        SortKey::Date => sorted.sort_by(|a, b| b.date.cmp(&a.date)),
        SortKey::Amount => sorted.sort_by(|a, b| b.amount.total_cmp(&a.amount)),
    }

    sorted
}

#[cfg(test)]
mod tests {
    use time::{
        Month, OffsetDateTime,
        macros::{datetime, offset},
    };

    use crate::{
        Error,
        expense::{
            Category, Expense, Title,
            query::{
                SortKey, filter_by_category, filter_by_month, month_from_number, sort_expenses,
            },
        },
    };

    fn expense(id: i64, amount: f64, category: Category, date: OffsetDateTime) -> Expense {
        Expense::build(Title::new_unchecked("Test"), amount)
            .category(category)
            .finalize(id, date)
            .unwrap()
    }

    fn ids(expenses: &[Expense]) -> Vec<i64> {
        expenses.iter().map(|expense| expense.id).collect()
    }

    fn test_expenses() -> Vec<Expense> {
        vec![
            expense(1, 5.0, Category::Food, datetime!(2024-01-05 9:00 UTC)),
            expense(2, 1000.0, Category::Bills, datetime!(2024-01-01 9:00 UTC)),
            expense(3, 3.0, Category::Food, datetime!(2024-02-10 9:00 UTC)),
            expense(4, 20.0, Category::Travel, datetime!(2023-01-20 9:00 UTC)),
        ]
    }

    #[test]
    fn month_from_number_accepts_one_to_twelve() {
        assert_eq!(month_from_number(1), Ok(Month::January));
        assert_eq!(month_from_number(12), Ok(Month::December));
        assert_eq!(month_from_number(0), Err(Error::InvalidMonth(0)));
        assert_eq!(month_from_number(13), Err(Error::InvalidMonth(13)));
    }

    #[test]
    fn filter_by_month_ignores_year() {
        let got = filter_by_month(&test_expenses(), Some(Month::January));

        assert_eq!(ids(&got), vec![1, 2, 4]);
    }

    #[test]
    fn filter_by_month_uses_local_calendar_month() {
        let expenses = vec![
            expense(1, 500.0, Category::Food, datetime!(2024-01-31 20:00 UTC))
                .to_offset(offset!(+5:30)),
        ];

        assert_eq!(ids(&filter_by_month(&expenses, Some(Month::February))), vec![1]);
        assert!(filter_by_month(&expenses, Some(Month::January)).is_empty());
    }

    #[test]
    fn filter_by_month_none_keeps_everything() {
        let got = filter_by_month(&test_expenses(), None);

        assert_eq!(ids(&got), vec![1, 2, 3, 4]);
    }

    #[test]
    fn filter_by_month_with_no_matches_is_empty() {
        let got = filter_by_month(&test_expenses(), Some(Month::July));

        assert!(got.is_empty());
    }

    #[test]
    fn filter_by_category_keeps_matching() {
        let got = filter_by_category(&test_expenses(), Some(Category::Food));

        assert_eq!(ids(&got), vec![1, 3]);
    }

    #[test]
    fn sort_by_date_puts_most_recent_first() {
        let got = sort_expenses(&test_expenses(), SortKey::Date);

        assert_eq!(ids(&got), vec![3, 1, 2, 4]);
    }

    #[test]
    fn sort_by_amount_puts_largest_first() {
        let got = sort_expenses(&test_expenses(), SortKey::Amount);

        assert_eq!(ids(&got), vec![2, 4, 1, 3]);
    }

    #[test]
    fn sort_keeps_order_of_equal_keys() {
        let date = datetime!(2024-01-05 9:00 UTC);
        let expenses = vec![
            expense(1, 10.0, Category::Food, date),
            expense(2, 50.0, Category::Food, date),
            expense(3, 10.0, Category::Food, date),
            expense(4, 10.0, Category::Food, date),
        ];

        assert_eq!(ids(&sort_expenses(&expenses, SortKey::Amount)), vec![2, 1, 3, 4]);
        assert_eq!(ids(&sort_expenses(&expenses, SortKey::Date)), vec![1, 2, 3, 4]);
    }
}
