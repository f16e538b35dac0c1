//! Headline statistics for a set of expenses.

use time::{Date, Month};

use crate::{
    dashboard::aggregation::{CategoryLabel, category_totals},
    expense::{Category, Expense, filter_by_month},
};

/// Headline numbers for a non-empty set of expenses.
#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    /// The sum of all amounts.
    pub total: f64,
    /// `total` divided by the number of days that have at least one expense.
    pub average_daily: f64,
    /// The category with the largest total and that total.
    pub top_category: (Category, f64),
    /// The day with the largest total and that total.
    pub most_expensive_day: (Date, f64),
    /// Spending this month compared to last month.
    pub month_over_month: MonthOverMonth,
}

/// Spending in the current calendar month compared to the one before.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthOverMonth {
    /// The total for the month containing today.
    pub current: f64,
    /// The total for the month before.
    pub previous: f64,
    /// `current - previous`.
    pub delta: f64,
    /// `delta` as a percentage of `previous`, or `None` if nothing was spent
    /// last month.
    pub percent_change: Option<f64>,
}

/// Summarise `expenses`, with `today` deciding which month is current.
///
/// Returns `None` if there are no expenses. Ties go to whichever category
/// or day was seen first.
pub fn summarize(expenses: &[Expense], today: Date) -> Option<Summary> {
    let total: f64 = expenses.iter().map(|expense| expense.amount).sum();

    let days = daily_totals(expenses);
    let most_expensive_day = days
        .iter()
        .copied()
        .reduce(|best, day| if day.1 > best.1 { day } else { best })?;
    let average_daily = total / days.len() as f64;

    // category_totals sorts stably, so the first entry wins ties.
    let top_category = category_totals(expenses)
        .into_iter()
        .find_map(|top| match top.label {
            CategoryLabel::Category(category) => Some((category, top.total)),
            CategoryLabel::Others => None,
        })?;

    Some(Summary {
        total,
        average_daily,
        top_category,
        most_expensive_day,
        month_over_month: month_over_month(expenses, today),
    })
}

/// Summarise the expenses from `month` of any year, or all of them for `None`.
///
/// The headline numbers only count `month`, but
/// [month_over_month](Summary::month_over_month) always compares the calendar
/// month containing `today` with the one before, over all of `expenses`.
pub fn summarize_month(expenses: &[Expense], month: Option<Month>, today: Date) -> Option<Summary> {
    let mut summary = summarize(&filter_by_month(expenses, month), today)?;
    summary.month_over_month = month_over_month(expenses, today);

    Some(summary)
}

/// Compare spending in the month containing `today` with the month before.
///
/// The previous month of January is December of the year before.
pub fn month_over_month(expenses: &[Expense], today: Date) -> MonthOverMonth {
    let current_month = (today.year(), today.month());
    let previous_month = match today.month() {
        Month::January => (today.year() - 1, Month::December),
        month => (today.year(), month.previous()),
    };

    let mut current = 0.0;
    let mut previous = 0.0;

    for expense in expenses {
        let month = (expense.date.year(), expense.month());

        if month == current_month {
            current += expense.amount;
        } else if month == previous_month {
            previous += expense.amount;
        }
    }

    let delta = current - previous;
    let percent_change = (previous != 0.0).then(|| delta / previous * 100.0);

    MonthOverMonth {
        current,
        previous,
        delta,
        percent_change,
    }
}

/// Totals per calendar day, in the order each day is first seen.
fn daily_totals(expenses: &[Expense]) -> Vec<(Date, f64)> {
    let mut days: Vec<(Date, f64)> = Vec::new();

    for expense in expenses {
        let date = expense.calendar_date();

        match days.iter_mut().find(|(day, _)| *day == date) {
            Some((_, total)) => *total += expense.amount,
            None => days.push((date, expense.amount)),
        }
    }

    days
}
