//! Daily spending heatmap.

use time::{Date, Duration};

use crate::expense::{Category, Expense};

/// The number of days before today covered by [HeatmapWindow::default].
pub const TRAILING_DAYS: u32 = 180;

/// The longest trailing window, about ten years.
pub const MAX_TRAILING_DAYS: u32 = 3660;

/// The range of days covered by a heatmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeatmapWindow {
    /// Every day of the calendar month containing today.
    CurrentMonth,
    /// Today and the given number of days before it, at most [MAX_TRAILING_DAYS].
    Trailing(u32),
}

impl Default for HeatmapWindow {
    fn default() -> Self {
        HeatmapWindow::Trailing(TRAILING_DAYS)
    }
}

impl HeatmapWindow {
    /// The first and last day of the window, both inclusive.
    pub fn range(self, today: Date) -> (Date, Date) {
        match self {
            HeatmapWindow::CurrentMonth => {
                let first = today.replace_day(1).unwrap_or(today);
                let last = today
                    .replace_day(today.month().length(today.year()))
                    .unwrap_or(today);
                (first, last)
            }
            HeatmapWindow::Trailing(days) => {
                let days = days.min(MAX_TRAILING_DAYS);
                let first = today
                    .checked_sub(Duration::days(days.into()))
                    .unwrap_or(Date::MIN);
                (first, today)
            }
        }
    }
}

/// How much was spent on a day, bucketed for colouring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Intensity {
    /// Nothing spent.
    Empty,
    /// Less than 100.
    Low,
    /// Less than 1,000.
    Medium,
    /// Less than 5,000.
    High,
    /// 5,000 or more.
    VeryHigh,
}

impl Intensity {
    /// The tier for a day's total.
    pub fn from_total(total: f64) -> Self {
        if total <= 0.0 {
            Intensity::Empty
        } else if total < 100.0 {
            Intensity::Low
        } else if total < 1_000.0 {
            Intensity::Medium
        } else if total < 5_000.0 {
            Intensity::High
        } else {
            Intensity::VeryHigh
        }
    }
}

/// The expenses of one day.
#[derive(Debug, Clone, PartialEq)]
pub struct DayBucket {
    /// The calendar day.
    pub date: Date,
    /// The sum of the amounts.
    pub total: f64,
    /// The colour tier of `total`.
    pub intensity: Intensity,
}

/// Sums expenses per day over `window`.
///
/// Returns one bucket for every day in the window, oldest first, including
/// days without expenses. When `category` is set only expenses in that
/// category are counted.
pub fn daily_heatmap(
    expenses: &[Expense],
    window: HeatmapWindow,
    today: Date,
    category: Option<Category>,
) -> Vec<DayBucket> {
    let (first, last) = window.range(today);
    let mut buckets = Vec::new();
    let mut date = first;

    loop {
        buckets.push(DayBucket {
            date,
            total: 0.0,
            intensity: Intensity::Empty,
        });

        match date.next_day() {
            Some(next) if next <= last => date = next,
            _ => break,
        }
    }

    for expense in expenses {
        if category.is_some_and(|category| expense.category != category) {
            continue;
        }

        let day = expense.calendar_date();
        if day < first || day > last {
            continue;
        }

        let index = (day - first).whole_days() as usize;
        buckets[index].total += expense.amount;
    }

    for bucket in &mut buckets {
        bucket.intensity = Intensity::from_total(bucket.total);
    }

    buckets
}

/// The categories that have expenses, in the order they are first seen.
pub fn heatmap_categories(expenses: &[Expense]) -> Vec<Category> {
    let mut categories = Vec::new();

    for expense in expenses {
        if !categories.contains(&expense.category) {
            categories.push(expense.category);
        }
    }

    categories
}
