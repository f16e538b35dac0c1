//! Monthly expense series: totals, counts, running totals and month-over-month change.

use time::Month;

use crate::expense::Expense;

/// The default monthly budget shown alongside the monthly series.
pub const DEFAULT_MONTHLY_BUDGET: f64 = 10_000.0;

/// Which number of a month to average.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MonthlyMetric {
    /// The amount spent.
    #[default]
    Total,
    /// The number of expenses.
    Count,
}

/// The expenses of one calendar month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthBucket {
    /// The month.
    pub month: Month,
    /// The sum of the amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// The sum of `total` over this and every earlier month.
    pub cumulative: f64,
    /// Percentage change of `total` from the previous month.
    ///
    /// Zero whenever the previous month has no spending (this includes January).
    pub change: f64,
}

impl MonthBucket {
    /// The three-letter abbreviation of the month, e.g. "Jan".
    pub fn label(&self) -> &'static str {
        match self.month {
            Month::January => "Jan",
            Month::February => "Feb",
            Month::March => "Mar",
            Month::April => "Apr",
            Month::May => "May",
            Month::June => "Jun",
            Month::July => "Jul",
            Month::August => "Aug",
            Month::September => "Sep",
            Month::October => "Oct",
            Month::November => "Nov",
            Month::December => "Dec",
        }
    }
}

/// Twelve [MonthBucket]s, January to December.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    months: Vec<MonthBucket>,
}

impl MonthlySeries {
    /// The buckets in calendar order. Always twelve.
    pub fn months(&self) -> &[MonthBucket] {
        &self.months
    }

    /// The bucket for `month`.
    pub fn month(&self, month: Month) -> &MonthBucket {
        &self.months[month_index(month)]
    }

    /// The sum over all twelve months.
    pub fn grand_total(&self) -> f64 {
        self.months
            .last()
            .map(|bucket| bucket.cumulative)
            .unwrap_or_default()
    }

    /// The mean of `metric` over the months that have spending.
    ///
    /// Months without spending are left out rather than counted as zero.
    /// Returns zero if no month has spending.
    pub fn average(&self, metric: MonthlyMetric) -> f64 {
        let active: Vec<&MonthBucket> = self
            .months
            .iter()
            .filter(|bucket| bucket.total > 0.0)
            .collect();

        if active.is_empty() {
            return 0.0;
        }

        let sum: f64 = active
            .iter()
            .map(|bucket| match metric {
                MonthlyMetric::Total => bucket.total,
                MonthlyMetric::Count => bucket.count as f64,
            })
            .sum();

        sum / active.len() as f64
    }

    /// The months where spending went over `budget`.
    pub fn months_over_budget(&self, budget: f64) -> Vec<Month> {
        self.months
            .iter()
            .filter(|bucket| bucket.total > budget)
            .map(|bucket| bucket.month)
            .collect()
    }
}

/// Aggregates expenses by calendar month.
///
/// With `year` set to `None`, expenses are bucketed by month alone, so the same
/// month of different years is merged. Pass `Some(year)` to only count
/// expenses from that year.
pub fn monthly_series(expenses: &[Expense], year: Option<i32>) -> MonthlySeries {
    let mut totals = [0.0; 12];
    let mut counts = [0usize; 12];

    for expense in expenses {
        if year.is_some_and(|year| expense.date.year() != year) {
            continue;
        }

        let index = month_index(expense.month());
        totals[index] += expense.amount;
        counts[index] += 1;
    }

    let mut months = Vec::with_capacity(12);
    let mut month = Month::January;
    let mut cumulative = 0.0;
    let mut previous_total = 0.0;

    for (total, count) in totals.into_iter().zip(counts) {
        cumulative += total;

        let change = if previous_total > 0.0 {
            (total - previous_total) / previous_total * 100.0
        } else {
            0.0
        };

        months.push(MonthBucket {
            month,
            total,
            count,
            cumulative,
            change,
        });

        previous_total = total;
        month = month.next();
    }

    MonthlySeries { months }
}

fn month_index(month: Month) -> usize {
    month as usize - 1
}

#[cfg(test)]
mod tests {
    use time::{Month, OffsetDateTime, macros::datetime};

    use crate::{
        dashboard::monthly::{MonthlyMetric, monthly_series},
        expense::{Category, Expense, Title},
    };

    fn create_test_expense(amount: f64, date: OffsetDateTime) -> Expense {
        Expense::build(Title::new_unchecked("Test"), amount)
            .category(Category::General)
            .finalize(1, date)
            .unwrap()
    }

    #[test]
    fn always_has_twelve_months_in_order() {
        let series = monthly_series(&[], None);

        assert_eq!(series.months().len(), 12);
        assert_eq!(series.months()[0].month, Month::January);
        assert_eq!(series.months()[11].month, Month::December);
        assert_eq!(series.months()[11].label(), "Dec");
        assert_eq!(series.grand_total(), 0.0);
    }

    #[test]
    fn sums_totals_counts_and_cumulative() {
        let expenses = vec![
            create_test_expense(5.0, datetime!(2024-01-05 9:00 UTC)),
            create_test_expense(1000.0, datetime!(2024-01-01 9:00 UTC)),
            create_test_expense(3.0, datetime!(2024-02-10 9:00 UTC)),
        ];

        let series = monthly_series(&expenses, None);

        let january = series.month(Month::January);
        assert_eq!(january.total, 1005.0);
        assert_eq!(january.count, 2);
        let february = series.month(Month::February);
        assert_eq!(february.total, 3.0);
        assert_eq!(february.cumulative, 1008.0);
        assert_eq!(series.months()[11].cumulative, 1008.0);
    }

    #[test]
    fn change_is_relative_to_previous_month() {
        let expenses = vec![
            create_test_expense(1005.0, datetime!(2024-01-05 9:00 UTC)),
            create_test_expense(3.0, datetime!(2024-02-10 9:00 UTC)),
        ];

        let series = monthly_series(&expenses, None);

        let change = series.month(Month::February).change;
        assert!((change - (3.0 - 1005.0) / 1005.0 * 100.0).abs() < 1e-9);
        assert!((change - -99.70149).abs() < 1e-4, "got {change}");
    }

    #[test]
    fn change_is_zero_after_month_without_spending() {
        let expenses = vec![
            create_test_expense(100.0, datetime!(2024-01-05 9:00 UTC)),
            create_test_expense(5000.0, datetime!(2024-03-10 9:00 UTC)),
        ];

        let series = monthly_series(&expenses, None);

        assert_eq!(series.month(Month::January).change, 0.0);
        assert_eq!(series.month(Month::February).change, -100.0);
        assert_eq!(series.month(Month::March).change, 0.0);
    }

    #[test]
    fn merges_years_unless_year_given() {
        let expenses = vec![
            create_test_expense(10.0, datetime!(2023-01-05 9:00 UTC)),
            create_test_expense(20.0, datetime!(2024-01-05 9:00 UTC)),
        ];

        assert_eq!(monthly_series(&expenses, None).month(Month::January).total, 30.0);
        assert_eq!(
            monthly_series(&expenses, Some(2024)).month(Month::January).total,
            20.0
        );
    }

    #[test]
    fn average_skips_months_without_spending() {
        let expenses = vec![
            create_test_expense(100.0, datetime!(2024-01-05 9:00 UTC)),
            create_test_expense(50.0, datetime!(2024-01-06 9:00 UTC)),
            create_test_expense(300.0, datetime!(2024-06-10 9:00 UTC)),
        ];

        let series = monthly_series(&expenses, None);

        assert_eq!(series.average(MonthlyMetric::Total), 225.0);
        assert_eq!(series.average(MonthlyMetric::Count), 1.5);
    }

    #[test]
    fn average_of_empty_series_is_zero() {
        let series = monthly_series(&[], None);

        assert_eq!(series.average(MonthlyMetric::Total), 0.0);
        assert_eq!(series.average(MonthlyMetric::Count), 0.0);
    }

    #[test]
    fn finds_months_over_budget() {
        let expenses = vec![
            create_test_expense(12_000.0, datetime!(2024-03-05 9:00 UTC)),
            create_test_expense(9_000.0, datetime!(2024-04-05 9:00 UTC)),
        ];

        let series = monthly_series(&expenses, None);

        assert_eq!(series.months_over_budget(10_000.0), vec![Month::March]);
    }
}
