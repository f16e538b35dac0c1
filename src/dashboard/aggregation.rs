//! Expense aggregation by category.
//!
//! Groups are kept in the order their category is first seen, and every sort
//! is stable, so ties always resolve to the category seen first.

use std::fmt::Display;

use crate::expense::{Category, Expense};

/// The label of the bucket that collects the categories outside the top N.
pub const OTHERS_LABEL: &str = "Others";

/// How many categories [top_categories] keeps before merging the rest.
pub const TOP_CATEGORY_COUNT: usize = 5;

/// The label of a category bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CategoryLabel {
    /// A single category.
    Category(Category),
    /// Several smaller categories merged together.
    Others,
}

impl Display for CategoryLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CategoryLabel::Category(category) => write!(f, "{category}"),
            CategoryLabel::Others => f.write_str(OTHERS_LABEL),
        }
    }
}

/// The amount spent in a category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryTotal {
    /// The category, or [CategoryLabel::Others].
    pub label: CategoryLabel,
    /// The sum of the amounts.
    pub total: f64,
    /// The number of expenses.
    pub count: usize,
    /// `total` as a percentage of the total over all categories.
    pub percentage: f64,
}

/// Sums the expenses in each category.
///
/// # Returns
/// One entry per category that has expenses, largest total first. Empty input
/// gives an empty vector.
pub fn category_totals(expenses: &[Expense]) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = Vec::new();

    for expense in expenses {
        let label = CategoryLabel::Category(expense.category);

        match totals.iter_mut().find(|total| total.label == label) {
            Some(total) => {
                total.total += expense.amount;
                total.count += 1;
            }
            None => totals.push(CategoryTotal {
                label,
                total: expense.amount,
                count: 1,
                percentage: 0.0,
            }),
        }
    }

    let grand_total: f64 = totals.iter().map(|total| total.total).sum();

    for total in &mut totals {
        total.percentage = percentage_of(total.total, grand_total);
    }

    totals.sort_by(|a, b| b.total.total_cmp(&a.total));
    totals
}

/// Keeps the `n` largest categories and merges the rest into one
/// [CategoryLabel::Others] bucket.
///
/// `totals` must be sorted largest first, as returned by [category_totals].
/// No "Others" bucket is added when there are `n` or fewer categories.
pub fn top_categories(mut totals: Vec<CategoryTotal>, n: usize) -> Vec<CategoryTotal> {
    if totals.len() <= n {
        return totals;
    }

    let rest = totals.split_off(n);
    let others = rest.into_iter().fold(
        CategoryTotal {
            label: CategoryLabel::Others,
            total: 0.0,
            count: 0,
            percentage: 0.0,
        },
        |mut others, total| {
            others.total += total.total;
            others.count += total.count;
            others.percentage += total.percentage;
            others
        },
    );

    totals.push(others);
    totals
}

/// The expenses in one category.
#[derive(Debug, Clone, PartialEq)]
pub struct CategoryGroup<'a> {
    /// The category of every expense in the group.
    pub category: Category,
    /// The sum of the amounts.
    pub total: f64,
    /// The expenses, in the order they were given.
    pub expenses: Vec<&'a Expense>,
}

/// Groups expenses by category for listing.
///
/// # Returns
/// One group per category, largest total first.
pub fn group_by_category(expenses: &[Expense]) -> Vec<CategoryGroup<'_>> {
    let mut groups: Vec<CategoryGroup<'_>> = Vec::new();

    for expense in expenses {
        match groups
            .iter_mut()
            .find(|group| group.category == expense.category)
        {
            Some(group) => {
                group.total += expense.amount;
                group.expenses.push(expense);
            }
            None => groups.push(CategoryGroup {
                category: expense.category,
                total: expense.amount,
                expenses: vec![expense],
            }),
        }
    }

    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups
}

/// `part` as a percentage of `whole`, or zero if `whole` is zero.
pub(crate) fn percentage_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        0.0
    } else {
        part / whole * 100.0
    }
}
