//! Dashboard module
//!
//! Pure aggregations over a list of expenses: category totals, the monthly
//! series, the daily heatmap and the headline summary. Callers re-run these
//! whenever the expense list changes.

mod aggregation;
mod heatmap;
mod monthly;
mod summary;

pub use aggregation::{
    CategoryGroup, CategoryLabel, CategoryTotal, OTHERS_LABEL, TOP_CATEGORY_COUNT,
    category_totals, group_by_category, top_categories,
};
pub use heatmap::{
    DayBucket, HeatmapWindow, Intensity, MAX_TRAILING_DAYS, TRAILING_DAYS, daily_heatmap,
    heatmap_categories,
};
pub use monthly::{
    DEFAULT_MONTHLY_BUDGET, MonthBucket, MonthlyMetric, MonthlySeries, monthly_series,
};
pub use summary::{MonthOverMonth, Summary, month_over_month, summarize, summarize_month};
