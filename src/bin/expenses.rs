use std::{
    path::PathBuf,
    process::ExitCode,
    sync::{Arc, Mutex},
};

use clap::{Parser, Subcommand, ValueEnum};
use rusqlite::Connection;

use expense_tracker::{
    Category, Config, CurrencyCode, DEFAULT_DB_PATH, DEFAULT_EXPORT_FILE,
    DEFAULT_TIMEZONE, Error, Expense, ExpenseStore,
    dashboard::{
        DEFAULT_MONTHLY_BUDGET, DayBucket, HeatmapWindow, Intensity, MAX_TRAILING_DAYS,
        MonthlyMetric, TOP_CATEGORY_COUNT, TRAILING_DAYS, category_totals, daily_heatmap,
        group_by_category, heatmap_categories, monthly_series, summarize_month, top_categories,
    },
    export_csv,
    expense::{
        ExpenseEdit, ExpenseId, SortKey, Title, filter_by_month, month_from_number,
        parse_timestamp, sort_expenses,
    },
    format_currency, initialize_db, setup_logging,
    stores::SQLiteKeyValueStore,
};

/// Track expenses and see where the money goes.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to the SQLite database.
    #[arg(long, default_value = DEFAULT_DB_PATH)]
    db_path: PathBuf,

    /// Canonical name of the local timezone, e.g. "Pacific/Auckland".
    #[arg(long, default_value = DEFAULT_TIMEZONE)]
    timezone: String,

    /// Also write debug logs to this file.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Monthly budget, months that go over are flagged.
    #[arg(long, default_value_t = DEFAULT_MONTHLY_BUDGET)]
    budget: f64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new expense.
    Add {
        /// What the money was spent on.
        #[arg(long)]
        title: String,
        /// How much was spent.
        #[arg(long)]
        amount: f64,
        /// One of General, Food, Travel, Bills, Shopping or Substances.
        #[arg(long)]
        category: Option<Category>,
        /// YYYY-MM-DD or an RFC 3339 timestamp, defaults to now.
        #[arg(long)]
        date: Option<String>,
    },
    /// Change an existing expense.
    Edit {
        /// The ID shown by `list`.
        id: ExpenseId,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        amount: Option<f64>,
        #[arg(long)]
        category: Option<Category>,
        #[arg(long)]
        date: Option<String>,
    },
    /// Delete an expense.
    Delete {
        /// The ID shown by `list`.
        id: ExpenseId,
    },
    /// List expenses.
    List {
        /// Only show expenses from this month (1 to 12) of any year.
        #[arg(long)]
        month: Option<u8>,
        #[arg(long, value_enum, default_value_t)]
        sort: SortArg,
        /// Group the list by category.
        #[arg(long)]
        by_category: bool,
    },
    /// Show headline statistics and category totals.
    Summary {
        /// Only count expenses from this month (1 to 12) of any year.
        #[arg(long)]
        month: Option<u8>,
    },
    /// Show totals for each month.
    Monthly {
        /// Only count expenses from this year. All years are merged otherwise.
        #[arg(long)]
        year: Option<i32>,
        /// The number to average over months with spending.
        #[arg(long, value_enum, default_value_t)]
        metric: MetricArg,
    },
    /// Show spending per day.
    Heatmap {
        #[arg(long, value_enum, default_value_t)]
        window: WindowArg,
        /// Days before today to include in a trailing window.
        #[arg(
            long,
            default_value_t = TRAILING_DAYS,
            value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_TRAILING_DAYS)),
        )]
        days: u32,
        /// Only count expenses in this category.
        #[arg(long)]
        category: Option<Category>,
    },
    /// Write all expenses to a CSV file.
    Export {
        #[arg(long, default_value = DEFAULT_EXPORT_FILE)]
        output: PathBuf,
    },
    /// Show or set the display currency.
    Currency {
        /// One of INR, USD, EUR, GBP or JPY.
        code: Option<CurrencyCode>,
    },
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum SortArg {
    #[default]
    Date,
    Amount,
}

impl From<SortArg> for SortKey {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Date => SortKey::Date,
            SortArg::Amount => SortKey::Amount,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum MetricArg {
    #[default]
    Total,
    Count,
}

impl From<MetricArg> for MonthlyMetric {
    fn from(value: MetricArg) -> Self {
        match value {
            MetricArg::Total => MonthlyMetric::Total,
            MetricArg::Count => MonthlyMetric::Count,
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, Default)]
enum WindowArg {
    /// Every day of the current month.
    Month,
    /// A number of days up to today.
    #[default]
    Trailing,
}

fn main() -> ExitCode {
    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            let (message, fix) = error.into_message();
            eprintln!("{message}: {fix}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), Error> {
    let config = Config::new(args.db_path, &args.timezone, args.budget, args.log_file)?;
    setup_logging(config.log_file.as_deref())?;
    tracing::debug!(
        "Using timezone {} (UTC{})",
        config.timezone,
        config.local_offset
    );

    let connection = Connection::open(&config.db_path)?;
    initialize_db(&connection)?;
    let backend = SQLiteKeyValueStore::new(Arc::new(Mutex::new(connection)));
    let mut store = ExpenseStore::load(backend, config.local_offset);
    tracing::debug!(
        "Loaded {} expenses from {:?}",
        store.expenses().len(),
        config.db_path
    );

    let currency = store.currency();

    match args.command {
        Command::Add {
            title,
            amount,
            category,
            date,
        } => {
            let mut builder =
                Expense::build(Title::new(&title)?, amount).category(category.unwrap_or_default());

            if let Some(date) = date {
                builder = builder.date(parse_timestamp(&date, config.local_offset)?);
            }

            let expense = store.create(builder, config.now())?;
            println!(
                "Added {} ({}) with ID {}",
                expense.title,
                format_currency(expense.amount, currency),
                expense.id
            );
        }
        Command::Edit {
            id,
            title,
            amount,
            category,
            date,
        } => {
            let existing = store.get(id).cloned().ok_or(Error::MissingExpense(id))?;

            let edit = ExpenseEdit {
                title: title.as_deref().map(Title::new).transpose()?,
                amount,
                category,
                date: date
                    .as_deref()
                    .map(|date| parse_timestamp(date, config.local_offset))
                    .transpose()?,
            };

            store.update(edit.apply(&existing)?)?;
            println!("Updated expense {id}");
        }
        Command::Delete { id } => {
            if store.get(id).is_none() {
                return Err(Error::MissingExpense(id));
            }

            store.remove(id)?;
            println!("Deleted expense {id}");
        }
        Command::List {
            month,
            sort,
            by_category,
        } => {
            let month = month.map(month_from_number).transpose()?;
            let expenses = sort_expenses(&filter_by_month(store.expenses(), month), sort.into());

            if expenses.is_empty() {
                println!("No expenses");
            } else if by_category {
                for group in group_by_category(&expenses) {
                    println!(
                        "{} ({})",
                        group.category,
                        format_currency(group.total, currency)
                    );

                    for expense in group.expenses {
                        print_expense(expense, currency);
                    }
                }
            } else {
                for expense in &expenses {
                    print_expense(expense, currency);
                }
            }
        }
        Command::Summary { month } => {
            let month = month.map(month_from_number).transpose()?;
            let expenses = filter_by_month(store.expenses(), month);

            let Some(summary) = summarize_month(store.expenses(), month, config.today()) else {
                println!("No expenses");
                return Ok(());
            };

            let change = &summary.month_over_month;
            let percent_change = match change.percent_change {
                Some(percent) => format!("{percent:+.1}%"),
                None => "N/A".to_owned(),
            };

            println!("Total:              {}", format_currency(summary.total, currency));
            println!(
                "Average per day:    {}",
                format_currency(summary.average_daily, currency)
            );
            println!(
                "Top category:       {} ({})",
                summary.top_category.0,
                format_currency(summary.top_category.1, currency)
            );
            println!(
                "Most expensive day: {} ({})",
                summary.most_expensive_day.0,
                format_currency(summary.most_expensive_day.1, currency)
            );
            println!(
                "This month:         {} ({} vs last month, {percent_change})",
                format_currency(change.current, currency),
                format_currency(change.delta, currency),
            );
            println!();

            for total in top_categories(category_totals(&expenses), TOP_CATEGORY_COUNT) {
                println!(
                    "{:<12} {:>16} {:>5.1}% ({} expenses)",
                    total.label.to_string(),
                    format_currency(total.total, currency),
                    total.percentage,
                    total.count
                );
            }
        }
        Command::Monthly { year, metric } => {
            let series = monthly_series(store.expenses(), year);

            for bucket in series.months() {
                let over_budget = if bucket.total > config.budget {
                    " over budget"
                } else {
                    ""
                };

                println!(
                    "{} {:>16} {:>4} {:>16} {:>+8.1}%{over_budget}",
                    bucket.label(),
                    format_currency(bucket.total, currency),
                    bucket.count,
                    format_currency(bucket.cumulative, currency),
                    bucket.change,
                );
            }

            let metric = MonthlyMetric::from(metric);
            let average = series.average(metric);
            match metric {
                MonthlyMetric::Total => {
                    println!("Monthly average: {}", format_currency(average, currency))
                }
                MonthlyMetric::Count => println!("Monthly average: {average:.1} expenses"),
            }
            println!(
                "Budget: {}, exceeded in {} month(s)",
                format_currency(config.budget, currency),
                series.months_over_budget(config.budget).len()
            );
        }
        Command::Heatmap {
            window,
            days,
            category,
        } => {
            let window = match window {
                WindowArg::Month => HeatmapWindow::CurrentMonth,
                WindowArg::Trailing => HeatmapWindow::Trailing(days),
            };

            let categories: Vec<&str> = heatmap_categories(store.expenses())
                .into_iter()
                .map(Category::as_str)
                .collect();
            println!("Categories: All, {}", categories.join(", "));

            let buckets = daily_heatmap(store.expenses(), window, config.today(), category);
            print_heatmap(&buckets);
        }
        Command::Export { output } => {
            let csv = export_csv(store.expenses())?;
            std::fs::write(&output, csv)?;
            println!(
                "Wrote {} expenses to {}",
                store.expenses().len(),
                output.display()
            );
        }
        Command::Currency { code } => match code {
            Some(code) => {
                store.set_currency(code)?;
                println!("Currency set to {code} ({})", code.symbol());
            }
            None => {
                let codes: Vec<&str> = CurrencyCode::ALL.iter().map(|code| code.code()).collect();
                println!("Currency: {currency} ({})", currency.symbol());
                println!("Available: {}", codes.join(", "));
            }
        },
    }

    Ok(())
}

fn print_expense(expense: &Expense, currency: CurrencyCode) {
    println!(
        "{:>14}  {}  {:<10} {:>16}  {}",
        expense.id,
        expense.calendar_date(),
        expense.category.as_str(),
        format_currency(expense.amount, currency),
        expense.title
    );
}

/// Prints one row per week, one cell per day.
fn print_heatmap(buckets: &[DayBucket]) {
    for week in buckets.chunks(7) {
        let cells: String = week
            .iter()
            .map(|bucket| match bucket.intensity {
                Intensity::Empty => '.',
                Intensity::Low => '░',
                Intensity::Medium => '▒',
                Intensity::High => '▓',
                Intensity::VeryHigh => '█',
            })
            .collect();

        if let Some(first) = week.first() {
            println!("{} {cells}", first.date);
        }
    }

    println!("Less . ░ ▒ ▓ █ More");
}
