//! Core expense domain types.

use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize};
use time::{
    Date, Month, OffsetDateTime, UtcOffset, format_description::BorrowedFormatItem,
    format_description::well_known::Rfc3339, macros::format_description,
};

use crate::Error;

/// Identifier for an expense.
///
/// New expenses get the Unix timestamp in milliseconds of when they were
/// created, see [ExpenseStore::create](crate::ExpenseStore::create).
pub type ExpenseId = i64;

// ============================================================================
// MODELS
// ============================================================================

/// A single recorded expense.
///
/// To create a new `Expense`, use [Expense::build].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: ExpenseId,
    /// What the money was spent on.
    pub title: Title,
    /// How much was spent. Always greater than zero.
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    /// The category the expense belongs to.
    #[serde(default, deserialize_with = "deserialize_category")]
    pub category: Category,
    /// When the expense happened.
    #[serde(with = "timestamp")]
    pub date: OffsetDateTime,
}

impl Expense {
    /// Create a new expense.
    ///
    /// Shortcut for [ExpenseBuilder] for discoverability.
    pub fn build(title: Title, amount: f64) -> ExpenseBuilder {
        ExpenseBuilder {
            title,
            amount,
            category: Category::default(),
            date: None,
        }
    }

    /// The same expense with its date expressed in `offset`.
    ///
    /// The moment the expense happened is unchanged, only the calendar day
    /// and month it falls on may move.
    pub fn to_offset(mut self, offset: UtcOffset) -> Self {
        self.date = self.date.to_offset(offset);
        self
    }

    /// The calendar day the expense happened on, in the offset of `date`.
    ///
    /// [ExpenseStore](crate::ExpenseStore) keeps every date in the local
    /// offset, so for stored expenses this is the local calendar day.
    pub fn calendar_date(&self) -> Date {
        self.date.date()
    }

    /// The calendar month the expense happened in, in the offset of `date`.
    pub fn month(&self) -> Month {
        self.date.month()
    }
}

/// A builder for creating [Expense] instances.
///
/// The ID and, unless set with [ExpenseBuilder::date], the date are assigned
/// when the builder is finalised by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseBuilder {
    /// What the money was spent on.
    pub title: Title,
    /// How much was spent.
    pub amount: f64,
    /// Defaults to [Category::General].
    pub category: Category,
    /// Defaults to the time the expense is created.
    pub date: Option<OffsetDateTime>,
}

impl ExpenseBuilder {
    /// Set the category for the expense.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the date for the expense.
    pub fn date(mut self, date: OffsetDateTime) -> Self {
        self.date = Some(date);
        self
    }

    /// Create the expense with `id`, using `now` if no date was set.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the amount is not greater than zero.
    pub fn finalize(self, id: ExpenseId, now: OffsetDateTime) -> Result<Expense, Error> {
        Ok(Expense {
            id,
            title: self.title,
            amount: validate_amount(self.amount)?,
            category: self.category,
            date: self.date.unwrap_or(now),
        })
    }
}

/// Replacement values for editing an existing expense.
///
/// Fields left as `None` keep their current value. The ID cannot be changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExpenseEdit {
    /// The new title.
    pub title: Option<Title>,
    /// The new amount.
    pub amount: Option<f64>,
    /// The new category.
    pub category: Option<Category>,
    /// The new date.
    pub date: Option<OffsetDateTime>,
}

impl ExpenseEdit {
    /// Apply the edit to a copy of `expense`.
    ///
    /// # Errors
    /// Returns [Error::InvalidAmount] if the new amount is not greater than zero.
    pub fn apply(self, expense: &Expense) -> Result<Expense, Error> {
        let amount = match self.amount {
            Some(amount) => validate_amount(amount)?,
            None => expense.amount,
        };

        Ok(Expense {
            id: expense.id,
            title: self.title.unwrap_or_else(|| expense.title.clone()),
            amount,
            category: self.category.unwrap_or(expense.category),
            date: self.date.unwrap_or(expense.date),
        })
    }
}

/// Check that `amount` is a finite number greater than zero.
///
/// # Errors
/// Returns [Error::InvalidAmount] otherwise.
pub fn validate_amount(amount: f64) -> Result<f64, Error> {
    if amount.is_finite() && amount > 0.0 {
        Ok(amount)
    } else {
        Err(Error::InvalidAmount(amount))
    }
}

fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let amount = f64::deserialize(deserializer)?;
    validate_amount(amount).map_err(serde::de::Error::custom)
}

// ============================================================================
// TITLE
// ============================================================================

/// A validated, non-empty expense title.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Title(String);

impl Title {
    /// Create a title.
    ///
    /// # Errors
    ///
    /// This function will return an [Error::EmptyTitle] if `title` is empty
    /// after trimming whitespace.
    pub fn new(title: &str) -> Result<Self, Error> {
        let title = title.trim();

        if title.is_empty() {
            Err(Error::EmptyTitle)
        } else {
            Ok(Self(title.to_string()))
        }
    }

    /// Create a title without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(title: &str) -> Self {
        Self(title.to_string())
    }
}

impl AsRef<str> for Title {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Title {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Title::new(s)
    }
}

impl TryFrom<String> for Title {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Title::new(&value)
    }
}

impl From<Title> for String {
    fn from(value: Title) -> Self {
        value.0
    }
}

impl Display for Title {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// CATEGORY
// ============================================================================

/// The fixed set of expense categories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub enum Category {
    /// Used when no category was given.
    #[default]
    General,
    /// Groceries, eating out.
    Food,
    /// Transport and trips.
    Travel,
    /// Rent, utilities, subscriptions.
    Bills,
    /// Clothes, gadgets, gifts.
    Shopping,
    /// Alcohol, tobacco and the like.
    Substances,
}

/// A label used by older versions of the app for [Category::Substances].
const LEGACY_SUBSTANCES_LABEL: &str = "Nashe";

impl Category {
    /// All categories, in the order they are offered to the user.
    pub const ALL: [Category; 6] = [
        Category::General,
        Category::Food,
        Category::Travel,
        Category::Bills,
        Category::Shopping,
        Category::Substances,
    ];

    /// The display label of the category.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::General => "General",
            Category::Food => "Food",
            Category::Travel => "Travel",
            Category::Bills => "Bills",
            Category::Shopping => "Shopping",
            Category::Substances => "Substances",
        }
    }

    /// Read a stored category label, falling back to [Category::General].
    ///
    /// Missing and empty labels are `General`. Unknown labels are also read as
    /// `General` so one odd record does not stop the rest from loading.
    pub fn normalize(label: Option<&str>) -> Category {
        let label = match label.map(str::trim) {
            None | Some("") => return Category::General,
            Some(label) => label,
        };

        label.parse().unwrap_or_else(|_| {
            tracing::warn!("Unknown category \"{label}\", using {}", Category::General);
            Category::General
        })
    }
}

impl FromStr for Category {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let label = s.trim();

        if label.eq_ignore_ascii_case(LEGACY_SUBSTANCES_LABEL) {
            return Ok(Category::Substances);
        }

        Category::ALL
            .into_iter()
            .find(|category| category.as_str().eq_ignore_ascii_case(label))
            .ok_or_else(|| Error::UnknownCategory(label.to_owned()))
    }
}

impl Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Category, D::Error>
where
    D: Deserializer<'de>,
{
    let label = Option::<String>::deserialize(deserializer)?;
    Ok(Category::normalize(label.as_deref()))
}

// ============================================================================
// DATES
// ============================================================================

const DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Parse an RFC 3339 timestamp or a bare `YYYY-MM-DD` date.
///
/// Bare dates are read as midnight in `offset`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is neither.
pub fn parse_timestamp(text: &str, offset: UtcOffset) -> Result<OffsetDateTime, Error> {
    let text = text.trim();

    if let Ok(timestamp) = OffsetDateTime::parse(text, &Rfc3339) {
        return Ok(timestamp);
    }

    Date::parse(text, DATE_FORMAT)
        .map(|date| date.midnight().assume_offset(offset))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

/// Serde helpers for storing timestamps as RFC 3339 strings.
///
/// Deserialising also accepts bare `YYYY-MM-DD` dates (midnight UTC).
mod timestamp {
    use serde::{Deserialize, Deserializer, Serializer};
    use time::{OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339};

    pub fn serialize<S>(date: &OffsetDateTime, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let text = date.format(&Rfc3339).map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&text)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<OffsetDateTime, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        super::parse_timestamp(&text, UtcOffset::UTC).map_err(serde::de::Error::custom)
    }
}
