//! The expense store: the canonical list of expenses and its persistence.

use serde_json::Value;
use time::{OffsetDateTime, UtcOffset};

use crate::{
    Error,
    currency::CurrencyCode,
    expense::{Expense, ExpenseBuilder, ExpenseId},
    stores::KeyValueStore,
};

/// The key the JSON encoded expenses are stored under.
pub const EXPENSES_KEY: &str = "expenses";
/// The key the selected currency code is stored under.
pub const CURRENCY_KEY: &str = "currency";

/// Owns the list of expenses, newest first, and writes it to a
/// [KeyValueStore] after every change.
///
/// Every date is kept in the local offset given to [ExpenseStore::load], so
/// calendar days and months read from the expenses are local ones no matter
/// which offset a date was written with.
///
/// Changes are applied in memory before they are written. If a write fails the
/// error is returned, and the in-memory list stays ahead of the stored one
/// until the next successful write.
#[derive(Debug, Clone)]
pub struct ExpenseStore<S> {
    backend: S,
    expenses: Vec<Expense>,
    local_offset: UtcOffset,
}

impl<S: KeyValueStore> ExpenseStore<S> {
    /// Load the stored expenses from `backend`, with their dates in `local_offset`.
    ///
    /// Never fails, see [load_expenses].
    pub fn load(backend: S, local_offset: UtcOffset) -> Self {
        let expenses = load_expenses(&backend)
            .into_iter()
            .map(|expense| expense.to_offset(local_offset))
            .collect();

        Self {
            backend,
            expenses,
            local_offset,
        }
    }

    /// The expenses, newest first.
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    /// Get the expense with `id`.
    pub fn get(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|expense| expense.id == id)
    }

    /// Add `expense` to the front of the list and save.
    ///
    /// # Errors
    /// Returns an error if the expenses could not be saved.
    pub fn add(&mut self, expense: Expense) -> Result<&[Expense], Error> {
        self.expenses.insert(0, expense.to_offset(self.local_offset));
        self.persist()?;

        Ok(&self.expenses)
    }

    /// Create an expense from `builder`, add it and save.
    ///
    /// The expense gets the timestamp of `now` in milliseconds as its ID, or
    /// one more than the largest existing ID if the clock has not moved on.
    /// Unless the builder sets a date, `now` is also used as the date.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is not greater than zero,
    /// - [Error::ExpenseIdOverflow] if the largest existing ID is already the largest possible ID,
    /// - or an error if the expenses could not be saved.
    pub fn create(
        &mut self,
        builder: ExpenseBuilder,
        now: OffsetDateTime,
    ) -> Result<Expense, Error> {
        let expense = builder
            .finalize(self.next_id(now)?, now)?
            .to_offset(self.local_offset);
        self.add(expense.clone())?;

        Ok(expense)
    }

    /// Remove the expense with `id` and save.
    ///
    /// Removing an expense that does not exist does nothing.
    ///
    /// # Errors
    /// Returns an error if the expenses could not be saved.
    pub fn remove(&mut self, id: ExpenseId) -> Result<&[Expense], Error> {
        let count_before = self.expenses.len();
        self.expenses.retain(|expense| expense.id != id);

        if self.expenses.len() == count_before {
            tracing::debug!("Tried to remove expense {id}, which does not exist");
        }

        self.persist()?;

        Ok(&self.expenses)
    }

    /// Replace the expense that has the same ID as `expense` and save.
    ///
    /// The expense keeps its position in the list. Updating an expense that
    /// does not exist does nothing.
    ///
    /// # Errors
    /// Returns an error if the expenses could not be saved.
    pub fn update(&mut self, expense: Expense) -> Result<&[Expense], Error> {
        match self
            .expenses
            .iter_mut()
            .find(|existing| existing.id == expense.id)
        {
            Some(existing) => *existing = expense.to_offset(self.local_offset),
            None => tracing::debug!("Tried to update expense {}, which does not exist", expense.id),
        }

        self.persist()?;

        Ok(&self.expenses)
    }

    /// The selected display currency.
    ///
    /// Falls back to the default currency if none has been selected or the
    /// stored code is not recognised.
    pub fn currency(&self) -> CurrencyCode {
        let code = match self.backend.get(CURRENCY_KEY) {
            Ok(Some(code)) => code,
            Ok(None) => return CurrencyCode::default(),
            Err(error) => {
                tracing::error!("Could not read the selected currency: {error}");
                return CurrencyCode::default();
            }
        };

        code.parse().unwrap_or_else(|error| {
            tracing::warn!("Ignoring stored currency: {error}");
            CurrencyCode::default()
        })
    }

    /// Select `currency` as the display currency and save it.
    ///
    /// # Errors
    /// Returns an error if the currency could not be saved.
    pub fn set_currency(&mut self, currency: CurrencyCode) -> Result<(), Error> {
        self.backend.set(CURRENCY_KEY, currency.code())
    }

    fn next_id(&self, now: OffsetDateTime) -> Result<ExpenseId, Error> {
        let timestamp = (now.unix_timestamp_nanos() / 1_000_000) as ExpenseId;

        match self.expenses.iter().map(|expense| expense.id).max() {
            Some(largest) if largest >= timestamp => {
                largest.checked_add(1).ok_or(Error::ExpenseIdOverflow)
            }
            _ => Ok(timestamp),
        }
    }

    fn persist(&mut self) -> Result<(), Error> {
        let json = serde_json::to_string(&self.expenses)
            .map_err(|error| Error::JSONSerializationError(error.to_string()))?;

        self.backend.set(EXPENSES_KEY, &json).inspect_err(|error| {
            tracing::error!("Could not save expenses: {error}");
        })
    }
}

/// Read the stored expenses from `backend`.
///
/// Returns an empty list if nothing is stored, the backend cannot be read or
/// the stored text is not a JSON array. Individual records that are not valid
/// expenses are skipped.
pub fn load_expenses(backend: &impl KeyValueStore) -> Vec<Expense> {
    match backend.get(EXPENSES_KEY) {
        Ok(Some(json)) => parse_expenses(&json),
        Ok(None) => Vec::new(),
        Err(error) => {
            tracing::error!("Could not read stored expenses: {error}");
            Vec::new()
        }
    }
}

/// Parse a JSON array of expenses, see [load_expenses].
pub fn parse_expenses(json: &str) -> Vec<Expense> {
    let records = match serde_json::from_str::<Vec<Value>>(json) {
        Ok(records) => records,
        Err(error) => {
            tracing::warn!("Stored expenses are not a JSON array, starting empty: {error}");
            return Vec::new();
        }
    };

    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(expense) => Some(expense),
            Err(error) => {
                tracing::warn!("Skipping stored expense #{index}: {error}");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use time::{
        Month, UtcOffset,
        macros::{date, datetime, offset},
    };

    use crate::{
        Error,
        currency::CurrencyCode,
        expense::{
            Category, Expense, Title, filter_by_month,
            store::{CURRENCY_KEY, EXPENSES_KEY, ExpenseStore, load_expenses, parse_expenses},
        },
        stores::{KeyValueStore, MemoryKeyValueStore},
    };

    fn expense(id: i64, title: &str, amount: f64) -> Expense {
        Expense::build(Title::new_unchecked(title), amount)
            .category(Category::Food)
            .finalize(id, datetime!(2024-01-05 9:00 UTC))
            .unwrap()
    }

    #[track_caller]
    fn assert_ids(expenses: &[Expense], want: &[i64]) {
        let got: Vec<i64> = expenses.iter().map(|expense| expense.id).collect();
        assert_eq!(got, want);
    }

    #[test]
    fn load_returns_empty_when_nothing_stored() {
        let store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);

        assert!(store.expenses().is_empty());
    }

    #[test]
    fn load_returns_empty_for_invalid_json() {
        let mut backend = MemoryKeyValueStore::new();
        backend.set(EXPENSES_KEY, "{not json").unwrap();

        assert!(load_expenses(&backend).is_empty());
    }

    #[test]
    fn load_returns_empty_when_not_an_array() {
        assert!(parse_expenses(r#"{"id": 1}"#).is_empty());
    }

    #[test]
    fn load_skips_invalid_records() {
        let json = r#"[
            {"id": 2, "title": "Coffee", "amount": 5, "category": "Food", "date": "2024-01-05"},
            {"id": 1, "title": "", "amount": 5, "date": "2024-01-04"},
            {"id": 0, "title": "Tea", "amount": 3, "date": "2024-01-03"}
        ]"#;

        let expenses = parse_expenses(json);

        assert_ids(&expenses, &[2, 0]);
        assert_eq!(expenses[1].category, Category::General);
    }

    #[test]
    fn add_prepends() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);

        store.add(expense(1, "Coffee", 5.0)).unwrap();
        let expenses = store.add(expense(2, "Rent", 1000.0)).unwrap();

        assert_ids(expenses, &[2, 1]);
    }

    #[test]
    fn add_persists_and_reloads_in_same_order() {
        let mut backend = MemoryKeyValueStore::new();
        let mut store = ExpenseStore::load(&mut backend, UtcOffset::UTC);
        store.add(expense(1, "Coffee", 5.0)).unwrap();
        store.add(expense(2, "Rent", 1000.0)).unwrap();
        let written = store.expenses().to_vec();

        let reloaded = ExpenseStore::load(&mut backend, UtcOffset::UTC);

        assert_eq!(reloaded.expenses(), written.as_slice());
    }

    #[test]
    fn create_assigns_timestamp_id_and_date() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        let now = datetime!(2024-01-05 9:00 UTC);

        let created = store
            .create(Expense::build(Title::new_unchecked("Coffee"), 5.0), now)
            .unwrap();

        assert_eq!(created.id, now.unix_timestamp() * 1000);
        assert_eq!(created.date, now);
        assert_eq!(store.expenses(), &[created]);
    }

    #[test]
    fn create_ids_increase_when_clock_does_not() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        let now = datetime!(2024-01-05 9:00 UTC);

        let first = store
            .create(Expense::build(Title::new_unchecked("Coffee"), 5.0), now)
            .unwrap();
        let second = store
            .create(Expense::build(Title::new_unchecked("Tea"), 3.0), now)
            .unwrap();

        assert_eq!(second.id, first.id + 1);
    }

    #[test]
    fn create_rejects_invalid_amount_without_saving() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);

        let result = store.create(
            Expense::build(Title::new_unchecked("Refund"), 0.0),
            datetime!(2024-01-05 9:00 UTC),
        );

        assert!(result.is_err());
        assert!(store.expenses().is_empty());
    }

    #[test]
    fn create_fails_when_ids_run_out() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        store.add(expense(i64::MAX, "Coffee", 5.0)).unwrap();

        let result = store.create(
            Expense::build(Title::new_unchecked("Tea"), 3.0),
            datetime!(2024-01-05 9:00 UTC),
        );

        assert_eq!(result, Err(Error::ExpenseIdOverflow));
        assert_ids(store.expenses(), &[i64::MAX]);
    }

    #[test]
    fn load_puts_dates_in_local_offset() {
        let mut backend = MemoryKeyValueStore::new();
        backend
            .set(
                EXPENSES_KEY,
                r#"[{"id": 1, "title": "Dinner", "amount": 500, "category": "Food", "date": "2024-01-31T20:00:00.000Z"}]"#,
            )
            .unwrap();

        let store = ExpenseStore::load(backend, offset!(+5:30));

        let dinner = &store.expenses()[0];
        assert_eq!(dinner.date, datetime!(2024-01-31 20:00 UTC));
        assert_eq!(dinner.calendar_date(), date!(2024 - 02 - 01));
        assert_eq!(filter_by_month(store.expenses(), Some(Month::February)).len(), 1);
        assert!(filter_by_month(store.expenses(), Some(Month::January)).is_empty());
    }

    #[test]
    fn add_and_update_put_dates_in_local_offset() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), offset!(-5));
        let late_night = datetime!(2024-03-01 2:00 UTC);

        store
            .add(
                Expense::build(Title::new_unchecked("Taxi"), 30.0)
                    .finalize(1, late_night)
                    .unwrap(),
            )
            .unwrap();
        assert_eq!(store.expenses()[0].calendar_date(), date!(2024 - 02 - 29));

        let edited = Expense::build(Title::new_unchecked("Taxi"), 35.0)
            .finalize(1, late_night)
            .unwrap();
        store.update(edited).unwrap();
        assert_eq!(store.expenses()[0].calendar_date(), date!(2024 - 02 - 29));
        assert_eq!(store.expenses()[0].amount, 35.0);
    }

    #[test]
    fn remove_deletes_expense() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        store.add(expense(1, "Coffee", 5.0)).unwrap();
        store.add(expense(2, "Rent", 1000.0)).unwrap();

        let expenses = store.remove(1).unwrap();

        assert_ids(expenses, &[2]);
    }

    #[test]
    fn remove_missing_id_is_noop() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        store.add(expense(1, "Coffee", 5.0)).unwrap();

        let expenses = store.remove(42).unwrap();

        assert_ids(expenses, &[1]);
    }

    #[test]
    fn update_replaces_in_place() {
        let mut backend = MemoryKeyValueStore::new();
        let mut store = ExpenseStore::load(&mut backend, UtcOffset::UTC);
        store.add(expense(1, "Coffee", 5.0)).unwrap();
        store.add(expense(2, "Rent", 1000.0)).unwrap();
        store.add(expense(3, "Snack", 3.0)).unwrap();

        let expenses = store.update(expense(2, "Rent (March)", 1100.0)).unwrap();

        assert_ids(expenses, &[3, 2, 1]);
        assert_eq!(expenses[1].amount, 1100.0);
        assert_eq!(expenses[1].title.as_ref(), "Rent (March)");
        let reloaded = load_expenses(&backend);
        assert_eq!(reloaded[1].amount, 1100.0);
    }

    #[test]
    fn update_missing_id_is_noop() {
        let mut store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);
        store.add(expense(1, "Coffee", 5.0)).unwrap();

        let expenses = store.update(expense(9, "Ghost", 1.0)).unwrap();

        assert_ids(expenses, &[1]);
        assert_eq!(expenses[0].title.as_ref(), "Coffee");
    }

    #[test]
    fn currency_defaults_to_rupee() {
        let store = ExpenseStore::load(MemoryKeyValueStore::new(), UtcOffset::UTC);

        assert_eq!(store.currency(), CurrencyCode::INR);
    }

    #[test]
    fn currency_ignores_unknown_code() {
        let mut backend = MemoryKeyValueStore::new();
        backend.set(CURRENCY_KEY, "DOGE").unwrap();

        let store = ExpenseStore::load(backend, UtcOffset::UTC);

        assert_eq!(store.currency(), CurrencyCode::INR);
    }

    #[test]
    fn set_currency_persists() {
        let mut backend = MemoryKeyValueStore::new();
        let mut store = ExpenseStore::load(&mut backend, UtcOffset::UTC);

        store.set_currency(CurrencyCode::GBP).unwrap();

        assert_eq!(store.currency(), CurrencyCode::GBP);
        assert_eq!(backend.get(CURRENCY_KEY), Ok(Some("GBP".to_owned())));
    }
}
