//! The finance store and its per-entity operations.
//!
//! A [`Ledger`] is built once per authenticated session. It keeps the four
//! collections in memory, mirrors every mutation to the database first, and
//! only patches the in-memory state after the remote call succeeded. State
//! is never rolled back: a failed call leaves the collections untouched and
//! returns the error.

use sea_orm::DatabaseConnection;

use crate::{
    Category, accounts::Account, debts::Debt, expenses::Expense, incomes::Income, summary,
    summary::{CategoryTotals, MonthlyBalance},
};

mod accounts;
mod categories;
mod debts;
mod expenses;
mod fetch;
mod incomes;

pub use fetch::{FetchOutcome, FetchReport, SectionFetch, Snapshot};

/// In-memory finance state for one owner, synchronized with the database.
#[derive(Debug)]
pub struct Ledger {
    owner: Option<String>,
    expenses: Vec<Expense>,
    incomes: Vec<Income>,
    accounts: Vec<Account>,
    debts: Vec<Debt>,
    loading: bool,
    fetch_seq: u64,
    database: DatabaseConnection,
}

impl Ledger {
    /// Return a builder for `Ledger`. Help to build the struct.
    pub fn builder() -> LedgerBuilder {
        LedgerBuilder::default()
    }

    /// The owner every remote operation is scoped to, when signed in.
    #[must_use]
    pub fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    /// Re-binds the owner identity.
    ///
    /// Bumping the fetch generation here is what invalidates a fetch that
    /// was still in flight for the previous owner: its snapshot will apply
    /// as [`FetchOutcome::Stale`].
    pub fn bind_owner(&mut self, owner: Option<String>) {
        if self.owner == owner {
            return;
        }
        self.owner = owner;
        self.fetch_seq = self.fetch_seq.wrapping_add(1);
    }

    /// `true` while a fetch is in flight; collections show the previous
    /// state until it completes.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn expenses(&self) -> &[Expense] {
        &self.expenses
    }

    #[must_use]
    pub fn incomes(&self) -> &[Income] {
        &self.incomes
    }

    #[must_use]
    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    #[must_use]
    pub fn debts(&self) -> &[Debt] {
        &self.debts
    }

    // Derived views; recomputed from the current collections on every call.

    #[must_use]
    pub fn total_expenses_cents(&self) -> i64 {
        summary::total_expenses_cents(&self.expenses)
    }

    #[must_use]
    pub fn total_income_cents(&self) -> i64 {
        summary::total_income_cents(&self.incomes)
    }

    #[must_use]
    pub fn total_balance_cents(&self) -> i64 {
        summary::total_balance_cents(&self.accounts)
    }

    #[must_use]
    pub fn category_totals(&self) -> CategoryTotals {
        CategoryTotals::from_expenses(&self.expenses)
    }

    #[must_use]
    pub fn category_expense_count(&self, category: Category) -> usize {
        summary::category_expense_count(&self.expenses, category)
    }

    #[must_use]
    pub fn monthly_balance(&self, year: i32, month: u32) -> MonthlyBalance {
        summary::monthly_balance(&self.expenses, &self.incomes, year, month)
    }

    #[must_use]
    pub fn most_urgent_debts(&self, today: chrono::NaiveDate, limit: usize) -> Vec<Debt> {
        summary::most_urgent_debts(&self.debts, today, limit)
    }

    #[must_use]
    pub fn recent_expenses(&self, limit: usize) -> Vec<Expense> {
        summary::recent_expenses(&self.expenses, limit)
    }

    pub(crate) fn clear_collections(&mut self) {
        self.expenses.clear();
        self.incomes.clear();
        self.accounts.clear();
        self.debts.clear();
    }
}

/// The builder for `Ledger`
#[derive(Default)]
pub struct LedgerBuilder {
    owner: Option<String>,
    database: DatabaseConnection,
}

impl LedgerBuilder {
    /// Bind the session owner; without one the store stays an empty shell
    /// whose mutations are soft no-ops.
    pub fn owner(mut self, owner: impl Into<String>) -> LedgerBuilder {
        self.owner = Some(owner.into());
        self
    }

    /// Pass the required database
    pub fn database(mut self, db: DatabaseConnection) -> LedgerBuilder {
        self.database = db;
        self
    }

    /// Construct `Ledger`. Collections start empty and `loading` starts
    /// `true`; call [`Ledger::fetch_data`] to populate them.
    pub fn build(self) -> Ledger {
        Ledger {
            owner: self.owner,
            expenses: Vec::new(),
            incomes: Vec::new(),
            accounts: Vec::new(),
            debts: Vec::new(),
            loading: true,
            fetch_seq: 0,
            database: self.database,
        }
    }
}
