//! Bulk (re)load of the four collections.
//!
//! This is the only place collections are replaced wholesale. The four reads
//! are independent: a failing section keeps its previous rows and is flagged
//! in the [`FetchReport`] instead of discarding the sections that did load.
//! A fetch that was overtaken by an owner change applies nothing.

use sea_orm::{DatabaseConnection, QueryFilter, QueryOrder, prelude::*};

use crate::{
    LedgerError,
    accounts::{self, Account},
    debts::{self, Debt},
    expenses::{self, Expense},
    incomes::{self, Income},
};

use super::Ledger;

/// Result of loading one entity table.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SectionFetch {
    /// Collection replaced with this many rows.
    Loaded(usize),
    /// Read or decode failed; the previous rows were kept.
    Failed,
}

impl SectionFetch {
    #[must_use]
    pub fn is_loaded(self) -> bool {
        matches!(self, SectionFetch::Loaded(_))
    }
}

/// Per-section outcome of one fetch.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FetchReport {
    pub expenses: SectionFetch,
    pub incomes: SectionFetch,
    pub accounts: SectionFetch,
    pub debts: SectionFetch,
}

impl FetchReport {
    #[must_use]
    pub fn fully_loaded(&self) -> bool {
        self.expenses.is_loaded()
            && self.incomes.is_loaded()
            && self.accounts.is_loaded()
            && self.debts.is_loaded()
    }
}

/// Outcome of [`Ledger::fetch_data`] / [`Ledger::apply_snapshot`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied(FetchReport),
    /// Superseded by an owner change while the reads were in flight;
    /// nothing was applied.
    Stale,
    /// No owner bound; collections were cleared.
    SignedOut,
}

/// Rows read for one owner at one fetch generation.
#[derive(Debug)]
pub struct Snapshot {
    seq: u64,
    expenses: Result<Vec<Expense>, LedgerError>,
    incomes: Result<Vec<Income>, LedgerError>,
    accounts: Result<Vec<Account>, LedgerError>,
    debts: Result<Vec<Debt>, LedgerError>,
}

impl Ledger {
    /// Reloads all four collections for the current owner.
    ///
    /// With no owner bound this clears everything and reports
    /// [`FetchOutcome::SignedOut`]; the empty state is not a loading state.
    pub async fn fetch_data(&mut self) -> FetchOutcome {
        if self.owner.is_none() {
            self.clear_collections();
            self.loading = false;
            // Supersede any load still in flight for the previous owner.
            self.fetch_seq = self.fetch_seq.wrapping_add(1);
            return FetchOutcome::SignedOut;
        }

        self.loading = true;
        let snapshot = self.load_snapshot().await;
        self.apply_snapshot(snapshot)
    }

    /// Reads the four tables for the current owner without touching state.
    ///
    /// Expenses and incomes arrive newest-first, debts by ascending due
    /// date; accounts are unordered. Pair with [`Ledger::apply_snapshot`],
    /// which refuses the snapshot if the owner changed in between.
    pub async fn load_snapshot(&self) -> Snapshot {
        let seq = self.fetch_seq;
        let owner = self.owner.clone().unwrap_or_default();
        let db = &self.database;

        Snapshot {
            seq,
            expenses: load_expenses(db, &owner).await,
            incomes: load_incomes(db, &owner).await,
            accounts: load_accounts(db, &owner).await,
            debts: load_debts(db, &owner).await,
        }
    }

    /// Applies a snapshot section by section, unless it is stale.
    pub fn apply_snapshot(&mut self, snapshot: Snapshot) -> FetchOutcome {
        if snapshot.seq != self.fetch_seq {
            return FetchOutcome::Stale;
        }

        let report = FetchReport {
            expenses: apply_section("expenses", snapshot.expenses, &mut self.expenses),
            incomes: apply_section("incomes", snapshot.incomes, &mut self.incomes),
            accounts: apply_section("accounts", snapshot.accounts, &mut self.accounts),
            debts: apply_section("debts", snapshot.debts, &mut self.debts),
        };
        self.loading = false;
        FetchOutcome::Applied(report)
    }
}

fn apply_section<T>(
    label: &str,
    result: Result<Vec<T>, LedgerError>,
    slot: &mut Vec<T>,
) -> SectionFetch {
    match result {
        Ok(rows) => {
            let count = rows.len();
            *slot = rows;
            SectionFetch::Loaded(count)
        }
        Err(err) => {
            tracing::error!("failed to load {label}: {err}");
            SectionFetch::Failed
        }
    }
}

async fn load_expenses(
    db: &DatabaseConnection,
    owner: &str,
) -> Result<Vec<Expense>, LedgerError> {
    let rows = expenses::Entity::find()
        .filter(expenses::Column::UserId.eq(owner))
        .order_by_desc(expenses::Column::Date)
        .all(db)
        .await?;
    rows.into_iter().map(Expense::try_from).collect()
}

async fn load_incomes(db: &DatabaseConnection, owner: &str) -> Result<Vec<Income>, LedgerError> {
    let rows = incomes::Entity::find()
        .filter(incomes::Column::UserId.eq(owner))
        .order_by_desc(incomes::Column::Date)
        .all(db)
        .await?;
    Ok(rows.into_iter().map(Income::from).collect())
}

async fn load_accounts(
    db: &DatabaseConnection,
    owner: &str,
) -> Result<Vec<Account>, LedgerError> {
    let rows = accounts::Entity::find()
        .filter(accounts::Column::UserId.eq(owner))
        .all(db)
        .await?;
    rows.into_iter().map(Account::try_from).collect()
}

async fn load_debts(db: &DatabaseConnection, owner: &str) -> Result<Vec<Debt>, LedgerError> {
    let rows = debts::Entity::find()
        .filter(debts::Column::UserId.eq(owner))
        .order_by_asc(debts::Column::DueDate)
        .all(db)
        .await?;
    rows.into_iter().map(Debt::try_from).collect()
}
