//! Per-session finance state synchronized with the database.
//!
//! The entry point is [`Ledger`]: one instance per authenticated owner,
//! holding the expense/income/account/debt collections in memory and
//! mirroring every mutation to the store. Pure aggregation lives in
//! [`summary`]; the record modules pair each domain type with its database
//! entity.

pub use accounts::{Account, AccountDraft, AccountKind};
pub use categories::Category;
pub use debts::{Debt, DebtDraft, DebtKind, DebtPatch};
pub use error::LedgerError;
pub use expenses::{Expense, ExpenseDraft, Frequency};
pub use incomes::{Income, IncomeDraft};
pub use money::MoneyCents;
pub use ops::{FetchOutcome, FetchReport, Ledger, LedgerBuilder, SectionFetch, Snapshot};
pub use summary::{CategoryTotals, MonthlyBalance, SavingsSignal};

mod accounts;
mod categories;
mod debts;
mod error;
mod expenses;
mod incomes;
mod money;
mod ops;
pub mod summary;

type ResultLedger<T> = Result<T, LedgerError>;
