//! Derived views over the in-memory collections.
//!
//! Everything here is a pure function of the slices it receives; the store
//! recomputes these on demand instead of maintaining running sums. "Today"
//! is always an argument so callers (and tests) control the clock.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::{Category, accounts::Account, debts::Debt, expenses::Expense, incomes::Income};

/// Sum of expense amounts.
#[must_use]
pub fn total_expenses_cents(expenses: &[Expense]) -> i64 {
    expenses.iter().map(|e| e.amount_cents).sum()
}

/// Sum of income amounts.
#[must_use]
pub fn total_income_cents(incomes: &[Income]) -> i64 {
    incomes.iter().map(|i| i.amount_cents).sum()
}

/// Signed sum of account balances; credit accounts in the red reduce it.
#[must_use]
pub fn total_balance_cents(accounts: &[Account]) -> i64 {
    accounts.iter().map(|a| a.balance_cents).sum()
}

/// Per-category expense totals, one slot per fixed category.
///
/// Categories without expenses stay at zero, so the result always has an
/// entry for every member of [`Category::ALL`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CategoryTotals([i64; Category::ALL.len()]);

impl CategoryTotals {
    /// Single pass over `expenses` with a per-category accumulator.
    #[must_use]
    pub fn from_expenses(expenses: &[Expense]) -> Self {
        let mut totals = [0i64; Category::ALL.len()];
        for expense in expenses {
            totals[expense.category.index()] += expense.amount_cents;
        }
        Self(totals)
    }

    #[must_use]
    pub fn get(&self, category: Category) -> i64 {
        self.0[category.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Category, i64)> + '_ {
        Category::ALL.iter().map(|c| (*c, self.0[c.index()]))
    }

    #[must_use]
    pub fn total_cents(&self) -> i64 {
        self.0.iter().sum()
    }

    /// Each category's share of the total as a percentage in `[0, 100]`.
    ///
    /// With a zero total every share is exactly `0.0` rather than NaN.
    #[must_use]
    pub fn shares(&self) -> Vec<(Category, f64)> {
        let total = self.total_cents();
        self.iter()
            .map(|(category, cents)| {
                let share = if total == 0 {
                    0.0
                } else {
                    cents as f64 / total as f64 * 100.0
                };
                (category, share)
            })
            .collect()
    }
}

/// Count of expenses in a given category.
#[must_use]
pub fn category_expense_count(expenses: &[Expense], category: Category) -> usize {
    expenses.iter().filter(|e| e.category == category).count()
}

/// Savings posture for a month, derived from income and balance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SavingsSignal {
    /// Spent more than earned.
    Overspending,
    /// Saved less than 10% of the month's income.
    LowSavings,
    /// Between 10% and 20%; nothing to flag.
    OnTrack,
    /// Saved at least 20% of the month's income.
    GoodSavings,
}

/// Income, expenses and balance for one calendar month.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyBalance {
    pub year: i32,
    pub month: u32,
    pub income_cents: i64,
    pub expenses_cents: i64,
}

impl MonthlyBalance {
    #[must_use]
    pub fn balance_cents(&self) -> i64 {
        self.income_cents - self.expenses_cents
    }

    /// Threshold classification of the balance against the month's income.
    ///
    /// Boundaries are inclusive exactly as the totals suggest: 10% of income
    /// saved is already on track, 20% is good. A month with neither income
    /// nor spending classifies as good savings.
    #[must_use]
    pub fn signal(&self) -> SavingsSignal {
        let balance = i128::from(self.balance_cents());
        let income = i128::from(self.income_cents);
        if balance < 0 {
            SavingsSignal::Overspending
        } else if balance * 10 < income {
            SavingsSignal::LowSavings
        } else if balance * 5 >= income {
            SavingsSignal::GoodSavings
        } else {
            SavingsSignal::OnTrack
        }
    }
}

fn in_month(date: NaiveDate, year: i32, month: u32) -> bool {
    date.year() == year && date.month() == month
}

/// Filters both sides to the given calendar month and sums them.
#[must_use]
pub fn monthly_balance(
    expenses: &[Expense],
    incomes: &[Income],
    year: i32,
    month: u32,
) -> MonthlyBalance {
    let expenses_cents = expenses
        .iter()
        .filter(|e| in_month(e.date, year, month))
        .map(|e| e.amount_cents)
        .sum();
    let income_cents = incomes
        .iter()
        .filter(|i| in_month(i.date, year, month))
        .map(|i| i.amount_cents)
        .sum();
    MonthlyBalance {
        year,
        month,
        income_cents,
        expenses_cents,
    }
}

/// Orders debts by urgency: overdue first, then soonest due date.
///
/// The sort is stable, so debts sharing an overdue status and a due date
/// keep their input order.
#[must_use]
pub fn sort_debts_by_urgency(debts: &[Debt], today: NaiveDate) -> Vec<Debt> {
    let mut sorted = debts.to_vec();
    sorted.sort_by_key(|d| (!d.is_overdue(today), d.due_date));
    sorted
}

/// The `limit` most urgent debts.
#[must_use]
pub fn most_urgent_debts(debts: &[Debt], today: NaiveDate, limit: usize) -> Vec<Debt> {
    let mut sorted = sort_debts_by_urgency(debts, today);
    sorted.truncate(limit);
    sorted
}

/// The `limit` most recent expenses by descending date (stable).
#[must_use]
pub fn recent_expenses(expenses: &[Expense], limit: usize) -> Vec<Expense> {
    let mut sorted = expenses.to_vec();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    sorted.truncate(limit);
    sorted
}
