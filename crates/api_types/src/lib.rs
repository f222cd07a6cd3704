use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Fixed expense category, as it crosses the wire.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Food,
    Transport,
    Home,
    Health,
    Shopping,
    Entertainment,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Bank,
    Cash,
    Credit,
    Savings,
    Other,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DebtKind {
    Loan,
    CreditCard,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    OneTime,
    Monthly,
    VariableMonthly,
}

pub mod expense {
    use super::*;

    /// Request body for creating or overwriting an expense.
    ///
    /// Amounts are integer cents. The recurrence fields are only meaningful
    /// when `is_recurring` is set; the server fills a missing cadence with a
    /// monthly one.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseNew {
        pub amount_cents: i64,
        pub category: Category,
        pub date: NaiveDate,
        pub description: String,
        #[serde(default)]
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        pub base_amount_cents: Option<i64>,
        pub next_due_date: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpenseView {
        pub id: String,
        pub amount_cents: i64,
        pub category: Category,
        pub date: NaiveDate,
        pub description: String,
        pub base_amount_cents: Option<i64>,
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        pub next_due_date: Option<NaiveDate>,
        pub last_occurrence: Option<NaiveDate>,
        pub parent_expense_id: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ExpensesResponse {
        pub expenses: Vec<ExpenseView>,
    }

    /// Request body for materializing recurring templates.
    ///
    /// `as_of` defaults to the server's current date.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct MaterializeRequest {
        pub as_of: Option<NaiveDate>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MaterializeResponse {
        pub created: Vec<ExpenseView>,
    }
}

pub mod income {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeNew {
        pub amount_cents: i64,
        pub source: String,
        pub date: NaiveDate,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomeView {
        pub id: String,
        pub amount_cents: i64,
        pub source: String,
        pub date: NaiveDate,
        pub description: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct IncomesResponse {
        pub incomes: Vec<IncomeView>,
    }
}

pub mod account {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountNew {
        pub name: String,
        pub balance_cents: i64,
        pub color: String,
        pub kind: AccountKind,
    }

    /// Balance-only partial update.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountBalanceUpdate {
        pub balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountView {
        pub id: String,
        pub name: String,
        pub balance_cents: i64,
        pub color: String,
        pub kind: AccountKind,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct AccountsResponse {
        pub accounts: Vec<AccountView>,
    }
}

pub mod debt {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtNew {
        pub name: String,
        pub amount_cents: i64,
        pub remaining_cents: i64,
        pub kind: DebtKind,
        /// Annual interest rate in basis points (550 = 5.50%).
        pub interest_rate_bp: Option<i64>,
        /// Statement closing date; credit cards only.
        pub closing_date: Option<NaiveDate>,
        pub due_date: NaiveDate,
        pub description: Option<String>,
    }

    /// Partial update; absent fields stay untouched.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct DebtUpdate {
        pub name: Option<String>,
        pub amount_cents: Option<i64>,
        pub remaining_cents: Option<i64>,
        pub kind: Option<DebtKind>,
        pub interest_rate_bp: Option<i64>,
        pub closing_date: Option<NaiveDate>,
        pub due_date: Option<NaiveDate>,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtView {
        pub id: String,
        pub name: String,
        pub amount_cents: i64,
        pub remaining_cents: i64,
        pub kind: DebtKind,
        pub interest_rate_bp: Option<i64>,
        pub closing_date: Option<NaiveDate>,
        pub due_date: NaiveDate,
        pub description: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct DebtsResponse {
        pub debts: Vec<DebtView>,
    }
}

pub mod category {
    use super::*;

    /// One registry entry with its usage numbers.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryInfo {
        pub category: Category,
        pub label: String,
        pub color: String,
        pub icon: String,
        pub total_cents: i64,
        pub expense_count: u64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoriesResponse {
        pub categories: Vec<CategoryInfo>,
    }

    /// Request body for moving every expense of one category into another.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryRename {
        pub new_category: Category,
    }

    /// How many expense rows a reclassification touched.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryChanged {
        pub moved: u64,
    }
}

pub mod stats {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum SavingsSignal {
        Overspending,
        LowSavings,
        OnTrack,
        GoodSavings,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Totals {
        pub total_expenses_cents: i64,
        pub total_income_cents: i64,
        pub total_balance_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct MonthlyBalanceView {
        pub year: i32,
        pub month: u32,
        pub income_cents: i64,
        pub expenses_cents: i64,
        pub balance_cents: i64,
        pub signal: SavingsSignal,
    }

    /// One category's slice of the expense breakdown.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryShare {
        pub category: Category,
        pub total_cents: i64,
        /// Share of total expenses in `[0, 100]`; 0 when there are none.
        pub percent: f64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BreakdownResponse {
        pub total_expenses_cents: i64,
        pub shares: Vec<CategoryShare>,
    }
}

pub mod refresh {
    use super::*;

    /// Outcome of one entity read during a refresh.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SectionStatus {
        pub loaded: bool,
        /// Row count when the section loaded.
        pub count: Option<u64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct RefreshResponse {
        pub expenses: SectionStatus,
        pub incomes: SectionStatus,
        pub accounts: SectionStatus,
        pub debts: SectionStatus,
    }
}
