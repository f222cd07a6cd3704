//! Conversions between ledger types and their wire counterparts.

use api_types::{
    account::AccountView, debt::DebtView, expense::ExpenseView, income::IncomeView, stats,
};
use ledger::{
    Account, AccountKind, Category, Debt, DebtKind, Expense, Frequency, Income, SavingsSignal,
};

pub fn category_to_api(category: Category) -> api_types::Category {
    match category {
        Category::Food => api_types::Category::Food,
        Category::Transport => api_types::Category::Transport,
        Category::Home => api_types::Category::Home,
        Category::Health => api_types::Category::Health,
        Category::Shopping => api_types::Category::Shopping,
        Category::Entertainment => api_types::Category::Entertainment,
        Category::Other => api_types::Category::Other,
    }
}

pub fn category_from_api(category: api_types::Category) -> Category {
    match category {
        api_types::Category::Food => Category::Food,
        api_types::Category::Transport => Category::Transport,
        api_types::Category::Home => Category::Home,
        api_types::Category::Health => Category::Health,
        api_types::Category::Shopping => Category::Shopping,
        api_types::Category::Entertainment => Category::Entertainment,
        api_types::Category::Other => Category::Other,
    }
}

pub fn frequency_to_api(frequency: Frequency) -> api_types::Frequency {
    match frequency {
        Frequency::OneTime => api_types::Frequency::OneTime,
        Frequency::Monthly => api_types::Frequency::Monthly,
        Frequency::VariableMonthly => api_types::Frequency::VariableMonthly,
    }
}

pub fn frequency_from_api(frequency: api_types::Frequency) -> Frequency {
    match frequency {
        api_types::Frequency::OneTime => Frequency::OneTime,
        api_types::Frequency::Monthly => Frequency::Monthly,
        api_types::Frequency::VariableMonthly => Frequency::VariableMonthly,
    }
}

pub fn account_kind_to_api(kind: AccountKind) -> api_types::AccountKind {
    match kind {
        AccountKind::Bank => api_types::AccountKind::Bank,
        AccountKind::Cash => api_types::AccountKind::Cash,
        AccountKind::Credit => api_types::AccountKind::Credit,
        AccountKind::Savings => api_types::AccountKind::Savings,
        AccountKind::Other => api_types::AccountKind::Other,
    }
}

pub fn account_kind_from_api(kind: api_types::AccountKind) -> AccountKind {
    match kind {
        api_types::AccountKind::Bank => AccountKind::Bank,
        api_types::AccountKind::Cash => AccountKind::Cash,
        api_types::AccountKind::Credit => AccountKind::Credit,
        api_types::AccountKind::Savings => AccountKind::Savings,
        api_types::AccountKind::Other => AccountKind::Other,
    }
}

pub fn debt_kind_to_api(kind: DebtKind) -> api_types::DebtKind {
    match kind {
        DebtKind::Loan => api_types::DebtKind::Loan,
        DebtKind::CreditCard => api_types::DebtKind::CreditCard,
    }
}

pub fn debt_kind_from_api(kind: api_types::DebtKind) -> DebtKind {
    match kind {
        api_types::DebtKind::Loan => DebtKind::Loan,
        api_types::DebtKind::CreditCard => DebtKind::CreditCard,
    }
}

pub fn signal_to_api(signal: SavingsSignal) -> stats::SavingsSignal {
    match signal {
        SavingsSignal::Overspending => stats::SavingsSignal::Overspending,
        SavingsSignal::LowSavings => stats::SavingsSignal::LowSavings,
        SavingsSignal::OnTrack => stats::SavingsSignal::OnTrack,
        SavingsSignal::GoodSavings => stats::SavingsSignal::GoodSavings,
    }
}

pub fn expense_view(expense: &Expense) -> ExpenseView {
    ExpenseView {
        id: expense.id.clone(),
        amount_cents: expense.amount_cents,
        category: category_to_api(expense.category),
        date: expense.date,
        description: expense.description.clone(),
        base_amount_cents: expense.base_amount_cents,
        is_recurring: expense.is_recurring,
        frequency: expense.frequency.map(frequency_to_api),
        next_due_date: expense.next_due_date,
        last_occurrence: expense.last_occurrence,
        parent_expense_id: expense.parent_expense_id.clone(),
    }
}

pub fn income_view(income: &Income) -> IncomeView {
    IncomeView {
        id: income.id.clone(),
        amount_cents: income.amount_cents,
        source: income.source.clone(),
        date: income.date,
        description: income.description.clone(),
    }
}

pub fn account_view(account: &Account) -> AccountView {
    AccountView {
        id: account.id.clone(),
        name: account.name.clone(),
        balance_cents: account.balance_cents,
        color: account.color.clone(),
        kind: account_kind_to_api(account.kind),
    }
}

pub fn debt_view(debt: &Debt) -> DebtView {
    DebtView {
        id: debt.id.clone(),
        name: debt.name.clone(),
        amount_cents: debt.amount_cents,
        remaining_cents: debt.remaining_cents,
        kind: debt_kind_to_api(debt.kind),
        interest_rate_bp: debt.interest_rate_bp,
        closing_date: debt.closing_date,
        due_date: debt.due_date,
        description: debt.description.clone(),
    }
}
