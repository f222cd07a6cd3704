//! Statistics API endpoints

use api_types::stats::{BreakdownResponse, CategoryShare, MonthlyBalanceView, Totals};
use api_types::{debt::DebtsResponse, expense::ExpensesResponse};
use axum::{
    Extension, Json,
    extract::{Query, State},
};
use chrono::{Datelike, NaiveDate, Utc};
use serde::Deserialize;

use crate::{ServerError, mapping, server::ServerState, user};

/// Handle requests for the top-level totals.
pub async fn totals(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Totals>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(Totals {
        total_expenses_cents: store.total_expenses_cents(),
        total_income_cents: store.total_income_cents(),
        total_balance_cents: store.total_balance_cents(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct MonthlyQuery {
    pub year: Option<i32>,
    pub month: Option<u32>,
}

/// Income vs. expenses for one calendar month, with the savings signal.
///
/// Defaults to the current month.
pub async fn monthly(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<MonthlyQuery>,
) -> Result<Json<MonthlyBalanceView>, ServerError> {
    let today = Utc::now().date_naive();
    let year = query.year.unwrap_or_else(|| today.year());
    let month = query.month.unwrap_or_else(|| today.month());
    if !(1..=12).contains(&month) {
        return Err(ServerError::Generic(format!("invalid month: {month}")));
    }

    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    let balance = store.monthly_balance(year, month);
    Ok(Json(MonthlyBalanceView {
        year: balance.year,
        month: balance.month,
        income_cents: balance.income_cents,
        expenses_cents: balance.expenses_cents,
        balance_cents: balance.balance_cents(),
        signal: mapping::signal_to_api(balance.signal()),
    }))
}

/// Per-category expense breakdown with percentages.
pub async fn breakdown(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<BreakdownResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    let totals = store.category_totals();
    let shares = totals
        .shares()
        .into_iter()
        .map(|(category, percent)| CategoryShare {
            category: mapping::category_to_api(category),
            total_cents: totals.get(category),
            percent,
        })
        .collect();

    Ok(Json(BreakdownResponse {
        total_expenses_cents: totals.total_cents(),
        shares,
    }))
}

#[derive(Debug, Deserialize)]
pub struct UrgentDebtsQuery {
    /// Reference date for the overdue check; defaults to today.
    pub today: Option<NaiveDate>,
    pub limit: Option<usize>,
}

/// The most urgent debts: overdue first, then soonest due date.
pub async fn urgent_debts(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<UrgentDebtsQuery>,
) -> Result<Json<DebtsResponse>, ServerError> {
    let today = query.today.unwrap_or_else(|| Utc::now().date_naive());
    let limit = query.limit.unwrap_or(5);

    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(DebtsResponse {
        debts: store
            .most_urgent_debts(today, limit)
            .iter()
            .map(mapping::debt_view)
            .collect(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct RecentExpensesQuery {
    pub limit: Option<usize>,
}

/// The most recent expenses by descending date.
pub async fn recent_expenses(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Query(query): Query<RecentExpensesQuery>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let limit = query.limit.unwrap_or(5);

    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(ExpensesResponse {
        expenses: store
            .recent_expenses(limit)
            .iter()
            .map(mapping::expense_view)
            .collect(),
    }))
}
