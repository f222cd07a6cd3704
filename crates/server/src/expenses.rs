//! Expense API endpoints

use api_types::expense::{
    ExpenseNew, ExpenseView, ExpensesResponse, MaterializeRequest, MaterializeResponse,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;

use crate::{ServerError, mapping, server::ServerState, user};
use ledger::ExpenseDraft;

fn draft_from(payload: ExpenseNew) -> ExpenseDraft {
    ExpenseDraft {
        amount_cents: payload.amount_cents,
        category: mapping::category_from_api(payload.category),
        date: payload.date,
        description: payload.description,
        base_amount_cents: payload.base_amount_cents,
        is_recurring: payload.is_recurring,
        frequency: payload.frequency.map(mapping::frequency_from_api),
        next_due_date: payload.next_due_date,
        last_occurrence: None,
        parent_expense_id: None,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<ExpensesResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(ExpensesResponse {
        expenses: store.expenses().iter().map(mapping::expense_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<ExpenseNew>,
) -> Result<(StatusCode, Json<ExpenseView>), ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    match store.add_expense(draft_from(payload)).await? {
        Some(expense) => Ok((StatusCode::CREATED, Json(mapping::expense_view(&expense)))),
        None => Err(ServerError::Generic("no owner bound".to_string())),
    }
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<ExpenseNew>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.edit_expense(&id, draft_from(payload)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.delete_expense(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generates the instances every recurring template is due for.
pub async fn materialize(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<MaterializeRequest>,
) -> Result<Json<MaterializeResponse>, ServerError> {
    let as_of = payload.as_of.unwrap_or_else(|| Utc::now().date_naive());
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    let created = store.materialize_recurring(as_of).await?;
    Ok(Json(MaterializeResponse {
        created: created.iter().map(mapping::expense_view).collect(),
    }))
}
