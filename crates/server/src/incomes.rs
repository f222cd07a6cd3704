//! Income API endpoints

use api_types::income::{IncomeNew, IncomeView, IncomesResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, mapping, server::ServerState, user};
use ledger::IncomeDraft;

fn draft_from(payload: IncomeNew) -> IncomeDraft {
    IncomeDraft {
        amount_cents: payload.amount_cents,
        source: payload.source,
        date: payload.date,
        description: payload.description,
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<IncomesResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(IncomesResponse {
        incomes: store.incomes().iter().map(mapping::income_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<IncomeNew>,
) -> Result<(StatusCode, Json<IncomeView>), ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    match store.add_income(draft_from(payload)).await? {
        Some(income) => Ok((StatusCode::CREATED, Json(mapping::income_view(&income)))),
        None => Err(ServerError::Generic("no owner bound".to_string())),
    }
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<IncomeNew>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.edit_income(&id, draft_from(payload)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.delete_income(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
