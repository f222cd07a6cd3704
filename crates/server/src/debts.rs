//! Debt API endpoints

use api_types::debt::{DebtNew, DebtUpdate, DebtView, DebtsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, mapping, server::ServerState, user};
use ledger::{DebtDraft, DebtPatch};

fn draft_from(payload: DebtNew) -> DebtDraft {
    DebtDraft {
        name: payload.name,
        amount_cents: payload.amount_cents,
        remaining_cents: payload.remaining_cents,
        kind: mapping::debt_kind_from_api(payload.kind),
        interest_rate_bp: payload.interest_rate_bp,
        closing_date: payload.closing_date,
        due_date: payload.due_date,
        description: payload.description,
    }
}

fn patch_from(payload: DebtUpdate) -> DebtPatch {
    DebtPatch {
        name: payload.name,
        amount_cents: payload.amount_cents,
        remaining_cents: payload.remaining_cents,
        kind: payload.kind.map(mapping::debt_kind_from_api),
        interest_rate_bp: payload.interest_rate_bp.map(Some),
        closing_date: payload.closing_date.map(Some),
        due_date: payload.due_date,
        description: payload.description.map(Some),
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<DebtsResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(DebtsResponse {
        debts: store.debts().iter().map(mapping::debt_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<DebtNew>,
) -> Result<(StatusCode, Json<DebtView>), ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    match store.add_debt(draft_from(payload)).await? {
        Some(debt) => Ok((StatusCode::CREATED, Json(mapping::debt_view(&debt)))),
        None => Err(ServerError::Generic("no owner bound".to_string())),
    }
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<DebtUpdate>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.update_debt(&id, patch_from(payload)).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.delete_debt(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
