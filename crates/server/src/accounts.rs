//! Account API endpoints

use api_types::account::{AccountBalanceUpdate, AccountNew, AccountView, AccountsResponse};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};

use crate::{ServerError, mapping, server::ServerState, user};
use ledger::AccountDraft;

fn draft_from(payload: AccountNew) -> AccountDraft {
    AccountDraft {
        name: payload.name,
        balance_cents: payload.balance_cents,
        color: payload.color,
        kind: mapping::account_kind_from_api(payload.kind),
    }
}

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<AccountsResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    Ok(Json(AccountsResponse {
        accounts: store.accounts().iter().map(mapping::account_view).collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<AccountNew>,
) -> Result<(StatusCode, Json<AccountView>), ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    match store.add_account(draft_from(payload)).await? {
        Some(account) => Ok((StatusCode::CREATED, Json(mapping::account_view(&account)))),
        None => Err(ServerError::Generic("no owner bound".to_string())),
    }
}

pub async fn update(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AccountNew>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.edit_account(&id, draft_from(payload)).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Balance-only partial update.
pub async fn update_balance(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(payload): Json<AccountBalanceUpdate>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store
        .update_account_balance(&id, payload.balance_cents)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    store.delete_account(&id).await?;
    Ok(StatusCode::NO_CONTENT)
}
