//! Category registry endpoints.
//!
//! The registry itself is fixed; the mutating routes reclassify the caller's
//! expenses between fixed categories (see `ledger::ops::categories`).

use api_types::category::{CategoriesResponse, CategoryChanged, CategoryInfo, CategoryRename};
use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::{ServerError, mapping, server::ServerState, user};
use ledger::Category;

pub async fn list(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
) -> Result<Json<CategoriesResponse>, ServerError> {
    let store = state.ledger_for(&user.username).await;
    let store = store.read().await;

    let totals = store.category_totals();
    let categories = Category::all()
        .iter()
        .map(|category| CategoryInfo {
            category: mapping::category_to_api(*category),
            label: category.label().to_string(),
            color: category.color().to_string(),
            icon: category.icon().to_string(),
            total_cents: totals.get(*category),
            expense_count: store.category_expense_count(*category) as u64,
        })
        .collect();

    Ok(Json(CategoriesResponse { categories }))
}

pub async fn rename(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(category): Path<String>,
    Json(payload): Json<CategoryRename>,
) -> Result<Json<CategoryChanged>, ServerError> {
    let old = Category::try_from(category.as_str())?;
    let new = mapping::category_from_api(payload.new_category);

    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    let moved = store.rename_category(old, new).await?;
    Ok(Json(CategoryChanged { moved }))
}

pub async fn remove(
    Extension(user): Extension<user::Model>,
    State(state): State<ServerState>,
    Path(category): Path<String>,
) -> Result<Json<CategoryChanged>, ServerError> {
    let category = Category::try_from(category.as_str())?;

    let store = state.ledger_for(&user.username).await;
    let mut store = store.write().await;

    let moved = store.delete_category(category).await?;
    Ok(Json(CategoryChanged { moved }))
}
