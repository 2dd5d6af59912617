use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, put},
    Json, Router,
};
use serde::Deserialize;

use vendra_core::account::SellerAccount;
use vendra_core::card::ProductCard;
use vendra_core::order::OrderRecord;
use vendra_core::user::User;

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct CardActiveRequest {
    pub account_id: i64,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

impl PageQuery {
    /// Postgres rejects negative LIMIT/OFFSET, so clamp instead of 500ing.
    fn clamped(&self) -> (i64, i64) {
        (self.limit.max(0), self.offset.max(0))
    }
}

#[derive(Debug, Deserialize)]
pub struct CardsQuery {
    pub account_id: Option<i64>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/users", get(list_users))
        .route("/admin/users/{id}", delete(delete_user))
        .route("/admin/users/{id}/active", put(set_user_active))
        .route("/admin/accounts", get(list_accounts))
        .route("/admin/accounts/{id}", delete(delete_account))
        .route("/admin/cards", get(list_cards))
        .route("/admin/cards/{nm_id}/active", put(set_card_active))
        .route("/admin/orders", get(list_orders))
}

async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<User>>, ApiError> {
    Ok(Json(state.users.list_users().await?))
}

async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
    state.users.delete_user(id).await?;
    tracing::info!(user_id = id, "user deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn set_user_active(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(body): Json<SetActiveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .users
        .get_user(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;
    state.users.set_active(id, body.is_active).await?;
    tracing::info!(user_id = id, is_active = body.is_active, "user activation changed");
    Ok(Json(serde_json::json!({ "id": id, "is_active": body.is_active })))
}

async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<SellerAccount>>, ApiError> {
    Ok(Json(state.accounts.list_all().await?))
}

async fn delete_account(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .accounts
        .get_account(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("account not found".to_string()))?;
    state.accounts.delete_account(id).await?;
    tracing::info!(account_id = id, "seller account deleted");
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn list_cards(
    State(state): State<AppState>,
    Query(query): Query<CardsQuery>,
) -> Result<Json<Vec<ProductCard>>, ApiError> {
    Ok(Json(state.cards.list_cards(query.account_id).await?))
}

async fn set_card_active(
    State(state): State<AppState>,
    Path(nm_id): Path<i64>,
    Json(body): Json<CardActiveRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    state
        .cards
        .set_card_active(body.account_id, nm_id, body.is_active)
        .await?;
    Ok(Json(serde_json::json!({ "nm_id": nm_id, "is_active": body.is_active })))
}

async fn list_orders(
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
) -> Result<Json<Vec<OrderRecord>>, ApiError> {
    let (limit, offset) = page.clamped();
    Ok(Json(state.orders.list_recent(limit, offset).await?))
}
