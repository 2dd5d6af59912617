use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Extension, Json, Router,
};
use serde::Deserialize;

use vendra_core::account::{AccountAccess, NewSellerAccount, SellerAccount};
use vendra_core::user::User;

use crate::middleware::auth::CurrentUser;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CreateAccountRequest {
    pub name: String,
    pub token: String,
    pub number: Option<i64>,
    pub inn: Option<i64>,
    pub tg_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct ShareRequest {
    pub user_id: i64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/wb-lk", get(list_accounts).post(create_account))
        .route("/wb-lk/{id}", delete(delete_account))
        .route("/wb-lk/{id}/share", post(share_account))
        .route("/wb-lk/{id}/users", get(list_account_users))
        .route("/wb-lk/{id}/unshare/{user_id}", delete(unshare_account))
}

/// Loads the account and checks the caller owns it. Non-owners get a 403
/// even when they hold a share; sharing is read access only.
async fn owned_account(
    state: &AppState,
    id: i64,
    caller: &User,
) -> Result<SellerAccount, ApiError> {
    let account = state
        .accounts
        .get_account(id)
        .await?
        .ok_or_else(|| ApiError::NotFound("account not found".to_string()))?;
    if account.owner_id != caller.id {
        return Err(ApiError::Forbidden(
            "only the owner can manage this account".to_string(),
        ));
    }
    Ok(account)
}

async fn list_accounts(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
) -> Result<Json<Vec<AccountAccess>>, ApiError> {
    Ok(Json(state.accounts.list_for_user(user.id).await?))
}

async fn create_account(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Json(body): Json<CreateAccountRequest>,
) -> Result<Json<SellerAccount>, ApiError> {
    if body.name.trim().is_empty() || body.token.trim().is_empty() {
        return Err(ApiError::Validation("name and token are required".to_string()));
    }

    let account = state
        .accounts
        .create_account(NewSellerAccount {
            name: body.name,
            token: body.token,
            number: body.number,
            inn: body.inn,
            tg_id: body.tg_id,
            owner_id: user.id,
        })
        .await?;

    tracing::info!(account_id = account.id, owner_id = user.id, "seller account created");
    Ok(Json(account))
}

async fn delete_account(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_account(&state, id, &user).await?;
    state.accounts.delete_account(id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}

async fn share_account(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
    Json(body): Json<ShareRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_account(&state, id, &user).await?;

    if body.user_id == user.id {
        return Err(ApiError::Conflict(
            "owner already has access".to_string(),
        ));
    }
    let target = state
        .users
        .get_user(body.user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("user not found".to_string()))?;

    let already_shared = state
        .accounts
        .list_users_with_access(id)
        .await?
        .iter()
        .any(|u| u.id == target.id);
    if already_shared {
        return Err(ApiError::Conflict("access already granted".to_string()));
    }

    state.accounts.share(id, target.id).await?;
    tracing::info!(account_id = id, user_id = target.id, "account shared");
    Ok(Json(serde_json::json!({ "shared_with": target.id })))
}

async fn list_account_users(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<User>>, ApiError> {
    owned_account(&state, id, &user).await?;
    Ok(Json(state.accounts.list_users_with_access(id).await?))
}

async fn unshare_account(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Path((id, user_id)): Path<(i64, i64)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    owned_account(&state, id, &user).await?;
    state.accounts.unshare(id, user_id).await?;
    tracing::info!(account_id = id, user_id, "account share revoked");
    Ok(Json(serde_json::json!({ "unshared": user_id })))
}
