use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use vendra_core::user::{NewUser, User};

use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub nickname: String,
    pub email: String,
    pub phone: Option<String>,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub nickname: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
struct LoginResponse {
    message: &'static str,
    user: User,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<Json<User>, ApiError> {
    if body.nickname.trim().is_empty() || body.password.is_empty() {
        return Err(ApiError::Validation(
            "nickname and password are required".to_string(),
        ));
    }

    if state.users.find_by_nickname(&body.nickname).await?.is_some() {
        return Err(ApiError::Conflict("nickname already taken".to_string()));
    }
    if state.users.find_by_email(&body.email).await?.is_some() {
        return Err(ApiError::Conflict("email already registered".to_string()));
    }

    let hashed_password = bcrypt::hash(&body.password, bcrypt::DEFAULT_COST)?;
    let user = state
        .users
        .create_user(NewUser {
            nickname: body.nickname,
            email: body.email,
            phone: body.phone,
            hashed_password,
        })
        .await?;

    tracing::info!(user_id = user.id, "user registered");
    Ok(Json(user))
}

async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    let user = state
        .users
        .find_by_nickname(&body.nickname)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("invalid credentials".to_string()))?;

    if !bcrypt::verify(&body.password, &user.hashed_password)? {
        return Err(ApiError::Unauthorized("invalid credentials".to_string()));
    }
    if !user.is_active {
        return Err(ApiError::Forbidden("account is not activated".to_string()));
    }

    Ok(Json(LoginResponse { message: "login successful", user }))
}
