use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use vendra_core::user::User;

use crate::error::ApiError;
use crate::state::AppState;

/// The resolved caller, injected as a request extension by
/// [`identify_user`].
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Resolves the caller from the `X-User-ID` header. The user must exist and
/// be active; everything else is a 401 with the usual error body.
pub async fn identify_user(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let user_id: i64 = req
        .headers()
        .get("X-User-ID")
        .and_then(|h| h.to_str().ok())
        .and_then(|v| v.parse().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing or invalid X-User-ID header".into()))?;

    let user = state
        .users
        .get_user(user_id)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("unknown user".into()))?;

    if !user.is_active {
        return Err(ApiError::Unauthorized("account is not activated".into()));
    }

    req.extensions_mut().insert(CurrentUser(user));
    Ok(next.run(req).await)
}

/// Gate for the admin surface; runs after [`identify_user`].
pub async fn require_staff(req: Request, next: Next) -> Result<Response, ApiError> {
    let is_staff = req
        .extensions()
        .get::<CurrentUser>()
        .map(|current| current.0.is_staff)
        .unwrap_or(false);

    if !is_staff {
        return Err(ApiError::Forbidden("staff access required".into()));
    }
    Ok(next.run(req).await)
}
