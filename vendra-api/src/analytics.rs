use axum::{
    extract::{Query, State},
    routing::get,
    Extension, Json, Router,
};
use chrono::NaiveDate;
use serde::Deserialize;

use vendra_core::analytics::{DateRange, OrdersChart, ProductStat};
use vendra_core::time::msk_today;
use vendra_core::user::User;

use crate::middleware::auth::CurrentUser;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub date_from: NaiveDate,
    pub date_to: NaiveDate,
    pub wb_lk_ids: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AccountsQuery {
    pub wb_lk_ids: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analytics/orders-chart", get(orders_chart))
        .route("/analytics/stocks", get(total_stocks))
        .route("/analytics/products", get(product_stats))
}

/// Resolves the accounts the query may touch: the requested ids intersected
/// with what the caller can actually see. No filter means every accessible
/// account; an explicitly empty filter means none.
async fn resolve_account_ids(
    state: &AppState,
    user: &User,
    requested: Option<&str>,
) -> Result<Vec<i64>, ApiError> {
    let accessible: Vec<i64> = state
        .accounts
        .list_for_user(user.id)
        .await?
        .into_iter()
        .map(|access| access.account.id)
        .collect();

    match requested {
        None => Ok(accessible),
        Some(raw) => {
            let requested: Vec<i64> = raw
                .split(',')
                .filter(|part| !part.trim().is_empty())
                .map(|part| {
                    part.trim()
                        .parse()
                        .map_err(|_| ApiError::Validation(format!("bad account id: {part}")))
                })
                .collect::<Result<_, _>>()?;
            Ok(requested
                .into_iter()
                .filter(|id| accessible.contains(id))
                .collect())
        }
    }
}

fn clamped_range(date_from: NaiveDate, date_to: NaiveDate) -> Result<DateRange, ApiError> {
    if date_from > date_to {
        return Err(ApiError::Validation(
            "date_from must not be after date_to".to_string(),
        ));
    }
    Ok(DateRange { from: date_from, to: date_to }.clamp_to(msk_today()))
}

async fn orders_chart(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<OrdersChart>, ApiError> {
    let range = clamped_range(query.date_from, query.date_to)?;
    let account_ids = resolve_account_ids(&state, &user, query.wb_lk_ids.as_deref()).await?;
    Ok(Json(state.analytics.orders_chart(range, &account_ids).await?))
}

async fn total_stocks(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<AccountsQuery>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let account_ids = resolve_account_ids(&state, &user, query.wb_lk_ids.as_deref()).await?;
    let total = state.analytics.total_stocks(&account_ids).await?;
    Ok(Json(serde_json::json!({ "total_stocks": total })))
}

#[derive(Debug, serde::Serialize)]
struct ProductsResponse {
    products: Vec<ProductStat>,
}

async fn product_stats(
    State(state): State<AppState>,
    Extension(CurrentUser(user)): Extension<CurrentUser>,
    Query(query): Query<RangeQuery>,
) -> Result<Json<ProductsResponse>, ApiError> {
    let range = clamped_range(query.date_from, query.date_to)?;
    let account_ids = resolve_account_ids(&state, &user, query.wb_lk_ids.as_deref()).await?;
    let products = state.analytics.product_stats(range, &account_ids).await?;
    Ok(Json(ProductsResponse { products }))
}
