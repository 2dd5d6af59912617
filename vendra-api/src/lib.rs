use axum::{
    extract::State,
    http::{HeaderValue, Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod accounts;
pub mod admin;
pub mod analytics;
pub mod auth;
pub mod error;
pub mod middleware;
pub mod state;

pub use state::AppState;

pub fn app(state: AppState, cors_origins: &[String]) -> Router {
    let cors = cors_layer(cors_origins);

    let admin_routes = admin::routes()
        .route_layer(axum::middleware::from_fn(middleware::auth::require_staff));

    let protected = Router::new()
        .merge(accounts::routes())
        .merge(analytics::routes())
        .merge(admin_routes)
        .route_layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::identify_user,
        ));

    Router::new()
        .merge(auth::routes())
        .route("/health", get(health))
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
            axum::http::HeaderName::from_static("x-user-id"),
        ]);

    if origins.iter().any(|origin| origin == "*") {
        return base.allow_origin(Any);
    }
    let parsed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    base.allow_origin(AllowOrigin::list(parsed))
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    if state.health.ping().await {
        (
            StatusCode::OK,
            Json(serde_json::json!({ "status": "ok", "database": "up" })),
        )
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(serde_json::json!({ "status": "degraded", "database": "down" })),
        )
    }
}
