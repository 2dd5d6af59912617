use std::net::SocketAddr;
use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendra_api::{app, state::AppState};
use vendra_store::{
    DbClient, StoreAccountRepository, StoreAnalyticsRepository, StoreCardRepository,
    StoreOrderRepository, StoreUserRepository,
};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendra_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = vendra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting API on port {}", config.server.port);

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let app_state = AppState {
        users: Arc::new(StoreUserRepository::new(db.pool.clone())),
        accounts: Arc::new(StoreAccountRepository::new(db.pool.clone())),
        orders: Arc::new(StoreOrderRepository::new(db.pool.clone())),
        cards: Arc::new(StoreCardRepository::new(db.pool.clone())),
        analytics: Arc::new(StoreAnalyticsRepository::new(db.pool.clone())),
        health: Arc::new(db),
    };

    let app = app(app_state, &config.server.cors_origins);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind listener");
    axum::serve(listener, app).await.expect("Server error");
}
