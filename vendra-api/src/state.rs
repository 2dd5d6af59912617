use std::sync::Arc;

use async_trait::async_trait;

use vendra_core::repository::{
    AccountRepository, AnalyticsRepository, CardRepository, OrderRepository, UserRepository,
};
use vendra_store::DbClient;

/// Liveness probe the health endpoint calls into.
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn ping(&self) -> bool;
}

#[async_trait]
impl HealthProbe for DbClient {
    async fn ping(&self) -> bool {
        DbClient::ping(self).await
    }
}

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserRepository>,
    pub accounts: Arc<dyn AccountRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub cards: Arc<dyn CardRepository>,
    pub analytics: Arc<dyn AnalyticsRepository>,
    pub health: Arc<dyn HealthProbe>,
}
