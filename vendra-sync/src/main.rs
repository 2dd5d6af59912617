use std::future::Future;
use std::sync::Arc;

use tokio::time::MissedTickBehavior;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use vendra_client::Hosts;
use vendra_core::repository::{
    AccountRepository, CardRepository, OrderRepository, StockRepository,
};
use vendra_core::time::msk_now;
use vendra_store::{
    DbClient, StoreAccountRepository, StoreCardRepository, StoreOrderRepository,
    StoreStockRepository,
};
use vendra_sync::cards::CardsSync;
use vendra_sync::jobs::{self, JobSpec, SyncOutcome};
use vendra_sync::orders::OrdersSync;
use vendra_sync::stocks::StocksSync;

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vendra_sync=info,vendra_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = vendra_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting sync scheduler");

    let db = DbClient::new(&config.database.url, config.database.max_connections)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");

    let accounts: Arc<dyn AccountRepository> =
        Arc::new(StoreAccountRepository::new(db.pool.clone()));
    let orders: Arc<dyn OrderRepository> = Arc::new(StoreOrderRepository::new(db.pool.clone()));
    let stocks: Arc<dyn StockRepository> = Arc::new(StoreStockRepository::new(db.pool.clone()));
    let cards: Arc<dyn CardRepository> = Arc::new(StoreCardRepository::new(db.pool.clone()));

    let hosts = Hosts::default();
    let orders_sync = Arc::new(OrdersSync::new(
        accounts.clone(),
        orders,
        hosts.clone(),
        config.sync.orders_window_days,
    ));
    let stocks_sync = Arc::new(StocksSync::new(accounts.clone(), stocks, hosts.clone()));
    let cards_sync = Arc::new(CardsSync::new(accounts, cards, hosts));

    let orders_task = tokio::spawn(run_job(jobs::orders_job(&config.sync), move || {
        let sync = orders_sync.clone();
        async move { sync.run().await }
    }));
    let stocks_task = tokio::spawn(run_job(jobs::stocks_job(&config.sync), move || {
        let sync = stocks_sync.clone();
        async move { sync.run().await }
    }));
    let cards_task = tokio::spawn(run_job(jobs::cards_job(&config.sync), move || {
        let sync = cards_sync.clone();
        async move { sync.run().await }
    }));

    let _ = tokio::join!(orders_task, stocks_task, cards_task);
}

async fn run_job<F, Fut>(spec: JobSpec, job: F)
where
    F: Fn() -> Fut,
    Fut: Future<Output = Result<SyncOutcome, Box<dyn std::error::Error + Send + Sync>>>,
{
    let mut ticker = tokio::time::interval(spec.interval);
    // Skip missed ticks instead of bursting after a long run.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;
        let key = spec.idempotency_key(msk_now());
        tracing::info!(job = spec.name, %key, "job run starting");

        match tokio::time::timeout(spec.timeout, job()).await {
            Ok(Ok(outcome)) => {
                tracing::info!(
                    job = spec.name,
                    %key,
                    accounts_ok = outcome.accounts_ok,
                    accounts_failed = outcome.accounts_failed,
                    rows_written = outcome.rows_written,
                    "job run finished"
                );
            }
            Ok(Err(err)) => {
                tracing::error!(job = spec.name, %key, %err, "job run aborted");
            }
            Err(_) => {
                tracing::error!(job = spec.name, %key, "job run timed out");
            }
        }
    }
}
