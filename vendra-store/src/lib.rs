pub mod account_repo;
pub mod analytics_repo;
pub mod app_config;
pub mod card_repo;
pub mod database;
pub mod order_repo;
pub mod stock_repo;
pub mod user_repo;

pub use account_repo::StoreAccountRepository;
pub use analytics_repo::StoreAnalyticsRepository;
pub use card_repo::StoreCardRepository;
pub use database::DbClient;
pub use order_repo::StoreOrderRepository;
pub use stock_repo::StoreStockRepository;
pub use user_repo::StoreUserRepository;
