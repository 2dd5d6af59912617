use async_trait::async_trait;

use crate::account::{AccountAccess, NewSellerAccount, SellerAccount};
use crate::analytics::{DateRange, OrdersChart, ProductStat};
use crate::card::ProductCard;
use crate::order::OrderRecord;
use crate::stock::StockSnapshot;
use crate::user::{NewUser, User};

/// Repository trait for user storage.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<User, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_user(
        &self,
        id: i64,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_nickname(
        &self,
        nickname: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn list_users(&self) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn set_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_user(&self, id: i64)
        -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for seller accounts and access shares.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    async fn create_account(
        &self,
        account: NewSellerAccount,
    ) -> Result<SellerAccount, Box<dyn std::error::Error + Send + Sync>>;

    async fn get_account(
        &self,
        id: i64,
    ) -> Result<Option<SellerAccount>, Box<dyn std::error::Error + Send + Sync>>;

    /// Accounts the user owns plus accounts shared with them.
    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<AccountAccess>, Box<dyn std::error::Error + Send + Sync>>;

    /// Every account under management; the sync jobs iterate this.
    async fn list_all(
        &self,
    ) -> Result<Vec<SellerAccount>, Box<dyn std::error::Error + Send + Sync>>;

    async fn share(
        &self,
        account_id: i64,
        user_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn unshare(
        &self,
        account_id: i64,
        user_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    /// Users with a share on the account (the owner is not listed).
    async fn list_users_with_access(
        &self,
        account_id: i64,
    ) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>>;

    async fn delete_account(
        &self,
        id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for order upserts and operator listings.
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Insert-or-update on `(nm_id, account_id, srid)`. Rows whose
    /// `cancel_date` is already set are left untouched.
    async fn upsert_order(
        &self,
        order: &OrderRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderRecord>, Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for stock snapshot overwrites.
#[async_trait]
pub trait StockRepository: Send + Sync {
    /// Overwrite on `(nm_id, account_id, supplier_article, warehouse_name)`.
    async fn upsert_stock(
        &self,
        stock: &StockSnapshot,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for product cards.
#[async_trait]
pub trait CardRepository: Send + Sync {
    /// Insert-or-update on `(nm_id, account_id)`.
    async fn upsert_card(
        &self,
        card: &ProductCard,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;

    async fn list_cards(
        &self,
        account_id: Option<i64>,
    ) -> Result<Vec<ProductCard>, Box<dyn std::error::Error + Send + Sync>>;

    /// Soft activation toggle; deactivated cards stay in storage.
    async fn set_card_active(
        &self,
        account_id: i64,
        nm_id: i64,
        is_active: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

/// Repository trait for read-side analytics aggregation.
#[async_trait]
pub trait AnalyticsRepository: Send + Sync {
    /// Per-day counts plus totals over an inclusive, already-clamped range.
    /// An empty `account_ids` slice yields an empty chart.
    async fn orders_chart(
        &self,
        range: DateRange,
        account_ids: &[i64],
    ) -> Result<OrdersChart, Box<dyn std::error::Error + Send + Sync>>;

    async fn total_stocks(
        &self,
        account_ids: &[i64],
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>>;

    async fn product_stats(
        &self,
        range: DateRange,
        account_ids: &[i64],
    ) -> Result<Vec<ProductStat>, Box<dyn std::error::Error + Send + Sync>>;
}
