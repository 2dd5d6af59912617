//! In-memory repository fakes for the sync job tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use wiremock::MockServer;

use vendra_client::Hosts;
use vendra_core::account::{AccountAccess, NewSellerAccount, SellerAccount};
use vendra_core::card::ProductCard;
use vendra_core::order::OrderRecord;
use vendra_core::repository::{
    AccountRepository, CardRepository, OrderRepository, StockRepository,
};
use vendra_core::stock::StockSnapshot;
use vendra_core::user::User;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

pub fn hosts_for(server: &MockServer) -> Hosts {
    Hosts {
        statistics: server.uri(),
        content: server.uri(),
        prices: server.uri(),
        analytics: server.uri(),
    }
}

fn account(id: i64) -> SellerAccount {
    SellerAccount {
        id,
        name: format!("account-{id}"),
        token: format!("token-{id}"),
        number: None,
        inn: None,
        tg_id: None,
        owner_id: 1,
        created_at: chrono::Utc::now(),
    }
}

pub struct FakeAccountRepo {
    accounts: Vec<SellerAccount>,
}

impl FakeAccountRepo {
    pub fn with_accounts(ids: &[i64]) -> Self {
        Self { accounts: ids.iter().copied().map(account).collect() }
    }
}

#[async_trait]
impl AccountRepository for FakeAccountRepo {
    async fn create_account(&self, _: NewSellerAccount) -> Result<SellerAccount, BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn get_account(&self, _: i64) -> Result<Option<SellerAccount>, BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn list_for_user(&self, _: i64) -> Result<Vec<AccountAccess>, BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn list_all(&self) -> Result<Vec<SellerAccount>, BoxError> {
        Ok(self.accounts.clone())
    }

    async fn share(&self, _: i64, _: i64) -> Result<(), BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn unshare(&self, _: i64, _: i64) -> Result<(), BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn list_users_with_access(&self, _: i64) -> Result<Vec<User>, BoxError> {
        unreachable!("not used by sync jobs")
    }

    async fn delete_account(&self, _: i64) -> Result<(), BoxError> {
        unreachable!("not used by sync jobs")
    }
}

#[derive(Default)]
pub struct FakeOrderRepo {
    records: Mutex<Vec<OrderRecord>>,
}

impl FakeOrderRepo {
    pub fn records(&self) -> Vec<OrderRecord> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl OrderRepository for FakeOrderRepo {
    // Mirrors the store's conflict handling: one row per
    // (nm_id, account_id, srid), and a row with a cancel date set is frozen.
    async fn upsert_order(&self, order: &OrderRecord) -> Result<(), BoxError> {
        let mut records = self.records.lock().unwrap();
        match records.iter_mut().find(|existing| {
            existing.nm_id == order.nm_id
                && existing.account_id == order.account_id
                && existing.srid == order.srid
        }) {
            Some(existing) if existing.cancel_date.is_some() => {}
            Some(existing) => *existing = order.clone(),
            None => records.push(order.clone()),
        }
        Ok(())
    }

    async fn list_recent(&self, _: i64, _: i64) -> Result<Vec<OrderRecord>, BoxError> {
        Ok(self.records())
    }
}

#[derive(Default)]
pub struct FakeStockRepo {
    records: Mutex<Vec<StockSnapshot>>,
}

impl FakeStockRepo {
    pub fn records(&self) -> Vec<StockSnapshot> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl StockRepository for FakeStockRepo {
    async fn upsert_stock(&self, stock: &StockSnapshot) -> Result<(), BoxError> {
        self.records.lock().unwrap().push(stock.clone());
        Ok(())
    }
}

#[derive(Default)]
pub struct FakeCardRepo {
    records: Mutex<Vec<ProductCard>>,
}

impl FakeCardRepo {
    pub fn records(&self) -> Vec<ProductCard> {
        self.records.lock().unwrap().clone()
    }
}

#[async_trait]
impl CardRepository for FakeCardRepo {
    async fn upsert_card(&self, card: &ProductCard) -> Result<(), BoxError> {
        self.records.lock().unwrap().push(card.clone());
        Ok(())
    }

    async fn list_cards(&self, _: Option<i64>) -> Result<Vec<ProductCard>, BoxError> {
        Ok(self.records())
    }

    async fn set_card_active(&self, _: i64, _: i64, _: bool) -> Result<(), BoxError> {
        Ok(())
    }
}
