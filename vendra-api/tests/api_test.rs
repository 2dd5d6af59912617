use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use http_body_util::BodyExt;
use tower::util::ServiceExt;

use vendra_api::state::{AppState, HealthProbe};
use vendra_api::app;
use vendra_core::account::{AccountAccess, NewSellerAccount, SellerAccount};
use vendra_core::analytics::{DateRange, DayCount, OrdersChart, ProductStat};
use vendra_core::card::ProductCard;
use vendra_core::order::OrderRecord;
use vendra_core::repository::{
    AccountRepository, AnalyticsRepository, CardRepository, OrderRepository, UserRepository,
};
use vendra_core::stock::StockSnapshot;
use vendra_core::time::msk_today;
use vendra_core::user::{NewUser, User};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Default)]
struct InMemory {
    users: Mutex<Vec<User>>,
    accounts: Mutex<Vec<SellerAccount>>,
    shares: Mutex<Vec<(i64, i64)>>,
    orders: Mutex<Vec<OrderRecord>>,
    stocks: Mutex<Vec<StockSnapshot>>,
    cards: Mutex<Vec<ProductCard>>,
}

impl InMemory {
    fn seed_user(&self, id: i64, nickname: &str, is_active: bool, is_staff: bool) -> User {
        let user = User {
            id,
            nickname: nickname.to_string(),
            email: format!("{nickname}@example.com"),
            phone: None,
            hashed_password: bcrypt::hash("secret", 4).unwrap(),
            is_active,
            is_staff,
            created_at: Utc::now(),
        };
        self.users.lock().unwrap().push(user.clone());
        user
    }

    fn seed_account(&self, id: i64, owner_id: i64) -> SellerAccount {
        let account = SellerAccount {
            id,
            name: format!("lk-{id}"),
            token: format!("token-{id}"),
            number: None,
            inn: None,
            tg_id: None,
            owner_id,
            created_at: Utc::now(),
        };
        self.accounts.lock().unwrap().push(account.clone());
        account
    }

    fn seed_order(&self, account_id: i64, srid: &str, date: chrono::NaiveDateTime, price: f64) {
        self.orders.lock().unwrap().push(OrderRecord {
            account_id,
            nm_id: 1,
            srid: srid.to_string(),
            date,
            last_change_date: date,
            warehouse_name: "Коледино".to_string(),
            warehouse_type: String::new(),
            country_name: String::new(),
            oblast_okrug_name: String::new(),
            region_name: String::new(),
            supplier_article: "ART-1".to_string(),
            barcode: None,
            category: String::new(),
            subject: String::new(),
            brand: String::new(),
            tech_size: String::new(),
            income_id: 0,
            is_supply: false,
            is_realization: true,
            total_price: price,
            discount_percent: 0.0,
            spp: 0.0,
            finished_price: price,
            price_with_disc: price,
            is_cancel: false,
            cancel_date: None,
            sticker: String::new(),
            g_number: String::new(),
        });
    }
}

#[async_trait]
impl UserRepository for InMemory {
    async fn create_user(&self, user: NewUser) -> Result<User, BoxError> {
        let mut users = self.users.lock().unwrap();
        let id = users.iter().map(|u| u.id).max().unwrap_or(0) + 1;
        let user = User {
            id,
            nickname: user.nickname,
            email: user.email,
            phone: user.phone,
            hashed_password: user.hashed_password,
            is_active: false,
            is_staff: false,
            created_at: Utc::now(),
        };
        users.push(user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<Option<User>, BoxError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_nickname(&self, nickname: &str) -> Result<Option<User>, BoxError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .find(|u| u.nickname == nickname)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, BoxError> {
        Ok(self.users.lock().unwrap().iter().find(|u| u.email == email).cloned())
    }

    async fn list_users(&self) -> Result<Vec<User>, BoxError> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn set_active(&self, id: i64, is_active: bool) -> Result<(), BoxError> {
        if let Some(user) = self.users.lock().unwrap().iter_mut().find(|u| u.id == id) {
            user.is_active = is_active;
        }
        Ok(())
    }

    async fn delete_user(&self, id: i64) -> Result<(), BoxError> {
        self.users.lock().unwrap().retain(|u| u.id != id);
        Ok(())
    }
}

#[async_trait]
impl AccountRepository for InMemory {
    async fn create_account(&self, account: NewSellerAccount) -> Result<SellerAccount, BoxError> {
        let mut accounts = self.accounts.lock().unwrap();
        let id = accounts.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let account = SellerAccount {
            id,
            name: account.name,
            token: account.token,
            number: account.number,
            inn: account.inn,
            tg_id: account.tg_id,
            owner_id: account.owner_id,
            created_at: Utc::now(),
        };
        accounts.push(account.clone());
        Ok(account)
    }

    async fn get_account(&self, id: i64) -> Result<Option<SellerAccount>, BoxError> {
        Ok(self.accounts.lock().unwrap().iter().find(|a| a.id == id).cloned())
    }

    async fn list_for_user(&self, user_id: i64) -> Result<Vec<AccountAccess>, BoxError> {
        let shares = self.shares.lock().unwrap();
        Ok(self
            .accounts
            .lock()
            .unwrap()
            .iter()
            .filter(|a| {
                a.owner_id == user_id || shares.contains(&(a.id, user_id))
            })
            .map(|a| AccountAccess { account: a.clone(), is_owner: a.owner_id == user_id })
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<SellerAccount>, BoxError> {
        Ok(self.accounts.lock().unwrap().clone())
    }

    async fn share(&self, account_id: i64, user_id: i64) -> Result<(), BoxError> {
        let mut shares = self.shares.lock().unwrap();
        if !shares.contains(&(account_id, user_id)) {
            shares.push((account_id, user_id));
        }
        Ok(())
    }

    async fn unshare(&self, account_id: i64, user_id: i64) -> Result<(), BoxError> {
        self.shares
            .lock()
            .unwrap()
            .retain(|entry| *entry != (account_id, user_id));
        Ok(())
    }

    async fn list_users_with_access(&self, account_id: i64) -> Result<Vec<User>, BoxError> {
        let shares = self.shares.lock().unwrap();
        Ok(self
            .users
            .lock()
            .unwrap()
            .iter()
            .filter(|u| shares.contains(&(account_id, u.id)))
            .cloned()
            .collect())
    }

    async fn delete_account(&self, id: i64) -> Result<(), BoxError> {
        self.accounts.lock().unwrap().retain(|a| a.id != id);
        Ok(())
    }
}

#[async_trait]
impl OrderRepository for InMemory {
    async fn upsert_order(&self, order: &OrderRecord) -> Result<(), BoxError> {
        self.orders.lock().unwrap().push(order.clone());
        Ok(())
    }

    async fn list_recent(&self, limit: i64, offset: i64) -> Result<Vec<OrderRecord>, BoxError> {
        Ok(self
            .orders
            .lock()
            .unwrap()
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl CardRepository for InMemory {
    async fn upsert_card(&self, card: &ProductCard) -> Result<(), BoxError> {
        self.cards.lock().unwrap().push(card.clone());
        Ok(())
    }

    async fn list_cards(&self, account_id: Option<i64>) -> Result<Vec<ProductCard>, BoxError> {
        Ok(self
            .cards
            .lock()
            .unwrap()
            .iter()
            .filter(|c| account_id.map_or(true, |id| c.account_id == id))
            .cloned()
            .collect())
    }

    async fn set_card_active(&self, account_id: i64, nm_id: i64, is_active: bool) -> Result<(), BoxError> {
        if let Some(card) = self
            .cards
            .lock()
            .unwrap()
            .iter_mut()
            .find(|c| c.account_id == account_id && c.nm_id == nm_id)
        {
            card.is_active = is_active;
        }
        Ok(())
    }
}

#[async_trait]
impl AnalyticsRepository for InMemory {
    async fn orders_chart(
        &self,
        range: DateRange,
        account_ids: &[i64],
    ) -> Result<OrdersChart, BoxError> {
        let orders = self.orders.lock().unwrap();
        let in_range: Vec<_> = orders
            .iter()
            .filter(|o| {
                account_ids.contains(&o.account_id)
                    && o.date.date() >= range.from
                    && o.date.date() <= range.to
            })
            .collect();

        let mut per_day: BTreeMap<chrono::NaiveDate, i64> = BTreeMap::new();
        for order in &in_range {
            *per_day.entry(order.date.date()).or_default() += 1;
        }

        Ok(OrdersChart {
            data: per_day
                .into_iter()
                .map(|(date, count)| DayCount { date, count })
                .collect(),
            total_orders: in_range.len() as i64,
            total_sales: in_range.iter().map(|o| o.price_with_disc).sum(),
        })
    }

    async fn total_stocks(&self, account_ids: &[i64]) -> Result<i64, BoxError> {
        Ok(self
            .stocks
            .lock()
            .unwrap()
            .iter()
            .filter(|s| account_ids.contains(&s.account_id))
            .map(|s| s.quantity)
            .sum())
    }

    async fn product_stats(
        &self,
        _range: DateRange,
        _account_ids: &[i64],
    ) -> Result<Vec<ProductStat>, BoxError> {
        Ok(Vec::new())
    }
}

#[async_trait]
impl HealthProbe for InMemory {
    async fn ping(&self) -> bool {
        true
    }
}

fn test_app(store: Arc<InMemory>) -> axum::Router {
    let state = AppState {
        users: store.clone(),
        accounts: store.clone(),
        orders: store.clone(),
        cards: store.clone(),
        analytics: store.clone(),
        health: store,
    };
    app(state, &["*".to_string()])
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str, user_id: i64) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("X-User-ID", user_id.to_string())
        .body(Body::empty())
        .unwrap()
}

fn post_json(uri: &str, user_id: Option<i64>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json");
    if let Some(id) = user_id {
        builder = builder.header("X-User-ID", id.to_string());
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn health_reports_database_up() {
    let app = test_app(Arc::new(InMemory::default()));
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["database"], "up");
}

#[tokio::test]
async fn register_rejects_duplicate_nickname() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "anna", true, false);
    let app = test_app(store);

    let response = app
        .oneshot(post_json(
            "/auth/register",
            None,
            serde_json::json!({
                "nickname": "anna",
                "email": "other@example.com",
                "password": "pw"
            }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("nickname"));
}

#[tokio::test]
async fn login_rejects_bad_password_and_inactive_users() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "anna", true, false);
    store.seed_user(2, "boris", false, false);
    let app = test_app(store);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            serde_json::json!({ "nickname": "anna", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            serde_json::json!({ "nickname": "boris", "password": "secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .oneshot(post_json(
            "/auth/login",
            None,
            serde_json::json!({ "nickname": "anna", "password": "secret" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["user"]["nickname"], "anna");
    // Hashes never leave the service.
    assert!(body["user"].get("hashed_password").is_none());
}

#[tokio::test]
async fn protected_routes_require_identity() {
    let app = test_app(Arc::new(InMemory::default()));
    let response = app
        .oneshot(Request::builder().uri("/wb-lk").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some(), "401 must carry an error body");
}

#[tokio::test]
async fn only_the_owner_can_share() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "owner", true, false);
    store.seed_user(2, "guest", true, false);
    store.seed_user(3, "third", true, false);
    store.seed_account(10, 1);
    let app = test_app(store.clone());

    // A non-owner cannot grant access, even to themselves.
    let response = app
        .clone()
        .oneshot(post_json(
            "/wb-lk/10/share",
            Some(2),
            serde_json::json!({ "user_id": 3 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    // The owner can.
    let response = app
        .clone()
        .oneshot(post_json(
            "/wb-lk/10/share",
            Some(1),
            serde_json::json!({ "user_id": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // Granting twice is a conflict.
    let response = app
        .clone()
        .oneshot(post_json(
            "/wb-lk/10/share",
            Some(1),
            serde_json::json!({ "user_id": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The guest now sees the account, flagged as not owned.
    let response = app.clone().oneshot(get("/wb-lk", 2)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body[0]["id"], 10);
    assert_eq!(body[0]["is_owner"], false);

    // Sharing an unknown account is a 404.
    let response = app
        .oneshot(post_json(
            "/wb-lk/99/share",
            Some(1),
            serde_json::json!({ "user_id": 2 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn orders_chart_sums_revenue_and_clamps_future_dates() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "owner", true, false);
    store.seed_account(10, 1);

    let today = msk_today();
    let yesterday = today - Duration::days(1);
    store.seed_order(10, "sr-1", yesterday.and_hms_opt(10, 0, 0).unwrap(), 1200.0);
    store.seed_order(10, "sr-2", yesterday.and_hms_opt(11, 0, 0).unwrap(), 800.5);
    store.seed_order(10, "sr-3", today.and_hms_opt(9, 0, 0).unwrap(), 499.5);

    let app = test_app(store);

    // date_to a month in the future must clamp to today, so all three land.
    let date_from = yesterday.format("%Y-%m-%d");
    let date_to = (today + Duration::days(30)).format("%Y-%m-%d");
    let uri = format!("/analytics/orders-chart?date_from={date_from}&date_to={date_to}");
    let response = test_request(app, &uri, 1).await;
    assert_eq!(response["total_orders"], 3);
    assert_eq!(response["total_sales"], 2500.0);
    assert_eq!(response["data"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn analytics_ignores_accounts_the_caller_cannot_see() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "owner", true, false);
    store.seed_user(2, "other", true, false);
    store.seed_account(10, 1);
    store.seed_account(20, 2);

    let today = msk_today();
    store.seed_order(20, "sr-1", today.and_hms_opt(9, 0, 0).unwrap(), 999.0);

    let app = test_app(store);

    // User 1 explicitly asks for account 20 but has no access to it.
    let date = today.format("%Y-%m-%d");
    let uri =
        format!("/analytics/orders-chart?date_from={date}&date_to={date}&wb_lk_ids=20");
    let response = test_request(app, &uri, 1).await;
    assert_eq!(response["total_orders"], 0);
    assert_eq!(response["total_sales"], 0.0);
}

#[tokio::test]
async fn admin_surface_is_staff_only() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "regular", true, false);
    store.seed_user(2, "operator", true, true);
    let app = test_app(store);

    let response = app.clone().oneshot(get("/admin/users", 1)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert!(body["error"].as_str().is_some(), "403 must carry an error body");

    let response = app.oneshot(get("/admin/users", 2)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn admin_orders_tolerates_negative_paging_values() {
    let store = Arc::new(InMemory::default());
    store.seed_user(1, "operator", true, true);
    store.seed_account(10, 1);
    let date = chrono::NaiveDate::from_ymd_opt(2024, 5, 12)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap();
    store.seed_order(10, "sr-1", date, 100.0);
    let app = test_app(store);

    let response = app
        .oneshot(get("/admin/orders?limit=-5&offset=-3", 1))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body.as_array().is_some());
}

async fn test_request(app: axum::Router, uri: &str, user_id: i64) -> serde_json::Value {
    let response = app.oneshot(get(uri, user_id)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}
