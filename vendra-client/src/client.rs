use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use serde::de::DeserializeOwned;
use tracing::debug;
use uuid::Uuid;

use crate::endpoint::{ApiHost, CardCursor, Endpoint, ReportRequest};
use crate::error::{ClientError, Result};
use crate::throttle::Throttle;
use crate::types::{
    CardsPage, GoodsPrice, GoodsPricesResponse, PriceUpdate, WbIncome, WbOrder, WbStock,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Base URLs per API family. Overridable so tests can point the client at a
/// mock server.
#[derive(Debug, Clone)]
pub struct Hosts {
    pub statistics: String,
    pub content: String,
    pub prices: String,
    pub analytics: String,
}

impl Default for Hosts {
    fn default() -> Self {
        Self {
            statistics: "https://statistics-api.wildberries.ru".to_string(),
            content: "https://content-api.wildberries.ru".to_string(),
            prices: "https://discounts-prices-api.wildberries.ru".to_string(),
            analytics: "https://seller-analytics-api.wildberries.ru".to_string(),
        }
    }
}

impl Hosts {
    fn base(&self, host: ApiHost) -> &str {
        match host {
            ApiHost::Statistics => &self.statistics,
            ApiHost::Content => &self.content,
            ApiHost::Prices => &self.prices,
            ApiHost::Analytics => &self.analytics,
        }
    }
}

/// Marketplace API client for one seller account.
///
/// Holds the account's bearer token and a per-bucket throttle; requests are
/// shaped to the documented rate budgets before they leave the process.
pub struct WbClient {
    http: reqwest::Client,
    hosts: Hosts,
    token: String,
    throttle: Throttle,
}

impl WbClient {
    pub fn new(token: impl Into<String>) -> Result<Self> {
        Self::with_hosts(token, Hosts::default())
    }

    pub fn with_hosts(token: impl Into<String>, hosts: Hosts) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            hosts,
            token: token.into(),
            throttle: Throttle::new(),
        })
    }

    async fn execute(&self, endpoint: &Endpoint) -> Result<reqwest::Response> {
        self.throttle.acquire(endpoint.bucket()).await;

        let url = format!("{}{}", self.hosts.base(endpoint.host()), endpoint.path());
        debug!(method = %endpoint.method(), %url, "marketplace request");

        let mut req = self
            .http
            .request(endpoint.method(), &url)
            .bearer_auth(&self.token);
        let query = endpoint.query();
        if !query.is_empty() {
            req = req.query(&query);
        }
        if let Some(body) = endpoint.body() {
            req = req.json(&body);
        }

        let response = req.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status { status, body });
        }
        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, endpoint: &Endpoint) -> Result<T> {
        let response = self.execute(endpoint).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Order lines changed since `date_from`; `flag = 0` means "until now".
    pub async fn fetch_orders(&self, date_from: NaiveDateTime, flag: u8) -> Result<Vec<WbOrder>> {
        self.fetch_json(&Endpoint::Orders { date_from, flag }).await
    }

    /// Current warehouse stock levels changed since `date_from`.
    pub async fn fetch_stocks(&self, date_from: NaiveDateTime) -> Result<Vec<WbStock>> {
        self.fetch_json(&Endpoint::Stocks { date_from }).await
    }

    /// One page of the cards listing; the caller drives the cursor.
    pub async fn fetch_cards_page(&self, cursor: CardCursor) -> Result<CardsPage> {
        self.fetch_json(&Endpoint::Cards { cursor }).await
    }

    /// FBW incoming deliveries since `date_from`.
    pub async fn fetch_incomes(&self, date_from: NaiveDate) -> Result<Vec<WbIncome>> {
        self.fetch_json(&Endpoint::Incomes { date_from }).await
    }

    /// Goods with their current prices and discounts.
    pub async fn fetch_goods_prices(&self, limit: u32) -> Result<Vec<GoodsPrice>> {
        let response: GoodsPricesResponse =
            self.fetch_json(&Endpoint::GoodsPrices { limit }).await?;
        Ok(response.data.list_goods)
    }

    /// Uploads new prices/discounts. The acceptance body carries only a task
    /// id the backend has no further use for, so it is discarded.
    pub async fn set_prices(&self, items: Vec<PriceUpdate>) -> Result<()> {
        self.execute(&Endpoint::SetPrices { items }).await?;
        Ok(())
    }

    /// Orders generation of a seller-analytics report.
    pub async fn generate_report(&self, request: ReportRequest) -> Result<()> {
        self.execute(&Endpoint::ReportGenerate(request)).await?;
        Ok(())
    }

    /// Downloads a generated report as the raw archive bytes.
    pub async fn download_report(&self, download_id: Uuid) -> Result<Vec<u8>> {
        let response = self
            .execute(&Endpoint::ReportDownload { download_id })
            .await?;
        Ok(response.bytes().await?.to_vec())
    }
}
