use std::time::Duration;

use chrono::{NaiveDate, NaiveDateTime};
use reqwest::Method;
use serde_json::{json, Value};
use uuid::Uuid;

use crate::types::PriceUpdate;

/// Page limit the content API allows per cards request.
pub const CARDS_PAGE_LIMIT: u32 = 100;

/// Which API family a request goes to; each family lives on its own host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiHost {
    Statistics,
    Content,
    Prices,
    Analytics,
}

/// Documented rate budgets, per seller account. The client throttles itself
/// to these; the marketplace blocks callers that exceed them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RateBucket {
    /// supplier/orders — 1 request per minute.
    OrdersStats,
    /// supplier/stocks and supplier/incomes — 1 request per minute.
    SupplierStats,
    /// Content category — 100 requests per minute.
    Content,
    /// discounts-prices — 10 requests per 6 seconds.
    Prices,
    /// seller-analytics reports — 3 requests per minute.
    Analytics,
}

impl RateBucket {
    /// Minimum spacing between two requests in this bucket.
    pub fn budget(self) -> Duration {
        match self {
            RateBucket::OrdersStats => Duration::from_secs(60),
            RateBucket::SupplierStats => Duration::from_secs(60),
            RateBucket::Content => Duration::from_millis(600),
            RateBucket::Prices => Duration::from_millis(600),
            RateBucket::Analytics => Duration::from_secs(20),
        }
    }
}

/// Continuation token for cards pagination: the server returns the
/// `updatedAt` + `nmID` of the last card of the page, and the next request
/// echoes them back verbatim.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CardCursor {
    pub updated_at: Option<String>,
    pub nm_id: Option<i64>,
}

/// Seller-analytics report flavors the backend can order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    DetailHistory,
    StockHistoryCsv,
}

impl ReportType {
    fn as_str(self) -> &'static str {
        match self {
            ReportType::DetailHistory => "DETAIL_HISTORY_REPORT",
            ReportType::StockHistoryCsv => "STOCK_HISTORY_REPORT_CSV",
        }
    }
}

/// Report generation request; `id` is the caller-assigned report UUID used
/// later to download the result.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRequest {
    pub id: Uuid,
    pub report_type: ReportType,
    pub user_report_name: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Every marketplace request the backend can make, one variant per endpoint.
///
/// The match arms below are the single source of truth for method, host,
/// path, rate bucket, query string and body; adding a variant without
/// extending them is a compile error.
#[derive(Debug, Clone, PartialEq)]
pub enum Endpoint {
    /// Order lines changed since `date_from`. `flag = 1` restricts to that
    /// exact day; `flag = 0` means "from that day until now".
    Orders { date_from: NaiveDateTime, flag: u8 },
    /// Warehouse stock levels changed since `date_from`.
    Stocks { date_from: NaiveDateTime },
    /// One page of product cards.
    Cards { cursor: CardCursor },
    /// FBW incoming deliveries since `date_from`.
    Incomes { date_from: NaiveDate },
    /// Current goods with prices and discounts.
    GoodsPrices { limit: u32 },
    /// Repricer upload: set price and discount per nmID.
    SetPrices { items: Vec<PriceUpdate> },
    /// Order generation of a seller-analytics report.
    ReportGenerate(ReportRequest),
    /// Download a generated report; the response is a raw ZIP/CSV payload.
    ReportDownload { download_id: Uuid },
}

impl Endpoint {
    pub fn method(&self) -> Method {
        match self {
            Endpoint::Orders { .. }
            | Endpoint::Stocks { .. }
            | Endpoint::Incomes { .. }
            | Endpoint::GoodsPrices { .. }
            | Endpoint::ReportDownload { .. } => Method::GET,
            Endpoint::Cards { .. }
            | Endpoint::SetPrices { .. }
            | Endpoint::ReportGenerate(_) => Method::POST,
        }
    }

    pub fn host(&self) -> ApiHost {
        match self {
            Endpoint::Orders { .. } | Endpoint::Stocks { .. } | Endpoint::Incomes { .. } => {
                ApiHost::Statistics
            }
            Endpoint::Cards { .. } => ApiHost::Content,
            Endpoint::GoodsPrices { .. } | Endpoint::SetPrices { .. } => ApiHost::Prices,
            Endpoint::ReportGenerate(_) | Endpoint::ReportDownload { .. } => ApiHost::Analytics,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Endpoint::Orders { .. } => "/api/v1/supplier/orders".to_string(),
            Endpoint::Stocks { .. } => "/api/v1/supplier/stocks".to_string(),
            Endpoint::Cards { .. } => "/content/v2/get/cards/list".to_string(),
            Endpoint::Incomes { .. } => "/api/v1/supplier/incomes".to_string(),
            Endpoint::GoodsPrices { .. } => "/api/v2/list/goods/filter".to_string(),
            Endpoint::SetPrices { .. } => "/api/v2/upload/task".to_string(),
            Endpoint::ReportGenerate(_) => "/api/v2/nm-report/downloads".to_string(),
            Endpoint::ReportDownload { download_id } => {
                format!("/api/v2/nm-report/downloads/file/{download_id}")
            }
        }
    }

    pub fn bucket(&self) -> RateBucket {
        match self {
            Endpoint::Orders { .. } => RateBucket::OrdersStats,
            Endpoint::Stocks { .. } | Endpoint::Incomes { .. } => RateBucket::SupplierStats,
            Endpoint::Cards { .. } => RateBucket::Content,
            Endpoint::GoodsPrices { .. } | Endpoint::SetPrices { .. } => RateBucket::Prices,
            Endpoint::ReportGenerate(_) | Endpoint::ReportDownload { .. } => RateBucket::Analytics,
        }
    }

    pub fn query(&self) -> Vec<(String, String)> {
        match self {
            Endpoint::Orders { date_from, flag } => vec![
                ("dateFrom".into(), date_from.format("%Y-%m-%dT%H:%M:%S").to_string()),
                ("flag".into(), flag.to_string()),
            ],
            Endpoint::Stocks { date_from } => vec![(
                "dateFrom".into(),
                date_from.format("%Y-%m-%dT%H:%M:%S").to_string(),
            )],
            Endpoint::Incomes { date_from } => {
                vec![("dateFrom".into(), date_from.format("%Y-%m-%d").to_string())]
            }
            Endpoint::GoodsPrices { limit } => vec![("limit".into(), limit.to_string())],
            Endpoint::Cards { .. }
            | Endpoint::SetPrices { .. }
            | Endpoint::ReportGenerate(_)
            | Endpoint::ReportDownload { .. } => Vec::new(),
        }
    }

    pub fn body(&self) -> Option<Value> {
        match self {
            Endpoint::Cards { cursor } => {
                let mut cur = json!({ "limit": CARDS_PAGE_LIMIT });
                if let Some(updated_at) = &cursor.updated_at {
                    cur["updatedAt"] = json!(updated_at);
                }
                if let Some(nm_id) = cursor.nm_id {
                    cur["nmID"] = json!(nm_id);
                }
                Some(json!({
                    "settings": {
                        "cursor": cur,
                        "filter": { "withPhoto": -1 },
                    }
                }))
            }
            Endpoint::SetPrices { items } => Some(json!({ "data": items })),
            Endpoint::ReportGenerate(req) => {
                let mut body = json!({
                    "id": req.id,
                    "reportType": req.report_type.as_str(),
                    "userReportName": req.user_report_name,
                });
                body["params"] = match req.report_type {
                    ReportType::DetailHistory => json!({
                        "startDate": req.start.format("%Y-%m-%d").to_string(),
                        "endDate": req.end.format("%Y-%m-%d").to_string(),
                        "skipDeletedNm": true,
                    }),
                    ReportType::StockHistoryCsv => json!({
                        "currentPeriod": {
                            "start": req.start.format("%Y-%m-%d").to_string(),
                            "end": req.end.format("%Y-%m-%d").to_string(),
                        },
                        "stockType": "",
                        "skipDeletedNm": true,
                        "availabilityFilters": [
                            "deficient",
                            "actual",
                            "balanced",
                            "nonActual",
                            "nonLiquid",
                            "invalidData",
                        ],
                        "orderBy": { "field": "officeMissingTime", "mode": "desc" },
                    }),
                };
                Some(body)
            }
            Endpoint::Orders { .. }
            | Endpoint::Stocks { .. }
            | Endpoint::Incomes { .. }
            | Endpoint::GoodsPrices { .. }
            | Endpoint::ReportDownload { .. } => None,
        }
    }
}
