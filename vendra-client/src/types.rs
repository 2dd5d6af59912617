//! Wire DTOs for marketplace responses.
//!
//! These decode the JSON the marketplace actually sends (camelCase, a few
//! legacy field spellings) and validate shape at the boundary; mapping into
//! domain rows happens in the sync jobs.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One line of the supplier/orders response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbOrder {
    pub date: NaiveDateTime,
    pub last_change_date: NaiveDateTime,
    pub warehouse_name: String,
    #[serde(default)]
    pub warehouse_type: String,
    pub country_name: String,
    pub oblast_okrug_name: String,
    pub region_name: String,
    pub supplier_article: String,
    pub nm_id: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    pub category: String,
    pub subject: String,
    pub brand: String,
    pub tech_size: String,
    #[serde(rename = "incomeID")]
    pub income_id: i64,
    pub is_supply: bool,
    pub is_realization: bool,
    pub total_price: f64,
    pub discount_percent: f64,
    #[serde(default)]
    pub spp: f64,
    pub finished_price: f64,
    pub price_with_disc: f64,
    pub is_cancel: bool,
    #[serde(default)]
    pub cancel_date: Option<NaiveDateTime>,
    #[serde(default)]
    pub sticker: String,
    pub g_number: String,
    pub srid: String,
}

impl WbOrder {
    /// Barcode as a number; the marketplace sends it as a string, sometimes
    /// empty.
    pub fn barcode_num(&self) -> Option<i64> {
        self.barcode.as_deref().and_then(|b| b.parse().ok())
    }

    /// Cancellation date, with the `0001-01-01T00:00:00` "not cancelled"
    /// sentinel mapped to `None`.
    pub fn effective_cancel_date(&self) -> Option<NaiveDateTime> {
        use chrono::Datelike;
        self.cancel_date.filter(|d| d.year() > 1)
    }
}

/// One line of the supplier/stocks response.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbStock {
    pub last_change_date: NaiveDateTime,
    pub warehouse_name: String,
    pub supplier_article: String,
    pub nm_id: i64,
    #[serde(default)]
    pub barcode: Option<String>,
    pub quantity: i64,
    pub in_way_to_client: i64,
    pub in_way_from_client: i64,
    pub quantity_full: i64,
    pub category: String,
    pub tech_size: String,
    pub is_supply: bool,
    pub is_realization: bool,
    #[serde(rename = "SCCode", default)]
    pub sc_code: String,
}

impl WbStock {
    pub fn barcode_num(&self) -> Option<i64> {
        self.barcode.as_deref().and_then(|b| b.parse().ok())
    }
}

/// One product card from the content API.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbCard {
    #[serde(rename = "nmID")]
    pub nm_id: i64,
    #[serde(rename = "imtID")]
    pub imt_id: i64,
    #[serde(rename = "nmUUID")]
    pub nm_uuid: Uuid,
    #[serde(rename = "subjectID")]
    pub subject_id: i64,
    pub subject_name: String,
    pub vendor_code: String,
    pub brand: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub need_kiz: bool,
    #[serde(default)]
    pub dimensions: Value,
    #[serde(default)]
    pub characteristics: Value,
    #[serde(default)]
    pub sizes: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Trailing cursor of a cards page. `total` is the size of the page just
/// returned; a value below the requested limit means the listing is done.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageCursor {
    #[serde(default)]
    pub updated_at: Option<String>,
    #[serde(rename = "nmID", default)]
    pub nm_id: Option<i64>,
    pub total: i64,
}

/// One page of the cards listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CardsPage {
    pub cards: Vec<WbCard>,
    pub cursor: PageCursor,
}

/// One FBW incoming delivery line.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WbIncome {
    pub income_id: i64,
    #[serde(default)]
    pub number: String,
    pub date: NaiveDateTime,
    pub last_change_date: NaiveDateTime,
    pub supplier_article: String,
    pub tech_size: String,
    #[serde(default)]
    pub barcode: Option<String>,
    pub quantity: i64,
    pub total_price: f64,
    pub warehouse_name: String,
    pub nm_id: i64,
    #[serde(default)]
    pub status: String,
}

/// Repricer upload item: new price and discount for one nmID.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PriceUpdate {
    #[serde(rename = "nmID")]
    pub nm_id: i64,
    pub price: i64,
    pub discount: i64,
}

/// One good from the discounts-prices listing.
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoodsPrice {
    #[serde(rename = "nmID")]
    pub nm_id: i64,
    pub vendor_code: String,
    pub discount: i64,
    #[serde(default)]
    pub currency_iso_code: String,
    #[serde(default)]
    pub sizes: Vec<GoodsSize>,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoodsSize {
    #[serde(rename = "sizeID", default)]
    pub size_id: Option<i64>,
    pub price: i64,
    pub discounted_price: f64,
    #[serde(default)]
    pub tech_size_name: String,
}

/// Envelope of the goods listing response.
#[derive(Debug, Deserialize)]
pub(crate) struct GoodsPricesResponse {
    pub data: GoodsPricesData,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GoodsPricesData {
    pub list_goods: Vec<GoodsPrice>,
}
