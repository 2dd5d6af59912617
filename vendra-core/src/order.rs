use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// One marketplace order line, keyed by `(nm_id, account_id, srid)`.
///
/// Timestamps are naive Moscow time exactly as the statistics API reports
/// them. Rows are append-mostly: re-sync overwrites mutable fields (last
/// change date, cancellation, prices) except when `cancel_date` is already
/// set, at which point the row is immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub account_id: i64,
    pub nm_id: i64,
    pub srid: String,
    pub date: NaiveDateTime,
    pub last_change_date: NaiveDateTime,
    pub warehouse_name: String,
    pub warehouse_type: String,
    pub country_name: String,
    pub oblast_okrug_name: String,
    pub region_name: String,
    pub supplier_article: String,
    pub barcode: Option<i64>,
    pub category: String,
    pub subject: String,
    pub brand: String,
    pub tech_size: String,
    pub income_id: i64,
    pub is_supply: bool,
    pub is_realization: bool,
    pub total_price: f64,
    pub discount_percent: f64,
    pub spp: f64,
    pub finished_price: f64,
    pub price_with_disc: f64,
    pub is_cancel: bool,
    pub cancel_date: Option<NaiveDateTime>,
    pub sticker: String,
    pub g_number: String,
}

impl OrderRecord {
    /// Natural key used for conflict resolution on upsert.
    pub fn conflict_key(&self) -> (i64, i64, &str) {
        (self.nm_id, self.account_id, &self.srid)
    }
}
