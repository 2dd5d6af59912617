use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Latest known stock quantity of a product at a warehouse.
///
/// Keyed by `(nm_id, account_id, supplier_article, warehouse_name)` and fully
/// overwritten each sync cycle — this is a snapshot, not a history table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockSnapshot {
    pub account_id: i64,
    pub nm_id: i64,
    pub supplier_article: String,
    pub warehouse_name: String,
    pub last_change_date: NaiveDateTime,
    pub barcode: Option<i64>,
    pub quantity: i64,
    pub in_way_to_client: i64,
    pub in_way_from_client: i64,
    pub quantity_full: i64,
    pub category: String,
    pub tech_size: String,
    pub is_supply: bool,
    pub is_realization: bool,
    pub sc_code: String,
    pub synced_at: NaiveDateTime,
}
