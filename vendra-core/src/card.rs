use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Marketplace product card (nmID), keyed by `(nm_id, account_id)`.
///
/// Dimensions, characteristics and sizes are semi-structured payloads the
/// marketplace owns; they are stored as JSONB and never interpreted here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductCard {
    pub account_id: i64,
    pub nm_id: i64,
    pub imt_id: i64,
    pub nm_uuid: Uuid,
    pub subject_id: i64,
    pub subject_name: String,
    pub vendor_code: String,
    pub brand: String,
    pub title: String,
    pub description: String,
    pub need_kiz: bool,
    pub dimensions: Value,
    pub characteristics: Value,
    pub sizes: Value,
    pub is_active: bool,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub synced_at: NaiveDateTime,
}
