use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A seller's Wildberries personal cabinet ("lk") under management.
/// `token` is the bearer token used for every outbound marketplace call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SellerAccount {
    pub id: i64,
    pub name: String,
    pub token: String,
    pub number: Option<i64>,
    pub inn: Option<i64>,
    pub tg_id: Option<i64>,
    pub owner_id: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewSellerAccount {
    pub name: String,
    pub token: String,
    pub number: Option<i64>,
    pub inn: Option<i64>,
    pub tg_id: Option<i64>,
    pub owner_id: i64,
}

/// An account as seen by a particular user: the owner sees `is_owner = true`,
/// users the account was shared with see `false`.
#[derive(Debug, Clone, Serialize)]
pub struct AccountAccess {
    #[serde(flatten)]
    pub account: SellerAccount,
    pub is_owner: bool,
}
