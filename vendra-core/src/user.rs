use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Application user as stored in `users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub nickname: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub hashed_password: String,
    pub is_active: bool,
    pub is_staff: bool,
    pub created_at: DateTime<Utc>,
}

/// Fields required to insert a user. The password arrives already hashed;
/// hashing is an API-layer concern.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub nickname: String,
    pub email: String,
    pub phone: Option<String>,
    pub hashed_password: String,
}
