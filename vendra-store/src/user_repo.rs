use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::repository::UserRepository;
use vendra_core::user::{NewUser, User};

pub struct StoreUserRepository {
    pool: PgPool,
}

impl StoreUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal struct for type-safe querying
#[derive(sqlx::FromRow)]
struct UserRow {
    id: i64,
    nickname: String,
    email: String,
    phone: Option<String>,
    hashed_password: String,
    is_active: bool,
    is_staff: bool,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        User {
            id: row.id,
            nickname: row.nickname,
            email: row.email,
            phone: row.phone,
            hashed_password: row.hashed_password,
            is_active: row.is_active,
            is_staff: row.is_staff,
            created_at: row.created_at,
        }
    }
}

const USER_COLUMNS: &str =
    "id, nickname, email, phone, hashed_password, is_active, is_staff, created_at";

#[async_trait]
impl UserRepository for StoreUserRepository {
    async fn create_user(
        &self,
        user: NewUser,
    ) -> Result<User, Box<dyn std::error::Error + Send + Sync>> {
        let row: UserRow = sqlx::query_as(&format!(
            "INSERT INTO users (nickname, email, phone, hashed_password)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(&user.nickname)
        .bind(&user.email)
        .bind(&user.phone)
        .bind(&user.hashed_password)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_user(
        &self,
        id: i64,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_nickname(
        &self,
        nickname: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<UserRow> = sqlx::query_as(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE nickname = $1"
        ))
        .bind(nickname)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn find_by_email(
        &self,
        email: &str,
    ) -> Result<Option<User>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;
        Ok(row.map(Into::into))
    }

    async fn list_users(&self) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<UserRow> =
            sqlx::query_as(&format!("SELECT {USER_COLUMNS} FROM users ORDER BY id"))
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_active(
        &self,
        id: i64,
        is_active: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("UPDATE users SET is_active = $1 WHERE id = $2")
            .bind(is_active)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_user(
        &self,
        id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
