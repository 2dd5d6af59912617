use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::account::{AccountAccess, NewSellerAccount, SellerAccount};
use vendra_core::repository::AccountRepository;
use vendra_core::user::User;

pub struct StoreAccountRepository {
    pool: PgPool,
}

impl StoreAccountRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: i64,
    name: String,
    token: String,
    number: Option<i64>,
    inn: Option<i64>,
    tg_id: Option<i64>,
    owner_id: i64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<AccountRow> for SellerAccount {
    fn from(row: AccountRow) -> Self {
        SellerAccount {
            id: row.id,
            name: row.name,
            token: row.token,
            number: row.number,
            inn: row.inn,
            tg_id: row.tg_id,
            owner_id: row.owner_id,
            created_at: row.created_at,
        }
    }
}

const ACCOUNT_COLUMNS: &str = "id, name, token, number, inn, tg_id, owner_id, created_at";

#[async_trait]
impl AccountRepository for StoreAccountRepository {
    async fn create_account(
        &self,
        account: NewSellerAccount,
    ) -> Result<SellerAccount, Box<dyn std::error::Error + Send + Sync>> {
        let row: AccountRow = sqlx::query_as(&format!(
            "INSERT INTO seller_accounts (name, token, number, inn, tg_id, owner_id)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {ACCOUNT_COLUMNS}"
        ))
        .bind(&account.name)
        .bind(&account.token)
        .bind(account.number)
        .bind(account.inn)
        .bind(account.tg_id)
        .bind(account.owner_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_account(
        &self,
        id: i64,
    ) -> Result<Option<SellerAccount>, Box<dyn std::error::Error + Send + Sync>> {
        let row: Option<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM seller_accounts WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(Into::into))
    }

    async fn list_for_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<AccountAccess>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT DISTINCT {ACCOUNT_COLUMNS} FROM seller_accounts a
             LEFT JOIN account_shares s ON s.account_id = a.id
             WHERE a.owner_id = $1 OR s.user_id = $1
             ORDER BY id"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let account: SellerAccount = row.into();
                let is_owner = account.owner_id == user_id;
                AccountAccess { account, is_owner }
            })
            .collect())
    }

    async fn list_all(
        &self,
    ) -> Result<Vec<SellerAccount>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<AccountRow> = sqlx::query_as(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM seller_accounts ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn share(
        &self,
        account_id: i64,
        user_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "INSERT INTO account_shares (account_id, user_id) VALUES ($1, $2)
             ON CONFLICT (account_id, user_id) DO NOTHING",
        )
        .bind(account_id)
        .bind(user_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn unshare(
        &self,
        account_id: i64,
        user_id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM account_shares WHERE account_id = $1 AND user_id = $2")
            .bind(account_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn list_users_with_access(
        &self,
        account_id: i64,
    ) -> Result<Vec<User>, Box<dyn std::error::Error + Send + Sync>> {
        #[derive(sqlx::FromRow)]
        struct SharedUserRow {
            id: i64,
            nickname: String,
            email: String,
            phone: Option<String>,
            hashed_password: String,
            is_active: bool,
            is_staff: bool,
            created_at: chrono::DateTime<chrono::Utc>,
        }

        let rows: Vec<SharedUserRow> = sqlx::query_as(
            "SELECT u.id, u.nickname, u.email, u.phone, u.hashed_password,
                    u.is_active, u.is_staff, u.created_at
             FROM users u
             JOIN account_shares s ON s.user_id = u.id
             WHERE s.account_id = $1
             ORDER BY u.id",
        )
        .bind(account_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| User {
                id: row.id,
                nickname: row.nickname,
                email: row.email,
                phone: row.phone,
                hashed_password: row.hashed_password,
                is_active: row.is_active,
                is_staff: row.is_staff,
                created_at: row.created_at,
            })
            .collect())
    }

    async fn delete_account(
        &self,
        id: i64,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query("DELETE FROM seller_accounts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
