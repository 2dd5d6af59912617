use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::card::ProductCard;
use vendra_core::repository::CardRepository;

pub struct StoreCardRepository {
    pool: PgPool,
}

impl StoreCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct CardRow {
    account_id: i64,
    nm_id: i64,
    imt_id: i64,
    nm_uuid: uuid::Uuid,
    subject_id: i64,
    subject_name: String,
    vendor_code: String,
    brand: String,
    title: String,
    description: String,
    need_kiz: bool,
    dimensions: serde_json::Value,
    characteristics: serde_json::Value,
    sizes: serde_json::Value,
    is_active: bool,
    created_at: chrono::NaiveDateTime,
    updated_at: chrono::NaiveDateTime,
    synced_at: chrono::NaiveDateTime,
}

impl From<CardRow> for ProductCard {
    fn from(row: CardRow) -> Self {
        ProductCard {
            account_id: row.account_id,
            nm_id: row.nm_id,
            imt_id: row.imt_id,
            nm_uuid: row.nm_uuid,
            subject_id: row.subject_id,
            subject_name: row.subject_name,
            vendor_code: row.vendor_code,
            brand: row.brand,
            title: row.title,
            description: row.description,
            need_kiz: row.need_kiz,
            dimensions: row.dimensions,
            characteristics: row.characteristics,
            sizes: row.sizes,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            synced_at: row.synced_at,
        }
    }
}

const CARD_COLUMNS: &str = "account_id, nm_id, imt_id, nm_uuid, subject_id, subject_name, \
     vendor_code, brand, title, description, need_kiz, dimensions, characteristics, sizes, \
     is_active, created_at, updated_at, synced_at";

#[async_trait]
impl CardRepository for StoreCardRepository {
    async fn upsert_card(
        &self,
        card: &ProductCard,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // The update arm never touches is_active: a card deactivated by an
        // operator stays deactivated through subsequent syncs.
        sqlx::query(&format!(
            "INSERT INTO product_cards ({CARD_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18)
             ON CONFLICT (nm_id, account_id) DO UPDATE SET
                 imt_id = EXCLUDED.imt_id,
                 nm_uuid = EXCLUDED.nm_uuid,
                 subject_id = EXCLUDED.subject_id,
                 subject_name = EXCLUDED.subject_name,
                 vendor_code = EXCLUDED.vendor_code,
                 brand = EXCLUDED.brand,
                 title = EXCLUDED.title,
                 description = EXCLUDED.description,
                 need_kiz = EXCLUDED.need_kiz,
                 dimensions = EXCLUDED.dimensions,
                 characteristics = EXCLUDED.characteristics,
                 sizes = EXCLUDED.sizes,
                 updated_at = EXCLUDED.updated_at,
                 synced_at = EXCLUDED.synced_at"
        ))
        .bind(card.account_id)
        .bind(card.nm_id)
        .bind(card.imt_id)
        .bind(card.nm_uuid)
        .bind(card.subject_id)
        .bind(&card.subject_name)
        .bind(&card.vendor_code)
        .bind(&card.brand)
        .bind(&card.title)
        .bind(&card.description)
        .bind(card.need_kiz)
        .bind(&card.dimensions)
        .bind(&card.characteristics)
        .bind(&card.sizes)
        .bind(card.is_active)
        .bind(card.created_at)
        .bind(card.updated_at)
        .bind(card.synced_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn list_cards(
        &self,
        account_id: Option<i64>,
    ) -> Result<Vec<ProductCard>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<CardRow> = match account_id {
            Some(id) => {
                sqlx::query_as(&format!(
                    "SELECT {CARD_COLUMNS} FROM product_cards
                     WHERE account_id = $1 ORDER BY nm_id"
                ))
                .bind(id)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as(&format!(
                    "SELECT {CARD_COLUMNS} FROM product_cards ORDER BY account_id, nm_id"
                ))
                .fetch_all(&self.pool)
                .await?
            }
        };

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn set_card_active(
        &self,
        account_id: i64,
        nm_id: i64,
        is_active: bool,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "UPDATE product_cards SET is_active = $3 WHERE account_id = $1 AND nm_id = $2",
        )
        .bind(account_id)
        .bind(nm_id)
        .bind(is_active)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
