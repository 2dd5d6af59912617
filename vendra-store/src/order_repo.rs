use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::order::OrderRecord;
use vendra_core::repository::OrderRepository;

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    account_id: i64,
    nm_id: i64,
    srid: String,
    date: chrono::NaiveDateTime,
    last_change_date: chrono::NaiveDateTime,
    warehouse_name: String,
    warehouse_type: String,
    country_name: String,
    oblast_okrug_name: String,
    region_name: String,
    supplier_article: String,
    barcode: Option<i64>,
    category: String,
    subject: String,
    brand: String,
    tech_size: String,
    income_id: i64,
    is_supply: bool,
    is_realization: bool,
    total_price: f64,
    discount_percent: f64,
    spp: f64,
    finished_price: f64,
    price_with_disc: f64,
    is_cancel: bool,
    cancel_date: Option<chrono::NaiveDateTime>,
    sticker: String,
    g_number: String,
}

impl From<OrderRow> for OrderRecord {
    fn from(row: OrderRow) -> Self {
        OrderRecord {
            account_id: row.account_id,
            nm_id: row.nm_id,
            srid: row.srid,
            date: row.date,
            last_change_date: row.last_change_date,
            warehouse_name: row.warehouse_name,
            warehouse_type: row.warehouse_type,
            country_name: row.country_name,
            oblast_okrug_name: row.oblast_okrug_name,
            region_name: row.region_name,
            supplier_article: row.supplier_article,
            barcode: row.barcode,
            category: row.category,
            subject: row.subject,
            brand: row.brand,
            tech_size: row.tech_size,
            income_id: row.income_id,
            is_supply: row.is_supply,
            is_realization: row.is_realization,
            total_price: row.total_price,
            discount_percent: row.discount_percent,
            spp: row.spp,
            finished_price: row.finished_price,
            price_with_disc: row.price_with_disc,
            is_cancel: row.is_cancel,
            cancel_date: row.cancel_date,
            sticker: row.sticker,
            g_number: row.g_number,
        }
    }
}

const ORDER_COLUMNS: &str = "account_id, nm_id, srid, date, last_change_date, warehouse_name, \
     warehouse_type, country_name, oblast_okrug_name, region_name, supplier_article, barcode, \
     category, subject, brand, tech_size, income_id, is_supply, is_realization, total_price, \
     discount_percent, spp, finished_price, price_with_disc, is_cancel, cancel_date, sticker, \
     g_number";

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn upsert_order(
        &self,
        order: &OrderRecord,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        // Cancelled rows are terminal: the WHERE guard on the update arm
        // keeps later syncs from resurrecting or mutating them.
        let sql = format!(
            "INSERT INTO orders ({ORDER_COLUMNS})
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                     $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27, $28)
             ON CONFLICT (nm_id, account_id, srid) DO UPDATE SET
                 last_change_date = EXCLUDED.last_change_date,
                 warehouse_name = EXCLUDED.warehouse_name,
                 warehouse_type = EXCLUDED.warehouse_type,
                 total_price = EXCLUDED.total_price,
                 discount_percent = EXCLUDED.discount_percent,
                 spp = EXCLUDED.spp,
                 finished_price = EXCLUDED.finished_price,
                 price_with_disc = EXCLUDED.price_with_disc,
                 is_cancel = EXCLUDED.is_cancel,
                 cancel_date = EXCLUDED.cancel_date,
                 sticker = EXCLUDED.sticker
             WHERE orders.cancel_date IS NULL"
        );

        sqlx::query(&sql)
            .bind(order.account_id)
            .bind(order.nm_id)
            .bind(&order.srid)
            .bind(order.date)
            .bind(order.last_change_date)
            .bind(&order.warehouse_name)
            .bind(&order.warehouse_type)
            .bind(&order.country_name)
            .bind(&order.oblast_okrug_name)
            .bind(&order.region_name)
            .bind(&order.supplier_article)
            .bind(order.barcode)
            .bind(&order.category)
            .bind(&order.subject)
            .bind(&order.brand)
            .bind(&order.tech_size)
            .bind(order.income_id)
            .bind(order.is_supply)
            .bind(order.is_realization)
            .bind(order.total_price)
            .bind(order.discount_percent)
            .bind(order.spp)
            .bind(order.finished_price)
            .bind(order.price_with_disc)
            .bind(order.is_cancel)
            .bind(order.cancel_date)
            .bind(&order.sticker)
            .bind(&order.g_number)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn list_recent(
        &self,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<OrderRecord>, Box<dyn std::error::Error + Send + Sync>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY date DESC LIMIT $1 OFFSET $2"
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}
