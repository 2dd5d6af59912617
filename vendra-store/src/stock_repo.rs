use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::repository::StockRepository;
use vendra_core::stock::StockSnapshot;

pub struct StoreStockRepository {
    pool: PgPool,
}

impl StoreStockRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StockRepository for StoreStockRepository {
    async fn upsert_stock(
        &self,
        stock: &StockSnapshot,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        sqlx::query(
            "INSERT INTO stock_snapshots (account_id, nm_id, supplier_article, warehouse_name,
                 last_change_date, barcode, quantity, in_way_to_client, in_way_from_client,
                 quantity_full, category, tech_size, is_supply, is_realization, sc_code, synced_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
             ON CONFLICT (nm_id, account_id, supplier_article, warehouse_name) DO UPDATE SET
                 last_change_date = EXCLUDED.last_change_date,
                 barcode = EXCLUDED.barcode,
                 quantity = EXCLUDED.quantity,
                 in_way_to_client = EXCLUDED.in_way_to_client,
                 in_way_from_client = EXCLUDED.in_way_from_client,
                 quantity_full = EXCLUDED.quantity_full,
                 category = EXCLUDED.category,
                 tech_size = EXCLUDED.tech_size,
                 is_supply = EXCLUDED.is_supply,
                 is_realization = EXCLUDED.is_realization,
                 sc_code = EXCLUDED.sc_code,
                 synced_at = EXCLUDED.synced_at",
        )
        .bind(stock.account_id)
        .bind(stock.nm_id)
        .bind(&stock.supplier_article)
        .bind(&stock.warehouse_name)
        .bind(stock.last_change_date)
        .bind(stock.barcode)
        .bind(stock.quantity)
        .bind(stock.in_way_to_client)
        .bind(stock.in_way_from_client)
        .bind(stock.quantity_full)
        .bind(&stock.category)
        .bind(&stock.tech_size)
        .bind(stock.is_supply)
        .bind(stock.is_realization)
        .bind(&stock.sc_code)
        .bind(stock.synced_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
