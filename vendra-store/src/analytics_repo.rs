use async_trait::async_trait;
use sqlx::PgPool;

use vendra_core::analytics::{DateRange, DayCount, OrdersChart, ProductStat};
use vendra_core::repository::AnalyticsRepository;

pub struct StoreAnalyticsRepository {
    pool: PgPool,
}

impl StoreAnalyticsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(sqlx::FromRow)]
struct DayRow {
    day: chrono::NaiveDate,
    count: i64,
}

#[derive(sqlx::FromRow)]
struct TotalsRow {
    total_orders: i64,
    total_sales: f64,
}

#[derive(sqlx::FromRow)]
struct ProductStatRow {
    nm_id: i64,
    vendor_code: String,
    brand: String,
    title: String,
    subject_name: String,
    orders: i64,
    quantity: i64,
    orders_7d: i64,
}

#[async_trait]
impl AnalyticsRepository for StoreAnalyticsRepository {
    async fn orders_chart(
        &self,
        range: DateRange,
        account_ids: &[i64],
    ) -> Result<OrdersChart, Box<dyn std::error::Error + Send + Sync>> {
        if account_ids.is_empty() {
            return Ok(OrdersChart { data: Vec::new(), total_orders: 0, total_sales: 0.0 });
        }

        let days: Vec<DayRow> = sqlx::query_as(
            "SELECT date::date AS day, COUNT(*)::BIGINT AS count
             FROM orders
             WHERE account_id = ANY($1) AND date::date BETWEEN $2 AND $3
             GROUP BY day
             ORDER BY day",
        )
        .bind(account_ids)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        let totals: TotalsRow = sqlx::query_as(
            "SELECT COUNT(*)::BIGINT AS total_orders,
                    COALESCE(SUM(price_with_disc), 0)::DOUBLE PRECISION AS total_sales
             FROM orders
             WHERE account_id = ANY($1) AND date::date BETWEEN $2 AND $3",
        )
        .bind(account_ids)
        .bind(range.from)
        .bind(range.to)
        .fetch_one(&self.pool)
        .await?;

        Ok(OrdersChart {
            data: days
                .into_iter()
                .map(|row| DayCount { date: row.day, count: row.count })
                .collect(),
            total_orders: totals.total_orders,
            total_sales: totals.total_sales,
        })
    }

    async fn total_stocks(
        &self,
        account_ids: &[i64],
    ) -> Result<i64, Box<dyn std::error::Error + Send + Sync>> {
        if account_ids.is_empty() {
            return Ok(0);
        }

        let total: i64 = sqlx::query_scalar(
            "SELECT COALESCE(SUM(quantity), 0)::BIGINT
             FROM stock_snapshots WHERE account_id = ANY($1)",
        )
        .bind(account_ids)
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn product_stats(
        &self,
        range: DateRange,
        account_ids: &[i64],
    ) -> Result<Vec<ProductStat>, Box<dyn std::error::Error + Send + Sync>> {
        if account_ids.is_empty() {
            return Ok(Vec::new());
        }

        // One row per card; orders in the requested range, current stock
        // across warehouses and the trailing-7-day order count come in via
        // correlated scalar subqueries so cards with no activity still show.
        let rows: Vec<ProductStatRow> = sqlx::query_as(
            "SELECT c.nm_id, c.vendor_code, c.brand, c.title, c.subject_name,
                    (SELECT COUNT(*)::BIGINT FROM orders o
                     WHERE o.nm_id = c.nm_id AND o.account_id = c.account_id
                       AND o.date::date BETWEEN $2 AND $3) AS orders,
                    (SELECT COALESCE(SUM(s.quantity), 0)::BIGINT FROM stock_snapshots s
                     WHERE s.nm_id = c.nm_id AND s.account_id = c.account_id) AS quantity,
                    (SELECT COUNT(*)::BIGINT FROM orders o
                     WHERE o.nm_id = c.nm_id AND o.account_id = c.account_id
                       AND o.date::date > $3 - 7 AND o.date::date <= $3) AS orders_7d
             FROM product_cards c
             WHERE c.account_id = ANY($1) AND c.is_active
             ORDER BY c.nm_id",
        )
        .bind(account_ids)
        .bind(range.from)
        .bind(range.to)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let orders_per_day_7d = row.orders_7d as f64 / 7.0;
                let days_of_stock = ProductStat::days_of_stock(row.quantity, orders_per_day_7d);
                ProductStat {
                    nmid: row.nm_id,
                    vendorcode: row.vendor_code,
                    brand: row.brand,
                    title: row.title,
                    subjectname: row.subject_name,
                    orders: row.orders,
                    quantity: row.quantity,
                    orders_per_day_7d,
                    days_of_stock,
                }
            })
            .collect())
    }
}
