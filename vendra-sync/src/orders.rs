use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use vendra_client::{Hosts, WbClient, WbOrder};
use vendra_core::order::OrderRecord;
use vendra_core::repository::{AccountRepository, OrderRepository};
use vendra_core::time::msk_today;

use crate::jobs::SyncOutcome;

/// Warehouse names the marketplace prefixes for virtual stock placements;
/// order lines from both flavors should read as the same warehouse.
const VIRTUAL_WAREHOUSE_PREFIX: &str = "Виртуальный ";

/// Pulls the trailing order window for every account and upserts each line
/// on `(nm_id, account_id, srid)`.
pub struct OrdersSync {
    accounts: Arc<dyn AccountRepository>,
    orders: Arc<dyn OrderRepository>,
    hosts: Hosts,
    window_days: i64,
}

impl OrdersSync {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        orders: Arc<dyn OrderRepository>,
        hosts: Hosts,
        window_days: i64,
    ) -> Self {
        Self { accounts, orders, hosts, window_days }
    }

    pub async fn run(&self) -> Result<SyncOutcome, Box<dyn std::error::Error + Send + Sync>> {
        // Window starts at MSK midnight so re-runs inside a day fetch the
        // same span and land on the same rows.
        let date_from = (msk_today() - Duration::days(self.window_days))
            .and_hms_opt(0, 0, 0)
            .ok_or("invalid window start")?;

        let mut outcome = SyncOutcome::default();
        for account in self.accounts.list_all().await? {
            let client = match WbClient::with_hosts(account.token.clone(), self.hosts.clone()) {
                Ok(client) => client,
                Err(err) => {
                    warn!(account_id = account.id, %err, "orders sync: client build failed");
                    outcome.accounts_failed += 1;
                    continue;
                }
            };

            let lines = match client.fetch_orders(date_from, 0).await {
                Ok(lines) => lines,
                Err(err) => {
                    warn!(account_id = account.id, %err, "orders sync: fetch failed");
                    outcome.accounts_failed += 1;
                    continue;
                }
            };

            let fetched = lines.len();
            for line in lines {
                let record = map_order(account.id, line);
                self.orders.upsert_order(&record).await?;
                outcome.rows_written += 1;
            }
            info!(account_id = account.id, fetched, "orders sync: account done");
            outcome.accounts_ok += 1;
        }
        Ok(outcome)
    }
}

fn map_order(account_id: i64, line: WbOrder) -> OrderRecord {
    let barcode = line.barcode_num();
    let cancel_date = line.effective_cancel_date();
    let warehouse_name = line
        .warehouse_name
        .strip_prefix(VIRTUAL_WAREHOUSE_PREFIX)
        .map(str::to_string)
        .unwrap_or(line.warehouse_name);
    OrderRecord {
        account_id,
        nm_id: line.nm_id,
        srid: line.srid,
        date: line.date,
        last_change_date: line.last_change_date,
        warehouse_name,
        warehouse_type: line.warehouse_type,
        country_name: line.country_name,
        oblast_okrug_name: line.oblast_okrug_name,
        region_name: line.region_name,
        supplier_article: line.supplier_article,
        barcode,
        category: line.category,
        subject: line.subject,
        brand: line.brand,
        tech_size: line.tech_size,
        income_id: line.income_id,
        is_supply: line.is_supply,
        is_realization: line.is_realization,
        total_price: line.total_price,
        discount_percent: line.discount_percent,
        spp: line.spp,
        finished_price: line.finished_price,
        price_with_disc: line.price_with_disc,
        is_cancel: line.is_cancel,
        cancel_date,
        sticker: line.sticker,
        g_number: line.g_number,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{FakeAccountRepo, FakeOrderRepo};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn order_json(srid: &str, cancel_date: &str) -> serde_json::Value {
        serde_json::json!({
            "date": "2024-05-12T09:15:00",
            "lastChangeDate": "2024-05-12T10:00:00",
            "warehouseName": "Коледино",
            "warehouseType": "Склад WB",
            "countryName": "Россия",
            "oblastOkrugName": "ЦФО",
            "regionName": "Московская",
            "supplierArticle": "ART-1",
            "nmId": 123456,
            "barcode": "2000000000001",
            "category": "Одежда",
            "subject": "Футболки",
            "brand": "Acme",
            "techSize": "M",
            "incomeID": 42,
            "isSupply": false,
            "isRealization": true,
            "totalPrice": 1500.0,
            "discountPercent": 20,
            "spp": 5,
            "finishedPrice": 1140.0,
            "priceWithDisc": 1200.0,
            "isCancel": false,
            "cancelDate": cancel_date,
            "sticker": "",
            "gNumber": "G-1",
            "srid": srid
        })
    }

    #[tokio::test]
    async fn syncs_every_account_and_maps_sentinel_cancel_date() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .and(query_param("flag", "0"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![
                order_json("sr-1", "0001-01-01T00:00:00"),
                order_json("sr-2", "2024-05-13T08:00:00"),
            ]))
            .expect(2)
            .mount(&server)
            .await;

        let accounts = Arc::new(FakeAccountRepo::with_accounts(&[1, 2]));
        let orders = Arc::new(FakeOrderRepo::default());
        let sync = OrdersSync::new(
            accounts,
            orders.clone(),
            crate::testutil::hosts_for(&server),
            14,
        );

        let outcome = sync.run().await.unwrap();
        assert_eq!(outcome.accounts_ok, 2);
        assert_eq!(outcome.accounts_failed, 0);
        assert_eq!(outcome.rows_written, 4);

        let stored = orders.records();
        assert_eq!(stored.len(), 4);
        let sr1 = stored.iter().find(|o| o.srid == "sr-1" && o.account_id == 1).unwrap();
        assert_eq!(sr1.cancel_date, None);
        assert_eq!(sr1.barcode, Some(2000000000001));
        let sr2 = stored.iter().find(|o| o.srid == "sr-2" && o.account_id == 1).unwrap();
        assert!(sr2.cancel_date.is_some());
    }

    #[tokio::test]
    async fn virtual_warehouse_prefix_is_stripped_from_order_lines() {
        let mut virtual_line = order_json("sr-1", "0001-01-01T00:00:00");
        virtual_line["warehouseName"] = serde_json::json!("Виртуальный Коледино");
        let physical_line = order_json("sr-2", "0001-01-01T00:00:00");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(vec![virtual_line, physical_line]),
            )
            .expect(1)
            .mount(&server)
            .await;

        let accounts = Arc::new(FakeAccountRepo::with_accounts(&[1]));
        let orders = Arc::new(FakeOrderRepo::default());
        let sync = OrdersSync::new(
            accounts,
            orders.clone(),
            crate::testutil::hosts_for(&server),
            14,
        );

        sync.run().await.unwrap();

        let stored = orders.records();
        let virtual_order = stored.iter().find(|o| o.srid == "sr-1").unwrap();
        assert_eq!(virtual_order.warehouse_name, "Коледино");
        assert!(!stored.iter().any(|o| o.warehouse_name.starts_with("Виртуальный")));
    }

    #[tokio::test]
    async fn rerun_overwrites_rows_but_leaves_cancelled_orders_alone() {
        let mut open_line = order_json("sr-open", "0001-01-01T00:00:00");
        open_line["priceWithDisc"] = serde_json::json!(1200.0);
        let cancelled_line = order_json("sr-cancelled", "2024-05-13T08:00:00");

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(vec![open_line.clone(), cancelled_line.clone()]),
            )
            .up_to_n_times(1)
            .mount(&server)
            .await;

        let accounts = Arc::new(FakeAccountRepo::with_accounts(&[1]));
        let orders = Arc::new(FakeOrderRepo::default());
        let sync = OrdersSync::new(
            accounts,
            orders.clone(),
            crate::testutil::hosts_for(&server),
            14,
        );

        sync.run().await.unwrap();

        // Second window: the open order repriced, the cancelled one mutated
        // upstream. Only the open order may change.
        let mut repriced = open_line;
        repriced["priceWithDisc"] = serde_json::json!(990.0);
        let mut mutated = cancelled_line;
        mutated["priceWithDisc"] = serde_json::json!(1.0);
        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .respond_with(ResponseTemplate::new(200).set_body_json(vec![repriced, mutated]))
            .mount(&server)
            .await;

        sync.run().await.unwrap();

        let stored = orders.records();
        assert_eq!(stored.len(), 2, "re-running the window must not duplicate rows");
        let open = stored.iter().find(|o| o.srid == "sr-open").unwrap();
        assert_eq!(open.price_with_disc, 990.0);
        let cancelled = stored.iter().find(|o| o.srid == "sr-cancelled").unwrap();
        assert_eq!(cancelled.price_with_disc, 1200.0);
    }

    #[tokio::test]
    async fn failed_account_is_skipped_not_fatal() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/supplier/orders"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let accounts = Arc::new(FakeAccountRepo::with_accounts(&[1, 2]));
        let orders = Arc::new(FakeOrderRepo::default());
        let sync = OrdersSync::new(
            accounts,
            orders.clone(),
            crate::testutil::hosts_for(&server),
            14,
        );

        let outcome = sync.run().await.unwrap();
        assert_eq!(outcome.accounts_ok, 0);
        assert_eq!(outcome.accounts_failed, 2);
        assert!(orders.records().is_empty());
    }
}
