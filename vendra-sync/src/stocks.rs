use std::sync::Arc;

use chrono::Duration;
use tracing::{info, warn};

use vendra_client::{Hosts, WbClient, WbStock};
use vendra_core::repository::{AccountRepository, StockRepository};
use vendra_core::stock::StockSnapshot;
use vendra_core::time::msk_now;

use crate::jobs::SyncOutcome;

/// Pulls current stock levels for every account and overwrites the snapshot
/// rows on `(nm_id, account_id, supplier_article, warehouse_name)`.
pub struct StocksSync {
    accounts: Arc<dyn AccountRepository>,
    stocks: Arc<dyn StockRepository>,
    hosts: Hosts,
}

impl StocksSync {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        stocks: Arc<dyn StockRepository>,
        hosts: Hosts,
    ) -> Self {
        Self { accounts, stocks, hosts }
    }

    pub async fn run(&self) -> Result<SyncOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let date_from = msk_now() - Duration::days(1);

        let mut outcome = SyncOutcome::default();
        for account in self.accounts.list_all().await? {
            let client = match WbClient::with_hosts(account.token.clone(), self.hosts.clone()) {
                Ok(client) => client,
                Err(err) => {
                    warn!(account_id = account.id, %err, "stocks sync: client build failed");
                    outcome.accounts_failed += 1;
                    continue;
                }
            };

            let lines = match client.fetch_stocks(date_from).await {
                Ok(lines) => lines,
                Err(err) => {
                    warn!(account_id = account.id, %err, "stocks sync: fetch failed");
                    outcome.accounts_failed += 1;
                    continue;
                }
            };

            let fetched = lines.len();
            let synced_at = msk_now();
            for line in lines {
                let snapshot = map_stock(account.id, line, synced_at);
                self.stocks.upsert_stock(&snapshot).await?;
                outcome.rows_written += 1;
            }
            info!(account_id = account.id, fetched, "stocks sync: account done");
            outcome.accounts_ok += 1;
        }
        Ok(outcome)
    }
}

fn map_stock(account_id: i64, line: WbStock, synced_at: chrono::NaiveDateTime) -> StockSnapshot {
    let barcode = line.barcode_num();
    StockSnapshot {
        account_id,
        nm_id: line.nm_id,
        supplier_article: line.supplier_article,
        // Kept verbatim: the name is part of the snapshot's natural key, so
        // a virtual and a physical warehouse must stay distinct rows.
        warehouse_name: line.warehouse_name,
        last_change_date: line.last_change_date,
        barcode,
        quantity: line.quantity,
        in_way_to_client: line.in_way_to_client,
        in_way_from_client: line.in_way_from_client,
        quantity_full: line.quantity_full,
        category: line.category,
        tech_size: line.tech_size,
        is_supply: line.is_supply,
        is_realization: line.is_realization,
        sc_code: line.sc_code,
        synced_at,
    }
}
