use std::sync::Arc;

use tracing::{info, warn};

use vendra_client::endpoint::CARDS_PAGE_LIMIT;
use vendra_client::{CardCursor, Hosts, WbCard, WbClient};
use vendra_core::card::ProductCard;
use vendra_core::repository::{AccountRepository, CardRepository};
use vendra_core::time::{msk_now, msk_now_from};

use crate::jobs::SyncOutcome;

/// Walks the content-API cards listing for every account, one cursor page at
/// a time, and upserts on `(nm_id, account_id)`.
pub struct CardsSync {
    accounts: Arc<dyn AccountRepository>,
    cards: Arc<dyn CardRepository>,
    hosts: Hosts,
}

impl CardsSync {
    pub fn new(
        accounts: Arc<dyn AccountRepository>,
        cards: Arc<dyn CardRepository>,
        hosts: Hosts,
    ) -> Self {
        Self { accounts, cards, hosts }
    }

    pub async fn run(&self) -> Result<SyncOutcome, Box<dyn std::error::Error + Send + Sync>> {
        let mut outcome = SyncOutcome::default();
        for account in self.accounts.list_all().await? {
            match self.sync_account(&account.token, account.id, &mut outcome).await {
                Ok(fetched) => {
                    info!(account_id = account.id, fetched, "cards sync: account done");
                    outcome.accounts_ok += 1;
                }
                Err(AccountError::Client(err)) => {
                    warn!(account_id = account.id, %err, "cards sync: account failed");
                    outcome.accounts_failed += 1;
                }
                Err(AccountError::Store(err)) => return Err(err),
            }
        }
        Ok(outcome)
    }

    async fn sync_account(
        &self,
        token: &str,
        account_id: i64,
        outcome: &mut SyncOutcome,
    ) -> Result<usize, AccountError> {
        let client = WbClient::with_hosts(token, self.hosts.clone())
            .map_err(|err| AccountError::Client(err.into()))?;

        let mut cursor = CardCursor::default();
        let mut fetched = 0;
        loop {
            let page = client
                .fetch_cards_page(cursor.clone())
                .await
                .map_err(|err| AccountError::Client(err.into()))?;

            fetched += page.cards.len();
            let synced_at = msk_now();
            for card in page.cards {
                let record = map_card(account_id, card, synced_at);
                self.cards
                    .upsert_card(&record)
                    .await
                    .map_err(AccountError::Store)?;
                outcome.rows_written += 1;
            }

            // A page shorter than the limit is the last one.
            if page.cursor.total < CARDS_PAGE_LIMIT as i64 {
                break;
            }
            cursor = CardCursor {
                updated_at: page.cursor.updated_at,
                nm_id: page.cursor.nm_id,
            };
        }
        Ok(fetched)
    }
}

enum AccountError {
    Client(Box<dyn std::error::Error + Send + Sync>),
    Store(Box<dyn std::error::Error + Send + Sync>),
}

fn map_card(account_id: i64, card: WbCard, synced_at: chrono::NaiveDateTime) -> ProductCard {
    ProductCard {
        account_id,
        nm_id: card.nm_id,
        imt_id: card.imt_id,
        nm_uuid: card.nm_uuid,
        subject_id: card.subject_id,
        subject_name: card.subject_name,
        vendor_code: card.vendor_code,
        brand: card.brand,
        title: card.title,
        description: card.description,
        need_kiz: card.need_kiz,
        dimensions: card.dimensions,
        characteristics: card.characteristics,
        sizes: card.sizes,
        is_active: true,
        created_at: msk_now_from(card.created_at),
        updated_at: msk_now_from(card.updated_at),
        synced_at,
    }
}
