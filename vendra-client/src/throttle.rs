use std::collections::HashMap;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;

use crate::endpoint::RateBucket;

/// Per-account request shaper.
///
/// Remembers the last send instant per rate bucket and sleeps out the rest of
/// the budget before the next request in that bucket goes on the wire. There
/// is exactly one in-flight request per account, so a plain mutex around the
/// map is enough.
#[derive(Debug, Default)]
pub struct Throttle {
    last_sent: Mutex<HashMap<RateBucket, Instant>>,
}

impl Throttle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until the bucket's budget allows another request, then records
    /// the send instant.
    pub async fn acquire(&self, bucket: RateBucket) {
        self.acquire_with_budget(bucket, bucket.budget()).await;
    }

    async fn acquire_with_budget(&self, bucket: RateBucket, budget: Duration) {
        let mut last_sent = self.last_sent.lock().await;
        let now = Instant::now();
        if let Some(last) = last_sent.get(&bucket) {
            let elapsed = now.duration_since(*last);
            if elapsed < budget {
                let wait = budget - elapsed;
                tracing::debug!(?bucket, wait_ms = wait.as_millis() as u64, "rate budget reached, waiting");
                tokio::time::sleep(wait).await;
            }
        }
        last_sent.insert(bucket, Instant::now());
    }
}
