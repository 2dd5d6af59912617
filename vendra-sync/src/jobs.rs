//! Job definitions for the sync scheduler.

use std::time::Duration;

use chrono::NaiveDateTime;

use vendra_store::app_config::SyncConfig;

/// A named periodic job with its schedule and an upper bound on one run.
#[derive(Debug, Clone)]
pub struct JobSpec {
    pub name: &'static str,
    pub interval: Duration,
    pub timeout: Duration,
}

impl JobSpec {
    /// Key identifying one run; logged so overlapping or retried runs of the
    /// same cycle can be correlated across the scheduler and the jobs.
    pub fn idempotency_key(&self, started: NaiveDateTime) -> String {
        format!("{}-{}", self.name, started.format("%Y%m%dT%H%M%S"))
    }
}

pub fn orders_job(cfg: &SyncConfig) -> JobSpec {
    JobSpec {
        name: "orders-sync",
        interval: Duration::from_secs(cfg.orders_interval_secs),
        timeout: Duration::from_secs(cfg.job_timeout_secs),
    }
}

pub fn cards_job(cfg: &SyncConfig) -> JobSpec {
    JobSpec {
        name: "cards-sync",
        interval: Duration::from_secs(cfg.cards_interval_secs),
        timeout: Duration::from_secs(cfg.job_timeout_secs),
    }
}

pub fn stocks_job(cfg: &SyncConfig) -> JobSpec {
    JobSpec {
        name: "stocks-sync",
        interval: Duration::from_secs(cfg.stocks_interval_secs),
        timeout: Duration::from_secs(cfg.job_timeout_secs),
    }
}

/// What one job run accomplished, for the scheduler's summary log line.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SyncOutcome {
    pub accounts_ok: usize,
    pub accounts_failed: usize,
    pub rows_written: usize,
}
