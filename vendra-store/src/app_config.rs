use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

/// Schedules for the periodic marketplace sync jobs, in seconds.
#[derive(Debug, Deserialize, Clone)]
pub struct SyncConfig {
    pub orders_interval_secs: u64,
    pub cards_interval_secs: u64,
    pub stocks_interval_secs: u64,
    /// Hard deadline for one job invocation.
    pub job_timeout_secs: u64,
    /// Trailing window the orders sync re-reads each run.
    pub orders_window_days: i64,
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            .add_source(config::File::with_name("config/local").required(false))
            // `VENDRA__DATABASE__URL=...` overrides `database.url`
            .add_source(config::Environment::with_prefix("VENDRA").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
