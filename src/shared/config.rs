use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub network: NetworkConfig,
    pub sync: SyncConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Base URL of the remote API server; push endpoints and the liveness
    /// probe path are resolved against it.
    pub base_url: String,
    pub probe_timeout_secs: u64,
    pub push_timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Minutes between periodic sync passes while online.
    pub interval_minutes: u64,
    /// Attempt ceiling after which an outbox entry is abandoned.
    pub max_attempts: u32,
    /// Maximum pending entries fetched per pass.
    pub pass_limit: u32,
    /// Days a completed entry is retained before the cleanup sweep removes it.
    pub retention_days: i64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig {
                url: "sqlite:data/krushimind.db".to_string(),
                max_connections: 5,
            },
            network: NetworkConfig {
                base_url: "http://localhost:3000".to_string(),
                probe_timeout_secs: 3,
                push_timeout_secs: 10,
            },
            sync: SyncConfig::default(),
        }
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            interval_minutes: 15,
            max_attempts: 5,
            pass_limit: 50,
            retention_days: 7,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("KRUSHIMIND_DATABASE_URL") {
            if !v.trim().is_empty() {
                cfg.database.url = v;
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_API_BASE_URL") {
            if !v.trim().is_empty() {
                cfg.network.base_url = v;
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_PROBE_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.network.probe_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_PUSH_TIMEOUT_SECS") {
            if let Some(value) = parse_u64(&v) {
                cfg.network.push_timeout_secs = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_SYNC_INTERVAL_MINUTES") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.interval_minutes = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_MAX_SYNC_ATTEMPTS") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.max_attempts = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_SYNC_PASS_LIMIT") {
            if let Some(value) = parse_u32(&v) {
                cfg.sync.pass_limit = value.max(1);
            }
        }
        if let Ok(v) = std::env::var("KRUSHIMIND_RETENTION_DAYS") {
            if let Some(value) = parse_u64(&v) {
                cfg.sync.retention_days = value as i64;
            }
        }

        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.database.max_connections == 0 {
            return Err("Database max_connections must be greater than 0".to_string());
        }
        if self.network.base_url.trim().is_empty() {
            return Err("Network base_url must not be empty".to_string());
        }
        if self.sync.interval_minutes == 0 {
            return Err("Sync interval_minutes must be greater than 0".to_string());
        }
        if self.sync.max_attempts == 0 {
            return Err("Sync max_attempts must be greater than 0".to_string());
        }
        if self.sync.pass_limit == 0 {
            return Err("Sync pass_limit must be greater than 0".to_string());
        }
        Ok(())
    }
}

fn parse_u64(value: &str) -> Option<u64> {
    value.trim().parse::<u64>().ok()
}

fn parse_u32(value: &str) -> Option<u32> {
    value.trim().parse::<u32>().ok()
}
