//! Server configuration

/// Server configuration, loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// order-changed notification throttle window, milliseconds
    pub order_throttle_ms: u64,
    /// data-changed notification throttle window, milliseconds
    pub data_throttle_ms: u64,
    /// Session lifetime, seconds
    pub session_ttl_secs: u64,
    /// Environment: development | production
    pub environment: String,
}

fn env_parse<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, String> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| "DATABASE_URL must be set".to_string())?,
            http_port: env_parse("HTTP_PORT", 8080),
            order_throttle_ms: env_parse("ORDER_THROTTLE_MS", 5_000),
            data_throttle_ms: env_parse("DATA_THROTTLE_MS", 10_000),
            session_ttl_secs: env_parse("SESSION_TTL_SECS", 12 * 60 * 60),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".into()),
        })
    }
}
