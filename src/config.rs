use anyhow::Result;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub scheduler_url: String,
    pub scheduler_timeout_secs: u64,
    pub session_ttl_secs: u64,
    pub max_sessions: u64,
    pub host: String,
    pub port: u16,
    pub environment: String,
    pub client_base_url: String,
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parsed_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_env_only()
    }

    /// Load configuration from environment variables only (without loading .env files)
    /// This is useful for testing where you want to control the environment directly
    pub fn from_env_only() -> Result<Self> {
        let port = parsed_or("PORT", 8080);
        if port == 0 {
            anyhow::bail!("PORT must be a non-zero port number");
        }

        Ok(Config {
            database_url: var_or("DATABASE_URL", "sqlite:./presets.db"),
            scheduler_url: var_or("SCHEDULER_URL", "http://127.0.0.1:8000"),
            scheduler_timeout_secs: parsed_or("SCHEDULER_TIMEOUT_SECS", 120),
            session_ttl_secs: parsed_or("SESSION_TTL_SECS", 3600),
            max_sessions: parsed_or("MAX_SESSIONS", 1000),
            host: var_or("HOST", "127.0.0.1"),
            port,
            environment: var_or("ENVIRONMENT", "development"),
            client_base_url: var_or("CLIENT_BASE_URL", "http://localhost:3000"),
        })
    }

    pub fn test_config() -> Self {
        Config {
            database_url: "sqlite::memory:".to_string(),
            scheduler_url: "http://127.0.0.1:9".to_string(),
            scheduler_timeout_secs: 5,
            session_ttl_secs: 60,
            max_sessions: 100,
            host: "127.0.0.1".to_string(),
            port: 8080,
            environment: "test".to_string(),
            client_base_url: "http://localhost:3000".to_string(),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.is_development() {
            "debug"
        } else if self.is_production() {
            "warn,actix_web=info"
        } else {
            "info"
        }
    }

    pub fn server_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn scheduler_timeout(&self) -> Duration {
        Duration::from_secs(self.scheduler_timeout_secs)
    }

    pub fn session_ttl(&self) -> Duration {
        Duration::from_secs(self.session_ttl_secs)
    }
}
