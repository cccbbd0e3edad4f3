// src/config.rs
use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Upper bound on any single store call; expiry surfaces as
    /// `StoreUnavailable` rather than hanging the command.
    pub store_timeout: Duration,
}

impl Config {
    /// Reads configuration from the environment. Call after `dotenvy` has
    /// loaded `.env`; missing or malformed boot config is fatal.
    pub fn from_env() -> Self {
        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

        let port = env::var("PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse::<u16>()
            .expect("PORT must be a valid port number");

        let store_timeout_ms = env::var("STORE_TIMEOUT_MS")
            .unwrap_or_else(|_| "5000".to_string())
            .parse::<u64>()
            .expect("STORE_TIMEOUT_MS must be a number of milliseconds");

        Self {
            database_url,
            port,
            store_timeout: Duration::from_millis(store_timeout_ms),
        }
    }
}
