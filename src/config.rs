// src/config.rs
use std::env;
use std::time::Duration;

/// Runtime configuration, read once at startup.
///
/// Every value has a local-dev default so `cargo run` works against a
/// backend on localhost without any environment set up.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Base URL of the shipments backend, e.g. "http://localhost:3001".
    pub backend_url: String,
    /// Bearer credential handed to the push channel at connect time.
    /// When unset the live-update listener is simply not connected.
    pub channel_token: Option<String>,
    /// Address the dashboard server binds to.
    pub bind_addr: String,
    /// Public base used when building one-time authorization URLs.
    pub public_url: String,
    /// SQLite file holding issued authorization codes.
    pub db_path: String,
    /// Quiescence window for the free-text search input.
    pub debounce: Duration,
    /// Rows per page on first load.
    pub page_size: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:3001".to_string(),
            channel_token: None,
            bind_addr: "127.0.0.1:3000".to_string(),
            public_url: "http://localhost:3000".to_string(),
            db_path: "backoffice.sqlite3".to_string(),
            debounce: Duration::from_millis(300),
            page_size: 10,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            backend_url: env::var("BACKOFFICE_BACKEND_URL").unwrap_or(defaults.backend_url),
            channel_token: env::var("BACKOFFICE_CHANNEL_TOKEN").ok().filter(|t| !t.is_empty()),
            bind_addr: env::var("BACKOFFICE_BIND").unwrap_or(defaults.bind_addr),
            public_url: env::var("BACKOFFICE_PUBLIC_URL").unwrap_or(defaults.public_url),
            db_path: env::var("BACKOFFICE_DB").unwrap_or(defaults.db_path),
            debounce: defaults.debounce,
            page_size: defaults.page_size,
        }
    }
}
