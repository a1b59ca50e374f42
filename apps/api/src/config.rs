use anyhow::{Context, Result};

const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Service configuration loaded from environment variables.
/// Layout constants are not configurable here; see `layout::config`.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    /// Request body limit for the layout and export endpoints.
    pub max_body_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            max_body_bytes: optional_env("MAX_BODY_BYTES")
                .map(|raw| {
                    raw.parse::<usize>()
                        .context("MAX_BODY_BYTES must be a byte count")
                })
                .transpose()?
                .unwrap_or(DEFAULT_MAX_BODY_BYTES),
        })
    }
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|value| !value.trim().is_empty())
}
