use anyhow::{Context, Result};

use crate::templates::registry::FALLBACK_TEMPLATE;

pub const DEFAULT_BULK_TEMPLATE_LIMIT: usize = 12;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub rust_log: String,
    /// Template used when a request names none or an unknown one.
    pub default_template: String,
    /// Upper bound on templates rendered by one bulk export.
    pub bulk_template_limit: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            default_template: std::env::var("DEFAULT_TEMPLATE")
                .unwrap_or_else(|_| FALLBACK_TEMPLATE.to_string()),
            bulk_template_limit: parse_limit(std::env::var("BULK_TEMPLATE_LIMIT").ok().as_deref()),
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

/// Unparseable or missing values fall back to the default; zero becomes one.
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(DEFAULT_BULK_TEMPLATE_LIMIT)
        .max(1)
}
