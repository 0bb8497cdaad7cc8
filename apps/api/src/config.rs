use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Both external providers are optional: without `ANTHROPIC_API_KEY` the AI
/// enrichment fields stay absent, and without `EMBEDDINGS_URL` semantic
/// ranking runs on the deterministic token-overlap backend.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub anthropic_api_key: Option<String>,
    pub embeddings_url: Option<String>,
    pub enrichment_timeout_secs: u64,
    pub similarity_timeout_secs: u64,
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
            anthropic_api_key: optional_env("ANTHROPIC_API_KEY"),
            embeddings_url: optional_env("EMBEDDINGS_URL"),
            enrichment_timeout_secs: parse_env("ENRICHMENT_TIMEOUT_SECS", 20)?,
            similarity_timeout_secs: parse_env("SIMILARITY_TIMEOUT_SECS", 10)?,
        })
    }
}

/// Treats unset and empty variables the same — both mean "not configured".
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_env(key: &str, default: u64) -> Result<u64> {
    match std::env::var(key) {
        Ok(value) => value
            .parse::<u64>()
            .with_context(|| format!("{key} must be a positive integer")),
        Err(_) => Ok(default),
    }
}
