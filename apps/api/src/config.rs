use anyhow::{bail, Context, Result};

use crate::evaluation::reconcile::MatchPolicy;

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing or malformed.
#[derive(Debug, Clone)]
pub struct Config {
    pub anthropic_api_key: String,
    pub port: u16,
    pub rust_log: String,
    /// Leading cover-letter characters compared by the fallback bid match.
    pub cover_prefix_chars: usize,
    /// Max in-flight summarization calls per job.
    pub summarize_max_in_flight: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let config = Config {
            anthropic_api_key: require_env("ANTHROPIC_API_KEY")?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            cover_prefix_chars: parse_env_or("MATCH_COVER_PREFIX_CHARS", 20)?,
            summarize_max_in_flight: parse_env_or("SUMMARIZE_MAX_IN_FLIGHT", 2)?,
        };

        if config.summarize_max_in_flight == 0 {
            bail!("SUMMARIZE_MAX_IN_FLIGHT must be at least 1");
        }

        Ok(config)
    }

    pub fn match_policy(&self) -> MatchPolicy {
        MatchPolicy {
            cover_prefix_chars: self.cover_prefix_chars,
        }
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn parse_env_or(key: &str, default: usize) -> Result<usize> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse::<usize>()
            .with_context(|| format!("'{key}' must be a non-negative integer")),
        Err(_) => Ok(default),
    }
}
