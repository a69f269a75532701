//! Application configuration loaded from environment variables.

use anyhow::{Context, Result};
use dotenvy::dotenv;
use secrecy::SecretString;
use std::env;

use crate::summarize::DEFAULT_MODEL;

/// Worker configuration. Credentials are never embedded; everything comes
/// from the environment (or a `.env` file in development).
#[derive(Debug)]
pub struct Config {
    pub notion_token: SecretString,
    pub notion_database_id: String,
    pub groq_api_key: SecretString,
    pub groq_model: String,
    pub pause_secs: u64,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        // Load .env file if present (development)
        let _ = dotenv();

        Ok(Self {
            notion_token: env::var("NOTION_TOKEN")
                .context("NOTION_TOKEN must be set")?
                .into(),
            notion_database_id: env::var("NOTION_DATABASE_ID")
                .context("NOTION_DATABASE_ID must be set")?,
            groq_api_key: env::var("GROQ_API_KEY")
                .context("GROQ_API_KEY must be set")?
                .into(),
            groq_model: env::var("GROQ_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            pause_secs: env::var("PAUSE_SECS")
                .unwrap_or_else(|_| "1".to_string())
                .parse()
                .context("PAUSE_SECS must be a valid number")?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secrets_not_in_debug() {
        let config = Config {
            notion_token: SecretString::from("secret-notion-token".to_string()),
            notion_database_id: "db-id".to_string(),
            groq_api_key: SecretString::from("gsk-secret-key".to_string()),
            groq_model: DEFAULT_MODEL.to_string(),
            pause_secs: 1,
        };

        let debug = format!("{:?}", config);
        assert!(!debug.contains("secret-notion-token"));
        assert!(!debug.contains("gsk-secret-key"));
        assert!(debug.contains("db-id"));
    }
}
