use crate::error::{AppError, Result};
use dotenvy::dotenv;
use std::env;

/// Default endpoint used when `MEMEFORGE_API_URL` is unset.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:8686/graphql";

#[derive(Clone, Debug)]
pub struct Config {
    pub endpoint: String,
}

impl Config {
    pub fn load() -> Result<Self> {
        // Load .env file if it exists, ignore if it doesn't
        let _ = dotenv();

        let endpoint =
            env::var("MEMEFORGE_API_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string());

        Self::with_endpoint(endpoint)
    }

    /// Builds a config with an explicit endpoint, validating the URL up front
    /// so a typo fails at startup instead of on the first generate action.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Result<Self> {
        let endpoint = endpoint.into();
        url::Url::parse(&endpoint)
            .map_err(|e| AppError::config(format!("Invalid endpoint URL '{}': {}", endpoint, e)))?;
        Ok(Self { endpoint })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_valid_endpoint() {
        let config = Config::with_endpoint("https://memes.example.com/graphql").unwrap();
        assert_eq!(config.endpoint, "https://memes.example.com/graphql");
    }

    #[test]
    fn rejects_garbage_endpoint() {
        assert!(matches!(
            Config::with_endpoint("not a url"),
            Err(AppError::Config(_))
        ));
    }
}
