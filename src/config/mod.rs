//! Configuration management for Tokenboard
//!
//! Loads from optional config files + environment variables via .env

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::net::SocketAddr;
use std::time::Duration;

use crate::oracle::{AggregatorSettings, RetryPolicy};

/// Main application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub prices: PricesConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Address the dashboard API binds to
    pub listen_addr: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricesConfig {
    /// DexScreener API base URL
    pub base_url: String,
    /// Cache freshness window in seconds
    pub ttl_secs: u64,
    /// Endpoints fetched concurrently per batch
    pub chunk_size: usize,
    /// Pause between batches in milliseconds
    pub batch_delay_ms: u64,
    /// Retries per endpoint after the first attempt
    pub retries: u32,
    /// Linear backoff unit in milliseconds
    pub retry_base_delay_ms: u64,
    /// Per-request timeout in milliseconds
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// "text" or "json"
    pub format: String,
    /// Default filter when RUST_LOG is unset
    pub filter: String,
}

impl PricesConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            retries: self.retries,
            base_delay: Duration::from_millis(self.retry_base_delay_ms),
            request_timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }

    pub fn aggregator_settings(&self) -> AggregatorSettings {
        AggregatorSettings {
            base_url: self.base_url.clone(),
            chunk_size: self.chunk_size,
            batch_delay: Duration::from_millis(self.batch_delay_ms),
            retry: self.retry_policy(),
        }
    }
}

impl AppConfig {
    /// Load configuration from file and environment
    pub fn load() -> Result<Self> {
        // Load .env file first
        dotenvy::dotenv().ok();

        let config = Self::builder_with_defaults()?
            // Load config file if exists
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // Override with environment variables (TOKENBOARD__*)
            .add_source(Environment::with_prefix("TOKENBOARD").separator("__"))
            .build()
            .context("Failed to build configuration")?;

        let app_config: AppConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        app_config.validate()?;
        Ok(app_config)
    }

    fn builder_with_defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        Ok(Config::builder()
            // Server defaults
            .set_default("server.listen_addr", "0.0.0.0:8080")?
            // Price pipeline defaults
            .set_default("prices.base_url", crate::oracle::sources::DEXSCREENER_API_URL)?
            .set_default("prices.ttl_secs", 60)?
            .set_default("prices.chunk_size", 4)?
            .set_default("prices.batch_delay_ms", 300)?
            .set_default("prices.retries", 2)?
            .set_default("prices.retry_base_delay_ms", 1000)?
            .set_default("prices.request_timeout_ms", 5000)?
            // Logging defaults
            .set_default("logging.format", "text")?
            .set_default("logging.filter", "info")?)
    }

    /// Reject settings the price pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.prices.ttl_secs == 0 {
            bail!("prices.ttl_secs must be greater than 0");
        }
        if self.prices.chunk_size == 0 {
            bail!("prices.chunk_size must be greater than 0");
        }
        if self.prices.request_timeout_ms == 0 {
            bail!("prices.request_timeout_ms must be greater than 0");
        }
        let base_url = &self.prices.base_url;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            bail!("prices.base_url must be an http(s) URL");
        }
        self.listen_addr()?;
        match self.logging.format.to_ascii_lowercase().as_str() {
            "text" | "json" => {}
            other => bail!("logging.format must be 'text' or 'json', got '{}'", other),
        }
        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.server
            .listen_addr
            .parse()
            .with_context(|| format!("Invalid server.listen_addr '{}'", self.server.listen_addr))
    }

    /// Generate a digest of the config for logging
    pub fn digest(&self) -> String {
        format!(
            "listen={} base_url={} ttl={}s chunk={} batch_delay={}ms retries={} backoff={}ms timeout={}ms",
            self.server.listen_addr,
            self.prices.base_url,
            self.prices.ttl_secs,
            self.prices.chunk_size,
            self.prices.batch_delay_ms,
            self.prices.retries,
            self.prices.retry_base_delay_ms,
            self.prices.request_timeout_ms
        )
    }
}

impl std::fmt::Display for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.digest())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> AppConfig {
        AppConfig::builder_with_defaults()
            .and_then(|b| b.build().context("build"))
            .and_then(|c| c.try_deserialize().context("deserialize"))
            .expect("defaults deserialize")
    }

    #[test]
    fn defaults_match_pipeline_constants() {
        let config = defaults();
        config.validate().expect("defaults are valid");

        let settings = config.prices.aggregator_settings();
        assert_eq!(settings, AggregatorSettings::default());
        assert_eq!(config.prices.ttl(), crate::oracle::DEFAULT_TTL);
    }

    #[test]
    fn validate_rejects_zero_chunk_size() {
        let mut config = defaults();
        config.prices.chunk_size = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_ttl() {
        let mut config = defaults();
        config.prices.ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_listen_addr_and_log_format() {
        let mut config = defaults();
        config.server.listen_addr = "not-an-addr".to_string();
        assert!(config.validate().is_err());

        let mut config = defaults();
        config.logging.format = "xml".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn digest_mentions_ttl_and_chunk() {
        let digest = defaults().digest();
        assert!(digest.contains("ttl=60s"));
        assert!(digest.contains("chunk=4"));
    }
}
