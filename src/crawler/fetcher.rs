//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the cartographer:
//! - Building the HTTP client with the configured user agent
//! - Pacing requests through the fetcher's own [`RateLimiter`]
//! - Treating network failures and non-2xx responses as transport errors

use crate::config::{defaults, FetcherConfig};
use crate::crawler::rate_limit::RateLimiter;
use crate::{CartographerError, Result};
use reqwest::Client;
use std::time::Duration;
use tokio::time::Instant;

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &FetcherConfig) -> std::result::Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.timeout())
        .connect_timeout(Duration::from_secs(defaults::CONNECT_TIMEOUT_SECS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Rate-limited HTTP GET client
///
/// The client and the last-request timestamp are owned by the fetcher, so two
/// fetchers never throttle each other.
pub struct Fetcher {
    client: Client,
    limiter: RateLimiter,
}

impl Fetcher {
    /// Creates a fetcher from the fetcher configuration
    pub fn new(config: &FetcherConfig) -> Result<Self> {
        let client = build_http_client(config)?;
        Ok(Self::with_client(client, RateLimiter::new(config.min_interval())))
    }

    /// Creates a fetcher around an existing client and limiter
    pub fn with_client(client: Client, limiter: RateLimiter) -> Self {
        Self { client, limiter }
    }

    /// Fetches a URL and returns the raw response body
    ///
    /// Waits for the rate limiter first. The request is recorded as finished
    /// whether it succeeded or not.
    ///
    /// # Errors
    ///
    /// * `CartographerError::Transport` - DNS, connection, timeout or non-2xx status
    pub async fn fetch(&mut self, url: &str) -> Result<Vec<u8>> {
        self.limiter.wait().await;

        tracing::debug!("GET {}", url);
        let result = self.send(url).await;
        self.limiter.record_request(Instant::now());

        result
    }

    async fn send(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| transport_error(url, &e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CartographerError::Transport {
                url: url.to_string(),
                message: format!("HTTP {}", status),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| transport_error(url, &e))?;

        tracing::debug!("Fetched {} ({} bytes)", url, body.len());
        Ok(body.to_vec())
    }
}

/// Classifies a reqwest error into a transport error message
fn transport_error(url: &str, error: &reqwest::Error) -> CartographerError {
    let message = if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else {
        error.to_string()
    };

    CartographerError::Transport {
        url: url.to_string(),
        message,
    }
}
