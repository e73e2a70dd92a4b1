use crate::config::defaults;
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Main configuration structure for Stack Cartographer
///
/// Every section and key is optional; anything left out falls back to the
/// constants in [`defaults`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    pub site: SiteConfig,
    pub fetcher: FetcherConfig,
    pub output: OutputConfig,
    pub crawl: CrawlConfig,
}

/// Documentation site being mapped
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Base URL of the documentation site, without a trailing path
    pub base_url: String,

    /// Path of the listing page that enumerates every method
    pub listing_path: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            listing_path: defaults::LISTING_PATH.to_string(),
        }
    }
}

/// HTTP fetcher behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FetcherConfig {
    /// User-Agent header sent with every request
    pub user_agent: String,

    /// Minimum time between two requests (milliseconds)
    pub min_request_interval: u64,

    /// Overall request timeout (seconds)
    pub request_timeout: u64,
}

impl FetcherConfig {
    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::USER_AGENT.to_string(),
            min_request_interval: defaults::MIN_REQUEST_INTERVAL_MS,
            request_timeout: defaults::REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputConfig {
    /// Path to the JSON catalog file (overwritten on every run)
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(defaults::OUTPUT_PATH),
        }
    }
}

/// Crawl loop behavior
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlConfig {
    /// What to do when a single method's detail page cannot be processed
    pub on_failure: FailurePolicy,
}

/// How the crawl loop reacts to a failing detail page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Stop at the first failure and write nothing
    #[default]
    Abort,

    /// Record the failure, skip the method and keep going
    Skip,
}
