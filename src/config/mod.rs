//! Configuration module for Stack Cartographer
//!
//! All tunables have named defaults in [`defaults`]. A TOML file can
//! override any subset of them.
//!
//! # Example
//!
//! ```no_run
//! use stack_cartographer::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("cartographer.toml")).unwrap();
//! println!("Mapping {}", config.site.base_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, FailurePolicy, FetcherConfig, OutputConfig, SiteConfig};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;

/// Built-in values used when no configuration overrides them
pub mod defaults {
    /// Documentation site to map
    pub const BASE_URL: &str = "http://api.stackexchange.com";

    /// Listing page enumerating every API method
    pub const LISTING_PATH: &str = "/docs";

    /// User-Agent header sent with every request
    pub const USER_AGENT: &str = "Stack Cartographer 0.1";

    /// Minimum time between two consecutive requests
    pub const MIN_REQUEST_INTERVAL_MS: u64 = 500;

    pub const REQUEST_TIMEOUT_SECS: u64 = 30;

    pub const CONNECT_TIMEOUT_SECS: u64 = 10;

    /// Catalog file written at the end of a run
    pub const OUTPUT_PATH: &str = "map.json";
}
