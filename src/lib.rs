//! Stack Cartographer: an API documentation mapper
//!
//! This crate crawls an API documentation site, extracts every documented
//! method along with its description and parameter declaration, and writes
//! the resulting catalog as a single JSON file.

pub mod config;
pub mod crawler;
pub mod output;

use thiserror::Error;

/// Main error type for Stack Cartographer operations
#[derive(Debug, Error)]
pub enum CartographerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),

    #[error("HTML parse error: {0}")]
    Parse(String),

    #[error("Invalid query '{expression}': {message}")]
    InvalidQuery { expression: String, message: String },

    #[error("Could not find {what}")]
    NotFound { what: String },

    #[error("Could not extract {what}: {message}")]
    Extraction { what: String, message: String },

    #[error("URL parse error: {0}")]
    InvalidUrl(#[from] ::url::ParseError),

    #[error("Failed to serialize catalog: {0}")]
    Serialize(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Method '{name}': {source}")]
    Method {
        name: String,
        #[source]
        source: Box<CartographerError>,
    },
}

impl CartographerError {
    /// Attaches the name of the method being processed to an error
    pub fn for_method(name: &str, source: CartographerError) -> Self {
        CartographerError::Method {
            name: name.to_string(),
            source: Box::new(source),
        }
    }
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// Result type alias for Stack Cartographer operations
pub type Result<T> = std::result::Result<T, CartographerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, run_to_file, CatalogBuilder, CrawlEvent, CrawlReport, FailurePolicy};
pub use output::{Catalog, MethodDetail, MethodSummary};
