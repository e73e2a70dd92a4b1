//! Crawler module for fetching and extracting the method catalog
//!
//! This module contains the crawl pipeline:
//! - Rate-limited HTTP fetching
//! - HTML parsing and structural queries
//! - Listing and detail page extraction
//! - The sequential crawl loop tying them together
//! - The run that crawls and writes the catalog file

mod catalog;
mod document;
mod fetcher;
mod rate_limit;

pub use crate::config::FailurePolicy;
pub use catalog::{extract_parameters, parse_method_detail, parse_method_list, CatalogBuilder};
pub use document::{Document, Node};
pub use fetcher::{build_http_client, Fetcher};
pub use rate_limit::RateLimiter;

use crate::config::Config;
use crate::output::{write_catalog, Catalog, MethodDetail};
use crate::{CartographerError, Result};
use chrono::Utc;

/// Process exit code when the run failed and nothing was written
pub const EXIT_FAILURE: u8 = 1;

/// Process exit code when a partial catalog was written with some methods skipped
pub const EXIT_PARTIAL: u8 = 2;

/// Progress notifications emitted while crawling
#[derive(Debug)]
pub enum CrawlEvent<'a> {
    /// The listing page was parsed
    Listed { count: usize },

    /// A method's detail page is about to be fetched (`index` is 1-based)
    Method {
        index: usize,
        total: usize,
        name: &'a str,
    },

    /// A method failed and was left out of the catalog
    Skipped {
        name: &'a str,
        error: &'a CartographerError,
    },
}

/// A method left out of the catalog under [`FailurePolicy::Skip`]
#[derive(Debug)]
pub struct MethodFailure {
    pub name: String,
    pub detail_url: String,
    pub error: CartographerError,
}

/// Outcome of a crawl: the extracted methods in listing order and any skips
#[derive(Debug, Default)]
pub struct CrawlReport {
    pub methods: Vec<MethodDetail>,
    pub failures: Vec<MethodFailure>,
}

impl CrawlReport {
    /// Returns true when every listed method made it into the catalog
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Process exit code for a run that wrote this report's catalog
    pub fn exit_code(&self) -> u8 {
        if self.is_complete() {
            0
        } else {
            EXIT_PARTIAL
        }
    }
}

/// Runs a complete crawl
///
/// Lists the methods, then fetches each detail page strictly one after the
/// other in listing order.
///
/// # Arguments
///
/// * `builder` - Catalog builder owning the fetcher
/// * `policy` - Whether a failing detail page aborts the crawl or is skipped
/// * `on_event` - Receives progress notifications
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl finished (possibly with skipped methods)
/// * `Err(CartographerError)` - Listing failed, or a detail page failed under
///   [`FailurePolicy::Abort`]
pub async fn crawl<F>(
    builder: &mut CatalogBuilder,
    policy: FailurePolicy,
    mut on_event: F,
) -> Result<CrawlReport>
where
    F: FnMut(CrawlEvent<'_>),
{
    let summaries = builder.list_methods().await?;
    let total = summaries.len();
    on_event(CrawlEvent::Listed { count: total });

    let mut report = CrawlReport {
        methods: Vec::with_capacity(total),
        failures: Vec::new(),
    };

    for (i, summary) in summaries.into_iter().enumerate() {
        on_event(CrawlEvent::Method {
            index: i + 1,
            total,
            name: &summary.name,
        });

        match builder
            .fetch_method_detail(&summary.name, &summary.detail_url)
            .await
        {
            Ok(detail) => report.methods.push(detail),
            Err(error) => match policy {
                FailurePolicy::Abort => {
                    return Err(CartographerError::for_method(&summary.name, error));
                }
                FailurePolicy::Skip => {
                    tracing::warn!("Skipping {}: {}", summary.name, error);
                    on_event(CrawlEvent::Skipped {
                        name: &summary.name,
                        error: &error,
                    });
                    report.failures.push(MethodFailure {
                        name: summary.name,
                        detail_url: summary.detail_url,
                        error,
                    });
                }
            },
        }
    }

    tracing::info!(
        "Crawl finished: {} methods extracted, {} skipped",
        report.methods.len(),
        report.failures.len()
    );

    Ok(report)
}

/// Crawls the configured site and writes the catalog to `config.output.path`
///
/// The file is only created once the crawl has succeeded, so an aborted run
/// leaves no output behind. Under [`FailurePolicy::Skip`] the catalog holds
/// the methods that could be extracted and the report lists the rest.
pub async fn run_to_file<F>(config: &Config, on_event: F) -> Result<CrawlReport>
where
    F: FnMut(CrawlEvent<'_>),
{
    let mut builder = CatalogBuilder::new(config)?;
    let mut report = crawl(&mut builder, config.crawl.on_failure, on_event).await?;

    let catalog = Catalog::new(std::mem::take(&mut report.methods), Utc::now());
    write_catalog(&config.output.path, &catalog)?;
    tracing::info!(
        "Wrote {} methods to {}",
        catalog.methods.len(),
        config.output.path.display()
    );

    report.methods = catalog.methods;
    Ok(report)
}
