//! Method catalog extraction
//!
//! The listing page enumerates every method as an anchor inside a
//! `div.method-name` block. Each detail page carries a description paragraph
//! in its `div.indented` block and an inline script assigning the parameter
//! declaration to `var parameters`.

use crate::config::{Config, SiteConfig};
use crate::crawler::document::Document;
use crate::crawler::fetcher::Fetcher;
use crate::output::{MethodDetail, MethodSummary};
use crate::{CartographerError, Result};
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::LazyLock;
use url::Url;

/// Anchors naming each method on the listing page
const METHOD_LINKS: &str = "div.method-name > a[href]";

/// First paragraph of the detail page's content block
const DESCRIPTION: &str = "div.indented p";

const SCRIPTS: &str = "script";

/// Token identifying the script that declares the method's parameters
const PARAMETERS_MARKER: &str = "var parameters";

/// Start of the `var parameters = <value>;` assignment
static PARAMETERS_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"var\s+parameters\s*=\s*").expect("Invalid regex")
});

/// Fetches the listing and detail pages and turns them into catalog records
pub struct CatalogBuilder {
    fetcher: Fetcher,
    base_url: Url,
    listing_path: String,
}

impl CatalogBuilder {
    /// Creates a builder with a fetcher built from the configuration
    pub fn new(config: &Config) -> Result<Self> {
        let fetcher = Fetcher::new(&config.fetcher)?;
        Self::with_fetcher(fetcher, &config.site)
    }

    /// Creates a builder around an existing fetcher
    pub fn with_fetcher(fetcher: Fetcher, site: &SiteConfig) -> Result<Self> {
        Ok(Self {
            fetcher,
            base_url: Url::parse(&site.base_url)?,
            listing_path: site.listing_path.clone(),
        })
    }

    /// Fetches the listing page and returns every method it links to
    ///
    /// Methods keep the position of their first appearance; a repeated name
    /// takes the URL of its last appearance.
    ///
    /// # Errors
    ///
    /// * `CartographerError::NotFound` - The listing contains no method links
    pub async fn list_methods(&mut self) -> Result<Vec<MethodSummary>> {
        let url = self.base_url.join(&self.listing_path)?;
        tracing::info!("Fetching method listing from {}", url);

        let body = self.fetcher.fetch(url.as_str()).await?;
        let document = Document::parse(&body)?;

        let methods = parse_method_list(&document)?;
        tracing::info!("Listing contains {} methods", methods.len());
        Ok(methods)
    }

    /// Fetches one method's detail page and extracts its record
    ///
    /// `detail_url` is resolved against the base URL, so both site-relative
    /// and absolute links work.
    pub async fn fetch_method_detail(&mut self, name: &str, detail_url: &str) -> Result<MethodDetail> {
        let url = self.base_url.join(detail_url)?;
        tracing::debug!("Fetching detail page for {} from {}", name, url);

        let body = self.fetcher.fetch(url.as_str()).await?;
        let document = Document::parse(&body)?;

        parse_method_detail(name, &document)
    }
}

/// Extracts method summaries from a parsed listing page
pub fn parse_method_list(document: &Document) -> Result<Vec<MethodSummary>> {
    let anchors = document.query(METHOD_LINKS)?;

    let mut methods: Vec<MethodSummary> = Vec::with_capacity(anchors.len());
    let mut positions: HashMap<String, usize> = HashMap::new();

    for anchor in anchors {
        let Some(href) = anchor.attr("href") else {
            continue;
        };

        let name = anchor.text();
        if name.is_empty() {
            tracing::warn!("Skipping method link without a name: {}", href);
            continue;
        }

        match positions.get(&name).copied() {
            Some(index) => {
                tracing::debug!(
                    "Duplicate method {}: {} replaces {}",
                    name,
                    href,
                    methods[index].detail_url
                );
                methods[index].detail_url = href.to_string();
            }
            None => {
                positions.insert(name.clone(), methods.len());
                methods.push(MethodSummary {
                    name,
                    detail_url: href.to_string(),
                });
            }
        }
    }

    if methods.is_empty() {
        return Err(CartographerError::NotFound {
            what: "method links on the listing page".to_string(),
        });
    }

    Ok(methods)
}

/// Extracts a method's description and parameters from its parsed detail page
pub fn parse_method_detail(name: &str, document: &Document) -> Result<MethodDetail> {
    let description = document
        .query_first(DESCRIPTION, "method description")?
        .text();

    let script = document
        .query(SCRIPTS)?
        .into_iter()
        .map(|node| node.text())
        .find(|text| text.contains(PARAMETERS_MARKER))
        .ok_or_else(|| CartographerError::NotFound {
            what: "parameter declaration script".to_string(),
        })?;

    let parameters = extract_parameters(&script)?;

    Ok(MethodDetail {
        path: name.to_string(),
        description,
        parameters,
    })
}

/// Decodes the value assigned by `var parameters = ...;` in a script
///
/// Exactly one JSON value is read after the `=`; the next non-space
/// character must be the `;` ending the statement. Whatever follows the `;`
/// is ignored.
pub fn extract_parameters(script: &str) -> Result<Value> {
    let assignment = PARAMETERS_ASSIGNMENT.find(script).ok_or_else(|| {
        extraction_error("script does not contain a 'var parameters = ...;' assignment".to_string())
    })?;
    let rest = &script[assignment.end()..];

    let mut values = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
    let parameters = match values.next() {
        Some(Ok(value)) => value,
        Some(Err(e)) => return Err(extraction_error(format!("invalid parameter literal: {}", e))),
        None => return Err(extraction_error("assignment has no value".to_string())),
    };

    if !rest[values.byte_offset()..].trim_start().starts_with(';') {
        return Err(extraction_error(
            "parameter literal is not terminated by ';'".to_string(),
        ));
    }

    Ok(parameters)
}

fn extraction_error(message: String) -> CartographerError {
    CartographerError::Extraction {
        what: "parameter declaration".to_string(),
        message,
    }
}
