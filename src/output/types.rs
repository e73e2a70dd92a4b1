//! Catalog data types
//!
//! These are the records produced by the crawler and written by the
//! serializer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier written to every catalog's `meta.generator` field
pub const GENERATOR: &str = concat!("Stack Cartographer ", env!("CARGO_PKG_VERSION"));

/// RFC-850 timestamp layout, e.g. `Wednesday, 15-Aug-12 15:52:01 UTC`
pub const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S UTC";

/// A method discovered on the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSummary {
    /// Method name as shown in the listing (anchor text)
    pub name: String,

    /// Link to the method's detail page (anchor href)
    pub detail_url: String,
}

/// Everything extracted from one method's detail page
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodDetail {
    /// Method name
    pub path: String,

    pub description: String,

    /// Parameter declaration exactly as the site embeds it
    pub parameters: Value,
}

/// Run metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Meta {
    pub generator: String,

    /// Generation time, RFC-850 formatted
    pub date: String,
}

/// The complete output document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub meta: Meta,
    pub methods: Vec<MethodDetail>,
}

impl Catalog {
    /// Wraps the methods with run metadata stamped at `generated_at`
    pub fn new(methods: Vec<MethodDetail>, generated_at: DateTime<Utc>) -> Self {
        Self {
            meta: Meta {
                generator: GENERATOR.to_string(),
                date: generated_at.format(RFC_850).to_string(),
            },
            methods,
        }
    }
}
