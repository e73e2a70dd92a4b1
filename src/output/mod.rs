//! Output module for the method catalog
//!
//! This module handles:
//! - The catalog record types
//! - Rendering the catalog as JSON
//! - Writing the catalog file

mod json;
mod types;

pub use json::{render, write_catalog};
pub use types::{Catalog, Meta, MethodDetail, MethodSummary, GENERATOR, RFC_850};
