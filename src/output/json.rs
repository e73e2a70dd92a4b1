//! JSON catalog rendering
//!
//! Renders the catalog as pretty-printed JSON and writes it to the output
//! file, replacing whatever was there before.

use crate::output::types::Catalog;
use crate::Result;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Renders a catalog as pretty-printed JSON
///
/// `meta` comes before `methods`, and methods keep the order they were
/// supplied in. The text ends with a newline.
pub fn render(catalog: &Catalog) -> Result<String> {
    let mut text = serde_json::to_string_pretty(catalog)?;
    text.push('\n');
    Ok(text)
}

/// Writes a catalog to `path`, truncating any existing file
///
/// The catalog is rendered before the file is opened, so a rendering
/// failure leaves an existing file untouched.
///
/// # Arguments
///
/// * `path` - Output file path
/// * `catalog` - The catalog to write
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the catalog
/// * `Err(CartographerError)` - Failed to render or write
pub fn write_catalog(path: &Path, catalog: &Catalog) -> Result<()> {
    let text = render(catalog)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    writer.write_all(text.as_bytes())?;
    writer.flush()?;

    tracing::debug!("Wrote {} bytes to {}", text.len(), path.display());
    Ok(())
}
