//! HTML document parsing and structural queries
//!
//! Pages are parsed with `scraper` (html5ever), which builds a best-effort
//! tree from any input. Queries are CSS selector expressions; they play the
//! role XPath plays in a DOM library.

use crate::{CartographerError, Result};
use scraper::{ElementRef, Html, Selector};

/// A parsed HTML page
pub struct Document {
    html: Html,
}

/// An element matched by a query
#[derive(Debug, Clone, Copy)]
pub struct Node<'a> {
    element: ElementRef<'a>,
}

impl Document {
    /// Parses raw response bytes into a document
    ///
    /// Malformed markup never fails: the parser's recovery warnings are
    /// dropped and whatever tree could be built is returned. Only an
    /// empty body, which contains no document at all, is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use stack_cartographer::crawler::Document;
    ///
    /// let doc = Document::parse(b"<div class=\"indented\"><p>Hello").unwrap();
    /// let node = doc.query_first("div.indented p", "greeting").unwrap();
    /// assert_eq!(node.text(), "Hello");
    /// ```
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(CartographerError::Parse(
                "response body is empty".to_string(),
            ));
        }

        let text = String::from_utf8_lossy(bytes);
        let html = Html::parse_document(&text);

        if !html.errors.is_empty() {
            tracing::trace!("Ignored {} HTML parse warnings", html.errors.len());
        }

        Ok(Self { html })
    }

    /// Parses an HTML string into a document
    pub fn parse_str(html: &str) -> Result<Self> {
        Self::parse(html.as_bytes())
    }

    /// Returns every element matching the path expression, in document order
    pub fn query(&self, expression: &str) -> Result<Vec<Node<'_>>> {
        let selector = compile(expression)?;
        Ok(self
            .html
            .select(&selector)
            .map(|element| Node { element })
            .collect())
    }

    /// Returns the first element matching the path expression
    ///
    /// # Errors
    ///
    /// * `CartographerError::NotFound` - Nothing matched; `described_as` names
    ///   the missing element in the message
    pub fn query_first(&self, expression: &str, described_as: &str) -> Result<Node<'_>> {
        let selector = compile(expression)?;
        self.html
            .select(&selector)
            .next()
            .map(|element| Node { element })
            .ok_or_else(|| CartographerError::NotFound {
                what: described_as.to_string(),
            })
    }
}

impl<'a> Node<'a> {
    /// Concatenated text of the element and its descendants, trimmed
    pub fn text(&self) -> String {
        self.element.text().collect::<String>().trim().to_string()
    }

    /// Looks up an attribute by name
    pub fn attr(&self, name: &str) -> Option<&'a str> {
        self.element.value().attr(name)
    }
}

fn compile(expression: &str) -> Result<Selector> {
    Selector::parse(expression).map_err(|e| CartographerError::InvalidQuery {
        expression: expression.to_string(),
        message: e.to_string(),
    })
}
