//! HTML content extraction
//!
//! Turns a successfully fetched body into a page: the document title, the
//! visible text with boilerplate stripped, and the outgoing links resolved
//! against the base URL and normalized.

use crate::model::Outlink;
use crate::url::normalize_url;
use ego_tree::NodeRef;
use scraper::{Html, Node, Selector};
use std::collections::HashSet;
use thiserror::Error;
use url::Url;

/// Elements whose subtrees never contribute visible text
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript", "template", "head"];

/// Extraction failures after a successful fetch
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("document body is empty")]
    EmptyBody,
}

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct Extracted {
    /// Document title, empty when the page has none
    pub title: String,

    /// Visible text, whitespace-collapsed and truncated
    pub text: String,

    /// Deduplicated normalized outgoing links with their anchor text
    pub outlinks: Vec<Outlink>,
}

/// Parses an HTML body into its title, visible text, and outlinks
///
/// Uses a permissive parser, so malformed markup degrades rather than fails;
/// the only rejected input is an empty body.
///
/// # Link Extraction Rules
///
/// - `<a href>` targets are resolved against the base URL and normalized
/// - `javascript:`, `mailto:`, `data:`, `tel:` and fragment-only links are
///   dropped
/// - non-http(s) targets are dropped
/// - duplicate targets within a page are reported once, keeping the first
///   anchor text
pub fn extract(body: &str, base_url: &Url, max_text_chars: usize) -> Result<Extracted, ExtractError> {
    if body.trim().is_empty() {
        return Err(ExtractError::EmptyBody);
    }

    let document = Html::parse_document(body);

    Ok(Extracted {
        title: extract_title(&document),
        text: extract_text(&document, max_text_chars),
        outlinks: extract_outlinks(&document, base_url),
    })
}

/// Extracts the page title from the document, trimmed and collapsed
fn extract_title(document: &Html) -> String {
    Selector::parse("title")
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|element| element.text().collect::<String>())
        })
        .map(|title| collapse_whitespace(&title))
        .unwrap_or_default()
}

/// Extracts visible text, skipping boilerplate subtrees
fn extract_text(document: &Html, max_chars: usize) -> String {
    let mut raw = String::new();
    collect_text(document.tree.root(), &mut raw);
    truncate_chars(collapse_whitespace(&raw), max_chars)
}

fn collect_text(node: NodeRef<'_, Node>, out: &mut String) {
    for child in node.children() {
        match child.value() {
            Node::Text(text) => {
                out.push_str(&text);
                out.push(' ');
            }
            Node::Element(element) => {
                if !SKIPPED_ELEMENTS.contains(&element.name()) {
                    collect_text(child, out);
                }
            }
            // Comments, doctypes, and processing instructions carry no text
            _ => {}
        }
    }
}

/// Extracts deduplicated, normalized outlinks with anchor text
fn extract_outlinks(document: &Html, base_url: &Url) -> Vec<Outlink> {
    let mut outlinks = Vec::new();
    let mut seen = HashSet::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                if let Some(resolved) = resolve_link(href, base_url) {
                    if seen.insert(resolved.clone()) {
                        outlinks.push(Outlink {
                            url: resolved,
                            anchor: collapse_whitespace(&element.text().collect::<String>()),
                        });
                    }
                }
            }
        }
    }

    outlinks
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None for hrefs that should be excluded: special schemes,
/// fragment-only anchors, unresolvable references, and non-http(s) targets.
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    for scheme in ["javascript:", "mailto:", "data:", "tel:"] {
        if lowered.starts_with(scheme) {
            return None;
        }
    }

    let joined = base_url.join(href).ok()?;
    normalize_url(joined.as_str()).ok().map(|url| url.to_string())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_chars(text: String, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        text
    } else {
        text.chars().take(max_chars).collect()
    }
}
