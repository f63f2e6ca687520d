//! DBLP profile page scraping.
//!
//! Fetches an author's profile page and extracts structured publication
//! records from its markup. Extraction is best-effort: every missing field
//! degrades to a fixed sentinel string, and entries repeating an
//! already-seen title are dropped so titles are unique per page.

use crate::error::{DblpError, Result};
use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tracing::{debug, info};

/// Sentinel for a missing title node
pub const NO_TITLE: &str = "No Title";
/// Sentinel for an entry with zero author nodes
pub const NO_AUTHORS: &str = "No Author Info";
/// Sentinel for a missing publication year
pub const NO_YEAR: &str = "No Year";
/// Sentinel for a missing head anchor
pub const NO_LINK: &str = "No Link";
/// Sentinel for an entry without a type icon
pub const NO_TYPE: &str = "No Type";
/// Sentinel for a missing abstract node
pub const NO_ABSTRACT: &str = "No Abstract";

/// Trailing UI artifact DBLP appends to expanded abstracts
const LESS_MARKER: &str = "△ Less";

/// One publication extracted from a profile page.
///
/// Serialized with the capitalized keys the persisted JSON file uses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    /// Publication title (deduplication key)
    #[serde(rename = "Title")]
    pub title: String,
    /// Comma-joined author names
    #[serde(rename = "Authors")]
    pub authors: String,
    /// Publication year as printed on the page
    #[serde(rename = "Year")]
    pub year: String,
    /// Link from the entry's head anchor (absolute or relative)
    #[serde(rename = "Link")]
    pub link: String,
    /// Venue type label taken from the entry's icon
    #[serde(rename = "Type")]
    pub kind: String,
    /// Abstract/snippet text
    #[serde(rename = "Description")]
    pub description: String,
}

/// Fetch a profile page and extract its publications.
///
/// # Errors
///
/// Returns `DblpError::Upstream` on a non-success status and
/// `DblpError::Network` on transport failure. Callers that want the
/// original fail-open behavior collapse these to an empty list.
pub async fn extract_publications(
    client: &reqwest::Client,
    profile_url: &str,
) -> Result<Vec<Publication>> {
    debug!(url = profile_url, "Fetching profile page");

    let response = client.get(profile_url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DblpError::Upstream {
            code: status.as_u16() as i32,
            message: format!("profile fetch returned {}", status),
        });
    }

    let html = response.text().await?;
    let publications = parse_profile(&html)?;
    info!(url = profile_url, count = publications.len(), "Extracted publications");
    Ok(publications)
}

/// Parse profile page HTML into publication records.
///
/// Scans every `li.entry` node in document order. The first occurrence of
/// a title wins; later entries with identical title text are skipped
/// entirely, even when their other fields differ.
pub fn parse_profile(html: &str) -> Result<Vec<Publication>> {
    let document = Html::parse_document(html);

    let entry_selector =
        Selector::parse("li.entry").map_err(|e| DblpError::Parse(e.to_string()))?;
    let title_selector =
        Selector::parse("span.title").map_err(|e| DblpError::Parse(e.to_string()))?;
    let author_selector = Selector::parse(r#"span[itemprop="author"]"#)
        .map_err(|e| DblpError::Parse(e.to_string()))?;
    let abstract_selector =
        Selector::parse("span.abstract").map_err(|e| DblpError::Parse(e.to_string()))?;
    let year_selector = Selector::parse(r#"span[itemprop="datePublished"]"#)
        .map_err(|e| DblpError::Parse(e.to_string()))?;
    let head_selector =
        Selector::parse("div.head").map_err(|e| DblpError::Parse(e.to_string()))?;
    let anchor_selector = Selector::parse("a").map_err(|e| DblpError::Parse(e.to_string()))?;
    let img_selector = Selector::parse("img").map_err(|e| DblpError::Parse(e.to_string()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut publications = Vec::new();

    for entry in document.select(&entry_selector) {
        let title = entry
            .select(&title_selector)
            .next()
            .map(|t| t.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| NO_TITLE.to_string());

        // Title is the sole deduplication key
        if !seen.insert(title.clone()) {
            continue;
        }

        let author_names: Vec<String> = entry
            .select(&author_selector)
            .map(|a| a.text().collect::<String>().trim().to_string())
            .collect();
        let authors = if author_names.is_empty() {
            NO_AUTHORS.to_string()
        } else {
            author_names.join(", ")
        };

        let description = entry
            .select(&abstract_selector)
            .next()
            .map(|s| {
                s.text()
                    .collect::<String>()
                    .trim()
                    .replace(LESS_MARKER, "")
                    .trim()
                    .to_string()
            })
            .unwrap_or_else(|| NO_ABSTRACT.to_string());

        let year = entry
            .select(&year_selector)
            .next()
            .map(|y| y.text().collect::<String>().trim().to_string())
            .unwrap_or_else(|| NO_YEAR.to_string());

        let link = entry
            .select(&head_selector)
            .next()
            .and_then(|head| head.select(&anchor_selector).next())
            .and_then(|a| a.value().attr("href"))
            .map(str::to_string)
            .unwrap_or_else(|| NO_LINK.to_string());

        let kind = entry
            .select(&img_selector)
            .next()
            .and_then(|img| img.value().attr("title"))
            .map(str::to_string)
            .unwrap_or_else(|| NO_TYPE.to_string());

        publications.push(Publication {
            title,
            authors,
            year,
            link,
            kind,
            description,
        });
    }

    Ok(publications)
}
